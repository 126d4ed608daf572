use std::sync::atomic::{AtomicU64, Ordering};

/// Process-lifetime ticket sequence. Starts at zero on every launch.
#[derive(Debug, Default)]
pub struct TicketCounter {
    value: AtomicU64,
}

impl TicketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the new ticket number.
    pub fn next(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}

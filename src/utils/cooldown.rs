use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mockable::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("You can open another ticket in {remaining_secs} seconds.")]
pub struct CooldownActive {
    pub remaining_secs: u64,
}

/// Per-user minimum interval between ticket creations.
///
/// Checking and recording happen under the map's per-key entry lock, so two
/// attempts racing for the same user cannot both pass.
pub struct CooldownTracker {
    window: TimeDelta,
    entries: DashMap<u64, DateTime<Utc>>,
    latest_ms: AtomicI64,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl CooldownTracker {
    pub fn new(window: Duration, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            window: TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX),
            entries: DashMap::new(),
            latest_ms: AtomicI64::new(i64::MIN),
            clock,
        }
    }

    /// Record a creation for `user_id` unless its previous one is too recent.
    pub fn try_acquire(&self, user_id: u64) -> Result<DateTime<Utc>, CooldownActive> {
        let now = self.clock.utc();

        match self.entries.entry(user_id) {
            Entry::Occupied(mut entry) => {
                let elapsed = now - *entry.get();
                if elapsed < self.window {
                    let remaining_ms = (self.window - elapsed).num_milliseconds().max(0);
                    return Err(CooldownActive {
                        remaining_secs: (remaining_ms as u64).div_ceil(1000),
                    });
                }
                entry.insert(now);
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
            }
        }

        self.latest_ms
            .fetch_max(now.timestamp_millis(), Ordering::SeqCst);
        Ok(now)
    }

    /// Forget a reservation whose ticket was never created.
    pub fn release(&self, user_id: u64) {
        self.entries.remove(&user_id);
    }

    #[cfg(test)]
    pub fn last_created(&self, user_id: u64) -> Option<DateTime<Utc>> {
        self.entries.get(&user_id).map(|entry| *entry.value())
    }

    /// Most recent creation across all users, including swept entries.
    pub fn latest(&self) -> Option<DateTime<Utc>> {
        match self.latest_ms.load(Ordering::SeqCst) {
            i64::MIN => None,
            ms => DateTime::from_timestamp_millis(ms),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop entries whose window has already passed. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.utc();
        let before = self.entries.len();
        self.entries.retain(|_, last| now - *last < self.window);
        before.saturating_sub(self.entries.len())
    }
}

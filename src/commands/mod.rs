pub mod admin;
pub mod claim_ticket;
pub mod close_ticket;
pub mod error;
pub mod open_ticket;
pub mod resolve_ticket;
pub mod send_message;

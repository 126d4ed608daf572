pub mod config;
pub mod cooldown;
pub mod countdown;
pub mod credentials;
pub mod database;
pub mod permissions;
pub mod reason;
pub mod ticket;
pub mod ticket_counter;
pub mod ticket_log;

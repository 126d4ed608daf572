pub mod access;
pub mod command_handler;
pub mod components;

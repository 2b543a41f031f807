pub mod channel;
pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod message;
pub mod outbound;
pub mod replies;
pub mod server;
pub mod state;

pub mod actions;
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod keepalive;
pub mod keyboard;
pub mod quiz;
pub mod schema;
pub mod state;
pub mod store;
pub mod vocab;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

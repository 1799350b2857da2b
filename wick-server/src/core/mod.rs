//! Core module: configuration, state and server lifecycle

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{Server, build_app, build_app_with_state};
pub use state::ServerState;

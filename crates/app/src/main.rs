//! Inkpad - single-user-session notepad service
//!
//! A terminal front-end over the core account, note, and OTP workflows.
//! Each command maps to one request/response pair against the controllers.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod controller;
mod flash;
mod state;
mod terminal;

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Inkpad");

    let config_path = std::env::var_os("INKPAD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(config::AppConfig::default_path);
    let config = match config::AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(data_dir = %config.data_dir.display(), "configuration loaded");

    // Initialize application state
    let app_state = match state::AppState::new(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = terminal::run(app_state) {
        tracing::error!("Terminal session failed: {}", e);
        std::process::exit(1);
    }
}

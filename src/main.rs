//! Student Registry - Entry Point
//!
//! Registration and authentication service for student records.

use log::{error, info};
use std::process::ExitCode;

use student_registry::Server;
use student_registry::config::ServerConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOG overrides the default filter
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Launching student registry...");

    let server = match Server::from_config(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    server.start().await;
    ExitCode::SUCCESS
}

//! # Inkpost Blog Server
//!
//! The main entry point for the Actix-web HTML server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;
mod views;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::{AppState, Storage};
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Inkpost blog server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(config.database.as_ref()).await;

    if config.seed_demo_content {
        if state.storage == Storage::InMemory {
            if let Err(e) = state.seed_demo_content().await {
                tracing::error!("Failed to seed demo content: {}", e);
            }
        } else {
            tracing::warn!("SEED_DEMO_CONTENT ignored outside in-memory mode");
        }
    }

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

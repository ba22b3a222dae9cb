//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str = "info,blog_server=debug,inkpost_infra=debug";

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Emit JSON lines instead of the pretty human format.
    pub json_logs: bool,
    pub service_name: String,
}

impl TelemetryConfig {
    /// `LOG_FORMAT=json` switches to JSON output; anything else is pretty.
    pub fn from_env() -> Self {
        Self {
            json_logs: std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
            service_name: std::env::var("SERVICE_NAME").unwrap_or_else(|_| "inkpost".to_string()),
        }
    }
}

/// `RUST_LOG` when set and valid, the built-in directives otherwise.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_telemetry(config: &TelemetryConfig) {
    let registry = tracing_subscriber::registry().with(env_filter());

    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
}

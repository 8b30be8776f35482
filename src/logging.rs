use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{Result, StatsError};

/// Sets up the logging subscriber for the application.
///
/// # Arguments
/// * `component` - Crate or binary target whose events pass the default filter
///
/// `RUST_LOG` overrides the default filter when set. Fails instead of
/// panicking when a global subscriber is already installed.
pub fn init_logger(component: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", component, Level::INFO)));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| StatsError::Config(format!("Failed to initialize logger: {}", e)))
}

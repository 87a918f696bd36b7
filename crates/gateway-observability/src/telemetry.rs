use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging.
///
/// - Emits JSON log lines via `tracing_subscriber`, filtered by `RUST_LOG` (default `info`).
/// - `try_init` also bridges `log` records into `tracing`, so the actix access log
///   shows up in the same stream.
///
/// Fails if a global subscriber or `log` logger is already installed.
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // with_current_span + with_span_list put the request span (and the identity span)
    // on every line emitted while handling a request.
    let formatting_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatting_layer)
        .try_init()?;

    tracing::info!(service = service_name, "telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_once_and_bridges_log_records() {
        init_telemetry("gateway-test").unwrap();

        assert!(log::log_enabled!(target: "auth_gateway::access", log::Level::Error));
        assert!(init_telemetry("gateway-test").is_err());
    }
}

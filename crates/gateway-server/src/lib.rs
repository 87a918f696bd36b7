//! Server lifecycle: load configuration, build the identity delegate, bind, serve.

use actix_web::{dev::Server, HttpServer};
use std::io;
use std::net::TcpListener;
use std::sync::Arc;

use gateway_actix::build_app;
use gateway_config::Config;
use gateway_core::ConfigError;
use gateway_identity::{Identity, IdentityOptions};
use gateway_observability::{init_telemetry, ObservedIdentity};
use gateway_ports::DynIdentity;

pub const SERVICE_NAME: &str = "auth-gateway";

/// Entry point used by the binary. Returns an error (non-zero exit) on bad
/// configuration or when the port cannot be bound; otherwise runs until killed.
pub async fn run() -> io::Result<()> {
    // A missing .env file is normal in deployed environments.
    let _ = dotenvy::dotenv();

    if let Err(e) = init_telemetry(SERVICE_NAME) {
        eprintln!("failed to initialize telemetry: {e}");
    }

    let config = Config::load().map_err(startup_error)?;
    tracing::info!(config = ?config.sanitized(), "configuration loaded");

    let identity = build_identity(&config).map_err(startup_error)?;

    let listener = bind_listener(&config.server.host, config.server.port).map_err(|e| {
        tracing::error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "failed to bind"
        );
        e
    })?;

    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Server is running on port {}", addr.port());

    serve(listener, config, identity)?.await
}

/// Build the identity delegate from configuration, failing fast on missing secrets.
pub fn build_identity(config: &Config) -> Result<DynIdentity, ConfigError> {
    let options = IdentityOptions::from_config(config);
    let identity = Identity::connect(options)?;

    let options = identity.options();
    tracing::info!(
        service_url = %options.service_url,
        email_and_password = options.email_and_password.enabled,
        social_providers = ?options.social_providers.enabled(),
        database = ?options.database.as_ref().map(|db| db.provider.as_str()),
        "identity delegate configured"
    );

    Ok(Arc::new(ObservedIdentity::new(Arc::new(identity))))
}

/// Bind the listening socket. No retry: a taken or invalid port is fatal.
pub fn bind_listener(host: &str, port: u16) -> io::Result<TcpListener> {
    TcpListener::bind((host, port))
}

/// Start serving on an already-bound listener. The returned server must be awaited
/// (or spawned) to make progress.
pub fn serve(listener: TcpListener, config: Config, identity: DynIdentity) -> io::Result<Server> {
    let server = HttpServer::new(move || build_app(&config, identity.clone()))
        .listen(listener)?
        .run();

    Ok(server)
}

fn startup_error(err: ConfigError) -> io::Error {
    tracing::error!(error = %err, "invalid configuration");
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

pub use gateway_server::{bind_listener, build_identity, run, serve, SERVICE_NAME};

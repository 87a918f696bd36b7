//! Library exports.
//!
//! The gateway is split into small crates under `crates/`. This facade keeps one
//! stable import path (`auth_gateway::...`) for the binary, integration tests and
//! anyone embedding the gateway in a larger actix application.

pub mod config;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod server;
pub mod telemetry;

pub use gateway_actix::{build_app, configure};
pub use gateway_core::{ConfigError, GatewayError, IdentityRequest, IdentityResponse, ParsedBody};
pub use gateway_ports::{DynIdentity, IdentityDelegate};

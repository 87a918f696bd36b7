//! Actix-web HTTP surface for the auth gateway.
//!
//! This crate contains the framework-specific code: the middleware pipeline,
//! the route table and the handler that bridges `/api/auth/*` to the identity
//! delegate. Domain types live in `gateway-core`; the delegate is abstracted
//! behind `gateway-ports`.

pub mod app;
pub mod handlers;
pub mod middleware;

pub use app::{build_app, configure};

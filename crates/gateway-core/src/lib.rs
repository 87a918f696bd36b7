//! Framework-agnostic types shared by the auth gateway crates.
//!
//! Nothing in here knows about Actix or reqwest; the HTTP layer and the identity
//! delegate both speak in terms of these envelopes.

pub mod models;

pub use models::*;

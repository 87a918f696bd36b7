//! Integration ports for the auth gateway.
//!
//! Implement these traits in your own crate to put a different identity/session
//! library behind the `/api/auth` mount without touching the HTTP pipeline.

pub mod identity;

pub use identity::*;

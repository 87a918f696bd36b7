pub mod auth;
pub mod root;

pub use auth::{forward, ForwardLimit};
pub use root::{hello, not_found, GREETING};

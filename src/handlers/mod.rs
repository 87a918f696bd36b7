// Compatibility facade over `gateway-actix` handlers.
pub use gateway_actix::handlers::*;

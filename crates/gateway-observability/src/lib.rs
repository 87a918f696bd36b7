pub mod identity;
pub mod telemetry;

pub use identity::ObservedIdentity;
pub use telemetry::init_telemetry;

pub use gateway_observability::telemetry::*;

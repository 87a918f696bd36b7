pub use gateway_identity::*;
pub use gateway_observability::ObservedIdentity;

pub use gateway_actix::middleware::*;

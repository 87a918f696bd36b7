pub use gateway_config::*;

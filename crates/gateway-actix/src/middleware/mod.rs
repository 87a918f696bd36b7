pub mod access_log;
pub mod body_parser;
pub mod cors;
pub mod security_headers;

pub use access_log::{access_logger, ACCESS_LOG_FORMAT};
pub use body_parser::{BodyKind, BodyParser, DEFAULT_PARAMETER_LIMIT};
pub use cors::{cors_policy, ALLOWED_METHODS};
pub use security_headers::security_headers;

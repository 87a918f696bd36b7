use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "actix")]
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Error returned to HTTP callers as `{"code": ..., "message": ...}`.
///
/// The status is carried alongside but never serialized.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GatewayError {
    pub code: String,
    pub message: String,
    #[serde(skip)]
    pub status: u16,
}

impl GatewayError {
    pub fn new(status: u16, code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            status,
        }
    }

    pub fn malformed_json(description: &str) -> Self {
        Self::new(400, "MALFORMED_JSON", description)
    }

    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            413,
            "PAYLOAD_TOO_LARGE",
            &format!("request body exceeds the {limit} byte limit"),
        )
    }

    pub fn too_many_parameters(limit: usize) -> Self {
        Self::new(
            413,
            "TOO_MANY_PARAMETERS",
            &format!("form body has more than {limit} parameters"),
        )
    }

    pub fn payload_error(description: &str) -> Self {
        Self::new(400, "INVALID_BODY", description)
    }

    pub fn provider_not_found(provider: &str) -> Self {
        Self::new(
            404,
            "PROVIDER_NOT_FOUND",
            &format!("social provider `{provider}` is not enabled"),
        )
    }

    pub fn email_password_disabled() -> Self {
        Self::new(
            400,
            "EMAIL_PASSWORD_DISABLED",
            "email and password authentication is not enabled",
        )
    }

    pub fn identity_unavailable(description: &str) -> Self {
        Self::new(502, "IDENTITY_SERVICE_UNAVAILABLE", description)
    }

    pub fn internal(description: &str) -> Self {
        Self::new(500, "INTERNAL_SERVER_ERROR", description)
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.status, self.message)
    }
}

impl std::error::Error for GatewayError {}

#[cfg(feature = "actix")]
impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Startup-time configuration failures. All of these are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("social provider `{provider}` is enabled but `{field}` is not set")]
    MissingProviderSecret {
        provider: String,
        field: &'static str,
    },

    #[error("invalid identity service url `{url}`: {reason}")]
    InvalidServiceUrl { url: String, reason: String },

    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("failed to load configuration: {0}")]
    Load(String),
}

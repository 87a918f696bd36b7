//! The configured identity handle mounted under `/api/auth`.
//!
//! `Identity` owns the capability switches (email/password, social providers)
//! and answers requests for disabled capabilities itself. Everything else goes
//! to a backend delegate, normally [`UpstreamIdentity`] talking to the external
//! identity service.

pub mod options;
pub mod routes;
pub mod upstream;

use async_trait::async_trait;
use http::StatusCode;
use std::sync::Arc;

use gateway_core::{ConfigError, GatewayError, IdentityRequest, IdentityResponse};
use gateway_ports::{DynIdentity, IdentityDelegate};

pub use options::*;
pub use routes::AuthRoute;
pub use upstream::UpstreamIdentity;

pub struct Identity {
    options: IdentityOptions,
    backend: DynIdentity,
}

impl Identity {
    /// Validate `options` and put `backend` behind them.
    ///
    /// Fails when an enabled social provider is missing credentials, so a
    /// misconfigured provider never looks like a disabled one.
    pub fn new(options: IdentityOptions, backend: DynIdentity) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { options, backend })
    }

    /// Validate `options` and forward to the identity service they name.
    pub fn connect(options: IdentityOptions) -> Result<Self, ConfigError> {
        let upstream = UpstreamIdentity::new(&options.service_url, options.timeout)?;
        Self::new(options, Arc::new(upstream))
    }

    pub fn options(&self) -> &IdentityOptions {
        &self.options
    }

    /// Answer locally when the route needs a capability that is switched off.
    fn refuse(&self, route: &AuthRoute, request: &IdentityRequest) -> Option<GatewayError> {
        if route.uses_email_and_password() && !self.options.email_and_password.enabled {
            return Some(GatewayError::email_password_disabled());
        }

        match route {
            AuthRoute::Callback { provider } if !self.options.social_providers.is_enabled(provider) => {
                Some(GatewayError::provider_not_found(provider))
            }
            AuthRoute::SignInSocial => {
                let provider = request
                    .parsed
                    .as_ref()
                    .and_then(|body| body.field("provider"));
                match provider {
                    Some(p) if self.options.social_providers.is_enabled(p) => None,
                    Some(p) => Some(GatewayError::provider_not_found(p)),
                    // Let the identity service report its own validation error.
                    None => None,
                }
            }
            _ => None,
        }
    }
}

#[async_trait]
impl IdentityDelegate for Identity {
    async fn handle(&self, request: IdentityRequest) -> Result<IdentityResponse, GatewayError> {
        let route = AuthRoute::parse(&request.method, &request.path);

        if route == AuthRoute::Ok {
            return IdentityResponse::json(StatusCode::OK, &serde_json::json!({ "ok": true }));
        }

        if let Some(err) = self.refuse(&route, &request) {
            tracing::debug!(route = route.as_str(), code = %err.code, "identity capability refused");
            return Ok(IdentityResponse::from_error(&err));
        }

        self.backend.handle(request).await
    }

    fn name(&self) -> &str {
        self.backend.name()
    }
}

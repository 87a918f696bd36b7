use async_trait::async_trait;
use http::{header, HeaderValue};
use std::time::Duration;

use gateway_core::{
    strip_hop_by_hop, ConfigError, GatewayError, IdentityRequest, IdentityResponse, AUTH_MOUNT,
};
use gateway_ports::IdentityDelegate;

/// Forwards identity requests to the external identity service over HTTP.
///
/// Redirects are never followed: OAuth flows depend on the browser seeing them.
pub struct UpstreamIdentity {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamIdentity {
    pub fn new(service_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::InvalidServiceUrl {
                url: service_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: service_url.trim_end_matches('/').to_string(),
        })
    }

    fn target(&self, request: &IdentityRequest) -> String {
        format!("{}{}{}", self.base_url, AUTH_MOUNT, request.path_and_query())
    }
}

#[async_trait]
impl IdentityDelegate for UpstreamIdentity {
    async fn handle(&self, request: IdentityRequest) -> Result<IdentityResponse, GatewayError> {
        let target = self.target(&request);

        let mut headers = request.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::CONTENT_LENGTH);
        if let Some(host) = headers.remove(header::HOST) {
            headers.entry("x-forwarded-host").or_insert(host);
        }

        let upstream = self
            .client
            .request(request.method, &target)
            .headers(headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(target_url = %target, error = %e, "identity service request failed");
                GatewayError::identity_unavailable("identity service is unavailable")
            })?;

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        strip_hop_by_hop(&mut headers);

        let body = upstream.bytes().await.map_err(|e| {
            tracing::warn!(target_url = %target, error = %e, "identity service response was cut short");
            GatewayError::identity_unavailable("identity service response was incomplete")
        })?;

        // The body is fully buffered, so any upstream length header no longer applies.
        headers.remove(header::CONTENT_LENGTH);
        if !body.is_empty() && !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            );
        }

        Ok(IdentityResponse {
            status,
            headers,
            body,
        })
    }

    fn name(&self) -> &str {
        "upstream"
    }
}

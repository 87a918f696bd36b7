use async_trait::async_trait;
use std::time::Instant;
use tracing::{field, Instrument};

use gateway_core::{GatewayError, IdentityRequest, IdentityResponse};
use gateway_ports::{DynIdentity, IdentityDelegate};

/// A thin wrapper around a `DynIdentity` that creates a tracing span for each delegate call.
///
/// Request spans created by the actix middleware extend through the auth handler
/// down into the identity service call.
pub struct ObservedIdentity {
    inner: DynIdentity,
}

impl ObservedIdentity {
    pub fn new(inner: DynIdentity) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl IdentityDelegate for ObservedIdentity {
    async fn handle(&self, request: IdentityRequest) -> Result<IdentityResponse, GatewayError> {
        // Never log query strings here: OAuth callbacks carry codes and state in them.
        let span = tracing::info_span!(
            "identity",
            delegate = %self.inner.name(),
            method = %request.method,
            path = %request.path,
            status = field::Empty,
            elapsed_ms = field::Empty,
        );

        let start = Instant::now();
        async move {
            let result = self.inner.handle(request).await;
            let span = tracing::Span::current();
            span.record("elapsed_ms", start.elapsed().as_millis() as u64);

            match &result {
                Ok(resp) => {
                    span.record("status", resp.status.as_u16());
                    tracing::debug!("identity call completed");
                }
                Err(err) => {
                    span.record("status", err.status);
                    tracing::warn!(code = %err.code, "identity call failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

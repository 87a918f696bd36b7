use async_trait::async_trait;
use std::sync::Arc;

use gateway_core::{GatewayError, IdentityRequest, IdentityResponse};

/// The identity delegate: everything under the auth mount prefix is handed here.
///
/// Implementations own sign-up, sign-in, callbacks, sessions and sign-out. The
/// gateway neither inspects nor rewrites the response.
#[async_trait]
pub trait IdentityDelegate: Send + Sync {
    /// Handle one request. Any method and any sub-path must be accepted.
    ///
    /// An `Err` means the delegate could not produce a response at all (e.g. the
    /// backing service is unreachable); protocol-level failures belong in the
    /// returned `IdentityResponse`.
    async fn handle(&self, request: IdentityRequest) -> Result<IdentityResponse, GatewayError>;

    /// Short name for logs and spans.
    fn name(&self) -> &str {
        "identity"
    }
}

pub type DynIdentity = Arc<dyn IdentityDelegate>;

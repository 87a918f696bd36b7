#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};
use std::sync::{Arc, Mutex};

use auth_gateway::config::Config;
use auth_gateway::{DynIdentity, GatewayError, IdentityDelegate, IdentityRequest, IdentityResponse};

pub const FRONTEND: &str = "http://localhost:5173";

/// Identity delegate double: records every request and answers with a fixed response.
pub struct RecordingIdentity {
    pub requests: Mutex<Vec<IdentityRequest>>,
    response: Result<IdentityResponse, GatewayError>,
}

impl RecordingIdentity {
    pub fn new() -> Arc<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert(
            "set-cookie",
            HeaderValue::from_static("better-auth.session_token=abc; HttpOnly; Path=/"),
        );
        headers.insert("x-identity", HeaderValue::from_static("recorded"));

        Self::responding(Ok(IdentityResponse {
            status: StatusCode::CREATED,
            headers,
            body: Bytes::from_static(br#"{"user":{"id":"u_1"}}"#),
        }))
    }

    pub fn responding(response: Result<IdentityResponse, GatewayError>) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            response,
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> IdentityRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("identity delegate was not called")
    }
}

#[async_trait]
impl IdentityDelegate for RecordingIdentity {
    async fn handle(&self, request: IdentityRequest) -> Result<IdentityResponse, GatewayError> {
        self.requests.lock().unwrap().push(request);
        self.response.clone()
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub fn dyn_identity(identity: &Arc<RecordingIdentity>) -> DynIdentity {
    identity.clone()
}

pub fn test_config(vars: &[(&str, &str)]) -> Config {
    let mut all: Vec<(String, String)> = vec![
        ("FRONTEND_URL".to_string(), FRONTEND.to_string()),
        ("GOOGLE_CLIENT_ID".to_string(), "test-client-id".to_string()),
        ("GOOGLE_CLIENT_SECRET".to_string(), "test-client-secret".to_string()),
    ];
    for (k, v) in vars {
        all.retain(|(key, _)| key != k);
        all.push((k.to_string(), v.to_string()));
    }

    Config::from_lookup(move |key| {
        all.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("test config")
}

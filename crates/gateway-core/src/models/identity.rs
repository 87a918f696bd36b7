use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use serde::Serialize;

use super::{GatewayError, ParsedBody};

/// Path prefix reserved for the identity delegate.
pub const AUTH_MOUNT: &str = "/api/auth";

/// Connection-scoped headers that must not be copied across a forwarding hop.
pub const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
}

/// Remove hop-by-hop headers, including any named by the `Connection` header.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
        .collect();

    for name in HOP_BY_HOP_HEADERS.iter().copied() {
        headers.remove(name);
    }
    for name in named {
        headers.remove(name.as_str());
    }
}

/// A request handed to the identity delegate.
///
/// `path` is relative to the auth mount prefix and always starts with `/`.
#[derive(Debug, Clone)]
pub struct IdentityRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub parsed: Option<ParsedBody>,
}

impl IdentityRequest {
    pub fn new(method: Method, path: &str) -> Self {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Self {
            method,
            path,
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            parsed: None,
        }
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = if query.is_empty() {
            None
        } else {
            Some(query.to_string())
        };
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    pub fn with_parsed(mut self, parsed: Option<ParsedBody>) -> Self {
        self.parsed = parsed;
        self
    }

    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }
}

/// The delegate's answer; passed back to the client as-is.
#[derive(Debug, Clone)]
pub struct IdentityResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IdentityResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Self, GatewayError> {
        let body = serde_json::to_vec(value).map_err(|e| GatewayError::internal(&e.to_string()))?;
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        Ok(Self {
            status,
            headers,
            body: Bytes::from(body),
        })
    }

    /// Render a gateway error in the same `{code, message}` shape the HTTP layer uses.
    pub fn from_error(err: &GatewayError) -> Self {
        let status = StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::json(status, err).unwrap_or_else(|_| Self::new(status))
    }
}

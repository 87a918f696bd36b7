use actix_web::{
    http::{header, StatusCode},
    web, HttpMessage, HttpRequest, HttpResponse, Result,
};

use gateway_config::DEFAULT_BODY_LIMIT;
use gateway_core::{is_hop_by_hop, GatewayError, IdentityRequest, IdentityResponse, ParsedBody, AUTH_MOUNT};
use gateway_ports::DynIdentity;

use crate::middleware::body_parser::read_body;

/// Largest body forwarded to the identity delegate, registered as app data.
#[derive(Debug, Clone, Copy)]
pub struct ForwardLimit(pub usize);

/// Catch-all for `/api/auth/*`, every method.
///
/// Method, headers, query and body go to the identity delegate as received; its
/// status, headers and body come back unchanged. The body is read from the raw
/// payload so compressed requests reach the delegate exactly as sent.
pub async fn forward(
    req: HttpRequest,
    payload: web::Payload,
    identity: web::Data<DynIdentity>,
) -> Result<HttpResponse, GatewayError> {
    let limit = req
        .app_data::<ForwardLimit>()
        .map_or(DEFAULT_BODY_LIMIT, |l| l.0);
    let body = read_body(payload, limit).await?;

    let request = identity_request(&req, body)?;
    let response = identity.handle(request).await?;
    Ok(http_response(response))
}

fn identity_request(req: &HttpRequest, body: web::Bytes) -> Result<IdentityRequest, GatewayError> {
    let method = http::Method::from_bytes(req.method().as_str().as_bytes())
        .map_err(|e| GatewayError::internal(&e.to_string()))?;

    let mut headers = http::HeaderMap::with_capacity(req.headers().len());
    for (name, value) in req.headers().iter() {
        let name = http::HeaderName::from_bytes(name.as_str().as_bytes());
        let value = http::HeaderValue::from_bytes(value.as_bytes());
        if let (Ok(name), Ok(value)) = (name, value) {
            headers.append(name, value);
        }
    }

    let sub_path = req.path().strip_prefix(AUTH_MOUNT).unwrap_or("/");
    let parsed = req.extensions().get::<ParsedBody>().cloned();

    Ok(IdentityRequest::new(method, sub_path)
        .with_query(req.query_string())
        .with_headers(headers)
        .with_body(body)
        .with_parsed(parsed))
}

fn http_response(resp: IdentityResponse) -> HttpResponse {
    let status = StatusCode::from_u16(resp.status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = HttpResponse::build(status);

    for (name, value) in resp.headers.iter() {
        // Actix frames the body itself.
        if is_hop_by_hop(name.as_str()) || *name == http::header::CONTENT_LENGTH {
            continue;
        }
        let name = header::HeaderName::from_bytes(name.as_str().as_bytes());
        let value = header::HeaderValue::from_bytes(value.as_bytes());
        if let (Ok(name), Ok(value)) = (name, value) {
            builder.append_header((name, value));
        }
    }

    builder.body(resp.body)
}

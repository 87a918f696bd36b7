use actix_web::{http::header, middleware::DefaultHeaders};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self';base-uri 'self';\
font-src 'self' https: data:;form-action 'self';frame-ancestors 'self';\
img-src 'self' data:;object-src 'none';script-src 'self';script-src-attr 'none';\
style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests";

/// Standard hardening headers for every response.
///
/// `DefaultHeaders` only fills in headers the response does not already carry, so
/// anything the identity delegate sets wins.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY))
        .add(("cross-origin-opener-policy", "same-origin"))
        .add(("cross-origin-resource-policy", "same-origin"))
        .add(("origin-agent-cluster", "?1"))
        .add((header::REFERRER_POLICY, "no-referrer"))
        .add((
            "strict-transport-security",
            "max-age=31536000; includeSubDomains",
        ))
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add(("x-dns-prefetch-control", "off"))
        .add(("x-download-options", "noopen"))
        .add((header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .add(("x-permitted-cross-domain-policies", "none"))
        .add(("x-xss-protection", "0"))
}

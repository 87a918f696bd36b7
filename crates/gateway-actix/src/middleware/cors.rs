use actix_cors::Cors;

pub const ALLOWED_METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];

/// CORS policy: one credentialed frontend origin, or no cross-origin access at all.
///
/// Requests from any other origin are passed through without CORS headers, so the
/// browser rejects the response rather than the server erroring.
pub fn cors_policy(frontend_url: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(ALLOWED_METHODS)
        .allow_any_header()
        .supports_credentials()
        .block_on_origin_mismatch(false)
        .max_age(3600);

    match frontend_url.map(|url| url.trim().trim_end_matches('/')) {
        Some(origin) if !origin.is_empty() => cors.allowed_origin(origin),
        _ => cors,
    }
}

use actix_web::{http::header::ContentType, HttpRequest, HttpResponse};

pub const GREETING: &str = "Hello World!";

/// `GET /`
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(GREETING)
}

/// Fallback for every unrouted path/method pair.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::plaintext())
        .body(format!("Cannot {} {}", req.method(), req.path()))
}

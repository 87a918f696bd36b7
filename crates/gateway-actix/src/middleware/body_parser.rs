use actix_http::encoding::Decoder;
use actix_web::{
    body::EitherBody,
    dev::{self, forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web::{Bytes, BytesMut},
    Error, HttpMessage, ResponseError,
};
use futures::{future::LocalBoxFuture, Stream, StreamExt};
use std::fmt::Display;
use std::future::{ready, Ready};
use std::pin::pin;
use std::rc::Rc;
use url::form_urlencoded;

use gateway_core::{GatewayError, ParsedBody};

/// Maximum number of fields accepted in a urlencoded body.
pub const DEFAULT_PARAMETER_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    UrlEncoded,
}

impl BodyKind {
    fn mime(self) -> &'static str {
        match self {
            BodyKind::Json => "application/json",
            BodyKind::UrlEncoded => "application/x-www-form-urlencoded",
        }
    }

    fn matches(self, content_type: &str) -> bool {
        content_type.eq_ignore_ascii_case(self.mime())
    }

    fn parse(self, body: &[u8], parameter_limit: usize) -> Result<ParsedBody, GatewayError> {
        match self {
            BodyKind::Json => serde_json::from_slice(body)
                .map(ParsedBody::Json)
                .map_err(|e| GatewayError::malformed_json(&e.to_string())),
            BodyKind::UrlEncoded => {
                let pairs: Vec<(String, String)> =
                    form_urlencoded::parse(body).into_owned().collect();
                if pairs.len() > parameter_limit {
                    return Err(GatewayError::too_many_parameters(parameter_limit));
                }
                Ok(ParsedBody::Form(pairs))
            }
        }
    }
}

/// Body-parsing stage.
///
/// Requests whose content type matches `kind` are buffered (up to `limit` bytes)
/// and decoded, inflating any `Content-Encoding` first. A decoding failure
/// short-circuits with a 4xx response and the route handler never runs. On
/// success the decoded body is stored in the request extensions as a
/// [`ParsedBody`] and the wire bytes are put back so downstream handlers still
/// see them unchanged.
pub struct BodyParser {
    kind: BodyKind,
    limit: usize,
    parameter_limit: usize,
}

impl BodyParser {
    pub fn json(limit: usize) -> Self {
        Self {
            kind: BodyKind::Json,
            limit,
            parameter_limit: DEFAULT_PARAMETER_LIMIT,
        }
    }

    pub fn urlencoded(limit: usize) -> Self {
        Self {
            kind: BodyKind::UrlEncoded,
            limit,
            parameter_limit: DEFAULT_PARAMETER_LIMIT,
        }
    }

    pub fn parameter_limit(mut self, parameter_limit: usize) -> Self {
        self.parameter_limit = parameter_limit;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for BodyParser
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BodyParserService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BodyParserService {
            service: Rc::new(service),
            kind: self.kind,
            limit: self.limit,
            parameter_limit: self.parameter_limit,
        }))
    }
}

pub struct BodyParserService<S> {
    service: Rc<S>,
    kind: BodyKind,
    limit: usize,
    parameter_limit: usize,
}

impl<S, B> Service<ServiceRequest> for BodyParserService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();

        if !self.kind.matches(req.content_type()) {
            return Box::pin(async move {
                svc.call(req).await.map(ServiceResponse::map_into_left_body)
            });
        }

        let kind = self.kind;
        let limit = self.limit;
        let parameter_limit = self.parameter_limit;

        Box::pin(async move {
            if declared_length(&req).is_some_and(|len| len > limit) {
                return Ok(reject(req, GatewayError::payload_too_large(limit)));
            }

            let raw = match read_body(req.take_payload(), limit).await {
                Ok(raw) => raw,
                Err(err) => return Ok(reject(req, err)),
            };

            let body = if is_encoded(&req) {
                let decoder = Decoder::from_headers(bytes_to_payload(raw.clone()), req.headers());
                match read_body(decoder, limit).await {
                    Ok(body) => body,
                    Err(err) => return Ok(reject(req, err)),
                }
            } else {
                raw.clone()
            };

            // An empty body is not a parse error.
            if !body.is_empty() {
                match kind.parse(&body, parameter_limit) {
                    Ok(parsed) => {
                        req.extensions_mut().insert(parsed);
                    }
                    Err(err) => return Ok(reject(req, err)),
                }
            }

            req.set_payload(bytes_to_payload(raw));
            svc.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

fn declared_length(req: &ServiceRequest) -> Option<usize> {
    req.headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn is_encoded(req: &ServiceRequest) -> bool {
    req.headers()
        .get(header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.trim().eq_ignore_ascii_case("identity"))
}

/// Buffer a body stream, failing once it grows past `limit` bytes.
pub(crate) async fn read_body<S, E>(stream: S, limit: usize) -> Result<Bytes, GatewayError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    let mut stream = pin!(stream);
    let mut body = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| GatewayError::payload_error(&e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(GatewayError::payload_too_large(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

fn bytes_to_payload(buf: Bytes) -> dev::Payload {
    let (_, mut payload) = actix_http::h1::Payload::create(true);
    payload.unread_data(buf);
    dev::Payload::from(payload)
}

fn reject<B>(req: ServiceRequest, err: GatewayError) -> ServiceResponse<EitherBody<B>> {
    tracing::debug!(
        path = %req.path(),
        code = %err.code,
        "request body rejected"
    );
    req.into_response(err.error_response()).map_into_right_body()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test as actix_test, web, App, HttpRequest, HttpResponse};
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    // Reads the raw payload: the `Bytes` extractor would inflate it.
    async fn echo(req: HttpRequest, payload: web::Payload) -> HttpResponse {
        let body = read_body(payload, 1 << 20).await.unwrap();
        let parsed = req.extensions().get::<ParsedBody>().cloned();
        let kind = match parsed {
            Some(ParsedBody::Json(_)) => "json",
            Some(ParsedBody::Form(_)) => "form",
            None => "none",
        };
        HttpResponse::Ok()
            .insert_header(("x-parsed", kind))
            .body(body)
    }

    #[actix_web::test]
    async fn json_body_is_parsed_and_restored() {
        let app = actix_test::init_service(
            App::new()
                .wrap(BodyParser::json(1024))
                .route("/", web::post().to(echo)),
        )
        .await;

        let payload = r#"{"a":[1,2,3]}"#;
        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "application/json; charset=utf-8"))
            .set_payload(payload)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("x-parsed").unwrap(), "json");
        let body = actix_test::read_body(resp).await;
        assert_eq!(body, Bytes::from_static(payload.as_bytes()));
    }

    #[actix_web::test]
    async fn other_content_types_pass_untouched() {
        let app = actix_test::init_service(
            App::new()
                .wrap(BodyParser::json(4))
                .route("/", web::post().to(echo)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .set_payload("{not json and longer than the limit")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("x-parsed").unwrap(), "none");
    }

    #[actix_web::test]
    async fn oversized_body_is_413() {
        let app = actix_test::init_service(
            App::new()
                .wrap(BodyParser::json(8))
                .route("/", web::post().to(echo)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(r#"{"key":"a value that is too long"}"#)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 413);
    }

    #[actix_web::test]
    async fn too_many_form_parameters_is_413() {
        let app = actix_test::init_service(
            App::new()
                .wrap(BodyParser::urlencoded(1024).parameter_limit(2))
                .route("/", web::post().to(echo)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("a=1&b=2&c=3")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 413);
        let body: GatewayError = actix_test::read_body_json(resp).await;
        assert_eq!(body.code, "TOO_MANY_PARAMETERS");
    }

    #[actix_web::test]
    async fn gzip_json_is_inflated_for_parsing_but_forwarded_as_sent() {
        let app = actix_test::init_service(
            App::new()
                .wrap(BodyParser::json(1024))
                .route("/", web::post().to(echo)),
        )
        .await;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"email":"a@example.com"}"#).unwrap();
        let compressed = encoder.finish().unwrap();

        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .insert_header((header::CONTENT_ENCODING, "gzip"))
            .set_payload(compressed.clone())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("x-parsed").unwrap(), "json");
        let body = actix_test::read_body(resp).await;
        assert_eq!(body, Bytes::from(compressed));
    }

    #[test]
    fn form_decoding_handles_escapes() {
        let parsed = BodyKind::UrlEncoded
            .parse(b"email=a%40example.com&name=Ada+Lovelace", DEFAULT_PARAMETER_LIMIT)
            .unwrap();
        assert_eq!(parsed.field("email"), Some("a@example.com"));
        assert_eq!(parsed.field("name"), Some("Ada Lovelace"));
    }
}

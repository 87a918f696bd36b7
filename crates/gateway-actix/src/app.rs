use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};
use tracing_actix_web::TracingLogger;

use gateway_config::Config;
use gateway_core::AUTH_MOUNT;
use gateway_ports::DynIdentity;

use crate::handlers::{forward, hello, not_found, ForwardLimit};
use crate::middleware::{access_logger, cors_policy, security_headers, BodyParser};

/// Route table: the auth catch-all and the root greeting.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(format!("{AUTH_MOUNT}/{{tail:.*}}")).to(forward))
        .service(
            web::resource("/")
                .route(web::get().to(hello))
                .route(web::head().to(hello))
                .default_service(web::to(not_found)),
        );
}

/// Assemble the application: shared state, routes and the middleware pipeline.
///
/// `wrap` order is innermost first. Requests pass, outermost to innermost:
/// request span, access log, CORS, security headers, JSON parser, urlencoded
/// parser, router. Keeping CORS outside the body parsers means their 4xx
/// rejections still carry CORS headers for the allowed origin.
pub fn build_app(
    config: &Config,
    identity: DynIdentity,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let limit = config.server.body_limit;

    App::new()
        .app_data(web::Data::new(identity))
        .app_data(ForwardLimit(limit))
        .configure(configure)
        .default_service(web::to(not_found))
        .wrap(BodyParser::urlencoded(limit))
        .wrap(BodyParser::json(limit))
        .wrap(security_headers())
        .wrap(cors_policy(config.cors.frontend_url.as_deref()))
        .wrap(access_logger())
        .wrap(TracingLogger::default())
}

use actix_web::middleware::Logger;

/// Combined access-log format plus request latency in milliseconds.
pub const ACCESS_LOG_FORMAT: &str =
    r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %Dms"#;

/// Access logger. Records go through `log` and are bridged into tracing.
pub fn access_logger() -> Logger {
    Logger::new(ACCESS_LOG_FORMAT).log_target("auth_gateway::access")
}

use http::Method;

/// Identity sub-routes the gateway knows about. Paths are relative to the mount prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRoute {
    SignUpEmail,
    SignInEmail,
    SignInSocial,
    Callback { provider: String },
    GetSession,
    SignOut,
    Ok,
    /// Any other sub-route; the identity service decides what it means.
    Other,
}

impl AuthRoute {
    pub fn parse(method: &Method, path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match (method, segments.as_slice()) {
            (&Method::POST, ["sign-up", "email"]) => AuthRoute::SignUpEmail,
            (&Method::POST, ["sign-in", "email"]) => AuthRoute::SignInEmail,
            (&Method::POST, ["sign-in", "social"]) => AuthRoute::SignInSocial,
            (&Method::GET | &Method::POST, ["callback", provider]) => AuthRoute::Callback {
                provider: provider.to_string(),
            },
            (&Method::GET, ["get-session"]) => AuthRoute::GetSession,
            (&Method::POST, ["sign-out"]) => AuthRoute::SignOut,
            (&Method::GET, ["ok"]) => AuthRoute::Ok,
            _ => AuthRoute::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthRoute::SignUpEmail => "sign_up_email",
            AuthRoute::SignInEmail => "sign_in_email",
            AuthRoute::SignInSocial => "sign_in_social",
            AuthRoute::Callback { .. } => "callback",
            AuthRoute::GetSession => "get_session",
            AuthRoute::SignOut => "sign_out",
            AuthRoute::Ok => "ok",
            AuthRoute::Other => "other",
        }
    }

    pub fn uses_email_and_password(&self) -> bool {
        matches!(self, AuthRoute::SignUpEmail | AuthRoute::SignInEmail)
    }
}

use gateway_core::ConfigError;
use hocon::HoconLoader;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "application.conf";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024;
pub const DEFAULT_IDENTITY_SERVICE_URL: &str = "http://127.0.0.1:4000";

const MASKED: &str = "***MASKED***";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body, in bytes.
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CorsConfig {
    /// The single origin allowed to make credentialed cross-origin calls.
    #[serde(default)]
    pub frontend_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Connection string for the identity service's store. Blank means unset.
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_true")]
    pub email_and_password: bool,
    #[serde(default)]
    pub social: SocialConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SocialConfig {
    #[serde(default)]
    pub google: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

fn default_service_url() -> String {
    DEFAULT_IDENTITY_SERVICE_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load from the HOCON file named by `GATEWAY_CONFIG` (default `application.conf`),
    /// or from the environment alone when that file does not exist.
    ///
    /// A file that exists but fails to parse is an error, not a fallback.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("GATEWAY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());

        match Self::from_hocon_path(&path) {
            Err(ConfigError::FileNotFound(_)) => {
                tracing::debug!(path = %path, "no configuration file, reading environment");
                Self::from_env()
            }
            other => other,
        }
    }

    /// Load configuration from a HOCON file with `${?VAR}` environment substitution.
    pub fn from_hocon_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = HoconLoader::new()
            .load_file(path)
            .map_err(|e| ConfigError::Load(format!("failed to load HOCON file: {e}")))?
            .resolve()
            .map_err(|e| ConfigError::Load(format!("failed to resolve HOCON: {e}")))?;

        Ok(config.normalized())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let load = |e: config::ConfigError| ConfigError::Load(e.to_string());

        let config = config::Config::builder()
            .set_default("server.host", default_host())
            .map_err(load)?
            .set_default("server.port", i64::from(DEFAULT_PORT))
            .map_err(load)?
            .set_default("server.body_limit", DEFAULT_BODY_LIMIT as i64)
            .map_err(load)?
            .set_default("identity.service_url", DEFAULT_IDENTITY_SERVICE_URL)
            .map_err(load)?
            .set_default("identity.email_and_password", true)
            .map_err(load)?
            .set_default("identity.timeout_secs", 30_i64)
            .map_err(load)?
            .set_default("identity.social.google.enabled", true)
            .map_err(load)?
            .set_override_option("server.host", var("HOST"))
            .map_err(load)?
            .set_override_option("server.port", var("PORT"))
            .map_err(load)?
            .set_override_option("server.body_limit", var("BODY_LIMIT"))
            .map_err(load)?
            .set_override_option("cors.frontend_url", var("FRONTEND_URL"))
            .map_err(load)?
            .set_override_option("database.url", var("DATABASE_URL"))
            .map_err(load)?
            .set_override_option("identity.service_url", var("IDENTITY_SERVICE_URL"))
            .map_err(load)?
            .set_override_option(
                "identity.email_and_password",
                var("EMAIL_AND_PASSWORD_ENABLED"),
            )
            .map_err(load)?
            .set_override_option("identity.timeout_secs", var("IDENTITY_TIMEOUT_SECS"))
            .map_err(load)?
            .set_override_option("identity.social.google.enabled", var("GOOGLE_ENABLED"))
            .map_err(load)?
            .set_override_option("identity.social.google.client_id", var("GOOGLE_CLIENT_ID"))
            .map_err(load)?
            .set_override_option(
                "identity.social.google.client_secret",
                var("GOOGLE_CLIENT_SECRET"),
            )
            .map_err(load)?
            .build()
            .map_err(load)?;

        let config: Config = config.try_deserialize().map_err(load)?;
        Ok(config.normalized())
    }

    /// Treat blank strings from any source as unset.
    fn normalized(mut self) -> Self {
        fn blank_to_none(value: &mut Option<String>) {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *value = None;
            }
        }

        blank_to_none(&mut self.cors.frontend_url);
        if let Some(ref mut google) = self.identity.social.google {
            blank_to_none(&mut google.client_id);
            blank_to_none(&mut google.client_secret);
        }
        if self
            .database
            .as_ref()
            .is_some_and(|db| db.url.trim().is_empty())
        {
            self.database = None;
        }
        self
    }

    /// Produce a version safe to log (secrets masked).
    pub fn sanitized(&self) -> Self {
        let mut clone = self.clone();

        if let Some(ref mut google) = clone.identity.social.google {
            if let Some(ref mut secret) = google.client_secret {
                *secret = MASKED.to_string();
            }
        }

        if let Some(ref mut db) = clone.database {
            db.url = mask_url_password(&db.url);
        }

        clone
    }
}

fn mask_url_password(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            // set_password only fails for cannot-be-a-base URLs, which have no password.
            let _ = parsed.set_password(Some(MASKED));
            parsed.to_string()
        }
        Ok(_) => raw.to_string(),
        Err(_) => MASKED.to_string(),
    }
}

use gateway_config::{Config, ProviderConfig};
use gateway_core::ConfigError;
use serde::Serialize;
use std::time::Duration;

/// Options the identity delegate is constructed from.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityOptions {
    /// Where the external identity service listens.
    pub service_url: String,
    pub database: Option<DatabaseAdapter>,
    pub email_and_password: EmailAndPassword,
    pub social_providers: SocialProviders,
    #[serde(skip)]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EmailAndPassword {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SocialProviders {
    pub google: Option<SocialProvider>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialProvider {
    pub enabled: bool,
    pub client_id: Option<String>,
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
}

/// The persistence adapter the identity service is bound to.
///
/// The gateway never opens this connection; it only records which kind of
/// store sits behind the delegate.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseAdapter {
    pub provider: String,
    #[serde(skip_serializing)]
    pub url: String,
}

impl DatabaseAdapter {
    pub fn from_url(url: &str) -> Self {
        let provider = if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            "postgresql"
        } else if url.starts_with("mysql://") {
            "mysql"
        } else if url.starts_with("sqlite:") || url.starts_with("file:") {
            "sqlite"
        } else if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
            "mongodb"
        } else {
            "sql"
        };

        Self {
            provider: provider.to_string(),
            url: url.to_string(),
        }
    }
}

impl SocialProvider {
    fn from_config(cfg: &ProviderConfig) -> Self {
        Self {
            enabled: cfg.enabled,
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        let missing = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

        if missing(&self.client_id) {
            return Err(ConfigError::MissingProviderSecret {
                provider: name.to_string(),
                field: "client_id",
            });
        }
        if missing(&self.client_secret) {
            return Err(ConfigError::MissingProviderSecret {
                provider: name.to_string(),
                field: "client_secret",
            });
        }
        Ok(())
    }
}

impl SocialProviders {
    fn entries(&self) -> impl Iterator<Item = (&'static str, &SocialProvider)> {
        [("google", self.google.as_ref())]
            .into_iter()
            .filter_map(|(name, p)| p.map(|p| (name, p)))
    }

    /// Names of providers that are switched on.
    pub fn enabled(&self) -> Vec<&'static str> {
        self.entries()
            .filter(|(_, p)| p.enabled)
            .map(|(name, _)| name)
            .collect()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries()
            .any(|(n, p)| p.enabled && n.eq_ignore_ascii_case(name))
    }
}

impl IdentityOptions {
    pub fn from_config(config: &Config) -> Self {
        let identity = &config.identity;

        Self {
            service_url: identity.service_url.clone(),
            database: config
                .database
                .as_ref()
                .map(|db| DatabaseAdapter::from_url(&db.url)),
            email_and_password: EmailAndPassword {
                enabled: identity.email_and_password,
            },
            social_providers: SocialProviders {
                google: identity.social.google.as_ref().map(SocialProvider::from_config),
            },
            timeout: Duration::from_secs(identity.timeout_secs),
        }
    }

    /// Reject enabled providers without credentials and unusable service URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, provider) in self.social_providers.entries() {
            provider.validate(name)?;
        }

        let parsed = url::Url::parse(&self.service_url).map_err(|e| ConfigError::InvalidServiceUrl {
            url: self.service_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidServiceUrl {
                url: self.service_url.clone(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }

        Ok(())
    }
}

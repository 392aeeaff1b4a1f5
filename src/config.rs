//! Site configuration loaded from environment variables
//!
//! Defaults target the production CMS; every value can be overridden per
//! deployment (systemd environment, `.env` exported by the shell, etc.).

use std::time::Duration;

pub const DEFAULT_WORDPRESS_URL: &str = "https://admin.fattorebakery.it";
pub const DEFAULT_FORM_ID: u64 = 14;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Basic-auth credentials for the forms plugin API
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub wordpress_url: String,
    pub credentials: Option<Credentials>,
    pub default_form_id: u64,
    pub port: u16,
    pub cms_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            wordpress_url: DEFAULT_WORDPRESS_URL.to_string(),
            credentials: None,
            default_form_id: DEFAULT_FORM_ID,
            port: DEFAULT_PORT,
            cms_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl SiteConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let wordpress_url = lookup("WORDPRESS_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.wordpress_url);

        let credentials = match (lookup("WP_API_USERNAME"), lookup("WP_API_PASSWORD")) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Credentials { username, password })
            }
            _ => None,
        };

        let default_form_id = parse_var(&lookup, "DEFAULT_FORM_ID", defaults.default_form_id)?;
        let port = parse_var(&lookup, "PORT", defaults.port)?;
        let timeout_secs = parse_var(&lookup, "CMS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let ttl_secs = parse_var(&lookup, "CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;

        Ok(Self {
            wordpress_url: wordpress_url.trim().trim_end_matches('/').to_string(),
            credentials,
            default_form_id,
            port,
            cms_timeout: Duration::from_secs(timeout_secs),
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }

    /// Same settings pointed at another CMS origin
    pub fn with_wordpress_url(mut self, url: impl Into<String>) -> Self {
        self.wordpress_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// WordPress core REST namespace
    pub fn api_base(&self) -> String {
        format!("{}/wp-json/wp/v2", self.wordpress_url)
    }

    /// Contact Form 7 REST namespace
    pub fn forms_base(&self) -> String {
        format!("{}/wp-json/contact-form-7/v1/contact-forms", self.wordpress_url)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
    }
}

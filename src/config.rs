// src/config.rs
use std::env;
use std::time::Duration;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "https://feedbackloop-ai.netlify.app",
    "http://localhost:5000",
    "https://majestic-strudel-9d7023.netlify.app",
];

pub const DEFAULT_PROVIDER_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";
pub const DEFAULT_REFERER: &str = "https://feedbackloop-ai.netlify.app";
pub const DEFAULT_TITLE: &str = "FeedbackLoop AI";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL not found in environment")]
    MissingDatabaseUrl,
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for the outbound completions provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// `None` when no usable credential is configured.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub referer: String,
    pub title: String,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), 5)?;
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("PORT", lookup("PORT"), 5000)?;

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) if !raw.trim().is_empty() => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            _ => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let timeout_secs = parse_or("AI_TIMEOUT_SECS", lookup("AI_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;

        let provider = ProviderConfig {
            api_key: lookup("OPENROUTER_API_KEY").and_then(|raw| clean_api_key(&raw)),
            base_url: lookup("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string()),
            model: lookup("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            referer: lookup("OPENROUTER_REFERER").unwrap_or_else(|| DEFAULT_REFERER.to_string()),
            title: lookup("OPENROUTER_TITLE").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            database_url,
            db_max_connections,
            host,
            port,
            allowed_origins,
            provider,
        })
    }
}

/// Strips one pair of surrounding quotes and whitespace; an empty result means no key.
pub fn clean_api_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix(['"', '\'']).unwrap_or(unquoted);
    let key = unquoted.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: v }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "mysql://localhost/db")]))
                .unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.allowed_origins.len(), 4);
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert_eq!(config.provider.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDatabaseUrl));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn allowed_origins_override_is_split_and_trimmed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("ALLOWED_ORIGINS", " https://a.example , https://b.example,,"),
        ]))
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn api_key_quotes_and_whitespace_are_stripped() {
        assert_eq!(clean_api_key("  \"sk-123\" "), Some("sk-123".to_string()));
        assert_eq!(clean_api_key("'sk-456'"), Some("sk-456".to_string()));
        assert_eq!(clean_api_key("sk-789"), Some("sk-789".to_string()));
        assert_eq!(clean_api_key(" \"\" "), None);
        assert_eq!(clean_api_key("   "), None);
    }
}

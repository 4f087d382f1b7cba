//! Configuration module for the content gateway.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to sign bearer tokens (required for login)
    pub jwt_secret: Option<String>,
    /// Origins allowed to make cross-origin requests
    pub allowed_origins: Vec<String>,
    /// Path to the SQLite content store
    pub db_path: PathBuf,
    /// Path to Tantivy search index directory
    pub index_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Public site URL, used as token issuer
    pub site_url: String,
    /// Recipient of contact form notifications
    pub admin_email: String,
    /// Webhook receiving contact notifications
    pub notify_webhook: Option<String>,
    /// Interval between search index rebuilds (None disables)
    pub reindex_interval: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AddrParseError> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("CMS_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let allowed_origins = parse_origins(
            &env::var("CMS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
        );

        let db_path = env::var("CMS_DB_PATH")
            .unwrap_or_else(|_| "./data/content.sqlite".to_string())
            .into();

        let index_path = env::var("CMS_INDEX_PATH")
            .unwrap_or_else(|_| "./data/index".to_string())
            .into();

        let bind_addr = env::var("CMS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let log_level = env::var("CMS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let site_url = env::var("CMS_SITE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| "http://localhost".to_string());

        let admin_email =
            env::var("CMS_ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string());

        let notify_webhook = env::var("CMS_NOTIFY_WEBHOOK")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let reindex_interval = env::var("CMS_REINDEX_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map_or(Some(Duration::from_secs(300)), |secs| {
                (secs > 0).then(|| Duration::from_secs(secs))
            });

        Ok(Self {
            jwt_secret,
            allowed_origins,
            db_path,
            index_path,
            bind_addr,
            log_level,
            site_url,
            admin_email,
            notify_webhook,
            reindex_interval,
        })
    }
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("CMS_JWT_SECRET");
        env::remove_var("CMS_ALLOWED_ORIGINS");
        env::remove_var("CMS_DB_PATH");
        env::remove_var("CMS_INDEX_PATH");
        env::remove_var("CMS_BIND_ADDR");
        env::remove_var("CMS_LOG_LEVEL");
        env::remove_var("CMS_SITE_URL");
        env::remove_var("CMS_NOTIFY_WEBHOOK");
        env::remove_var("CMS_REINDEX_SECS");

        let config = Config::from_env().unwrap();

        assert!(config.jwt_secret.is_none());
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:3001"]
        );
        assert_eq!(config.db_path, PathBuf::from("./data/content.sqlite"));
        assert_eq!(config.index_path, PathBuf::from("./data/index"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.site_url, "http://localhost");
        assert!(config.notify_webhook.is_none());
        assert_eq!(config.reindex_interval, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins(" https://example.com/ ,, http://localhost:3000");
        assert_eq!(origins, vec!["https://example.com", "http://localhost:3000"]);
    }
}

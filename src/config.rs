use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::error::{AppError, Result};

const APP_DIR: &str = "crypto-news-bot";

const DEFAULT_FEEDS: &[&str] = &[
    "https://cointelegraph.com/rss",
    "https://www.coindesk.com/arc/outboundfeeds/rss/",
    "https://cryptonews.com/news/feed/",
    "https://decrypt.co/feed",
    "https://bitcoinmagazine.com/.rss/full/",
    "https://u.today/rss",
    "https://cryptopotato.com/feed/",
    "https://www.crypto-news-flash.com/feed/",
    "https://coinjournal.net/feed/",
    "https://news.bitcoin.com/feed/",
];

const DEFAULT_KEYWORDS: &[&str] = &[
    "bitcoin", "btc", "ethereum", "eth", "altcoin", "cryptocurrency", "crypto", "blockchain",
    "defi", "nft", "solana", "cardano", "ada", "ripple", "xrp", "binance", "bnb", "dogecoin",
    "doge", "shiba", "polygon", "matic", "chainlink", "link", "avalanche", "avax", "polkadot",
    "dot", "litecoin", "ltc", "uniswap", "uni",
];

/// Runtime settings, resolved once at startup and handed to each component.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub db_path: String,
    pub log_path: String,
    pub feeds: Vec<String>,
    pub keywords: Vec<String>,
    pub recency_window_hours: i64,
    pub retention_days: i64,
    pub max_articles: usize,
    pub summary_max_chars: usize,
    pub title_max_chars: usize,
    pub message_max_chars: usize,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram_bot_token: String::new(),
            telegram_chat_id: String::new(),
            db_path: "data/crypto_news.db".to_string(),
            log_path: "crypto_news.log".to_string(),
            feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            recency_window_hours: 4,
            retention_days: 7,
            max_articles: 10,
            summary_max_chars: 200,
            title_max_chars: 80,
            message_max_chars: 3500,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Defaults, then the optional config file, then the environment.
    ///
    /// Call `validate` once logging is up.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            tracing::debug!("No config file at {:?}, using defaults", config_path);
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CRYPTO_NEWS_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
            self.telegram_bot_token = token;
        }
        if let Some(chat_id) = lookup("TELEGRAM_CHAT_ID") {
            self.telegram_chat_id = chat_id;
        }
        if let Some(db_path) = lookup("CRYPTO_NEWS_DB_PATH") {
            self.db_path = db_path;
        }
        if let Some(log_path) = lookup("CRYPTO_NEWS_LOG_PATH") {
            self.log_path = log_path;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram_bot_token.trim().is_empty() || self.telegram_chat_id.trim().is_empty() {
            return Err(AppError::Config(
                "TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set".to_string(),
            ));
        }
        if self.feeds.is_empty() {
            return Err(AppError::Config("no feeds configured".to_string()));
        }
        if self.recency_window_hours <= 0
            || self.retention_days <= 0
            || self.max_articles == 0
            || self.title_max_chars == 0
            || self.message_max_chars == 0
            || self.request_timeout_secs == 0
        {
            return Err(AppError::Config("limits must be positive".to_string()));
        }
        Ok(())
    }

    pub fn recency_window(&self) -> TimeDelta {
        TimeDelta::hours(self.recency_window_hours)
    }

    pub fn retention(&self) -> TimeDelta {
        TimeDelta::days(self.retention_days)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_bot_limits() {
        let config = Config::default();
        assert_eq!(config.feeds.len(), 10);
        assert_eq!(config.recency_window(), TimeDelta::hours(4));
        assert_eq!(config.retention(), TimeDelta::days(7));
        assert_eq!(config.max_articles, 10);
        assert_eq!(config.summary_max_chars, 200);
        assert_eq!(config.title_max_chars, 80);
        assert_eq!(config.message_max_chars, 3500);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.log_path, "crypto_news.log");
    }

    #[test]
    fn missing_credentials_are_fatal() {
        let mut config = Config::default();
        config.apply_env(env(&[("TELEGRAM_BOT_TOKEN", "123:abc")]));
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn env_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "telegram_chat_id = \"42\"\nmax_articles = 5\nfeeds = [\"https://example.com/rss\"]\n",
        )
        .unwrap();

        let mut config = Config::from_file(&path).unwrap();
        config.apply_env(env(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "99"),
            ("CRYPTO_NEWS_LOG_PATH", "/var/log/crypto_news.log"),
        ]));

        assert!(config.validate().is_ok());
        assert_eq!(config.telegram_chat_id, "99");
        assert_eq!(config.max_articles, 5);
        assert_eq!(config.log_path, "/var/log/crypto_news.log");
        assert_eq!(config.feeds, vec!["https://example.com/rss".to_string()]);
        assert_eq!(config.keywords.len(), DEFAULT_KEYWORDS.len());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_articles = \"ten\"").unwrap();
        assert!(matches!(Config::from_file(&path), Err(AppError::Toml(_))));
    }
}

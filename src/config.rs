use std::{fmt, net::SocketAddr, path::PathBuf};

use url::Url;

use crate::error::ConfigError;

const DEFAULT_WORDS_PATH: &str = "words.txt";
const DEFAULT_KEEP_ALIVE_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: Url,
    pub addr: SocketAddr,
}

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub words_path: PathBuf,
    pub keep_alive_addr: SocketAddr,
    pub log_level: String,
    /// Long polling is used when unset.
    pub webhook: Option<WebhookConfig>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("words_path", &self.words_path)
            .field("keep_alive_addr", &self.keep_alive_addr)
            .field("log_level", &self.log_level)
            .field("webhook", &self.webhook)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from the process environment, including `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bot_token = var("BOT_TOKEN")
            .or_else(|| var("TELOXIDE_TOKEN"))
            .ok_or(ConfigError::MissingToken)?;

        let words_path = var("WORDS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORDS_PATH));

        let keep_alive_addr = parse_addr(
            "KEEP_ALIVE_ADDR",
            &var("KEEP_ALIVE_ADDR").unwrap_or_else(|| DEFAULT_KEEP_ALIVE_ADDR.to_owned()),
        )?;

        let log_level = var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());

        let webhook = match (var("WEBHOOK_URL"), var("WEBHOOK_ADDR")) {
            (Some(raw_url), Some(addr)) => Some(WebhookConfig {
                url: raw_url.parse::<Url>().map_err(|e: url::ParseError| ConfigError::Invalid {
                    var: "WEBHOOK_URL",
                    reason: e.to_string(),
                })?,
                addr: parse_addr("WEBHOOK_ADDR", &addr)?,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialWebhook),
        };

        Ok(Self {
            bot_token,
            words_path,
            keep_alive_addr,
            log_level,
            webhook,
        })
    }
}

fn parse_addr(var: &'static str, raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim().parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

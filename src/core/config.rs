use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use url::Url;

use crate::core::error::ConfigError;

/// Phone shown in the customer bot's "About" card when SUPPORT_PHONE is not set
pub const DEFAULT_SUPPORT_PHONE: &str = "+37529XXXXXXX";

/// Header Telegram attaches to every webhook delivery when a secret token was registered
pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// HTTP server configuration
pub mod server {
    /// Listen port when PORT is not provided by the host
    pub const DEFAULT_PORT: u16 = 8080;

    /// Listen address when BIND_ADDR is not set
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Runtime configuration, read once at startup.
///
/// Tokens and the webhook secret are kept in [`SecretString`] so they never
/// end up in logs through `Debug`.
#[derive(Clone)]
pub struct Config {
    pub customer_bot_token: SecretString,
    pub pro_bot_token: SecretString,
    pub dispatcher_bot_token: SecretString,
    pub admin_ids: Vec<i64>,
    pub support_phone: String,
    pub base_webhook_url: Url,
    pub webhook_secret: Option<SecretString>,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub bot_api_url: Option<Url>,
    pub log_level: String,
    pub log_file_path: Option<String>,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let customer_bot_token = SecretString::from(require("CUSTOMER_BOT_TOKEN")?);
        let pro_bot_token = SecretString::from(require("PRO_BOT_TOKEN")?);
        let dispatcher_bot_token = SecretString::from(require("DISPATCHER_BOT_TOKEN")?);

        let base_webhook_url = parse_base_url("BASE_WEBHOOK_URL", &require("BASE_WEBHOOK_URL")?)?;

        let webhook_secret = match get("WEBHOOK_SECRET") {
            Some(secret) if is_valid_secret_token(&secret) => Some(SecretString::from(secret)),
            Some(_) => return Err(ConfigError::InvalidSecret),
            None => None,
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => server::DEFAULT_PORT,
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| server::DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let bot_api_url = get("BOT_API_URL")
            .map(|raw| parse_base_url("BOT_API_URL", &raw))
            .transpose()?;

        Ok(Self {
            customer_bot_token,
            pro_bot_token,
            dispatcher_bot_token,
            admin_ids: get("ADMIN_IDS").map(|raw| parse_admin_ids(&raw)).unwrap_or_default(),
            support_phone: get("SUPPORT_PHONE").unwrap_or_else(|| DEFAULT_SUPPORT_PHONE.to_string()),
            base_webhook_url,
            webhook_secret,
            bind_addr,
            port,
            bot_api_url,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_file_path: get("LOG_FILE_PATH"),
        })
    }

    /// Returns true if the Telegram user id is listed in ADMIN_IDS
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    /// The configured webhook secret as a plain string, if any
    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_ref().map(|s| s.expose_secret())
    }

    /// Builds the public webhook URL for a path such as `/tg/customer`
    pub fn webhook_url(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_webhook_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{}{}", base, path))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("admin_ids", &self.admin_ids)
            .field("support_phone", &self.support_phone)
            .field("base_webhook_url", &self.base_webhook_url.as_str())
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "[REDACTED]"))
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("bot_api_url", &self.bot_api_url.as_ref().map(Url::as_str))
            .field("log_level", &self.log_level)
            .field("log_file_path", &self.log_file_path)
            .finish_non_exhaustive()
    }
}

/// Parses a comma/space separated list of numeric Telegram ids.
///
/// Anything that is not an integer is skipped.
pub fn parse_admin_ids(raw: &str) -> Vec<i64> {
    raw.split([',', ' ', '\n', '\t'])
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .collect()
}

/// Telegram only accepts `A-Z`, `a-z`, `0-9`, `_` and `-` in a webhook secret, 1-256 chars
pub fn is_valid_secret_token(secret: &str) -> bool {
    (1..=256).contains(&secret.len())
        && secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn parse_base_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl {
            var,
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}

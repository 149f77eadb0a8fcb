use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("Environment variable {0} is not set")]
    Missing(&'static str),

    /// A URL variable could not be parsed or has an unsupported scheme
    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    /// PORT is not a valid u16
    #[error("PORT must be a number between 0 and 65535, got '{0}'")]
    InvalidPort(String),

    /// BIND_ADDR is not an IP address
    #[error("BIND_ADDR must be an IP address, got '{0}'")]
    InvalidBindAddr(String),

    /// WEBHOOK_SECRET uses characters Telegram rejects
    #[error("WEBHOOK_SECRET must be 1-256 characters of A-Z, a-z, 0-9, '_' or '-'")]
    InvalidSecret,
}

/// Centralized error type for the service
///
/// Handler trees use [`crate::telegram::HandlerError`] instead; this enum covers
/// startup, webhook registration and the HTTP layer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

//! Logging initialization and startup diagnostics

use anyhow::Result;
use simplelog::*;
use std::fs::File;
use std::str::FromStr;

use crate::core::config::Config;

/// Parses a LOG_LEVEL value, falling back to `Info` for anything unknown
pub fn parse_level(raw: &str) -> LevelFilter {
    LevelFilter::from_str(raw.trim()).unwrap_or(LevelFilter::Info)
}

/// Initialize logger for console output and, optionally, a log file
///
/// # Arguments
/// * `level` - Value of LOG_LEVEL (`error`, `warn`, `info`, `debug`, `trace`)
/// * `log_file_path` - Path to an additional log file, if any
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the log file or install the logger
pub fn init_logger(level: &str, log_file_path: Option<&str>) -> Result<()> {
    let level = parse_level(level);
    let config = ConfigBuilder::new()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file_path {
        let log_file = File::create(path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;
        loggers.push(WriteLogger::new(level, config, log_file));
    }

    CombinedLogger::init(loggers).map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at startup, without secrets
pub fn log_configuration(config: &Config) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Listening on {}:{}", config.bind_addr, config.port);
    log::info!("Webhook base: {}", config.base_webhook_url);

    if config.webhook_secret.is_some() {
        log::info!("✅ WEBHOOK_SECRET set, webhook deliveries and /setup are authenticated");
    } else {
        log::warn!("⚠️  WEBHOOK_SECRET not set, webhook endpoints and /setup are open");
    }

    if config.admin_ids.is_empty() {
        log::warn!("⚠️  ADMIN_IDS is empty, nobody will receive dispatcher notifications");
    } else {
        log::info!("Admins: {:?}", config.admin_ids);
    }

    if let Some(ref api) = config.bot_api_url {
        log::info!("Using custom Bot API URL: {}", api);
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

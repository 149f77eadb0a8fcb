use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;

use brigadir::cli::{Cli, Commands};
use brigadir::core::web_server::start_web_server;
use brigadir::core::{init_logger, log_configuration, Config};
use brigadir::telegram::bot::{registration_link, resolve_usernames, setup_bot_commands};
use brigadir::telegram::{create_bots, setup_webhooks, BotRole, HandlerDeps, WebhookHub};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration, HTTP client, bind).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    let cli = Cli::parse_args();

    // Handler panics are logged instead of vanishing with the task
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    let config = Config::from_env();
    let (level, log_file) = match config {
        Ok(ref c) => (c.log_level.clone(), c.log_file_path.clone()),
        Err(_) => ("info".to_string(), None),
    };
    init_logger(&level, log_file.as_deref())?;

    let config = match config {
        Ok(c) => Arc::new(c),
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_service(config).await,
        Commands::SetupWebhooks => run_setup_webhooks(config).await,
        Commands::CheckConfig => run_check_config(&config),
    }
}

/// Registers webhooks and serves updates until a shutdown signal
async fn run_service(config: Arc<Config>) -> Result<()> {
    log_configuration(&config);

    let bots = create_bots(&config)?;
    let usernames = resolve_usernames(&bots).await;
    setup_bot_commands(&bots).await;

    match usernames.pro.as_deref() {
        Some(pro) => log::info!("Contractor registration link: {}", registration_link(pro)),
        None => log::warn!("Pro bot username unknown, registration link unavailable"),
    }

    if let Err(e) = setup_webhooks(&bots, &config).await {
        log::error!("Webhook registration failed, POST /setup to retry: {}", e);
    }

    let deps = HandlerDeps::new(Arc::clone(&config), bots, usernames);
    let hub = Arc::new(WebhookHub::new(deps));

    start_web_server(hub).await?;
    Ok(())
}

async fn run_setup_webhooks(config: Arc<Config>) -> Result<()> {
    let bots = create_bots(&config)?;
    setup_webhooks(&bots, &config).await?;
    log::info!("All webhooks registered");
    Ok(())
}

fn run_check_config(config: &Config) -> Result<()> {
    println!("Configuration OK");
    println!("{:#?}", config);
    for role in BotRole::all() {
        println!("{:<10} {}", role.to_string(), config.webhook_url(role.webhook_path())?);
    }
    Ok(())
}

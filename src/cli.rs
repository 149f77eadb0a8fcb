use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "brigadir")]
#[command(author, version, about = "Customer, contractor and dispatcher Telegram bots served over webhooks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Register webhooks and serve the three bots (default)
    Run,

    /// Register the three webhooks with Telegram and exit
    SetupWebhooks,

    /// Validate configuration and print a redacted summary
    CheckConfig,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

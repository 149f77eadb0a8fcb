//! Bot initialization and command definitions
//!
//! This module contains:
//! - The three bot roles and their webhook paths
//! - Command enums for each bot
//! - Bot instance creation
//! - Command menu publishing and command parsing

use reqwest::ClientBuilder;
use secrecy::{ExposeSecret, SecretString};
use strum::{Display, EnumIter, IntoEnumIterator};
use teloxide::prelude::*;
use teloxide::types::User;
use teloxide::utils::command::BotCommands;

use crate::core::config::{self, Config};
use crate::core::error::AppResult;

/// Which of the three bots an update or request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum BotRole {
    Customer,
    Pro,
    Dispatcher,
}

impl BotRole {
    /// Path the bot's webhook is served on, relative to BASE_WEBHOOK_URL
    pub fn webhook_path(self) -> &'static str {
        match self {
            BotRole::Customer => "/tg/customer",
            BotRole::Pro => "/tg/pro",
            BotRole::Dispatcher => "/tg/dispatcher",
        }
    }

    pub fn all() -> impl Iterator<Item = BotRole> {
        Self::iter()
    }
}

/// Commands of the customer bot
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Команды:")]
pub enum CustomerCommand {
    #[command(description = "главное меню")]
    Start,
}

/// Commands of the pro bot. `/start exec` is the registration deep link.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Команды:")]
pub enum ProCommand {
    #[command(description = "статус и меню исполнителя")]
    Start(String),
}

/// Commands of the dispatcher bot (admins only)
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "Панель диспетчера. Команды:")]
pub enum DispatcherCommand {
    #[command(description = "панель диспетчера")]
    Start,
    #[command(description = "список исполнителей")]
    ExecList,
    #[command(description = "одобрить исполнителя: /exec_approve <id>")]
    ExecApprove(String),
    #[command(description = "заблокировать исполнителя: /exec_block <id>")]
    ExecBlock(String),
    #[command(description = "карточка исполнителя: /exec_info <id>")]
    ExecInfo(String),
    #[command(description = "последние заявки")]
    Orders,
    #[command(description = "заявка и отклики: /order_info <id>")]
    OrderInfo(String),
}

/// The three bot clients. `Bot` is reference-counted, so cloning is cheap.
#[derive(Clone)]
pub struct BotSet {
    pub customer: Bot,
    pub pro: Bot,
    pub dispatcher: Bot,
}

impl BotSet {
    pub fn get(&self, role: BotRole) -> &Bot {
        match role {
            BotRole::Customer => &self.customer,
            BotRole::Pro => &self.pro,
            BotRole::Dispatcher => &self.dispatcher,
        }
    }
}

/// Usernames reported by `getMe`, used for command parsing and deep links
#[derive(Clone, Debug, Default)]
pub struct BotUsernames {
    pub customer: Option<String>,
    pub pro: Option<String>,
    pub dispatcher: Option<String>,
}

impl BotUsernames {
    pub fn get(&self, role: BotRole) -> Option<&str> {
        match role {
            BotRole::Customer => self.customer.as_deref(),
            BotRole::Pro => self.pro.as_deref(),
            BotRole::Dispatcher => self.dispatcher.as_deref(),
        }
    }

    fn set(&mut self, role: BotRole, username: Option<String>) {
        match role {
            BotRole::Customer => self.customer = username,
            BotRole::Pro => self.pro = username,
            BotRole::Dispatcher => self.dispatcher = username,
        }
    }
}

/// Creates the three bots with a shared HTTP client and the configured API URL
///
/// # Returns
/// * `Ok(BotSet)` - Successfully created bot instances
/// * `Err(AppError)` - Failed to build the HTTP client
pub fn create_bots(config: &Config) -> AppResult<BotSet> {
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;

    let make = |token: &SecretString| {
        let bot = Bot::with_client(token.expose_secret(), client.clone());
        match config.bot_api_url {
            Some(ref url) => bot.set_api_url(url.clone()),
            None => bot,
        }
    };

    Ok(BotSet {
        customer: make(&config.customer_bot_token),
        pro: make(&config.pro_bot_token),
        dispatcher: make(&config.dispatcher_bot_token),
    })
}

/// Asks Telegram for each bot's username. Failures leave the name unknown.
pub async fn resolve_usernames(bots: &BotSet) -> BotUsernames {
    let mut usernames = BotUsernames::default();

    for role in BotRole::all() {
        match bots.get(role).get_me().await {
            Ok(me) => {
                log::info!("{} bot is @{}", role, me.user.username.as_deref().unwrap_or("?"));
                usernames.set(role, me.user.username.clone());
            }
            Err(e) => log::warn!("getMe failed for {} bot: {}", role, e),
        }
    }

    usernames
}

/// Publishes each bot's command menu in the Telegram UI. Failures are logged.
pub async fn setup_bot_commands(bots: &BotSet) {
    let results = [
        (BotRole::Customer, bots.customer.set_my_commands(CustomerCommand::bot_commands()).await),
        (BotRole::Pro, bots.pro.set_my_commands(ProCommand::bot_commands()).await),
        (
            BotRole::Dispatcher,
            bots.dispatcher.set_my_commands(DispatcherCommand::bot_commands()).await,
        ),
    ];

    for (role, result) in results {
        if let Err(e) = result {
            log::warn!("Failed to set commands for {} bot: {}", role, e);
        }
    }
}

/// Parses a command addressed to this bot. Mentions of other bots don't match.
pub fn parse_command<C: BotCommands>(text: &str, bot_username: Option<&str>) -> Option<C> {
    C::parse(text, bot_username.unwrap_or_default()).ok()
}

/// Deep link that opens contractor registration in the pro bot
pub fn registration_link(pro_username: &str) -> String {
    format!("https://t.me/{}?start=exec", pro_username)
}

/// Telegram user id as the signed id used throughout the registry
pub fn user_id_of(user: &User) -> i64 {
    i64::try_from(user.id.0).unwrap_or(0)
}

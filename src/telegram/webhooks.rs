//! Webhook registration and update dispatch
//!
//! Updates arrive as HTTP posts, one route per bot. Each one is fed straight
//! into that bot's handler tree and awaited before the request is answered.

use std::ops::ControlFlow;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;

use crate::core::config::Config;
use crate::core::error::AppResult;
use crate::telegram::bot::{BotRole, BotSet};
use crate::telegram::handlers::{self, HandlerDeps, HandlerError};

/// The three handler trees plus their shared dependencies
pub struct WebhookHub {
    deps: HandlerDeps,
    customer: UpdateHandler<HandlerError>,
    pro: UpdateHandler<HandlerError>,
    dispatcher: UpdateHandler<HandlerError>,
}

impl WebhookHub {
    pub fn new(deps: HandlerDeps) -> Self {
        Self {
            customer: handlers::customer::schema(deps.clone()),
            pro: handlers::pro::schema(deps.clone()),
            dispatcher: handlers::dispatcher::schema(deps.clone()),
            deps,
        }
    }

    pub fn deps(&self) -> &HandlerDeps {
        &self.deps
    }

    pub fn config(&self) -> &Config {
        &self.deps.config
    }

    /// Runs one update through the role's handler tree.
    ///
    /// Handler errors are logged here and never reach the HTTP layer, so
    /// Telegram does not redeliver the update.
    pub async fn dispatch(&self, role: BotRole, update: Update) {
        let bot = self.deps.bots.get(role).clone();
        let handler = match role {
            BotRole::Customer => &self.customer,
            BotRole::Pro => &self.pro,
            BotRole::Dispatcher => &self.dispatcher,
        };
        let update_id = update.id;

        match handler.dispatch(dptree::deps![bot, update]).await {
            ControlFlow::Break(Ok(())) => {}
            ControlFlow::Break(Err(e)) => {
                log::error!("{} bot: handler failed on update {:?}: {}", role, update_id, e);
            }
            ControlFlow::Continue(_) => {
                log::debug!("{} bot: update {:?} not handled", role, update_id);
            }
        }
    }
}

/// Points each bot's webhook at `BASE_WEBHOOK_URL + /tg/<role>`.
///
/// Existing webhooks are deleted first with pending updates dropped. The
/// secret token is attached when WEBHOOK_SECRET is set.
pub async fn setup_webhooks(bots: &BotSet, config: &Config) -> AppResult<()> {
    for role in BotRole::all() {
        let bot = bots.get(role);
        let url = config.webhook_url(role.webhook_path())?;

        bot.delete_webhook().drop_pending_updates(true).await?;

        let mut request = bot
            .set_webhook(url.clone())
            .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery]);
        if let Some(secret) = config.webhook_secret() {
            request = request.secret_token(secret.to_string());
        }
        request.await?;

        log::info!("{} bot webhook set to {}", role, url);
    }
    Ok(())
}

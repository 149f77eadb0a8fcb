//! Dispatcher bot: contractor moderation and order lookup for admins

use std::str::FromStr;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError, HandlerResult};
use crate::core::types::ExecutorStatus;
use crate::telegram::bot::{parse_command, registration_link, user_id_of, DispatcherCommand};
use crate::telegram::html::send_html;
use crate::telegram::messages;

/// How many orders `/orders` lists
pub const RECENT_ORDERS_LIMIT: usize = 20;

/// Creates the handler tree of the dispatcher bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let username = deps.usernames.dispatcher.clone();

    Update::filter_message()
        .filter_map(move |msg: Message| {
            msg.text()
                .and_then(|text| parse_command::<DispatcherCommand>(text, username.as_deref()))
        })
        .endpoint(move |bot: Bot, msg: Message, cmd: DispatcherCommand| {
            let deps = deps.clone();
            async move { handle_command(&bot, &msg, cmd, &deps).await }
        })
}

async fn handle_command(bot: &Bot, msg: &Message, cmd: DispatcherCommand, deps: &HandlerDeps) -> HandlerResult {
    let sender = msg.from.as_ref().map(user_id_of).unwrap_or(0);
    let is_admin = deps.config.is_admin(sender);

    if !is_admin {
        if cmd == DispatcherCommand::Start {
            send_html(bot, msg.chat.id, messages::NO_ACCESS, None).await?;
        } else {
            log::warn!("Ignoring {:?} from non-admin {}", cmd, sender);
        }
        return Ok(());
    }

    log::info!("Admin {} ran {:?}", sender, cmd);
    let chat_id = msg.chat.id;

    let reply = match cmd {
        DispatcherCommand::Start => {
            let link = deps.usernames.pro.as_deref().map(registration_link);
            messages::dispatcher_help(link.as_deref())
        }
        DispatcherCommand::ExecList => messages::executor_list(&deps.registry.executors_by_status().await),
        DispatcherCommand::ExecApprove(arg) => match parse_id::<i64>(&arg) {
            None => messages::usage("exec_approve"),
            Some(id) => match deps.registry.set_executor_status(id, ExecutorStatus::Approved).await {
                None => messages::EXECUTOR_NOT_FOUND.to_string(),
                Some(executor) => {
                    if let Err(e) = send_html(&deps.bots.pro, ChatId(id), messages::PRO_APPROVED, None).await {
                        log::warn!("Could not tell contractor {} about approval: {}", id, e);
                    }
                    messages::executor_approved(&executor)
                }
            },
        },
        DispatcherCommand::ExecBlock(arg) => match parse_id::<i64>(&arg) {
            None => messages::usage("exec_block"),
            Some(id) => match deps.registry.set_executor_status(id, ExecutorStatus::Blocked).await {
                None => messages::EXECUTOR_NOT_FOUND.to_string(),
                Some(executor) => messages::executor_blocked(&executor),
            },
        },
        DispatcherCommand::ExecInfo(arg) => match parse_id::<i64>(&arg) {
            None => messages::usage("exec_info"),
            Some(id) => match deps.registry.executor(id).await {
                None => messages::EXECUTOR_NOT_FOUND.to_string(),
                Some(executor) => messages::executor_info(&executor),
            },
        },
        DispatcherCommand::Orders => messages::orders_list(&deps.registry.recent_orders(RECENT_ORDERS_LIMIT).await),
        DispatcherCommand::OrderInfo(arg) => match parse_id::<u64>(&arg) {
            None => messages::usage("order_info"),
            Some(id) => match deps.registry.order(id).await {
                None => messages::ORDER_NOT_FOUND.to_string(),
                Some(order) => {
                    let mut responders = Vec::with_capacity(order.responses.len());
                    for &executor_id in &order.responses {
                        responders.push((executor_id, deps.registry.executor(executor_id).await));
                    }
                    messages::order_info(&order, &responders)
                }
            },
        },
    };

    send_html(bot, chat_id, reply, None).await?;
    Ok(())
}

/// First argument as a non-negative decimal id
fn parse_id<T: FromStr>(args: &str) -> Option<T> {
    args.split_whitespace()
        .next()
        .filter(|token| token.chars().all(|c| c.is_ascii_digit()))
        .and_then(|token| token.parse().ok())
}

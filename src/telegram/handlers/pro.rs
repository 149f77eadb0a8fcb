//! Pro bot: contractor registration, status menu and order responses

use std::collections::BTreeSet;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{Message, MessageId};

use super::types::{callback_origin, HandlerDeps, HandlerError, HandlerResult, ProDialogue};
use crate::core::types::Executor;
use crate::core::validation::{parse_answer, parse_phone};
use crate::storage::ResponseOutcome;
use crate::telegram::bot::{parse_command, user_id_of, ProCommand};
use crate::telegram::callbacks::ProCallback;
use crate::telegram::html::{mention_user, send_html};
use crate::telegram::{keyboards, messages};

/// `/start` payload that opens registration
const REGISTRATION_PAYLOAD: &str = "exec";

/// Creates the handler tree of the pro bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();
    let deps_callbacks = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callbacks))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let username = deps.usernames.pro.clone();

    Update::filter_message()
        .filter_map(move |msg: Message| {
            msg.text()
                .and_then(|text| parse_command::<ProCommand>(text, username.as_deref()))
        })
        .endpoint(move |bot: Bot, msg: Message, cmd: ProCommand| {
            let deps = deps.clone();
            async move {
                match cmd {
                    ProCommand::Start(payload) => handle_start(&bot, &msg, &payload, &deps).await,
                }
            }
        })
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let deps = deps.clone();
        async move { handle_text(&bot, &msg, &deps).await }
    })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move { handle_callback(&bot, &q, &deps).await }
    })
}

async fn handle_start(bot: &Bot, msg: &Message, payload: &str, deps: &HandlerDeps) -> HandlerResult {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user_id_of(user);

    if payload.trim().eq_ignore_ascii_case(REGISTRATION_PAYLOAD) {
        log::info!("Contractor {} started registration", user_id);
        deps.pro_dialogues.set(user_id, ProDialogue::Name).await;
        send_html(bot, msg.chat.id, messages::PRO_ASK_NAME, None).await?;
        return Ok(());
    }

    deps.pro_dialogues.clear(user_id).await;
    let executor = deps.registry.executor(user_id).await;
    send_html(
        bot,
        msg.chat.id,
        messages::pro_status(executor.as_ref()),
        Some(keyboards::pro_main_menu()),
    )
    .await?;
    Ok(())
}

async fn handle_text(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> HandlerResult {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user_id_of(user);
    let Some(state) = deps.pro_dialogues.get(user_id).await else {
        return Ok(());
    };

    let chat_id = msg.chat.id;
    let text = msg.text().unwrap_or_default().trim().to_string();

    match state {
        ProDialogue::Name => {
            let name = match parse_answer(&text) {
                Ok(name) => name,
                Err(e) => {
                    send_html(bot, chat_id, messages::answer_rejected(&e), None).await?;
                    return Ok(());
                }
            };
            deps.pro_dialogues.set(user_id, ProDialogue::Phone { name }).await;
            send_html(bot, chat_id, messages::PRO_ASK_PHONE, None).await?;
        }
        ProDialogue::Phone { name } => match parse_phone(&text) {
            Ok(phone) => {
                let selected = BTreeSet::new();
                let keyboard = keyboards::pro_categories_keyboard(&selected);
                deps.pro_dialogues
                    .set(user_id, ProDialogue::Categories { name, phone, selected })
                    .await;
                send_html(bot, chat_id, messages::PRO_ASK_CATEGORIES, Some(keyboard)).await?;
            }
            Err(_) => {
                send_html(bot, chat_id, messages::PHONE_FORMAT, None).await?;
            }
        },
        ProDialogue::Categories { ref selected, .. } => {
            send_html(
                bot,
                chat_id,
                messages::USE_BUTTONS,
                Some(keyboards::pro_categories_keyboard(selected)),
            )
            .await?;
        }
    }

    Ok(())
}

async fn handle_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> HandlerResult {
    let user_id = user_id_of(&q.from);
    let parsed = q.data.as_deref().and_then(ProCallback::parse);

    let (Some(callback), Some((chat_id, message_id))) = (parsed, callback_origin(q)) else {
        log::debug!("Contractor {}: unhandled callback {:?}", user_id, q.data);
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    match callback {
        ProCallback::ShowCategories => {
            let text = match deps.registry.executor(user_id).await {
                Some(executor) => messages::pro_categories(&executor),
                None => messages::PRO_NOT_REGISTERED.to_string(),
            };
            send_html(bot, chat_id, text, None).await?;
        }
        ProCallback::ShowPhone => {
            let text = match deps.registry.executor(user_id).await {
                Some(executor) => messages::pro_phone(&executor),
                None => messages::PRO_NOT_REGISTERED.to_string(),
            };
            send_html(bot, chat_id, text, None).await?;
        }
        ProCallback::Help => {
            send_html(bot, chat_id, messages::PRO_HELP, None).await?;
        }
        ProCallback::ToggleCategory(category) => {
            if let Some(ProDialogue::Categories {
                name,
                phone,
                mut selected,
            }) = deps.pro_dialogues.get(user_id).await
            {
                if !selected.remove(&category) {
                    selected.insert(category);
                }
                let keyboard = keyboards::pro_categories_keyboard(&selected);
                deps.pro_dialogues
                    .set(user_id, ProDialogue::Categories { name, phone, selected })
                    .await;
                bot.edit_message_reply_markup(chat_id, message_id)
                    .reply_markup(keyboard)
                    .await?;
            }
        }
        ProCallback::CategoriesDone => {
            if let Some(ProDialogue::Categories { name, phone, selected }) = deps.pro_dialogues.get(user_id).await {
                if selected.is_empty() {
                    return alert(bot, q, messages::PRO_NO_CATEGORIES).await;
                }

                let executor = deps
                    .registry
                    .register_executor(Executor::new(user_id, name, phone, selected))
                    .await;
                deps.pro_dialogues.clear(user_id).await;
                log::info!(
                    "Contractor {} registered for: {}",
                    user_id,
                    executor.categories_label()
                );

                send_html(bot, chat_id, messages::PRO_REGISTERED, None).await?;
                deps.notify_admins(&messages::new_registration(&mention_user(&q.from), &executor))
                    .await;
            }
        }
        ProCallback::BadOrderRef => {
            return alert(bot, q, messages::TAKE_BAD_REF).await;
        }
        ProCallback::Take(order_id) => {
            return handle_take(bot, q, order_id, (chat_id, message_id), deps).await;
        }
        ProCallback::Skip(order_id) => {
            log::debug!("Contractor {} skipped order #{}", user_id, order_id);
            bot.answer_callback_query(q.id.clone()).text(messages::SKIPPED).await?;
            remove_keyboard(bot, chat_id, message_id).await;
            return Ok(());
        }
    }

    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

async fn handle_take(
    bot: &Bot,
    q: &CallbackQuery,
    order_id: u64,
    (chat_id, message_id): (ChatId, MessageId),
    deps: &HandlerDeps,
) -> HandlerResult {
    let user_id = user_id_of(&q.from);

    match deps.registry.record_response(order_id, user_id).await {
        ResponseOutcome::UnknownOrder => alert(bot, q, messages::TAKE_UNKNOWN_ORDER).await,
        ResponseOutcome::NotApproved => alert(bot, q, messages::TAKE_NOT_APPROVED).await,
        ResponseOutcome::Accepted { order, executor } => {
            log::info!("Contractor {} took order #{}", user_id, order.id);
            deps.notify_admins(&messages::order_response(&order, &executor, &mention_user(&q.from)))
                .await;
            bot.answer_callback_query(q.id.clone())
                .text(messages::TAKE_ACCEPTED)
                .await?;
            remove_keyboard(bot, chat_id, message_id).await;
            Ok(())
        }
    }
}

async fn alert(bot: &Bot, q: &CallbackQuery, text: &str) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).text(text).show_alert(true).await?;
    Ok(())
}

/// Strips the Take/Skip buttons off a card. The message may be gone already.
async fn remove_keyboard(bot: &Bot, chat_id: ChatId, message_id: MessageId) {
    if let Err(e) = bot.edit_message_reply_markup(chat_id, message_id).await {
        log::debug!("Could not remove order card keyboard: {}", e);
    }
}

//! Customer bot: main menu, callback requests and the request form

use chrono::{Local, NaiveDate};
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{callback_origin, CustomerDialogue, HandlerDeps, HandlerError, HandlerResult};
use crate::core::types::OrderDraft;
use crate::core::validation::{parse_answer, parse_phone};
use crate::telegram::bot::{parse_command, user_id_of, CustomerCommand};
use crate::telegram::callbacks::{CustomerCallback, DateChoice};
use crate::telegram::html::{mention_user, send_html};
use crate::telegram::{keyboards, messages};

/// Creates the handler tree of the customer bot
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
    let username = deps.usernames.customer.clone();

    Update::filter_message()
        .filter_map(move |msg: Message| {
            msg.text()
                .and_then(|text| parse_command::<CustomerCommand>(text, username.as_deref()))
        })
        .endpoint(move |bot: Bot, msg: Message, cmd: CustomerCommand| {
            let deps = deps.clone();
            async move {
                match cmd {
                    CustomerCommand::Start => handle_start(&bot, &msg, &deps).await,
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

async fn handle_start(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> HandlerResult {
    if let Some(user) = msg.from.as_ref() {
        deps.customer_dialogues.clear(user_id_of(user)).await;
    }
    send_html(bot, msg.chat.id, messages::GREETING, Some(keyboards::customer_main_menu())).await?;
    Ok(())
}

async fn handle_text(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> HandlerResult {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user_id_of(user);
    let Some(state) = deps.customer_dialogues.get(user_id).await else {
        log::debug!("Customer {}: text outside a dialogue ignored", user_id);
        return Ok(());
    };

    let chat_id = msg.chat.id;
    let text = msg.text().unwrap_or_default().trim().to_string();

    match state {
        CustomerDialogue::CallbackPhone => match parse_phone(&text) {
            Ok(phone) => {
                deps.notify_admins(&messages::callback_request(&mention_user(user), &phone))
                    .await;
                deps.customer_dialogues.clear(user_id).await;
                log::info!("Customer {} requested a callback", user_id);
                send_html(bot, chat_id, messages::CALLBACK_THANKS, Some(keyboards::customer_main_menu())).await?;
            }
            Err(_) => {
                send_html(bot, chat_id, messages::CALLBACK_PHONE_INVALID, None).await?;
            }
        },
        CustomerDialogue::OrderPhone => match parse_phone(&text) {
            Ok(phone) => {
                deps.customer_dialogues
                    .set(user_id, CustomerDialogue::OrderCategory { phone })
                    .await;
                send_html(bot, chat_id, messages::ASK_CATEGORY, Some(keyboards::categories_keyboard())).await?;
            }
            Err(_) => {
                send_html(bot, chat_id, messages::PHONE_FORMAT, None).await?;
            }
        },
        CustomerDialogue::OrderCategory { .. } => {
            send_html(bot, chat_id, messages::USE_BUTTONS, Some(keyboards::categories_keyboard())).await?;
        }
        CustomerDialogue::OrderDescription { phone, category } => {
            let description = match parse_answer(&text) {
                Ok(description) => description,
                Err(e) => {
                    send_html(bot, chat_id, messages::answer_rejected(&e), Some(keyboards::cancel_keyboard())).await?;
                    return Ok(());
                }
            };
            deps.customer_dialogues
                .set(
                    user_id,
                    CustomerDialogue::OrderAddress {
                        phone,
                        category,
                        description,
                    },
                )
                .await;
            send_html(bot, chat_id, messages::ASK_ADDRESS, Some(keyboards::cancel_keyboard())).await?;
        }
        CustomerDialogue::OrderAddress {
            phone,
            category,
            description,
        } => {
            let address = match parse_answer(&text) {
                Ok(address) => address,
                Err(e) => {
                    send_html(bot, chat_id, messages::answer_rejected(&e), Some(keyboards::cancel_keyboard())).await?;
                    return Ok(());
                }
            };
            deps.customer_dialogues
                .set(
                    user_id,
                    CustomerDialogue::OrderDate {
                        phone,
                        category,
                        description,
                        address,
                    },
                )
                .await;
            send_html(bot, chat_id, messages::ASK_DATE, Some(keyboards::dates_menu(today()))).await?;
        }
        CustomerDialogue::OrderDate { .. } => {
            send_html(bot, chat_id, messages::USE_BUTTONS, Some(keyboards::dates_menu(today()))).await?;
        }
    }

    Ok(())
}

async fn handle_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> HandlerResult {
    let user_id = user_id_of(&q.from);
    let parsed = q.data.as_deref().and_then(CustomerCallback::parse);

    let (Some(callback), Some((chat_id, message_id))) = (parsed, callback_origin(q)) else {
        log::debug!("Customer {}: unhandled callback {:?}", user_id, q.data);
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    match callback {
        CustomerCallback::About => {
            send_html(bot, chat_id, messages::about(&deps.config.support_phone), None).await?;
        }
        CustomerCallback::RequestCall => {
            deps.customer_dialogues.set(user_id, CustomerDialogue::CallbackPhone).await;
            send_html(bot, chat_id, messages::ASK_CALLBACK_PHONE, Some(keyboards::cancel_keyboard())).await?;
        }
        CustomerCallback::Home => {
            deps.customer_dialogues.clear(user_id).await;
            send_html(bot, chat_id, messages::MAIN_MENU, Some(keyboards::customer_main_menu())).await?;
        }
        CustomerCallback::NewOrder => {
            deps.customer_dialogues.set(user_id, CustomerDialogue::OrderPhone).await;
            send_html(bot, chat_id, messages::ASK_ORDER_PHONE, Some(keyboards::cancel_keyboard())).await?;
        }
        CustomerCallback::Category(category) => {
            if let Some(CustomerDialogue::OrderCategory { phone }) = deps.customer_dialogues.get(user_id).await {
                deps.customer_dialogues
                    .set(user_id, CustomerDialogue::OrderDescription { phone, category })
                    .await;
                send_html(bot, chat_id, messages::ASK_DESCRIPTION, Some(keyboards::cancel_keyboard())).await?;
            }
        }
        CustomerCallback::Date(DateChoice::Day(date)) => {
            // Taking the state ends the form, so a repeated tap finds nothing to submit
            if let Some(CustomerDialogue::OrderDate {
                phone,
                category,
                description,
                address,
            }) = deps
                .customer_dialogues
                .take_if(user_id, |state| matches!(state, CustomerDialogue::OrderDate { .. }))
                .await
            {
                let draft = OrderDraft {
                    customer_id: user_id,
                    customer_phone: phone,
                    category,
                    description,
                    address,
                    date,
                };
                submit_order(bot, chat_id, draft, deps).await?;
            }
        }
        CustomerCallback::Date(choice) => {
            if let Some(CustomerDialogue::OrderDate { .. }) = deps.customer_dialogues.get(user_id).await {
                let (text, keyboard) = match choice {
                    DateChoice::Week => (messages::ASK_DATE_IN_WEEK, keyboards::dates_week(today())),
                    DateChoice::Back | DateChoice::Day(_) => (messages::ASK_DATE, keyboards::dates_menu(today())),
                };
                bot.edit_message_text(chat_id, message_id, text)
                    .reply_markup(keyboard)
                    .await?;
            }
        }
    }

    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

/// Stores the order, confirms it and fans it out. The form state is already gone.
async fn submit_order(bot: &Bot, chat_id: ChatId, draft: OrderDraft, deps: &HandlerDeps) -> HandlerResult {
    let customer_id = draft.customer_id;
    let order = deps.registry.create_order(draft).await;
    log::info!(
        "Order #{} created by customer {} ({}, {})",
        order.id,
        customer_id,
        order.category,
        order.date_label()
    );

    let confirmation =
        send_html(bot, chat_id, messages::order_created(&order), Some(keyboards::customer_main_menu())).await;
    deps.send_order_to_executors(&order).await;
    confirmation?;
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

//! HTML formatting for bot messages
//!
//! Everything user-supplied (names, addresses, descriptions) goes through
//! [`escape`] before it is placed into a message.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, ParseMode, User};
use teloxide::RequestError;

/// Escapes the characters Telegram's HTML parse mode treats as markup
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn bold(text: &str) -> String {
    format!("<b>{}</b>", escape(text))
}

pub fn code(text: &str) -> String {
    format!("<code>{}</code>", escape(text))
}

/// `@username` when the user has one, otherwise a link to the profile by id
pub fn mention(user_id: i64, username: Option<&str>, full_name: &str) -> String {
    match username {
        Some(username) if !username.is_empty() => escape(&format!("@{}", username)),
        _ => {
            let name = if full_name.trim().is_empty() { "пользователь" } else { full_name };
            format!("<a href=\"tg://user?id={}\">{}</a>", user_id, escape(name))
        }
    }
}

pub fn mention_user(user: &User) -> String {
    mention(
        crate::telegram::bot::user_id_of(user),
        user.username.as_deref(),
        &user.full_name(),
    )
}

/// Drops tags and decodes entities, for resending a message as plain text
pub fn to_plain(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

fn is_entity_parse_error(err: &RequestError) -> bool {
    err.to_string().to_lowercase().contains("can't parse entities")
}

/// Send an HTML message, falling back to plain text if Telegram rejects the markup.
pub async fn send_html(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
    keyboard: Option<InlineKeyboardMarkup>,
) -> ResponseResult<Message> {
    let raw_text = text.into();
    let mut req = bot.send_message(chat_id, raw_text.clone()).parse_mode(ParseMode::Html);
    if let Some(kb) = keyboard.clone() {
        req = req.reply_markup(kb);
    }

    match req.await {
        Ok(msg) => Ok(msg),
        Err(e) if is_entity_parse_error(&e) => {
            log::warn!("HTML rejected for chat {}, resending as plain text: {}", chat_id, e);
            let mut retry = bot.send_message(chat_id, to_plain(&raw_text));
            if let Some(kb) = keyboard {
                retry = retry.reply_markup(kb);
            }
            retry.await
        }
        Err(e) => Err(e),
    }
}

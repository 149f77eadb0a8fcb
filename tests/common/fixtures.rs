//! Telegram update fixtures
//!
//! Minimal JSON shapes for the updates the bots receive, plus the canned
//! Bot API results the fake server returns.

#![allow(dead_code)]

use serde_json::{json, Value};

/// A private-chat user; the chat id equals the user id
pub fn user_json(user_id: i64, username: Option<&str>) -> Value {
    let mut user = json!({
        "id": user_id,
        "is_bot": false,
        "first_name": "Test",
    });
    if let Some(username) = username {
        user["username"] = json!(username);
    }
    user
}

fn private_chat(chat_id: i64) -> Value {
    json!({
        "id": chat_id,
        "type": "private",
        "first_name": "Test"
    })
}

/// A text message sent by `user_id` in their private chat with the bot
pub fn create_message_json(user_id: i64, text: &str) -> Value {
    json!({
        "message_id": 1,
        "date": 1234567890,
        "chat": private_chat(user_id),
        "from": user_json(user_id, Some("testuser")),
        "text": text
    })
}

/// Webhook body carrying a text message
pub fn message_update(update_id: u32, user_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": create_message_json(user_id, text)
    })
}

/// Webhook body carrying an inline button press on message 42
pub fn callback_update(update_id: u32, user_id: i64, data: &str) -> Value {
    json!({
        "update_id": update_id,
        "callback_query": {
            "id": format!("cbq-{}", update_id),
            "from": user_json(user_id, Some("testuser")),
            "chat_instance": "instance",
            "data": data,
            "message": {
                "message_id": 42,
                "date": 1234567890,
                "chat": private_chat(user_id),
                "from": {
                    "id": 1,
                    "is_bot": true,
                    "first_name": "Bot",
                    "username": "SomeBot"
                },
                "text": "menu"
            }
        }
    })
}

/// Bot API result for methods that return a `Message`
pub fn sent_message_result() -> Value {
    json!({
        "ok": true,
        "result": {
            "message_id": 100,
            "date": 1234567890,
            "chat": private_chat(1),
            "text": "ok"
        }
    })
}

/// Bot API result for methods that return `True`
pub fn true_result() -> Value {
    json!({"ok": true, "result": true})
}

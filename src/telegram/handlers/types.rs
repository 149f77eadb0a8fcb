//! Handler types, dependencies and dialogue states

use std::collections::BTreeSet;
use std::sync::Arc;
use teloxide::types::{CallbackQuery, ChatId, MessageId};

use crate::core::config::Config;
use crate::core::types::{Category, Order};
use crate::storage::{DialogueStore, Registry};
use crate::telegram::bot::{BotSet, BotUsernames};
use crate::telegram::notifications::{self, DeliveryReport};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for handler functions
pub type HandlerResult = Result<(), HandlerError>;

/// Where a customer is in the callback or request form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerDialogue {
    CallbackPhone,
    OrderPhone,
    OrderCategory {
        phone: String,
    },
    OrderDescription {
        phone: String,
        category: Category,
    },
    OrderAddress {
        phone: String,
        category: Category,
        description: String,
    },
    OrderDate {
        phone: String,
        category: Category,
        description: String,
        address: String,
    },
}

/// Where a contractor is in registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProDialogue {
    Name,
    Phone {
        name: String,
    },
    Categories {
        name: String,
        phone: String,
        selected: BTreeSet<Category>,
    },
}

/// Dependencies shared by the three handler trees
#[derive(Clone)]
pub struct HandlerDeps {
    pub config: Arc<Config>,
    pub bots: BotSet,
    pub usernames: BotUsernames,
    pub registry: Registry,
    pub customer_dialogues: DialogueStore<CustomerDialogue>,
    pub pro_dialogues: DialogueStore<ProDialogue>,
}

impl HandlerDeps {
    /// Create handler dependencies with an empty registry
    pub fn new(config: Arc<Config>, bots: BotSet, usernames: BotUsernames) -> Self {
        Self {
            config,
            bots,
            usernames,
            registry: Registry::new(),
            customer_dialogues: DialogueStore::new(),
            pro_dialogues: DialogueStore::new(),
        }
    }

    /// Sends `text` to every admin through the dispatcher bot
    pub async fn notify_admins(&self, text: &str) -> usize {
        notifications::notify_admins(&self.bots.dispatcher, &self.config.admin_ids, text).await
    }

    /// Fans the order out to matching contractors through the pro bot
    pub async fn send_order_to_executors(&self, order: &Order) -> DeliveryReport {
        notifications::send_order_to_executors(
            &self.registry,
            &self.bots.pro,
            &self.bots.dispatcher,
            &self.config.admin_ids,
            order,
        )
        .await
    }
}

/// Chat and message an inline button was pressed on, if Telegram still has the message
pub fn callback_origin(q: &CallbackQuery) -> Option<(ChatId, MessageId)> {
    q.message.as_ref().map(|m| (m.chat().id, m.id()))
}

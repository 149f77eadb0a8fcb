//! Telegram bot integration and handlers

pub mod bot;
pub mod callbacks;
pub mod handlers;
pub mod html;
pub mod keyboards;
pub mod messages;
pub mod notifications;
pub mod webhooks;

// Re-exports for convenience
pub use bot::{create_bots, BotRole, BotSet, BotUsernames};
pub use handlers::{HandlerDeps, HandlerError};
pub use notifications::DeliveryReport;
pub use webhooks::{setup_webhooks, WebhookHub};

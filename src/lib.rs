//! Brigadir - three Telegram bots for a construction dispatch centre
//!
//! One web service hosts a customer bot (requests and callbacks), a pro bot
//! (contractor registration and order responses) and a dispatcher bot
//! (moderation for admins), each fed by its own webhook.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, domain types and the web server
//! - `storage`: in-memory registry and dialogue state
//! - `telegram`: bots, handler trees, keyboards and webhook dispatch
//! - `cli`: command-line interface

pub mod cli;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult, Config};
pub use storage::Registry;
pub use telegram::{create_bots, setup_webhooks, BotRole, BotSet, HandlerDeps, WebhookHub};

//! Handler trees of the three bots
//!
//! Each bot gets its own dptree schema. Production feeds webhook updates into
//! them through [`crate::telegram::webhooks::WebhookHub`], and integration tests
//! use the same trees against a fake Bot API.

pub mod customer;
pub mod dispatcher;
pub mod pro;
mod types;

pub use types::{callback_origin, CustomerDialogue, HandlerDeps, HandlerError, HandlerResult, ProDialogue};

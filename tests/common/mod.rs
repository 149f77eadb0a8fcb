//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod helpers;

#[allow(unused_imports)]
pub use fixtures::{callback_update, create_message_json, message_update};
#[allow(unused_imports)]
pub use helpers::{ApiCall, TestApp, ADMIN_ID};

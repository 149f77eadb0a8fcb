//! Admin notifications and order fan-out
//!
//! Nothing here is retried: a failed delivery is logged, counted and dropped.

use teloxide::prelude::*;

use crate::core::types::Order;
use crate::storage::Registry;
use crate::telegram::html::send_html;
use crate::telegram::{keyboards, messages};

/// What happened when an order was fanned out to contractors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Approved contractors serving the order's category
    pub targeted: usize,
    /// Cards Telegram accepted
    pub delivered: usize,
}

/// Sends a message to every admin through the dispatcher bot.
///
/// Returns how many admins received it. One failure does not stop the rest.
pub async fn notify_admins(dispatcher_bot: &Bot, admin_ids: &[i64], text: &str) -> usize {
    if admin_ids.is_empty() {
        log::warn!("ADMIN_IDS is empty, dropping admin notification");
        return 0;
    }

    let mut delivered = 0;
    for &admin_id in admin_ids {
        match send_html(dispatcher_bot, ChatId(admin_id), text, None).await {
            Ok(_) => delivered += 1,
            Err(e) => log::error!("Failed to notify admin {}: {}", admin_id, e),
        }
    }
    delivered
}

/// Delivers the order card to approved contractors of its category.
///
/// Admins are told when nobody serves the category, and again when there
/// were targets but no card got through (contractors who never pressed
/// Start in the pro bot cannot be messaged).
pub async fn send_order_to_executors(
    registry: &Registry,
    pro_bot: &Bot,
    dispatcher_bot: &Bot,
    admin_ids: &[i64],
    order: &Order,
) -> DeliveryReport {
    let targets = registry.matching_executors(order.category).await;
    let mut report = DeliveryReport {
        targeted: targets.len(),
        delivered: 0,
    };

    if targets.is_empty() {
        log::info!("Order #{}: no approved contractors for {}", order.id, order.category);
        notify_admins(dispatcher_bot, admin_ids, &messages::no_coverage(order)).await;
        return report;
    }

    let text = messages::order_card(order);
    let keyboard = keyboards::order_card_keyboard(order);

    for executor in &targets {
        match send_html(pro_bot, ChatId(executor.user_id), text.clone(), Some(keyboard.clone())).await {
            Ok(_) => report.delivered += 1,
            Err(e) => log::warn!(
                "Order #{}: card not delivered to contractor {}: {}",
                order.id,
                executor.user_id,
                e
            ),
        }
    }

    log::info!(
        "Order #{} fanned out: {}/{} delivered",
        order.id,
        report.delivered,
        report.targeted
    );

    if report.delivered == 0 {
        notify_admins(dispatcher_bot, admin_ids, &messages::nobody_reached(order)).await;
    }

    report
}

//! Delivery failures against the fake Bot API
//!
//! Telegram refuses messages to users who never opened a bot and rejects
//! malformed markup. These tests make the fake server fail the same way.

mod common;

use std::collections::BTreeSet;

use brigadir::core::types::{Category, Executor, ExecutorStatus, OrderDraft};
use brigadir::telegram::html::send_html;
use brigadir::telegram::notifications::notify_admins;
use brigadir::telegram::{BotRole, DeliveryReport};
use chrono::NaiveDate;
use common::{TestApp, ADMIN_ID};
use pretty_assertions::assert_eq;
use teloxide::types::ChatId;

const CONTRACTOR: i64 = 500;
const CUSTOMER: i64 = 700;
const CANT_INITIATE: &str = "Forbidden: bot can't initiate conversation with a user";

async fn approved_contractor(app: &TestApp, user_id: i64, category: Category) {
    let registry = &app.hub.deps().registry;
    registry
        .register_executor(Executor::new(user_id, "Бригада", "+375297654321", BTreeSet::from([category])))
        .await;
    registry.set_executor_status(user_id, ExecutorStatus::Approved).await;
}

fn draft(category: Category) -> OrderDraft {
    OrderDraft {
        customer_id: CUSTOMER,
        customer_phone: "+375291112233".into(),
        category,
        description: "Вывезти мусор".into(),
        address: "ул. Ленинская, 1".into(),
        date: NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
    }
}

#[tokio::test]
async fn test_undelivered_cards_alert_admins() {
    let app = TestApp::new().await;
    app.fail_sends_from(BotRole::Pro, 403, CANT_INITIATE).await;
    approved_contractor(&app, CONTRACTOR, Category::Loader).await;
    let order = app.hub.deps().registry.create_order(draft(Category::Loader)).await;

    let report = app.hub.deps().send_order_to_executors(&order).await;

    assert_eq!(report, DeliveryReport { targeted: 1, delivered: 0 });
    let notice = app.last_message(BotRole::Dispatcher, ADMIN_ID).await;
    assert!(notice.contains("Ни одному исполнителю не доставлено"), "{}", notice);
    assert!(notice.contains("#1"));
}

#[tokio::test]
async fn test_partial_delivery_does_not_alert_admins() {
    let app = TestApp::new().await;
    app.fail_sends_to(CONTRACTOR, 403, CANT_INITIATE).await;
    approved_contractor(&app, CONTRACTOR, Category::Loader).await;
    approved_contractor(&app, 501, Category::Loader).await;
    let order = app.hub.deps().registry.create_order(draft(Category::Loader)).await;

    let report = app.hub.deps().send_order_to_executors(&order).await;

    assert_eq!(report, DeliveryReport { targeted: 2, delivered: 1 });
    assert_eq!(app.messages(BotRole::Pro, 501).await.len(), 1);
    assert!(app.messages(BotRole::Dispatcher, ADMIN_ID).await.is_empty());
}

#[tokio::test]
async fn test_failed_admin_does_not_stop_the_others() {
    let app = TestApp::with_admins(&[ADMIN_ID, 901]).await;
    app.fail_sends_to(ADMIN_ID, 403, "Forbidden: bot was blocked by the user").await;

    let delivered = notify_admins(&app.hub.deps().bots.dispatcher, &[ADMIN_ID, 901], "Проверка").await;

    assert_eq!(delivered, 1);
    assert_eq!(app.messages(BotRole::Dispatcher, 901).await, vec!["Проверка".to_string()]);

    // The same holds through the configured admin list
    assert_eq!(app.hub.deps().notify_admins("Ещё раз").await, 1);
    assert_eq!(app.last_message(BotRole::Dispatcher, 901).await, "Ещё раз");
}

#[tokio::test]
async fn test_rejected_markup_is_resent_as_plain_text() {
    let app = TestApp::new().await;
    app.reject_next_markup().await;

    send_html(
        &app.hub.deps().bots.customer,
        ChatId(CUSTOMER),
        "<b>Заявка #1</b> &amp; &lt;срочно&gt;",
        None,
    )
    .await
    .unwrap();

    let sent = app.calls_named("sendMessage").await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].body["parse_mode"], "HTML");
    assert!(sent[1].body.get("parse_mode").is_none());
    assert_eq!(sent[1].text(), "Заявка #1 & <срочно>");
}

//! Test application wired to a fake Bot API
//!
//! The three bots talk to a wiremock server instead of Telegram. Tokens are
//! chosen so each recorded request can be traced back to the bot that sent it.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use brigadir::core::config::{Config, SECRET_TOKEN_HEADER};
use brigadir::core::web_server::create_router;
use brigadir::telegram::{create_bots, BotRole, BotUsernames, HandlerDeps, WebhookHub};

use super::fixtures::{callback_update, message_update, sent_message_result, true_result};

pub const CUSTOMER_TOKEN: &str = "111:customer";
pub const PRO_TOKEN: &str = "222:pro";
pub const DISPATCHER_TOKEN: &str = "333:dispatcher";
pub const ADMIN_ID: i64 = 900;

/// One request the bots made against the fake Bot API
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub bot: Option<BotRole>,
    /// Lowercased method name, e.g. `sendmessage`
    pub method: String,
    pub body: Value,
}

impl ApiCall {
    pub fn chat_id(&self) -> Option<i64> {
        self.body["chat_id"].as_i64()
    }

    pub fn text(&self) -> &str {
        self.body["text"].as_str().unwrap_or_default()
    }
}

pub struct TestApp {
    pub server: MockServer,
    pub hub: Arc<WebhookHub>,
    router: Router,
    secret: Option<String>,
    next_update_id: AtomicU32,
}

impl TestApp {
    /// App without a webhook secret
    pub async fn new() -> Self {
        Self::start(None, false, &[ADMIN_ID]).await
    }

    /// App that requires `secret` on webhook deliveries and `/setup`
    pub async fn with_secret(secret: &str) -> Self {
        Self::start(Some(secret), false, &[ADMIN_ID]).await
    }

    /// App whose fake Bot API refuses `setWebhook`
    pub async fn rejecting_webhooks() -> Self {
        Self::start(None, true, &[ADMIN_ID]).await
    }

    /// App with several admins in `ADMIN_IDS`
    pub async fn with_admins(admin_ids: &[i64]) -> Self {
        Self::start(None, false, admin_ids).await
    }

    async fn start(secret: Option<&str>, reject_webhooks: bool, admin_ids: &[i64]) -> Self {
        let server = MockServer::start().await;
        mount_bot_api(&server, reject_webhooks).await;

        let api_url = server.uri();
        let secret_owned = secret.map(str::to_string);
        let admin_ids = admin_ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
        let config = Config::from_lookup(|key| match key {
            "CUSTOMER_BOT_TOKEN" => Some(CUSTOMER_TOKEN.to_string()),
            "PRO_BOT_TOKEN" => Some(PRO_TOKEN.to_string()),
            "DISPATCHER_BOT_TOKEN" => Some(DISPATCHER_TOKEN.to_string()),
            "BASE_WEBHOOK_URL" => Some("https://brigadir.example.com".to_string()),
            "ADMIN_IDS" => Some(admin_ids.clone()),
            "SUPPORT_PHONE" => Some("+375291000000".to_string()),
            "BOT_API_URL" => Some(api_url.clone()),
            "WEBHOOK_SECRET" => secret_owned.clone(),
            _ => None,
        })
        .expect("test config should be valid");

        let bots = create_bots(&config).expect("bots should build");
        let usernames = BotUsernames {
            customer: Some("CustomerBot".to_string()),
            pro: Some("ProBot".to_string()),
            dispatcher: Some("DispatcherBot".to_string()),
        };
        let hub = Arc::new(WebhookHub::new(HandlerDeps::new(Arc::new(config), bots, usernames)));
        let router = create_router(Arc::clone(&hub));

        Self {
            server,
            hub,
            router,
            secret: secret_owned,
            next_update_id: AtomicU32::new(1),
        }
    }

    /// Makes every `sendMessage` of one bot fail with a Bot API error
    pub async fn fail_sends_from(&self, bot: BotRole, status: u16, description: &str) {
        Mock::given(method("POST"))
            .and(path_regex(format!("(?i)/bot{}:[^/]*/sendmessage$", bot_id(bot))))
            .respond_with(api_error(status, description))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Makes every `sendMessage` into `chat_id` fail with a Bot API error
    pub async fn fail_sends_to(&self, chat_id: i64, status: u16, description: &str) {
        Mock::given(method("POST"))
            .and(path_regex("(?i)/sendmessage$"))
            .and(body_partial_json(json!({"chat_id": chat_id})))
            .respond_with(api_error(status, description))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Rejects the next `sendMessage` the way Telegram rejects broken HTML
    pub async fn reject_next_markup(&self) {
        Mock::given(method("POST"))
            .and(path_regex("(?i)/sendmessage$"))
            .respond_with(api_error(
                400,
                "Bad Request: can't parse entities: Unsupported start tag \"x\" at byte offset 0",
            ))
            .with_priority(1)
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    fn update_id(&self) -> u32 {
        self.next_update_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Sends a raw request through the router, returning status and body text
    pub async fn request(&self, method: &str, uri: &str, body: String, secret: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            request = request.header(SECRET_TOKEN_HEADER, secret);
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Delivers an update to a bot's webhook the way Telegram would
    pub async fn deliver(&self, role: BotRole, update: Value) -> StatusCode {
        let (status, _) = self
            .request("POST", role.webhook_path(), update.to_string(), self.secret.as_deref())
            .await;
        status
    }

    pub async fn send_text(&self, role: BotRole, user_id: i64, text: &str) {
        let status = self.deliver(role, message_update(self.update_id(), user_id, text)).await;
        assert_eq!(status, StatusCode::OK, "text {:?} to {} bot", text, role);
    }

    pub async fn press(&self, role: BotRole, user_id: i64, data: &str) {
        let status = self.deliver(role, callback_update(self.update_id(), user_id, data)).await;
        assert_eq!(status, StatusCode::OK, "button {:?} in {} bot", data, role);
    }

    /// Every request the bots made so far, in order
    pub async fn calls(&self) -> Vec<ApiCall> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|request| {
                let path = request.url.path().to_string();
                ApiCall {
                    bot: bot_of(&path),
                    method: path.rsplit('/').next().unwrap_or_default().to_lowercase(),
                    body: serde_json::from_slice(&request.body).unwrap_or(Value::Null),
                }
            })
            .collect()
    }

    /// Texts sent by `bot` into `chat_id`
    pub async fn messages(&self, bot: BotRole, chat_id: i64) -> Vec<String> {
        self.calls()
            .await
            .into_iter()
            .filter(|c| c.bot == Some(bot) && c.method == "sendmessage" && c.chat_id() == Some(chat_id))
            .map(|c| c.text().to_string())
            .collect()
    }

    pub async fn last_message(&self, bot: BotRole, chat_id: i64) -> String {
        self.messages(bot, chat_id).await.pop().unwrap_or_default()
    }

    pub async fn calls_named(&self, method: &str) -> Vec<ApiCall> {
        let method = method.to_lowercase();
        self.calls().await.into_iter().filter(|c| c.method == method).collect()
    }
}

/// Numeric part of the bot's test token, as it appears in Bot API paths
fn bot_id(bot: BotRole) -> &'static str {
    let token = match bot {
        BotRole::Customer => CUSTOMER_TOKEN,
        BotRole::Pro => PRO_TOKEN,
        BotRole::Dispatcher => DISPATCHER_TOKEN,
    };
    token.split(':').next().unwrap_or_default()
}

fn bot_of(path: &str) -> Option<BotRole> {
    BotRole::all().find(|&bot| path.contains(&format!("/bot{}:", bot_id(bot))))
}

fn api_error(status: u16, description: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "ok": false,
        "error_code": status,
        "description": description
    }))
}

async fn mount_bot_api(server: &MockServer, reject_webhooks: bool) {
    for name in ["sendmessage", "editmessagetext", "editmessagereplymarkup"] {
        Mock::given(method("POST"))
            .and(path_regex(format!("(?i)/{}$", name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent_message_result()))
            .mount(server)
            .await;
    }

    for name in ["answercallbackquery", "deletewebhook", "setmycommands"] {
        Mock::given(method("POST"))
            .and(path_regex(format!("(?i)/{}$", name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(true_result()))
            .mount(server)
            .await;
    }

    let set_webhook = if reject_webhooks {
        api_error(400, "Bad Request: bad webhook: HTTPS url must be provided for webhook")
    } else {
        ResponseTemplate::new(200).set_body_json(true_result())
    };
    Mock::given(method("POST"))
        .and(path_regex("(?i)/setwebhook$"))
        .respond_with(set_webhook)
        .mount(server)
        .await;
}

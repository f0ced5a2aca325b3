use super::IMessageDispatcher;
use serde::Deserialize;
use std::time::Duration;
use teamdesk_domain::DispatchOutcome;
use tracing::{info, warn};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages through the Telegram Bot API `sendMessage` method
pub struct TelegramDispatcher {
    client: reqwest::Client,
    bot_token: String,
    api_url: String,
}

impl TelegramDispatcher {
    pub fn new(bot_token: String) -> Self {
        Self::with_api_url(bot_token, TELEGRAM_API_URL.to_string())
    }

    pub fn with_api_url(bot_token: String, api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_token,
            api_url,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.bot_token, method)
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), String> {
        let res = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": text,
                "disable_web_page_preview": true,
            }))
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| format!("sendMessage failed: {}", e))?;

        let status = res.status();
        let body: TelegramResponse = res
            .json()
            .await
            .map_err(|e| format!("Invalid sendMessage response ({}): {}", status, e))?;

        if !body.ok {
            return Err(format!(
                "Telegram API error {}: {}",
                status,
                body.description.unwrap_or_default()
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IMessageDispatcher for TelegramDispatcher {
    async fn send(&self, handles: &[String], message: &str) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        for chat_id in handles {
            match self.send_message(chat_id, message).await {
                Ok(()) => outcome.success_count += 1,
                Err(e) => {
                    warn!("Unable to send telegram message to chat {}: {}", chat_id, e);
                    outcome.fail_count += 1;
                }
            }
        }
        info!(
            "Telegram dispatch finished. Sent: {}, failed: {}",
            outcome.success_count, outcome.fail_count
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};

    const BOT_TOKEN: &str = "123:test-token";

    #[derive(Deserialize)]
    struct SendMessageBody {
        chat_id: String,
        text: String,
    }

    type Received = Arc<Mutex<Vec<(String, String)>>>;

    /// Answers like the Bot API would, depending on the chat id
    async fn send_message(
        body: web::Json<SendMessageBody>,
        received: web::Data<Received>,
    ) -> HttpResponse {
        received
            .lock()
            .unwrap()
            .push((body.chat_id.clone(), body.text.clone()));

        match body.chat_id.as_str() {
            "rejected" => HttpResponse::Ok()
                .json(serde_json::json!({ "ok": false, "description": "chat not found" })),
            "garbled" => HttpResponse::Ok().body("<html>bad gateway</html>"),
            "blocked" => HttpResponse::Forbidden().json(
                serde_json::json!({ "ok": false, "description": "bot was blocked by the user" }),
            ),
            _ => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
        }
    }

    fn spawn_bot_api() -> (String, Received) {
        let received: Received = Default::default();
        let data = received.clone();
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(data.clone()))
                .route(
                    &format!("/bot{}/sendMessage", BOT_TOKEN),
                    web::post().to(send_message),
                )
        })
        .listen(listener)
        .expect("Failed to listen")
        .workers(1)
        .run();
        actix_web::rt::spawn(server);

        (format!("http://127.0.0.1:{}", port), received)
    }

    #[actix_web::test]
    async fn sends_to_every_chat_and_counts_failures() {
        let (api_url, received) = spawn_bot_api();
        let dispatcher = TelegramDispatcher::with_api_url(BOT_TOKEN.into(), api_url);

        let handles: Vec<String> = ["1001", "rejected", "garbled", "blocked", "2002"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let outcome = dispatcher.send(&handles, "⏰ Reminder #1").await;

        assert_eq!(
            outcome,
            DispatchOutcome {
                success_count: 2,
                fail_count: 3,
            }
        );
        let received = received.lock().unwrap().clone();
        let chats: Vec<_> = received.iter().map(|(chat, _)| chat.as_str()).collect();
        assert_eq!(chats, vec!["1001", "rejected", "garbled", "blocked", "2002"]);
        assert!(received.iter().all(|(_, text)| text == "⏰ Reminder #1"));
    }

    #[actix_web::test]
    async fn unreachable_api_fails_every_send() {
        // Nothing listens on a released port
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let dispatcher = TelegramDispatcher::with_api_url(
            BOT_TOKEN.into(),
            format!("http://127.0.0.1:{}", port),
        );

        let outcome = dispatcher
            .send(&["1001".to_string(), "2002".to_string()], "hello")
            .await;
        assert!(outcome.is_complete_failure());
        assert_eq!(outcome.fail_count, 2);
    }
}

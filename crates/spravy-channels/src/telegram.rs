//! Telegram Bot API channel.
//!
//! Uses long polling via `getUpdates`, `sendMessage`/`editMessageText` for
//! responses, and `answerCallbackQuery` for button-press acks.
//! Docs: <https://core.telegram.org/bots/api>

use async_trait::async_trait;
use spravy_core::{
    config::TelegramConfig,
    error::SpravyError,
    message::{EventPayload, IncomingEvent, Menu, OutgoingMessage},
    traits::Channel,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Telegram channel using the Bot API with long polling.
pub struct TelegramChannel {
    client: reqwest::Client,
    base_url: String,
    /// Tracks the last update_id to avoid reprocessing.
    last_update_id: Arc<Mutex<Option<i64>>>,
}

// --- Telegram API types ---

#[derive(Debug, Deserialize)]
struct TgResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgUpdate {
    update_id: i64,
    message: Option<TgMessage>,
    callback_query: Option<TgCallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    message_id: i64,
    from: Option<TgUser>,
    chat: TgChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgCallbackQuery {
    id: String,
    from: TgUser,
    /// The message the pressed button was attached to.
    message: Option<TgMessage>,
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    id: i64,
    first_name: String,
    last_name: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
}

impl TelegramChannel {
    /// Create a new Telegram channel from config.
    pub fn new(config: TelegramConfig) -> Self {
        let base_url = format!("https://api.telegram.org/bot{}", config.bot_token);
        Self {
            client: reqwest::Client::new(),
            base_url,
            last_update_id: Arc::new(Mutex::new(None)),
        }
    }

    /// Send a text message to a specific chat, attaching the menu (if any)
    /// to the final chunk.
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        menu: Option<&Menu>,
    ) -> Result<(), SpravyError> {
        let chunks = split_message(text, 4096);
        let last = chunks.len() - 1;

        for (i, chunk) in chunks.iter().enumerate() {
            let mut body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });
            if i == last {
                if let Some(menu) = menu {
                    body["reply_markup"] = menu_markup(menu);
                }
            }

            let resp = self
                .client
                .post(format!("{}/sendMessage", self.base_url))
                .json(&body)
                .send()
                .await
                .map_err(|e| SpravyError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                warn!("telegram send got {status}: {error_text}");
            }
        }

        Ok(())
    }

    /// Edit an existing message in place.
    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        menu: Option<&Menu>,
    ) -> Result<(), SpravyError> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        if let Some(menu) = menu {
            body["reply_markup"] = menu_markup(menu);
        }

        let resp = self
            .client
            .post(format!("{}/editMessageText", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SpravyError::Channel(format!("telegram edit failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            warn!("telegram edit got {status}: {error_text}");
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    async fn register_commands(&self) {
        let commands = serde_json::json!({
            "commands": [
                { "command": "start", "description": "Головне меню" },
                { "command": "remind", "description": "Налаштувати нагадування" },
                { "command": "remind_1h", "description": "Нагадувати щогодини" },
                { "command": "remind_2h", "description": "Нагадувати кожні 2 години" },
                { "command": "remind_off", "description": "Вимкнути нагадування" },
            ]
        });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }

    fn parse_chat_id(target: Option<&str>) -> Result<i64, SpravyError> {
        let target = target
            .ok_or_else(|| SpravyError::Channel("no reply_target on outgoing message".into()))?;
        target.parse().map_err(|e| {
            SpravyError::Channel(format!("invalid telegram chat_id '{target}': {e}"))
        })
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingEvent>, SpravyError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut url = format!("{base_url}/getUpdates?timeout=30");
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let resp = match client
                    .get(&url)
                    .timeout(std::time::Duration::from_secs(35))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                // Successful poll — reset backoff.
                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    let event = match update_to_event(update) {
                        Some(ev) => ev,
                        None => continue,
                    };

                    if tx.send(event).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), SpravyError> {
        let chat_id = Self::parse_chat_id(message.reply_target.as_deref())?;

        match message.edit_message_id {
            Some(message_id) => {
                self.edit_text(chat_id, message_id, &message.text, message.menu.as_ref())
                    .await
            }
            None => {
                self.send_text(chat_id, &message.text, message.menu.as_ref())
                    .await
            }
        }
    }

    async fn ack_callback(&self, callback_id: &str) -> Result<(), SpravyError> {
        let body = serde_json::json!({ "callback_query_id": callback_id });
        self.client
            .post(format!("{}/answerCallbackQuery", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SpravyError::Channel(format!("telegram ack failed: {e}")))?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), SpravyError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}

/// Convert one Telegram update into an inbound event, if it carries one.
fn update_to_event(update: TgUpdate) -> Option<IncomingEvent> {
    if let Some(cb) = update.callback_query {
        let message = cb.message?;
        let data = cb.data?;
        return Some(IncomingEvent {
            id: Uuid::new_v4(),
            channel: "telegram".to_string(),
            sender_id: cb.from.id.to_string(),
            sender_name: Some(display_name(&cb.from)),
            timestamp: chrono::Utc::now(),
            reply_target: Some(message.chat.id.to_string()),
            payload: EventPayload::Callback {
                data,
                callback_id: cb.id,
                message_id: message.message_id,
            },
        });
    }

    let msg = update.message?;
    let text = msg.text?;
    let user = msg.from?;

    let payload = match parse_command(&text) {
        Some((name, args)) => EventPayload::Command { name, args },
        None => EventPayload::Text { text },
    };

    Some(IncomingEvent {
        id: Uuid::new_v4(),
        channel: "telegram".to_string(),
        sender_id: user.id.to_string(),
        sender_name: Some(display_name(&user)),
        timestamp: chrono::Utc::now(),
        reply_target: Some(msg.chat.id.to_string()),
        payload,
    })
}

fn display_name(user: &TgUser) -> String {
    if let Some(ref un) = user.username {
        format!("@{un}")
    } else if let Some(ref ln) = user.last_name {
        format!("{} {ln}", user.first_name)
    } else {
        user.first_name.clone()
    }
}

/// Split a slash command into name and args. Strips the leading slash and
/// any `@botname` suffix on the command token. Returns `None` for plain text.
fn parse_command(text: &str) -> Option<(String, Vec<String>)> {
    let rest = text.strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let first = parts.next()?;
    let name = first.split('@').next().unwrap_or(first);
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), parts.map(|s| s.to_string()).collect()))
}

/// Render a menu as a Telegram inline keyboard, one button per row.
fn menu_markup(menu: &Menu) -> serde_json::Value {
    let rows: Vec<Vec<serde_json::Value>> = menu
        .buttons
        .iter()
        .map(|b| vec![serde_json::json!({ "text": b.label, "callback_data": b.data })])
        .collect();
    serde_json::json!({ "inline_keyboard": rows })
}

/// Split a long message into chunks that respect Telegram's limit.
fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        // Snap the cut to a char boundary so slicing never lands inside a
        // multi-byte character (Cyrillic text is 2 bytes per char).
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let break_at = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .map(|i| start + i + 1)
                .unwrap_or(end)
        } else {
            end
        };
        chunks.push(&text[start..break_at]);
        start = break_at;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use spravy_core::message::MenuButton;

    #[test]
    fn test_split_short_message() {
        let chunks = split_message("hello", 4096);
        assert_eq!(chunks, vec!["hello"]);
    }

    #[test]
    fn test_split_long_message() {
        let text = "a\n".repeat(3000);
        let chunks = split_message(&text, 4096);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 4096);
        }
    }

    #[test]
    fn test_split_multibyte_message_without_newlines() {
        // One ASCII char shifts every following 2-byte Cyrillic char off
        // the byte-offset grid, so a naive byte cut would land mid-char.
        let text = format!("a{}", "м".repeat(3000));
        let chunks = split_message(&text, 4096);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 4096);
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_parse_command_basic() {
        assert_eq!(
            parse_command("/start"),
            Some(("start".to_string(), vec![]))
        );
        assert_eq!(
            parse_command("/remind_1h"),
            Some(("remind_1h".to_string(), vec![]))
        );
    }

    #[test]
    fn test_parse_command_strips_bot_suffix_and_keeps_args() {
        assert_eq!(
            parse_command("/remind@spravybot now please"),
            Some((
                "remind".to_string(),
                vec!["now".to_string(), "please".to_string()]
            ))
        );
    }

    #[test]
    fn test_parse_command_rejects_plain_text() {
        assert!(parse_command("buy milk").is_none());
        assert!(parse_command("/").is_none());
    }

    #[test]
    fn test_menu_markup_one_button_per_row() {
        let menu = Menu {
            buttons: vec![
                MenuButton {
                    label: "A".into(),
                    data: "a".into(),
                },
                MenuButton {
                    label: "B".into(),
                    data: "b".into(),
                },
            ],
        };
        let markup = menu_markup(&menu);
        let rows = markup["inline_keyboard"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_array().unwrap().len(), 1);
        assert_eq!(rows[0][0]["text"], "A");
        assert_eq!(rows[0][0]["callback_data"], "a");
    }

    #[test]
    fn test_update_with_callback_query() {
        let json = r#"{
            "update_id": 7,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 42, "first_name": "Olena"},
                "message": {
                    "message_id": 99,
                    "chat": {"id": 42},
                    "text": "Оберіть дію:"
                },
                "data": "add_today"
            }
        }"#;
        let update: TgUpdate = serde_json::from_str(json).unwrap();
        let event = update_to_event(update).unwrap();
        assert_eq!(event.sender_id, "42");
        assert_eq!(event.reply_target.as_deref(), Some("42"));
        match event.payload {
            EventPayload::Callback {
                data,
                callback_id,
                message_id,
            } => {
                assert_eq!(data, "add_today");
                assert_eq!(callback_id, "cb-1");
                assert_eq!(message_id, 99);
            }
            other => panic!("expected callback payload, got {other:?}"),
        }
    }

    #[test]
    fn test_update_with_text_message() {
        let json = r#"{
            "update_id": 8,
            "message": {
                "message_id": 100,
                "from": {"id": 42, "first_name": "Olena", "username": "olena"},
                "chat": {"id": 42},
                "text": "buy milk"
            }
        }"#;
        let update: TgUpdate = serde_json::from_str(json).unwrap();
        let event = update_to_event(update).unwrap();
        assert_eq!(event.sender_name.as_deref(), Some("@olena"));
        match event.payload {
            EventPayload::Text { text } => assert_eq!(text, "buy milk"),
            other => panic!("expected text payload, got {other:?}"),
        }
    }

    #[test]
    fn test_update_with_command_message() {
        let json = r#"{
            "update_id": 9,
            "message": {
                "message_id": 101,
                "from": {"id": 42, "first_name": "Olena"},
                "chat": {"id": 42},
                "text": "/start"
            }
        }"#;
        let update: TgUpdate = serde_json::from_str(json).unwrap();
        let event = update_to_event(update).unwrap();
        match event.payload {
            EventPayload::Command { name, args } => {
                assert_eq!(name, "start");
                assert!(args.is_empty());
            }
            other => panic!("expected command payload, got {other:?}"),
        }
    }

    #[test]
    fn test_update_without_content_is_dropped() {
        let json = r#"{"update_id": 10}"#;
        let update: TgUpdate = serde_json::from_str(json).unwrap();
        assert!(update_to_event(update).is_none());
    }
}

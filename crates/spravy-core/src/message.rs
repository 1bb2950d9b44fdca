use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inbound user event from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingEvent {
    pub id: Uuid,
    /// Channel name (e.g. "telegram").
    pub channel: String,
    /// Platform-specific user ID.
    pub sender_id: String,
    /// Human-readable sender name.
    pub sender_name: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific target for routing the response (e.g. Telegram chat_id).
    pub reply_target: Option<String>,
    pub payload: EventPayload,
}

/// The three inbound event shapes a channel can deliver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    /// A slash command like `/start` or `/remind_1h` (leading slash stripped).
    Command { name: String, args: Vec<String> },
    /// A button press on an inline menu.
    Callback {
        data: String,
        /// Opaque ID the channel needs to acknowledge the press.
        callback_id: String,
        /// The message carrying the menu, for in-place edits.
        message_id: i64,
    },
    /// A free-text message.
    Text { text: String },
}

/// An outgoing message to send back through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Platform-specific target for routing (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
    /// Interactive menu to attach, if any.
    #[serde(default)]
    pub menu: Option<Menu>,
    /// When set, edit this existing message in place instead of sending a new one.
    #[serde(default)]
    pub edit_message_id: Option<i64>,
}

/// An inline menu, rendered one button per row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Menu {
    pub buttons: Vec<MenuButton>,
}

/// A single menu button with its callback payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuButton {
    pub label: String,
    pub data: String,
}

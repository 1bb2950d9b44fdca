use crate::{
    error::SpravyError,
    message::{IncomingEvent, OutgoingMessage},
};
use async_trait::async_trait;

/// Messaging Channel trait.
///
/// Every messaging platform the bot can live on (Telegram today) implements
/// this trait to deliver inbound user events and accept outbound replies.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming events.
    /// Returns a receiver that yields inbound user events.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingEvent>, SpravyError>;

    /// Send a reply back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), SpravyError>;

    /// Acknowledge a button press so the origin UI clears its loading state.
    async fn ack_callback(&self, callback_id: &str) -> Result<(), SpravyError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), SpravyError>;
}

//! Gateway — the event loop connecting the channel, the store, and per-user
//! sessions, plus the hourly reminder scan.
//!
//! Handlers run sequentially on one loop; the session map is only ever
//! touched between awaits of a single handler, so no lock is needed.

use crate::menu;
use crate::sessions::Sessions;
use chrono::NaiveTime;
use spravy_core::{
    config::ReminderConfig,
    error::SpravyError,
    message::{EventPayload, IncomingEvent, OutgoingMessage},
    traits::Channel,
};
use spravy_store::{DayBucket, ReminderInterval, Store};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Period between reminder scans. Fixed: the stored per-user interval does
/// not change it (see `reminder_tick`).
const REMINDER_PERIOD_SECS: u64 = 3600;

/// The central gateway that routes inbound events to handlers.
pub struct Gateway {
    channel: Arc<dyn Channel>,
    store: Store,
    sessions: Sessions,
    reminder_config: ReminderConfig,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(channel: Arc<dyn Channel>, store: Store, reminder_config: ReminderConfig) -> Self {
        Self {
            channel,
            store,
            sessions: Sessions::new(),
            reminder_config,
        }
    }

    /// Run the main event loop until shutdown.
    ///
    /// A handler error is logged and re-raised, terminating the process;
    /// there is no retry or supervisor layer.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        info!("Spravy gateway running | channel: {}", self.channel.name());

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel: {e}"))?;

        // Spawn the hourly reminder loop.
        let rem_store = self.store.clone();
        let rem_channel = self.channel.clone();
        let rem_config = self.reminder_config.clone();
        let rem_handle = tokio::spawn(async move {
            Self::reminder_loop(rem_store, rem_channel, rem_config).await;
        });

        loop {
            tokio::select! {
                maybe_event = rx.recv() => {
                    match maybe_event {
                        Some(event) => {
                            if let Err(e) = self.handle_event(event).await {
                                error!("handler failed: {e}");
                                rem_handle.abort();
                                return Err(e.into());
                            }
                        }
                        None => {
                            info!("channel closed, shutting down");
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        rem_handle.abort();
        if let Err(e) = self.channel.stop().await {
            warn!("channel stop failed: {e}");
        }
        Ok(())
    }

    /// Route one inbound event to its handler.
    async fn handle_event(&mut self, event: IncomingEvent) -> Result<(), SpravyError> {
        let user_id = event.sender_id;
        let reply_target = event.reply_target;

        match event.payload {
            EventPayload::Command { name, .. } => {
                self.handle_command(&user_id, reply_target, &name).await
            }
            EventPayload::Callback {
                data,
                callback_id,
                message_id,
            } => {
                // Ack first so the origin UI clears its loading state.
                self.channel.ack_callback(&callback_id).await?;
                self.handle_callback(&user_id, reply_target, &data, message_id)
                    .await
            }
            EventPayload::Text { text } => self.handle_text(&user_id, reply_target, &text).await,
        }
    }

    async fn handle_command(
        &mut self,
        user_id: &str,
        reply_target: Option<String>,
        name: &str,
    ) -> Result<(), SpravyError> {
        match name {
            "start" => {
                self.channel
                    .send(OutgoingMessage {
                        text: menu::GREETING.to_string(),
                        reply_target,
                        menu: Some(menu::main_menu()),
                        edit_message_id: None,
                    })
                    .await
            }
            "remind" => {
                self.channel
                    .send(OutgoingMessage {
                        text: menu::REMIND_HELP.to_string(),
                        reply_target,
                        menu: None,
                        edit_message_id: None,
                    })
                    .await
            }
            "remind_1h" | "remind_2h" | "remind_off" => {
                let interval = match name {
                    "remind_1h" => ReminderInterval::Hourly,
                    "remind_2h" => ReminderInterval::TwoHourly,
                    _ => ReminderInterval::Off,
                };
                // Interval selection ignores any pending session flag.
                self.store.save_reminder(user_id, interval).await?;
                self.channel
                    .send(OutgoingMessage {
                        text: menu::reminder_confirmation(interval),
                        reply_target,
                        menu: Some(menu::main_menu()),
                        edit_message_id: None,
                    })
                    .await
            }
            other => {
                debug!("ignoring unknown command /{other} from {user_id}");
                Ok(())
            }
        }
    }

    async fn handle_callback(
        &mut self,
        user_id: &str,
        reply_target: Option<String>,
        data: &str,
        message_id: i64,
    ) -> Result<(), SpravyError> {
        match data {
            menu::CB_ADD_TODAY | menu::CB_ADD_TOMORROW => {
                let bucket = if data == menu::CB_ADD_TODAY {
                    DayBucket::Today
                } else {
                    DayBucket::Tomorrow
                };
                self.sessions.set_awaiting(user_id, bucket);
                self.channel
                    .send(OutgoingMessage {
                        text: menu::add_prompt(bucket).to_string(),
                        reply_target,
                        menu: None,
                        edit_message_id: Some(message_id),
                    })
                    .await
            }
            menu::CB_LIST_TASKS => {
                let tasks = self.store.load_tasks(user_id).await?;
                self.channel
                    .send(OutgoingMessage {
                        text: menu::render_task_list(&tasks),
                        reply_target,
                        menu: Some(menu::main_menu()),
                        edit_message_id: Some(message_id),
                    })
                    .await
            }
            other => {
                warn!("unknown callback data '{other}' from {user_id}");
                Ok(())
            }
        }
    }

    async fn handle_text(
        &mut self,
        user_id: &str,
        reply_target: Option<String>,
        text: &str,
    ) -> Result<(), SpravyError> {
        // The pending flag is consumed regardless of how the save goes.
        if let Some(bucket) = self.sessions.take(user_id) {
            self.store.save_task(user_id, bucket, text, false).await?;
            self.channel
                .send(OutgoingMessage {
                    text: menu::saved_confirmation(bucket, text),
                    reply_target,
                    menu: Some(menu::main_menu()),
                    edit_message_id: None,
                })
                .await
        } else {
            // Free text while idle: just offer the menu again.
            self.channel
                .send(OutgoingMessage {
                    text: menu::CHOOSE_ACTION.to_string(),
                    reply_target,
                    menu: Some(menu::main_menu()),
                    edit_message_id: None,
                })
                .await
        }
    }

    /// Background task: hourly reminder scan.
    ///
    /// Errors inside a tick are logged and swallowed; the next tick runs
    /// on schedule.
    async fn reminder_loop(store: Store, channel: Arc<dyn Channel>, config: ReminderConfig) {
        loop {
            tokio::time::sleep(std::time::Duration::from_secs(REMINDER_PERIOD_SECS)).await;

            let now = chrono::Local::now().time();
            if !within_window(now, &config.window_start, &config.window_end) {
                debug!("reminder tick outside delivery window, skipping");
                continue;
            }

            if let Err(e) = reminder_tick(&store, channel.as_ref()).await {
                error!("reminder tick failed: {e}");
            }
        }
    }
}

/// One reminder scan: push the incomplete-task list to every opted-in user
/// who has incomplete tasks.
///
/// The stored interval only gates opt-in: `1h` and `2h` users are both
/// notified on every hourly tick. A slower `2h` cadence is stored but not
/// implemented.
async fn reminder_tick(store: &Store, channel: &dyn Channel) -> Result<(), SpravyError> {
    for user_id in store.users_with_reminders().await? {
        let tasks = store.load_tasks(&user_id).await?;
        if let Some(text) = menu::render_reminder(&tasks) {
            // Private chat: chat id is the user id.
            channel
                .send(OutgoingMessage {
                    text,
                    reply_target: Some(user_id.clone()),
                    menu: None,
                    edit_message_id: None,
                })
                .await?;
        }
    }
    Ok(())
}

/// Closed daytime interval check on zero-padded `HH:MM` strings,
/// e.g. 09:00 <= now <= 22:00.
fn within_window(now: NaiveTime, start: &str, end: &str) -> bool {
    let now = now.format("%H:%M").to_string();
    now.as_str() >= start && now.as_str() <= end
}

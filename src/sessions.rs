//! Per-user pending-input records.
//!
//! A record is created when the user picks an "add task" option and is
//! consumed by their next free-text message, whatever that message turns
//! out to be. Process-lifetime only: a restart drops in-flight prompts,
//! which is accepted.

use spravy_store::DayBucket;
use std::collections::HashMap;

/// Keyed store of pending-input flags, one slot per user.
#[derive(Debug, Default)]
pub struct Sessions {
    pending: HashMap<String, DayBucket>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the user as awaiting task text for `bucket`, replacing any
    /// previous flag.
    pub fn set_awaiting(&mut self, user_id: &str, bucket: DayBucket) {
        self.pending.insert(user_id.to_string(), bucket);
    }

    /// Consume the user's pending flag, if any.
    pub fn take(&mut self, user_id: &str) -> Option<DayBucket> {
        self.pending.remove(user_id)
    }
}

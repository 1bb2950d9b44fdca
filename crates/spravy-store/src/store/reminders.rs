//! Per-user reminder cadence preference.

use super::Store;
use crate::types::ReminderInterval;
use spravy_core::error::SpravyError;
use std::str::FromStr;
use tracing::warn;

impl Store {
    /// Stored interval for a user, or `Off` when no row exists.
    pub async fn load_reminder(&self, user_id: &str) -> Result<ReminderInterval, SpravyError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT interval FROM reminders WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| SpravyError::Store(format!("load reminder failed: {e}")))?;

        Ok(match row {
            Some((value,)) => ReminderInterval::from_str(&value).unwrap_or_else(|e| {
                warn!("reminder row for {user_id}: {e}, treating as off");
                ReminderInterval::Off
            }),
            None => ReminderInterval::Off,
        })
    }

    /// Upsert the interval for a user. At most one row survives per user.
    pub async fn save_reminder(
        &self,
        user_id: &str,
        interval: ReminderInterval,
    ) -> Result<(), SpravyError> {
        sqlx::query("INSERT OR REPLACE INTO reminders (user_id, interval) VALUES (?, ?)")
            .bind(user_id)
            .bind(interval.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| SpravyError::Store(format!("save reminder failed: {e}")))?;
        Ok(())
    }

    /// Users who opted into reminders (interval != off).
    pub async fn users_with_reminders(&self) -> Result<Vec<String>, SpravyError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT user_id FROM reminders WHERE interval != 'off'")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| SpravyError::Store(format!("list reminders failed: {e}")))?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

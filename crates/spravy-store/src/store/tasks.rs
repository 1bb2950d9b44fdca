//! Per-user task rows, partitioned by day bucket.

use super::Store;
use crate::types::{DayBucket, TaskItem, TaskLists};
use spravy_core::error::SpravyError;
use std::str::FromStr;
use tracing::warn;

impl Store {
    /// Load all tasks for a user, partitioned by day bucket in storage
    /// order. Unknown users get empty lists.
    pub async fn load_tasks(&self, user_id: &str) -> Result<TaskLists, SpravyError> {
        let rows: Vec<(String, String, bool)> = sqlx::query_as(
            "SELECT day, task_text, done FROM tasks WHERE user_id = ? ORDER BY rowid",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SpravyError::Store(format!("load tasks failed: {e}")))?;

        let mut lists = TaskLists::default();
        for (day, text, done) in rows {
            let item = TaskItem { text, done };
            match DayBucket::from_str(&day) {
                Ok(DayBucket::Today) => lists.today.push(item),
                Ok(DayBucket::Tomorrow) => lists.tomorrow.push(item),
                Err(e) => warn!("skipping task row for {user_id}: {e}"),
            }
        }
        Ok(lists)
    }

    /// Append one task row. No dedup: repeated identical saves create
    /// duplicate rows.
    pub async fn save_task(
        &self,
        user_id: &str,
        day: DayBucket,
        text: &str,
        done: bool,
    ) -> Result<(), SpravyError> {
        sqlx::query("INSERT INTO tasks (user_id, day, task_text, done) VALUES (?, ?, ?, ?)")
            .bind(user_id)
            .bind(day.as_str())
            .bind(text)
            .bind(done)
            .execute(&self.pool)
            .await
            .map_err(|e| SpravyError::Store(format!("save task failed: {e}")))?;
        Ok(())
    }
}

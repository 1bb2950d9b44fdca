//! # spravy-store
//!
//! Persistent task and reminder storage for Spravy (SQLite-backed).

pub mod store;
pub mod types;

pub use store::Store;
pub use types::{DayBucket, ReminderInterval, TaskItem, TaskLists};

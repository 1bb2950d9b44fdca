//! # spravy-channels
//!
//! Messaging platform integrations for Spravy.

pub mod telegram;

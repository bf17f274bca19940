//! # MemoryPing Bot
//!
//! A Telegram reminder bot that understands plain-language requests such as
//! "call mom at 7pm" or "every weekday at 9am standup".
//!
//! ## Features
//! - Phrase resolution into a due time, recurrence and tags
//! - JSON file persistence with atomic rewrites
//! - Periodic delivery with snooze, done and dismiss buttons
//! - XP, levels, streaks, achievements and a leaderboard
//! - Mood journal, habit suggestions and reply personalities

/// Bot commands, keyboards, callback payloads and update handlers
pub mod bot;
/// Configuration from environment variables
pub mod config;
/// Turning reminder text into a schedule
pub mod parser;
/// Background delivery, gamification and other domain services
pub mod services;
/// JSON-file data store and its models
pub mod storage;
/// Formatting, validation, logging and feedback helpers
pub mod utils;

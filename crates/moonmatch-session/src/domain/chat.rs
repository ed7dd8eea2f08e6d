//! The session chat log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only chat entry. Messages are never edited; the only later
/// mutation is attaching an emoji reaction to the most recent entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Avatar of the sending character.
    pub avatar_url: String,
    /// Display name of the sending character.
    pub sender: String,
    /// Message body (question text, raw answer, or moon message).
    pub text: String,
    /// Emoji reaction, attached by the other player.
    pub reaction: Option<String>,
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,
}

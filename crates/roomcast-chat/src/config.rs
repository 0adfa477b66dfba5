//! Chat limits.

use serde::{Deserialize, Serialize};

/// Size limits for chat.
///
/// Loaded with the rest of the server configuration; the defaults match
/// what clients are built to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum number of named chat rooms in one cluster.
    pub max_chat_rooms_per_cluster: usize,

    /// Maximum chat room name length, in characters.
    pub max_name_len: usize,

    /// Maximum chat message length, in characters.
    pub max_message_len: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_chat_rooms_per_cluster: 5,
            max_name_len: 20,
            max_message_len: 250,
        }
    }
}

impl ChatConfig {
    /// Cuts a chat room name down to `max_name_len` characters.
    pub fn truncate_name(&self, name: &str) -> String {
        name.chars().take(self.max_name_len).collect()
    }

    /// Cuts an over-long message and marks the cut with `...`.
    ///
    /// The result never exceeds `max_message_len` characters.
    pub fn truncate_message(&self, text: &str) -> String {
        if text.chars().count() <= self.max_message_len {
            return text.to_string();
        }
        let keep = self.max_message_len.saturating_sub(3);
        let mut out: String = text.chars().take(keep).collect();
        out.push_str("...");
        out
    }
}

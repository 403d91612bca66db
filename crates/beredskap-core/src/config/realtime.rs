//! Message hub configuration.

use serde::{Deserialize, Serialize};

/// Real-time message delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Buffer size of each per-target broadcast channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Maximum messages replayed from the store after a subscriber lags.
    #[serde(default = "default_replay_limit")]
    pub replay_limit: u32,
    /// Maximum message body length in characters.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    /// Default page size for message listings.
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            replay_limit: default_replay_limit(),
            max_message_length: default_max_message_length(),
            list_limit: default_list_limit(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_replay_limit() -> u32 {
    500
}

fn default_max_message_length() -> usize {
    4000
}

fn default_list_limit() -> u32 {
    100
}

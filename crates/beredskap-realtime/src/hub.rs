//! In-memory pub/sub for newly persisted messages.

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use beredskap_entity::message::Message;

use crate::channel::ChannelKey;

/// Registry of per-conversation broadcast channels.
#[derive(Debug)]
pub struct MessageHub {
    /// Channel key → broadcast sender
    channels: DashMap<ChannelKey, broadcast::Sender<Message>>,
    /// Buffer size for new channels
    buffer_size: usize,
}

impl MessageHub {
    /// Create a hub whose channels buffer `buffer_size` messages per receiver.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Publish a persisted message to its conversation. Returns the number
    /// of receivers reached.
    pub fn publish(&self, msg: &Message) -> usize {
        let key = ChannelKey::for_message(msg);
        let Some(tx) = self.channels.get(&key).map(|entry| entry.value().clone()) else {
            return 0;
        };
        match tx.send(msg.clone()) {
            Ok(receivers) => receivers,
            Err(_) => {
                // Every receiver is gone.
                self.channels
                    .remove_if(&key, |_, sender| sender.receiver_count() == 0);
                0
            }
        }
    }

    /// Subscribe to a conversation, creating its channel on first use.
    pub fn subscribe(&self, key: ChannelKey) -> broadcast::Receiver<Message> {
        let tx = self
            .channels
            .entry(key)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);
        debug!(channel = %key, "Subscribed to channel");
        tx.subscribe()
    }

    /// Drop channels nobody listens to. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let before = self.channels.len();
        self.channels.retain(|_, sender| sender.receiver_count() > 0);
        before - self.channels.len()
    }

    /// Number of open channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

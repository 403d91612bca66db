//! At-least-once message subscriptions.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::Stream;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::warn;
use uuid::Uuid;

use beredskap_core::result::AppResult;
use beredskap_core::types::id::MessageId;
use beredskap_database::store::{MessageCursor, MessageStore};
use beredskap_entity::message::{Message, MessageFilter};

/// A live feed of messages matching one filter.
///
/// Delivery is at-least-once: after the receiver lags, missed rows are
/// replayed from the store, so a message may arrive twice. Callers
/// deduplicate by message id.
pub struct Subscription {
    filter: MessageFilter,
    stream: BroadcastStream<Message>,
    store: Arc<dyn MessageStore>,
    backlog: VecDeque<Message>,
    cursor: MessageCursor,
    replay_limit: i64,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("filter", &self.filter)
            .field("cursor", &self.cursor)
            .field("backlog", &self.backlog.len())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Wrap a receiver. Replays after lag start from `since`.
    pub fn new(
        filter: MessageFilter,
        rx: broadcast::Receiver<Message>,
        store: Arc<dyn MessageStore>,
        replay_limit: i64,
        since: DateTime<Utc>,
    ) -> Self {
        Self {
            filter,
            stream: BroadcastStream::new(rx),
            store,
            backlog: VecDeque::new(),
            cursor: MessageCursor {
                created_at: since,
                id: MessageId::from_uuid(Uuid::nil()),
            },
            replay_limit,
        }
    }

    /// The filter this subscription applies.
    pub fn filter(&self) -> &MessageFilter {
        &self.filter
    }

    /// Next matching message, or `None` once the hub is gone.
    pub async fn next(&mut self) -> AppResult<Option<Message>> {
        loop {
            if let Some(msg) = self.backlog.pop_front() {
                self.advance(&msg);
                return Ok(Some(msg));
            }

            match self.stream.next().await {
                Some(Ok(msg)) => {
                    if self.filter.matches(&msg) {
                        self.advance(&msg);
                        return Ok(Some(msg));
                    }
                }
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(skipped, filter = ?self.filter, "Subscriber lagged, replaying from store");
                    self.replay().await?;
                }
                None => return Ok(None),
            }
        }
    }

    /// Turn the subscription into a stream of results.
    pub fn into_stream(self) -> impl Stream<Item = AppResult<Message>> + Send {
        futures::stream::unfold(self, |mut sub| async move {
            match sub.next().await {
                Ok(Some(msg)) => Some((Ok(msg), sub)),
                Ok(None) => None,
                Err(e) => Some((Err(e), sub)),
            }
        })
    }

    /// Queue every stored message after the cursor, one page at a time.
    async fn replay(&mut self) -> AppResult<()> {
        let mut from = self.cursor;
        loop {
            let page = self
                .store
                .list_messages_after(&self.filter, from, self.replay_limit)
                .await?;
            let Some(last) = page.last() else {
                return Ok(());
            };
            from = MessageCursor::at(last);
            let full = i64::try_from(page.len()).unwrap_or(i64::MAX) >= self.replay_limit;
            self.backlog.extend(page);
            if !full {
                return Ok(());
            }
        }
    }

    fn advance(&mut self, msg: &Message) {
        self.cursor = self.cursor.max(MessageCursor::at(msg));
    }
}

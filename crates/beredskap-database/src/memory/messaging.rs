//! Notification and message tables of the in-process store.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use beredskap_core::result::AppResult;
use beredskap_core::types::id::{MessageId, NotificationId, UserId};
use beredskap_entity::message::{Message, MessageFilter};
use beredskap_entity::notification::{NewNotification, Notification};

use super::{MemoryStore, Tables};
use crate::store::{DedupOutcome, MessageCursor, MessageStore, NotificationStore};

impl Tables {
    /// Matching messages in (created_at, id) order.
    fn conversation(&self, filter: &MessageFilter) -> Vec<&Message> {
        let mut rows: Vec<&Message> = self.messages.iter().filter(|m| filter.matches(m)).collect();
        rows.sort_by_key(|m| MessageCursor::at(m));
        rows
    }
}

fn clamp(limit: i64) -> usize {
    usize::try_from(limit.max(0)).unwrap_or(usize::MAX)
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert_deduplicated(
        &self,
        notification: NewNotification,
        window: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<DedupOutcome> {
        let mut tables = self.lock().await;
        let since = now - window;
        let existing = tables
            .notifications
            .values()
            .filter(|n| n.created_at > since && notification.duplicates(n))
            .max_by_key(|n| (n.created_at, n.id));

        if let Some(existing) = existing {
            return Ok(DedupOutcome {
                notification: existing.clone(),
                created: false,
            });
        }

        let stored = notification.into_notification(now);
        tables.notifications.insert(stored.id, stored.clone());
        Ok(DedupOutcome {
            notification: stored,
            created: true,
        })
    }

    async fn find_notification(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        Ok(self.lock().await.notifications.get(&id).cloned())
    }

    async fn list_notifications(
        &self,
        user_id: UserId,
        unread_only: bool,
        limit: i64,
    ) -> AppResult<Vec<Notification>> {
        let tables = self.lock().await;
        let mut rows: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|n| n.user_id == user_id && (!unread_only || n.is_unread()))
            .cloned()
            .collect();
        rows.sort_by_key(|n| Reverse((n.created_at, n.id)));
        rows.truncate(clamp(limit));
        Ok(rows)
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut tables = self.lock().await;
        match tables.notifications.get_mut(&id) {
            Some(n) if n.is_unread() => {
                n.is_read = true;
                n.read_at = Some(now);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn mark_all_notifications_read(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut tables = self.lock().await;
        let mut changed = 0;
        for n in tables.notifications.values_mut() {
            if n.user_id == user_id && n.is_unread() {
                n.is_read = true;
                n.read_at = Some(now);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count_unread_notifications(&self, user_id: UserId) -> AppResult<i64> {
        let tables = self.lock().await;
        Ok(tables
            .notifications
            .values()
            .filter(|n| n.user_id == user_id && n.is_unread())
            .count() as i64)
    }

    async fn purge_notifications_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.lock().await;
        let before = tables.notifications.len();
        tables.notifications.retain(|_, n| n.created_at >= cutoff);
        Ok((before - tables.notifications.len()) as u64)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: &Message) -> AppResult<Message> {
        let mut tables = self.lock().await;
        tables.messages.push(message.clone());
        Ok(message.clone())
    }

    async fn find_message(&self, id: MessageId) -> AppResult<Option<Message>> {
        let tables = self.lock().await;
        Ok(tables.messages.iter().find(|m| m.id == id).cloned())
    }

    async fn list_messages(&self, filter: &MessageFilter, limit: i64) -> AppResult<Vec<Message>> {
        let tables = self.lock().await;
        let rows = tables.conversation(filter);
        let skip = rows.len().saturating_sub(clamp(limit));
        Ok(rows.into_iter().skip(skip).cloned().collect())
    }

    async fn list_messages_after(
        &self,
        filter: &MessageFilter,
        cursor: MessageCursor,
        limit: i64,
    ) -> AppResult<Vec<Message>> {
        let tables = self.lock().await;
        Ok(tables
            .conversation(filter)
            .into_iter()
            .filter(|m| cursor.precedes(m))
            .take(clamp(limit))
            .cloned()
            .collect())
    }

    async fn mark_message_read(&self, id: MessageId, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.lock().await;
        Ok(tables
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .map(|m| u64::from(m.mark_read(now)))
            .unwrap_or(0))
    }

    async fn mark_conversation_read(
        &self,
        filter: &MessageFilter,
        reader: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut tables = self.lock().await;
        let mut changed = 0;
        for m in tables.messages.iter_mut() {
            if filter.is_unread_for(m, reader) && m.mark_read(now) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count_unread_messages(
        &self,
        filter: &MessageFilter,
        reader: UserId,
    ) -> AppResult<i64> {
        let tables = self.lock().await;
        Ok(tables
            .messages
            .iter()
            .filter(|m| filter.is_unread_for(m, reader))
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beredskap_core::types::id::CommunityId;
    use beredskap_entity::message::MessageTarget;
    use beredskap_entity::notification::NotificationKind;

    fn new_notification(user_id: UserId, sender: &str) -> NewNotification {
        NewNotification {
            user_id,
            kind: NotificationKind::Message,
            title: "Nytt meddelande".into(),
            content: "hej".into(),
            sender_name: Some(sender.into()),
            action_url: None,
        }
    }

    #[tokio::test]
    async fn test_dedup_inside_window_returns_existing() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let window = Duration::seconds(5);
        let t0 = Utc::now();

        let first = store
            .insert_deduplicated(new_notification(user, "Anna"), window, t0)
            .await
            .unwrap();
        assert!(first.created);

        let second = store
            .insert_deduplicated(new_notification(user, "Anna"), window, t0 + Duration::seconds(2))
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.notification, first.notification);

        let other_sender = store
            .insert_deduplicated(new_notification(user, "Bo"), window, t0 + Duration::seconds(2))
            .await
            .unwrap();
        assert!(other_sender.created);

        let later = store
            .insert_deduplicated(new_notification(user, "Anna"), window, t0 + Duration::seconds(6))
            .await
            .unwrap();
        assert!(later.created);
        assert_eq!(store.count_unread_notifications(user).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_dedup_inserts_once() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let now = Utc::now();
        let window = Duration::seconds(5);

        let (a, b) = tokio::join!(
            store.insert_deduplicated(new_notification(user, "Anna"), window, now),
            store.insert_deduplicated(new_notification(user, "Anna"), window, now),
        );
        assert_ne!(a.unwrap().created, b.unwrap().created);
        assert_eq!(store.count_unread_notifications(user).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_returns_latest_oldest_first() {
        let store = MemoryStore::new();
        let (a, b) = (UserId::new(), UserId::new());
        let t0 = Utc::now();
        for i in 0..5 {
            let msg = Message::new(
                if i % 2 == 0 { a } else { b },
                format!("#{i}"),
                MessageTarget::Direct(if i % 2 == 0 { b } else { a }),
                false,
                t0 + Duration::seconds(i),
            );
            store.insert_message(&msg).await.unwrap();
        }
        let community = Message::new(a, "alla".into(), MessageTarget::Community(CommunityId::new()), false, t0);
        store.insert_message(&community).await.unwrap();

        let filter = MessageFilter::new(a, MessageTarget::Direct(b));
        let rows = store.list_messages(&filter, 3).await.unwrap();
        let contents: Vec<_> = rows.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["#2", "#3", "#4"]);

        let after = store
            .list_messages_after(&filter, MessageCursor::at(&rows[0]), 10)
            .await
            .unwrap();
        assert_eq!(after.len(), 2);
    }

    #[tokio::test]
    async fn test_mark_conversation_read_skips_own_messages() {
        let store = MemoryStore::new();
        let (a, b) = (UserId::new(), UserId::new());
        let now = Utc::now();
        store
            .insert_message(&Message::new(a, "1".into(), MessageTarget::Direct(b), false, now))
            .await
            .unwrap();
        store
            .insert_message(&Message::new(b, "2".into(), MessageTarget::Direct(a), false, now))
            .await
            .unwrap();

        let filter = MessageFilter::new(a, MessageTarget::Direct(b));
        assert_eq!(store.count_unread_messages(&filter, a).await.unwrap(), 1);
        assert_eq!(store.mark_conversation_read(&filter, a, now).await.unwrap(), 1);
        assert_eq!(store.mark_conversation_read(&filter, a, now).await.unwrap(), 0);
        assert_eq!(store.count_unread_messages(&filter, a).await.unwrap(), 0);

        let peer_view = MessageFilter::new(b, MessageTarget::Direct(a));
        assert_eq!(store.count_unread_messages(&peer_view, b).await.unwrap(), 1);
    }
}

//! Chat message routing.
//!
//! A message goes to exactly one target: a direct peer or a community.
//! Listing, unread counts, read marks, and subscriptions all select rows
//! through the same [`MessageFilter`], so the two kinds never mix.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use beredskap_core::config::RealtimeConfig;
use beredskap_core::error::AppError;
use beredskap_core::events::{DomainEvent, MessageEvent};
use beredskap_core::result::AppResult;
use beredskap_core::types::id::MessageId;
use beredskap_database::store::MessageStore;
use beredskap_entity::message::{Message, MessageFilter, MessageTarget};
use beredskap_realtime::{ChannelKey, MessageHub, Subscription};

use crate::context::RequestContext;
use crate::membership::CommunityDirectory;
use crate::notification::NotificationDispatcher;
use crate::validation::page_limit;

/// Characters of message content carried in notifications.
const PREVIEW_CHARS: usize = 100;

/// Routes chat messages to storage, notifications, and live subscribers.
#[derive(Debug, Clone)]
pub struct MessageRouter {
    /// Message store.
    store: Arc<dyn MessageStore>,
    /// Community membership.
    directory: CommunityDirectory,
    /// Notification dispatcher.
    dispatcher: Arc<NotificationDispatcher>,
    /// Live fan-out.
    hub: Arc<MessageHub>,
    /// Limits and buffer sizes.
    config: RealtimeConfig,
}

/// Request to send a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Message body.
    pub content: String,
    /// Direct peer or community.
    pub target: MessageTarget,
    /// Sender flagged the message as an emergency.
    #[serde(default)]
    pub is_emergency: bool,
}

impl MessageRouter {
    /// Creates a new message router.
    pub fn new(
        store: Arc<dyn MessageStore>,
        directory: CommunityDirectory,
        dispatcher: Arc<NotificationDispatcher>,
        hub: Arc<MessageHub>,
        config: RealtimeConfig,
    ) -> Self {
        Self {
            store,
            directory,
            dispatcher,
            hub,
            config,
        }
    }

    /// Persists a message, notifies its recipients, and publishes it to
    /// live subscribers.
    pub async fn send(&self, ctx: &RequestContext, req: SendMessageRequest) -> AppResult<Message> {
        if req.content.trim().is_empty() {
            return Err(AppError::validation("Message content must not be empty"));
        }
        let length = req.content.chars().count();
        if length > self.config.max_message_length {
            return Err(AppError::validation(format!(
                "Message is {length} characters, the limit is {}",
                self.config.max_message_length
            )));
        }
        match req.target {
            MessageTarget::Direct(peer_id) if ctx.is(peer_id) => {
                return Err(AppError::validation(
                    "Cannot send a direct message to yourself",
                ));
            }
            MessageTarget::Direct(_) => {}
            MessageTarget::Community(community_id) => {
                self.directory
                    .require_member(community_id, ctx.user_id)
                    .await?;
            }
        }

        let message = Message::new(
            ctx.user_id,
            req.content,
            req.target,
            req.is_emergency,
            Utc::now(),
        );
        let message = self.store.insert_message(&message).await?;

        info!(
            message_id = %message.id,
            sender_id = %ctx.user_id,
            target = %message.target(),
            is_emergency = message.is_emergency,
            "Message sent"
        );

        let receivers = self.hub.publish(&message);
        debug!(message_id = %message.id, receivers, "Message published");

        match self.event_for(ctx, &message).await {
            Ok(event) => self.dispatcher.dispatch(&event).await,
            Err(e) => warn!(
                message_id = %message.id,
                error = %e,
                "Could not resolve message recipients"
            ),
        }

        Ok(message)
    }

    /// The most recent messages of a conversation, oldest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        target: MessageTarget,
        limit: Option<u32>,
    ) -> AppResult<Vec<Message>> {
        let filter = self.filter_for(ctx, target).await?;
        self.store
            .list_messages(&filter, page_limit(limit, self.config.list_limit))
            .await
    }

    /// Marks one message read. Direct messages only by their recipient,
    /// community messages by any member.
    pub async fn mark_read(&self, ctx: &RequestContext, id: MessageId) -> AppResult<u64> {
        let message = self
            .store
            .find_message(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Message {id} not found")))?;
        match message.target() {
            MessageTarget::Direct(recipient_id) if !ctx.is(recipient_id) => {
                return Err(AppError::authorization(
                    "Only the recipient can mark this message read",
                ));
            }
            MessageTarget::Direct(_) => {}
            MessageTarget::Community(community_id) => {
                self.directory
                    .require_member(community_id, ctx.user_id)
                    .await?;
            }
        }
        self.store.mark_message_read(id, Utc::now()).await
    }

    /// Marks every unread message in a conversation read, except the
    /// caller's own. Returns rows changed.
    pub async fn mark_conversation_read(
        &self,
        ctx: &RequestContext,
        target: MessageTarget,
    ) -> AppResult<u64> {
        let filter = self.filter_for(ctx, target).await?;
        let changed = self
            .store
            .mark_conversation_read(&filter, ctx.user_id, Utc::now())
            .await?;
        debug!(user_id = %ctx.user_id, target = %target, changed, "Conversation marked read");
        Ok(changed)
    }

    /// Unread messages in a conversation not sent by the caller.
    pub async fn unread_count(&self, ctx: &RequestContext, target: MessageTarget) -> AppResult<i64> {
        let filter = self.filter_for(ctx, target).await?;
        self.store.count_unread_messages(&filter, ctx.user_id).await
    }

    /// Live feed of new messages in a conversation.
    pub async fn subscribe(
        &self,
        ctx: &RequestContext,
        target: MessageTarget,
    ) -> AppResult<Subscription> {
        let filter = self.filter_for(ctx, target).await?;
        // Subscribe before taking the replay cursor so no publish falls between.
        let rx = self.hub.subscribe(ChannelKey::for_filter(&filter));
        let since = Utc::now();
        info!(user_id = %ctx.user_id, target = %target, "Message subscription opened");
        Ok(Subscription::new(
            filter,
            rx,
            Arc::clone(&self.store),
            i64::from(self.config.replay_limit),
            since,
        ))
    }

    /// The read filter for the caller, after checking community access.
    async fn filter_for(
        &self,
        ctx: &RequestContext,
        target: MessageTarget,
    ) -> AppResult<MessageFilter> {
        if let MessageTarget::Community(community_id) = target {
            self.directory
                .require_member(community_id, ctx.user_id)
                .await?;
        }
        Ok(MessageFilter::new(ctx.user_id, target))
    }

    async fn event_for(&self, ctx: &RequestContext, message: &Message) -> AppResult<DomainEvent> {
        let preview = message.preview(PREVIEW_CHARS);
        let event = match message.target() {
            MessageTarget::Direct(recipient_id) => MessageEvent::DirectSent {
                message_id: message.id,
                sender_id: ctx.user_id,
                sender_name: ctx.display_name.clone(),
                recipient_id,
                preview,
                is_emergency: message.is_emergency,
            },
            MessageTarget::Community(community_id) => MessageEvent::CommunitySent {
                message_id: message.id,
                sender_id: ctx.user_id,
                sender_name: ctx.display_name.clone(),
                community_id,
                recipients: self
                    .directory
                    .members_except(community_id, ctx.user_id)
                    .await?,
                preview,
                is_emergency: message.is_emergency,
            },
        };
        Ok(DomainEvent::message(ctx.user_id, event))
    }
}

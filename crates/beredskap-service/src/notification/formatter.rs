//! Notification text for domain events.

use beredskap_core::events::{DomainEvent, EventPayload, MessageEvent, SharingEvent};
use beredskap_core::types::id::{CommunityId, OfferId, UserId};
use beredskap_entity::notification::{NewNotification, NotificationKind};

/// Formats notifications for domain events.
pub struct NotificationFormatter;

impl NotificationFormatter {
    /// One notification per recipient of `event`.
    pub fn format(event: &DomainEvent) -> Vec<NewNotification> {
        match &event.payload {
            EventPayload::Sharing(sharing) => vec![Self::sharing(sharing)],
            EventPayload::Message(message) => Self::message(message),
        }
    }

    fn sharing(event: &SharingEvent) -> NewNotification {
        match event {
            SharingEvent::RequestCreated {
                offer_id,
                owner_id,
                requester_name,
                resource_name,
                quantity,
                message,
                ..
            } => Self::request_created(
                *owner_id,
                *offer_id,
                requester_name,
                resource_name,
                *quantity,
                message.as_deref(),
            ),
            SharingEvent::RequestApproved {
                offer_id,
                requester_id,
                owner_name,
                resource_name,
                response_message,
                ..
            } => Self::request_answered(
                *requester_id,
                *offer_id,
                owner_name,
                resource_name,
                "approved",
                response_message.as_deref(),
            ),
            SharingEvent::RequestDenied {
                offer_id,
                requester_id,
                owner_name,
                resource_name,
                response_message,
                ..
            } => Self::request_answered(
                *requester_id,
                *offer_id,
                owner_name,
                resource_name,
                "denied",
                response_message.as_deref(),
            ),
        }
    }

    fn message(event: &MessageEvent) -> Vec<NewNotification> {
        match event {
            MessageEvent::DirectSent {
                sender_id,
                sender_name,
                recipient_id,
                preview,
                is_emergency,
                ..
            } => vec![Self::direct_message(
                *recipient_id,
                *sender_id,
                sender_name,
                preview,
                *is_emergency,
            )],
            MessageEvent::CommunitySent {
                sender_name,
                community_id,
                recipients,
                preview,
                is_emergency,
                ..
            } => recipients
                .iter()
                .map(|recipient| {
                    Self::community_message(
                        *recipient,
                        *community_id,
                        sender_name,
                        preview,
                        *is_emergency,
                    )
                })
                .collect(),
        }
    }

    /// Formats a new-request notification for the offer owner.
    pub fn request_created(
        owner_id: UserId,
        offer_id: OfferId,
        requester_name: &str,
        resource_name: &str,
        quantity: i32,
        message: Option<&str>,
    ) -> NewNotification {
        let mut content = format!("{requester_name} asked for {quantity} of '{resource_name}'");
        if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
            content.push_str(&format!(": \"{message}\""));
        }
        NewNotification {
            user_id: owner_id,
            kind: NotificationKind::ResourceRequest,
            title: format!("New request for {resource_name}"),
            content,
            sender_name: Some(requester_name.to_string()),
            action_url: Some(format!("/offers/{offer_id}/requests")),
        }
    }

    /// Formats the owner's answer for the requester.
    pub fn request_answered(
        requester_id: UserId,
        offer_id: OfferId,
        owner_name: &str,
        resource_name: &str,
        verdict: &str,
        response_message: Option<&str>,
    ) -> NewNotification {
        let mut content = format!("{owner_name} {verdict} your request for '{resource_name}'");
        if let Some(response) = response_message.filter(|m| !m.trim().is_empty()) {
            content.push_str(&format!(": \"{response}\""));
        }
        NewNotification {
            user_id: requester_id,
            kind: NotificationKind::System,
            title: format!("Request {verdict}"),
            content,
            sender_name: Some(owner_name.to_string()),
            action_url: Some(format!("/offers/{offer_id}")),
        }
    }

    /// Formats a direct message notification for the recipient.
    pub fn direct_message(
        recipient_id: UserId,
        sender_id: UserId,
        sender_name: &str,
        preview: &str,
        is_emergency: bool,
    ) -> NewNotification {
        let title = if is_emergency {
            format!("Emergency message from {sender_name}")
        } else {
            format!("Message from {sender_name}")
        };
        NewNotification {
            user_id: recipient_id,
            kind: message_kind(is_emergency),
            title,
            content: preview.to_string(),
            sender_name: Some(sender_name.to_string()),
            action_url: Some(format!("/messages/direct/{sender_id}")),
        }
    }

    /// Formats a community message notification for one member.
    pub fn community_message(
        recipient_id: UserId,
        community_id: CommunityId,
        sender_name: &str,
        preview: &str,
        is_emergency: bool,
    ) -> NewNotification {
        let title = if is_emergency {
            "Emergency in your community".to_string()
        } else {
            "New community message".to_string()
        };
        NewNotification {
            user_id: recipient_id,
            kind: message_kind(is_emergency),
            title,
            content: format!("{sender_name}: {preview}"),
            sender_name: Some(sender_name.to_string()),
            action_url: Some(format!("/messages/community/{community_id}")),
        }
    }
}

fn message_kind(is_emergency: bool) -> NotificationKind {
    if is_emergency {
        NotificationKind::Emergency
    } else {
        NotificationKind::Message
    }
}

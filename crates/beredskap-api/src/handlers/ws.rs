//! WebSocket feed of new messages in one conversation.

use axum::extract::ws::{Message as WsMessage, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use beredskap_core::error::AppError;
use beredskap_entity::message::MessageTarget;
use beredskap_realtime::Subscription;
use beredskap_service::RequestContext;

use crate::dto::request::WsQuery;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/ws/messages?target=community:{id}
///
/// Access is checked before the upgrade so an outsider gets a plain 403.
pub async fn ws_handler(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let target: MessageTarget = query
        .target
        .parse()
        .map_err(|e| AppError::validation(format!("{e}")))?;
    let subscription = state.messages.subscribe(&ctx, target).await?;

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(ctx, target, subscription, socket)))
}

async fn handle_ws_connection(
    ctx: RequestContext,
    target: MessageTarget,
    subscription: Subscription,
    socket: WebSocket,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    info!(user_id = %ctx.user_id, target = %target, "WebSocket connection established");

    let outbound_task = tokio::spawn(async move {
        let mut messages = Box::pin(subscription.into_stream());
        while let Some(item) = messages.next().await {
            let msg = match item {
                Ok(msg) => msg,
                Err(e) => {
                    warn!(error = %e, "Message replay failed, closing feed");
                    break;
                }
            };
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    warn!(message_id = %msg.id, error = %e, "Message not serializable");
                    continue;
                }
            };
            if ws_tx.send(WsMessage::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // The feed is one-way; inbound frames only matter for close detection.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(user_id = %ctx.user_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();

    info!(user_id = %ctx.user_id, target = %target, "WebSocket connection closed");
}

//! Live admin roster over WebSocket.
//!
//! Each connection opens its own roster and subscription. Every store change
//! is pushed as a full, ordered roster; client commands are answered with
//! the updated roster.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Response},
};
use futures_util::{Sink, SinkExt, StreamExt};
use uuid::Uuid;

use eragenetica_domain::{Confirmation, Identity};
use eragenetica_shared::{ErrorCode, ErrorInfo, RosterClientMessage, RosterServerMessage};

use super::{ApiError, ApiState, Auth};
use crate::infrastructure::ports::{CharacterSubscription, Snapshot};
use crate::use_cases::{AdminRoster, RosterError};

/// Upgrade handler for `/ws/roster`. Admins only.
///
/// The admin check runs before the upgrade is validated, so a player is
/// refused with 403 whatever headers they send.
pub async fn roster_ws_handler(
    Auth(identity): Auth,
    State(state): State<Arc<ApiState>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    if !identity.is_admin() {
        return ApiError::forbidden().into_response();
    }
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, identity))
}

/// Handle an individual roster connection.
async fn handle_socket(socket: WebSocket, state: Arc<ApiState>, identity: Identity) {
    let connection_id = Uuid::new_v4();
    let admin_id = identity.uid().clone();

    let mut roster = match state.app.use_cases.roster.open(identity) {
        Ok(roster) => roster,
        Err(e) => {
            tracing::warn!(connection_id = %connection_id, error = %e, "Roster connection refused");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = socket.split();
    tracing::info!(connection_id = %connection_id, admin_id = %admin_id, "Roster connection established");

    let mut subscription = roster.subscribe().await.ok();
    if subscription.is_none() {
        // The roster carries the failure.
        if send(&mut ws_sender, &roster_message(&roster)).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            snapshot = next_snapshot(&mut subscription) => match snapshot {
                Some(snapshot) => {
                    roster.apply_snapshot(snapshot);
                    if send(&mut ws_sender, &roster_message(&roster)).await.is_err() {
                        break;
                    }
                }
                None => {
                    tracing::warn!(connection_id = %connection_id, "Roster subscription ended");
                    subscription = None;
                }
            },
            incoming = ws_receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let reply = match serde_json::from_str::<RosterClientMessage>(text.as_str()) {
                        Ok(msg) => handle_message(msg, &mut roster).await,
                        Err(e) => {
                            tracing::warn!(connection_id = %connection_id, error = %e, "Failed to parse message");
                            Some(invalid_request())
                        }
                    };
                    if let Some(reply) = reply {
                        if send(&mut ws_sender, &reply).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(connection_id = %connection_id, "Roster connection closed by client");
                    break;
                }
                Some(Err(e)) => {
                    tracing::error!(connection_id = %connection_id, error = %e, "WebSocket error");
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    if let Some(mut subscription) = subscription {
        subscription.cancel();
    }
    tracing::info!(connection_id = %connection_id, "Roster connection terminated");
}

/// Next snapshot, or never when there is no subscription.
async fn next_snapshot(subscription: &mut Option<CharacterSubscription>) -> Option<Snapshot> {
    match subscription {
        Some(subscription) => subscription.next().await,
        None => std::future::pending().await,
    }
}

/// Apply one client command to the roster.
async fn handle_message(
    msg: RosterClientMessage,
    roster: &mut AdminRoster,
) -> Option<RosterServerMessage> {
    let result = match msg {
        RosterClientMessage::Heartbeat => return Some(RosterServerMessage::Pong),
        RosterClientMessage::Unknown => return Some(invalid_request()),
        RosterClientMessage::Reorder { from, to } => roster.reorder(from, to).await,
        RosterClientMessage::SaveDefaultOrder { confirm } => roster
            .save_default_order(Confirmation::from(confirm))
            .await
            .map(|_| ()),
        RosterClientMessage::ResetToDefaultOrder { confirm } => roster
            .reset_to_default_order(Confirmation::from(confirm))
            .await
            .map(|_| ()),
    };

    match result {
        Err(RosterError::Domain(_)) => Some(invalid_request()),
        // Store failures are carried on the roster itself.
        _ => Some(roster_message(roster)),
    }
}

fn roster_message(roster: &AdminRoster) -> RosterServerMessage {
    let view = roster.view();
    RosterServerMessage::Roster {
        characters: view.characters,
        error: view.error,
    }
}

fn invalid_request() -> RosterServerMessage {
    RosterServerMessage::Error {
        error: ErrorInfo::new(ErrorCode::InvalidRequest),
    }
}

async fn send<S>(sender: &mut S, msg: &RosterServerMessage) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
{
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode roster message");
            return Ok(());
        }
    };
    sender.send(Message::Text(json.into())).await.map_err(|_| ())
}

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::AppState;
use clipline_core::{ArchiveCache, ClientEvent, ConnectionHandle, MailingList, ServerEvent};

const FORWARDED_FOR: &str = "x-forwarded-for";

pub async fn ws_handler<C: ArchiveCache>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    ws.on_upgrade(move |socket| handle_socket(state, socket, forwarded))
}

async fn handle_socket<C: ArchiveCache>(
    state: AppState<C>,
    socket: WebSocket,
    forwarded: Option<String>,
) {
    let session_token = Uuid::new_v4().to_string();
    let client_id = state
        .sessions
        .identify(forwarded.as_deref(), &session_token);
    let (handle, mut outbox) = state.hub.register(client_id.clone());
    info!(client_id = %client_id, "client connected");

    let (mut sink, mut stream) = socket.split();

    // Write side: drain the outbox into the socket in send order.
    let writer = tokio::spawn(async move {
        while let Some(event) = outbox.recv().await {
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => dispatch(&state, &handle, &text).await,
            Ok(Message::Close(frame)) => {
                info!(client_id = %client_id, reason = ?frame, "client disconnected");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(client_id = %client_id, error = %e, "socket read failed");
                break;
            }
        }
    }

    state.hub.unregister(&client_id);
    state.coordinator.forget_subscriber(&client_id);
    writer.abort();
}

/// Routes one inbound event. Malformed payloads are answered with an
/// error event and never reach the business logic; handler failures are
/// surfaced to the calling connection only.
async fn dispatch<C: ArchiveCache>(state: &AppState<C>, conn: &ConnectionHandle, text: &str) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(client_id = %conn.client_id(), error = %e, "malformed client event");
            conn.send(ServerEvent::error("invalidPayload", e.to_string()));
            return;
        }
    };

    match event {
        ClientEvent::Archive { url } => {
            if let Err(e) = state.coordinator.archive(&url, conn).await {
                conn.send(e.to_event());
            }
        }
        ClientEvent::GetArchive { pid } => match state.coordinator.get_archive(&pid).await {
            Ok(record) => {
                conn.send(ServerEvent::Archive { pid, record });
            }
            Err(e) => {
                conn.send(e.to_event());
            }
        },
        ClientEvent::GetMostRecentListings => match state.coordinator.recent_listings().await {
            Ok(listings) => {
                conn.send(ServerEvent::MostRecentListings { listings });
            }
            Err(e) => {
                conn.send(e.to_event());
            }
        },
        ClientEvent::GetMostRecentDiscussions { last } => {
            if let Err(e) = state.synchronizer.list_recent(last).await {
                warn!(client_id = %conn.client_id(), error = %e, "discussion fetch failed");
                conn.send(e.to_event());
            }
        }
        ClientEvent::UpdateDiscussion {
            id,
            total_comment_count,
        } => {
            if let Err(e) = state
                .synchronizer
                .apply_update(&id, total_comment_count)
                .await
            {
                warn!(client_id = %conn.client_id(), error = %e, "discussion update failed");
                conn.send(e.to_event());
            }
        }
        ClientEvent::SubscribeDaily { email } => match state.mail.subscribe(&email).await {
            Ok(outcome) => {
                conn.send(ServerEvent::SubscribeDaily {
                    accepted: outcome.accepted,
                    message: outcome.message,
                });
            }
            Err(e) => {
                // Degrade gracefully: a failure indicator, not a raised
                // transport error.
                warn!(client_id = %conn.client_id(), error = %e, "subscription failed");
                conn.send(ServerEvent::SubscribeDaily {
                    accepted: false,
                    message: Some(e.to_string()),
                });
            }
        },
        ClientEvent::ClearEmergencyAlert { id } => {
            // On the wire with no defined behavior; kept as a no-op.
            debug!(alert_id = %id, "clearEmergencyAlert received, ignoring");
        }
    }
}

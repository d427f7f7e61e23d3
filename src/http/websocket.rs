//! Registry event stream over WebSocket.
//!
//! # Data Flow
//! ```text
//! EventWatcher ── broadcast ──→ one task per socket ──→ JSON text frames
//! ```
//!
//! # Design Decisions
//! - Server-to-client only; inbound frames other than Close are ignored
//! - A lagging client skips missed events rather than being disconnected

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use crate::blockchain::LandEvent;
use crate::http::state::AppState;

pub async fn events_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let events = state.events.subscribe();
    ws.on_upgrade(move |socket| stream_events(socket, events))
}

async fn stream_events(socket: WebSocket, mut events: Receiver<LandEvent>) {
    let (mut sender, mut receiver) = socket.split();
    tracing::debug!("Event stream opened");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to encode event");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event stream lagging");
                }
                Err(RecvError::Closed) => break,
            },
            inbound = receiver.next() => match inbound {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Event stream closed");
}

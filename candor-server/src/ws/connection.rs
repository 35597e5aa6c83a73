//! WebSocket connection handling
//!
//! Token verification happens before the upgrade, so a bad token gets a
//! plain 401 and never a socket. After the upgrade each connection owns
//! one `InterviewSession`; session events flow out through a forwarder
//! task, client frames flow in through the read loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use candor_core::{InterviewSession, SessionEvent};

use crate::AppState;

use super::protocol::{ClientMessage, ServerMessage, session_event_to_message};

/// Grace period for flushing the final frames before the socket closes
const CLOSE_FLUSH_DELAY: Duration = Duration::from_millis(100);

/// WebSocket upgrade handler; rejects bad tokens with 401 before upgrading
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(token) = params.get("token") else {
        debug!("websocket upgrade without token");
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let user_id = match state.authenticator.verify(token) {
        Ok(user_id) => user_id,
        Err(e) => {
            debug!(error = %e, "websocket token rejected");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: String) {
    let (mut sink, mut stream) = socket.split();

    let Some(_slot) = state.registry.register(&user_id) else {
        let frame = ServerMessage::Error {
            message: "an interview session is already active for this user".to_string(),
        };
        send_frame(&mut sink, &frame).await;
        let _ = sink.close().await;
        return;
    };

    info!(user_id, "interview connection established");

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let mut session = InterviewSession::new(
        user_id.clone(),
        state.agent.clone(),
        state.store.clone(),
        events_tx.clone(),
    );

    let cancel = CancellationToken::new();
    let forwarder = tokio::spawn(forward_events(events_rx, sink, cancel.clone()));

    // Read loop: ends when the session requests close, the client
    // disconnects, or the socket errors
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        dispatch(&text, &mut session, &events_tx).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(user_id, "client closed the connection");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary, ping, pong: axum answers pings itself
                    }
                    Some(Err(e)) => {
                        warn!(user_id, error = %e, "websocket read error");
                        break;
                    }
                }
            }
        }
    }

    // Dropping the session drops the event sender; the forwarder then
    // drains whatever is queued and exits
    drop(session);
    drop(events_tx);
    let _ = forwarder.await;

    info!(user_id, "interview connection closed");
}

/// Forward session events to the socket until close is requested or the
/// channel drains
async fn forward_events(
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    mut sink: SplitSink<WebSocket, Message>,
    cancel: CancellationToken,
) {
    while let Some(event) = events.recv().await {
        let requested_close = matches!(event, SessionEvent::Close);
        if let Some(frame) = session_event_to_message(event) {
            send_frame(&mut sink, &frame).await;
        }
        if requested_close {
            // Let in-flight frames reach the client before the close frame
            tokio::time::sleep(CLOSE_FLUSH_DELAY).await;
            let _ = sink.close().await;
            cancel.cancel();
            return;
        }
    }
    let _ = sink.close().await;
}

async fn send_frame(sink: &mut SplitSink<WebSocket, Message>, frame: &ServerMessage) {
    match serde_json::to_string(frame) {
        Ok(json) => {
            if let Err(e) = sink.send(Message::Text(json.into())).await {
                debug!(error = %e, "failed to write frame");
            }
        }
        Err(e) => warn!(error = %e, "failed to serialize frame"),
    }
}

/// Parse and route one client frame
///
/// A malformed frame produces an error event and leaves the connection
/// open; only the session decides when to close.
async fn dispatch(
    text: &str,
    session: &mut InterviewSession,
    events: &mpsc::UnboundedSender<SessionEvent>,
) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, "unparseable client frame");
            let _ = events.send(SessionEvent::Error {
                message: format!("invalid message: {e}"),
            });
            return;
        }
    };

    match message {
        ClientMessage::Start { interview_id } => {
            session.start(&interview_id).await;
        }
        ClientMessage::Response { response } => {
            session.submit_answer(&response).await;
        }
        ClientMessage::ProctoringViolation {
            violation_type,
            detector_name,
            metadata,
        } => {
            session.record_violation(&violation_type, detector_name.as_deref(), metadata);
        }
    }
}

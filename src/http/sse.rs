//! Server-Sent-Events transport for the MCP session
//!
//! `GET /sse` opens a long-lived event stream; the first event names the
//! `POST /messages/` endpoint (with the session id) that carries client
//! frames back in. Responses are pushed onto the session's stream.

use std::{collections::HashMap, convert::Infallible};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};
use tracing::info;
use uuid::Uuid;

use crate::mcp::rpc::json_rpc_error;
use crate::mcp::server::handle_json_rpc_value;
use crate::AppState;

const SESSION_CHANNEL_CAPACITY: usize = 32;

/// Open SSE sessions, keyed by session id. The only shared mutable state in
/// the process.
#[derive(Debug, Default)]
pub struct SseSessions {
    inner: Mutex<HashMap<Uuid, mpsc::Sender<Value>>>,
}

impl SseSessions {
    pub fn new() -> Self {
        Self::default()
    }

    async fn insert(&self, session_id: Uuid, sender: mpsc::Sender<Value>) {
        self.inner.lock().await.insert(session_id, sender);
    }

    async fn sender(&self, session_id: &Uuid) -> Option<mpsc::Sender<Value>> {
        self.inner.lock().await.get(session_id).cloned()
    }

    async fn remove(&self, session_id: &Uuid) {
        self.inner.lock().await.remove(session_id);
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub session_id: Uuid,
}

pub async fn sse_endpoint(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4();
    let (sender, receiver) = mpsc::channel::<Value>(SESSION_CHANNEL_CAPACITY);
    state.sessions.insert(session_id, sender).await;

    info!(session_id = %session_id, "sse session opened");

    let endpoint_event = Event::default()
        .event("endpoint")
        .data(format!("/messages/?session_id={session_id}"));
    let message_events = ReceiverStream::new(receiver)
        .map(|response| Event::default().event("message").data(response.to_string()));

    let stream = tokio_stream::once(endpoint_event)
        .chain(message_events)
        .map(Ok::<_, Infallible>);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn post_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let Some(sender) = state.sessions.sender(&query.session_id).await else {
        return (StatusCode::NOT_FOUND, "unknown session").into_response();
    };

    let response = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => handle_json_rpc_value(&state, payload).await,
        Err(_) => Some(json_rpc_error(None, -32700, "Parse error")),
    };

    if let Some(response) = response {
        if sender.send(response).await.is_err() {
            // Client hung up; drop the dead session.
            state.sessions.remove(&query.session_id).await;
            info!(session_id = %query.session_id, "sse session closed");
            return StatusCode::GONE.into_response();
        }
    }

    StatusCode::ACCEPTED.into_response()
}

// HTTP request handlers
use crate::domain::error::InteractionAuthError;
use crate::infrastructure::discord_channel::PING_COMMAND;
use crate::infrastructure::discord_signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

const PAYLOAD_EXCERPT_LEN: usize = 256;
const INTERACTION_PING: u8 = 1;
const INTERACTION_COMMAND: u8 = 2;
const INTERACTION_COMPONENT: u8 = 3;
const RESPONSE_PONG: u8 = 1;
const RESPONSE_CHANNEL_MESSAGE: u8 = 4;
const FLAG_EPHEMERAL: u32 = 1 << 6;

#[derive(Debug, Serialize, PartialEq)]
pub struct Acknowledgement {
    pub result: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub data: Option<InteractionData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InteractionData {
    /// Set on application commands
    #[serde(default)]
    pub name: Option<String>,
    /// Set on button clicks
    #[serde(default)]
    pub custom_id: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Location webhook.
///
/// Always acknowledges: the tracking client cannot act on errors and would
/// otherwise keep resending the same batch. Failures are logged instead.
pub async fn receive_locations(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<Acknowledgement> {
    if let Err(e) = state.tracker_service.handle_event(&body).await {
        tracing::error!(
            stage = e.stage(),
            error = %e,
            payload = %excerpt(&body),
            "Error building location record and sending notification"
        );
    }

    Json(Acknowledgement { result: "ok" })
}

/// Chat interaction callback: endpoint PING, the `/ping` command, and the
/// notification buttons.
///
/// Every request must carry a valid ed25519 signature over the raw body;
/// anything else is refused with 401 before the body is looked at.
pub async fn handle_interaction(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    if let Err(e) = authenticate(&state, &headers, &body) {
        tracing::warn!(error = %e, "Rejected interaction");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let interaction: Interaction = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, payload = %excerpt(&body), "Undecodable interaction");
        StatusCode::BAD_REQUEST
    })?;
    let data = interaction.data.unwrap_or_default();

    let reply = match interaction.kind {
        INTERACTION_PING => json!({ "type": RESPONSE_PONG }),
        INTERACTION_COMMAND => match data.name.as_deref() {
            Some(PING_COMMAND) => message("Pong!"),
            other => {
                tracing::warn!(command = ?other, "Unknown application command");
                ephemeral("Unknown command.")
            }
        },
        INTERACTION_COMPONENT => {
            let handle = data.custom_id;
            match handle
                .as_deref()
                .and_then(|h| state.tracker_service.invoke_action(h))
            {
                Some(content) => message(&content),
                None => {
                    tracing::warn!(handle = ?handle, "Unresolvable interaction");
                    ephemeral("This location has expired.")
                }
            }
        }
        other => {
            tracing::warn!(kind = other, "Unsupported interaction type");
            ephemeral("Unsupported interaction.")
        }
    };

    Ok(Json(reply))
}

fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), InteractionAuthError> {
    let header = |name: &'static str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .ok_or(InteractionAuthError::MissingHeader(name))
    };
    state
        .interaction_verifier
        .verify(header(SIGNATURE_HEADER)?, header(TIMESTAMP_HEADER)?, body)
}

fn message(content: &str) -> Value {
    json!({
        "type": RESPONSE_CHANNEL_MESSAGE,
        "data": { "content": content }
    })
}

fn ephemeral(content: &str) -> Value {
    json!({
        "type": RESPONSE_CHANNEL_MESSAGE,
        "data": { "content": content, "flags": FLAG_EPHEMERAL }
    })
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(PAYLOAD_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}

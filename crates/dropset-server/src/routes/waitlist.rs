//! Waitlist routes: `/waitlist`
//!
//! `POST` joins the waitlist, `GET` reports how many people are on it.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use dropset_core::waitlist::Submission;

use crate::error::AppError;
use crate::extract::ClientId;
use crate::state::AppState;

/// Build the `/waitlist` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/waitlist", get(status).post(join))
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl From<Submission> for JoinResponse {
    fn from(submission: Submission) -> Self {
        match submission {
            Submission::Registered { count } => Self {
                message: "Successfully joined the waitlist!",
                count: Some(count),
            },
            Submission::AlreadyRegistered { .. } => Self {
                message: "You are already on the waitlist!",
                count: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub count: usize,
    pub message: &'static str,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Join the waitlist.
///
/// The rate check runs before the body is read. A body that cannot be read
/// (too large, broken stream), is not JSON, or is JSON `null` is treated as
/// an unexpected failure.
async fn join(
    State(state): State<Arc<AppState>>,
    ClientId(client_id): ClientId,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<JoinResponse>, AppError> {
    state.waitlist.admit(&client_id).await?;

    let body =
        body.map_err(|e| AppError::Internal(format!("failed to read waitlist body: {e}")))?;

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Internal(format!("waitlist body is not valid JSON: {e}")))?;

    if payload.is_null() {
        return Err(AppError::Internal("waitlist body is JSON null".to_owned()));
    }

    let email = payload.get("email").and_then(Value::as_str);
    let submission = state.waitlist.register(email).await?;

    Ok(Json(submission.into()))
}

/// Report the current registrant count.
async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        count: state.waitlist.status().await,
        message: "Waitlist is open!",
    })
}

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::errors::AppError;
use crate::models::{CallOutcome, CallRecord, WebhookEventType, WebhookPayload};
use crate::services::classifier::classify_outcome;
use crate::services::extractor::{extract_cancel_details, extract_meeting_details};
use crate::services::reconciler;
use crate::state::AppState;

/// HMAC-SHA256 of the raw request body with the platform API key, hex
/// encoded in the signature header.
pub fn verify_webhook_signature(api_key: &str, signature: &str, body: &[u8]) -> bool {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(api_key.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    expected == signature
}

pub async fn retell_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Verify signature in production; development replays are unsigned.
    if !state.config.is_development() {
        let signature = headers
            .get("x-retell-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !verify_webhook_signature(&state.config.retell_api_key, signature, &body) {
            tracing::warn!("invalid webhook signature received");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized" })),
            )
                .into_response();
        }
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable webhook payload");
            return AppError::InvalidPayload(e.to_string()).into_response();
        }
    };

    match payload.event {
        WebhookEventType::CallStarted => {
            tracing::info!(call_id = %payload.call.call_id, "call started");
        }
        WebhookEventType::CallEnded => {
            tracing::info!(call_id = %payload.call.call_id, "call ended");
        }
        WebhookEventType::CallAnalyzed => {
            tracing::info!(call_id = %payload.call.call_id, "call analyzed");
            if let Err(e) = process_analyzed_call(&state, &payload.call).await {
                return e.into_response();
            }
        }
    }

    Json(json!({ "received": true })).into_response()
}

/// Route a finished call to its calendar side effect. Extraction failures
/// are recovered here (the delivery is still acknowledged); calendar
/// provider failures propagate so the upstream can retry or alert.
async fn process_analyzed_call(state: &Arc<AppState>, call: &CallRecord) -> Result<(), AppError> {
    let outcome = classify_outcome(call);
    tracing::info!(call_id = %call.call_id, outcome = outcome.as_str(), "call outcome");

    let calendar = state.calendar.as_ref();
    let calendar_id = state.config.google_calendar_id.as_str();

    match outcome {
        CallOutcome::MeetingBooked => match extract_meeting_details(call) {
            Ok(meeting) => {
                reconciler::handle_meeting_booked(calendar, calendar_id, &meeting).await?;
            }
            Err(e) => {
                tracing::error!(call_id = %call.call_id, error = %e, "could not extract meeting details");
            }
        },

        CallOutcome::MeetingCancelled => match extract_cancel_details(call) {
            Ok(cancel) => {
                reconciler::handle_meeting_cancelled(calendar, calendar_id, &cancel).await?;
            }
            Err(e) => {
                tracing::error!(call_id = %call.call_id, error = %e, "could not extract cancel details");
            }
        },

        CallOutcome::MeetingRescheduled => {
            match (extract_cancel_details(call), extract_meeting_details(call)) {
                (Ok(cancel), Ok(meeting)) => {
                    reconciler::handle_meeting_rescheduled(calendar, calendar_id, &cancel, &meeting)
                        .await?;
                }
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!(call_id = %call.call_id, error = %e, "could not extract reschedule details");
                }
            }
        }

        // No calendar side effect for these.
        CallOutcome::CallbackRequested | CallOutcome::InfoOnly | CallOutcome::NoConversation => {}
    }

    Ok(())
}

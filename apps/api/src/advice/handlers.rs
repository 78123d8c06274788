//! Axum route handlers for the stateless decode API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::advice::decoder::{decode_advice, DecodedAdvice};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    pub raw_text: String,
}

/// POST /api/v1/advice/decode
///
/// Decodes an already-obtained AI reply. Useful for previews and for replaying
/// stored replies without another AI call.
pub async fn handle_decode(
    State(state): State<AppState>,
    Json(request): Json<DecodeRequest>,
) -> Result<Json<DecodedAdvice>, AppError> {
    Ok(Json(decode_advice(&request.raw_text, &state.markers)))
}

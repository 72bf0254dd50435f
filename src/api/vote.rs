use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::error::{ApiError, INVALID_VOTE};
use super::types::{VoteRequest, VoteResponse};
use crate::server::AppState;
use crate::services::submit_rating;

/// Two decimals, exact halves rounded away from zero (`4.125` -> `"4.13"`).
pub fn format_average(average: f64) -> String {
    format!("{:.2}", (average * 100.0).round() / 100.0)
}

pub async fn submit_vote(
    State(state): State<AppState>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::InvalidInput(INVALID_VOTE.to_string()))?;

    let update = submit_rating(
        &*state.store,
        req.movie_id.as_deref(),
        req.rating,
        state.config.rating.guard_revision,
    )
    .await?;

    Ok(Json(VoteResponse {
        message: "Voto registrato con successo!".to_string(),
        new_average: format_average(update.new_average),
        new_count: update.new_count,
    }))
}

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::error::{ApiError, MISSING_FIELDS};
use super::types::{GenerateDetailsRequest, GenerateDetailsResponse};
use crate::server::AppState;
use crate::services::{generate_details, DetailRequest};

/// Preflight and origin checks happen in the route's layers, before this
/// runs. Nothing is written to the person document; the caller attaches
/// the returned fields.
pub async fn generate_person_details(
    State(state): State<AppState>,
    payload: Result<Json<GenerateDetailsRequest>, JsonRejection>,
) -> Result<Json<GenerateDetailsResponse>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::InvalidInput(MISSING_FIELDS.to_string()))?;

    let request = DetailRequest {
        document_id: req.document_id,
        name: req.name,
        document_type: req.document_type,
    };
    let details = generate_details(
        &*state.text_generator,
        &*state.portraits,
        &*state.store,
        &request,
    )
    .await?;

    Ok(Json(GenerateDetailsResponse {
        biography: details.biography,
        image_asset_id: details.image_asset_id,
    }))
}

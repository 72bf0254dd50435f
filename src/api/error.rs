use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::types::MessageResponse;
use crate::services::{DetailsError, RatingError};
use crate::store::StoreError;

pub const INVALID_VOTE: &str = "Dati non validi";
pub const MOVIE_NOT_FOUND: &str = "Film non trovato";
pub const MISSING_FIELDS: &str = "Dati mancanti";
pub const INTERNAL_ERROR: &str = "Si è verificato un errore interno";
pub const CONCURRENT_VOTE: &str = "Il film è stato votato nel frattempo, riprova";
pub const FORBIDDEN_ORIGIN: &str = "Origine non consentita";
pub const BIOGRAPHY_FAILED: &str = "La generazione della biografia non è riuscita.";

/// Every error a handler can return, rendered as `{ "message": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Store(String),
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) | ApiError::Store(_) | ApiError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = MessageResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<RatingError> for ApiError {
    fn from(err: RatingError) -> Self {
        match err {
            RatingError::InvalidInput => ApiError::InvalidInput(INVALID_VOTE.to_string()),
            RatingError::NotFound(_) => ApiError::NotFound(MOVIE_NOT_FOUND.to_string()),
            RatingError::Conflict(_) => ApiError::Conflict(CONCURRENT_VOTE.to_string()),
            RatingError::StoreRead(_) | RatingError::StoreWrite(_) => {
                error!(error = %err, "Failed to record vote");
                ApiError::Store(INTERNAL_ERROR.to_string())
            }
        }
    }
}

impl From<DetailsError> for ApiError {
    fn from(err: DetailsError) -> Self {
        match err {
            DetailsError::InvalidInput(_) => ApiError::InvalidInput(MISSING_FIELDS.to_string()),
            DetailsError::BiographyGenerationFailed(_) => {
                error!(error = %err, "Detail generation failed");
                ApiError::Upstream(BIOGRAPHY_FAILED.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "Catalog query failed");
        ApiError::Store(INTERNAL_ERROR.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamError;

    #[test]
    fn test_rating_error_statuses() {
        let cases = [
            (RatingError::InvalidInput, StatusCode::BAD_REQUEST),
            (RatingError::NotFound("m".into()), StatusCode::NOT_FOUND),
            (RatingError::Conflict("m".into()), StatusCode::CONFLICT),
            (
                RatingError::StoreRead(StoreError::NotConfigured("projectId")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                RatingError::StoreWrite(StoreError::Decode("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_biography_failure_message() {
        let err = ApiError::from(DetailsError::BiographyGenerationFailed(
            UpstreamError::EmptyResponse("Text generation"),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), BIOGRAPHY_FAILED);
    }
}

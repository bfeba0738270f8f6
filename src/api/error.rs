use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::types::ErrorBody;
use crate::recommend::RecommendError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {0}: {1}")]
    InvalidParameter(&'static str, String),
    #[error(transparent)]
    Recommend(#[from] RecommendError),
    #[error("Track not found: {0}")]
    TrackNotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) | ApiError::InvalidParameter(_, _) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Recommend(RecommendError::UnknownUser(_)) => StatusCode::NOT_FOUND,
            ApiError::TrackNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{loops::LoopGenerationError, models::ApiError};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Loop(#[from] LoopGenerationError),
}

impl RouteError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Loop(LoopGenerationError::NoRouteFound { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!("Route request failed ({status}): {self}");

        (
            status,
            Json(ApiError {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status() {
        assert_eq!(
            RouteError::InvalidInput("Invalid coordinates".into()).status(),
            StatusCode::BAD_REQUEST
        );
        let err: RouteError = LoopGenerationError::NoRouteFound { queries_issued: 16 }.into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("try a different location or distance"));
    }
}

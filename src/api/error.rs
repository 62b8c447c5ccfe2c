use crate::schema::{FieldError, ValidationErrors};
use crate::store::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Every failure body the API returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),
    #[error("Invalid request body")]
    InvalidBody(#[from] JsonRejection),
    #[error("Plant not found")]
    NotFound,
    /// `context` is the operation that failed, e.g. "Error adding plant".
    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let (errors, error) = match self {
            ApiError::Validation(e) => (Some(e.errors), None),
            ApiError::InvalidBody(rejection) => (None, Some(rejection.body_text())),
            ApiError::NotFound => (None, None),
            ApiError::Store { context, source } => {
                tracing::error!(error = ?source, "{context}");
                (None, Some(source.to_string()))
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
                errors,
                error,
            }),
        )
            .into_response()
    }
}

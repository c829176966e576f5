use axum::{Json, http::StatusCode, response::IntoResponse};
use credence_common::{caller::CallerError, form::ValidationError, views::ApiErrorResponse};
use credence_db::storage::StoreError;
use thiserror::Error;

use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    CallerError(#[from] CallerError),

    /// An export action reported a destructive notification.
    #[error("{title}: {description}")]
    Export { title: String, description: String },

    #[error(transparent)]
    InternalAnyhow(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Storage(se) => match se {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CallerError(ce) => match ce {
                CallerError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
                CallerError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Export { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Render(_) | Self::InternalAnyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

const INTERNAL_MESSAGE: &str = "Something went wrong on our end. Please try again later.";
const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";

impl From<ApiError> for ApiErrorResponse {
    fn from(err: ApiError) -> Self {
        let (code, message): (&str, String) = match &err {
            ApiError::NotFound => ("NotFound", NOT_FOUND_MESSAGE.into()),
            ApiError::Validation(ve) => (
                "ValidationFailed",
                format!("{}: {}", ve.title(), ve.description()),
            ),
            ApiError::Storage(se) => match se {
                StoreError::NotFound => ("NotFound", NOT_FOUND_MESSAGE.into()),
                StoreError::Conflict(id) => (
                    "Conflict",
                    format!("A certificate with ID {id} already exists."),
                ),
                StoreError::Internal(_) => ("InternalError", INTERNAL_MESSAGE.into()),
            },
            ApiError::CallerError(ce) => match ce {
                CallerError::Unauthorized { .. } => (
                    "Unauthorized",
                    "You are not authenticated to perform this action.".into(),
                ),
                CallerError::Anyhow(_) => ("InternalError", INTERNAL_MESSAGE.into()),
            },
            ApiError::Export { title, description } => {
                ("ExportFailed", format!("{title}: {description}"))
            }
            ApiError::Render(_) | ApiError::InternalAnyhow(_) => {
                ("InternalError", INTERNAL_MESSAGE.into())
            }
        };

        ApiErrorResponse {
            code: Some(code.into()),
            message,

            #[cfg(debug_assertions)]
            details: Some(err.to_string()),

            #[cfg(not(debug_assertions))]
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!("Error returned by handler: {self}");
        } else {
            tracing::debug!(status = %status_code, "Request rejected: {self}");
        }

        (status_code, Json(Into::<ApiErrorResponse>::into(self))).into_response()
    }
}

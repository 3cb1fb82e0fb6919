use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that can be returned from handlers.
///
/// User-facing messages are French (product contract); `Storage` detail is
/// the raw database error and is stripped before reaching production
/// responses via [`AppError::redacted`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Accès non autorisé")]
    Unauthorized,

    // Validation errors (missing/invalid required field, no row inserted)
    #[error("{0}")]
    Validation(String),

    // Storage conditions surfaced as client errors
    #[error("Une demande similaire existe déjà")]
    Duplicate,

    #[error("Certaines données sont trop longues")]
    DataTooLong,

    // Anything else coming out of the database
    #[error("{message}")]
    Storage {
        message: String,
        detail: Option<String>,
    },
}

impl AppError {
    /// Replace the generic storage message with endpoint-specific wording.
    /// Other variants pass through unchanged.
    pub fn with_storage_message(self, message: &str) -> Self {
        match self {
            AppError::Storage { detail, .. } => AppError::Storage {
                message: message.to_string(),
                detail,
            },
            other => other,
        }
    }

    /// Drop raw storage detail so production responses never expose it.
    pub fn redacted(self, production: bool) -> Self {
        match self {
            AppError::Storage { message, .. } if production => AppError::Storage {
                message,
                detail: None,
            },
            other => other,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            // 401 Unauthorized
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, None),

            // 400 Bad Request
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, None),
            AppError::Duplicate => (StatusCode::BAD_REQUEST, None),
            AppError::DataTooLong => (StatusCode::BAD_REQUEST, None),

            // 500 Internal Server Error
            AppError::Storage { message, detail } => {
                tracing::error!(detail = ?detail, "Storage error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, detail.clone())
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message: self.to_string(),
            error,
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // SQLSTATE 23505: unique violation, 22001: string data right truncation
        if let Some(db_err) = err.as_database_error() {
            match db_err.code().as_deref() {
                Some("23505") => return AppError::Duplicate,
                Some("22001") => return AppError::DataTooLong,
                _ => {}
            }
        }

        AppError::Storage {
            message: "Erreur serveur".to_string(),
            detail: Some(err.to_string()),
        }
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

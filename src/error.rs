use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Error taxonomy for the whole API. Everything a handler or repo can fail
/// with converges here, and `IntoResponse` decides what the client sees --
/// internal detail stays in the server-side logs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("username already taken")]
    DuplicateUsername,

    /// Wrong password or unknown username. Collapsed into one outcome so the
    /// response never signals which usernames exist.
    #[error("invalid credentials")]
    CredentialMismatch,

    /// The auth gate's unified signal for any token failure.
    #[error("authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Persistence layer unreachable. Surfaced as 503, never retried here.
    #[error("store unavailable")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn internal<E: Into<anyhow::Error>>(e: E) -> Self {
        ApiError::Internal(e.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        use sqlx::Error as E;
        match &e {
            E::RowNotFound => ApiError::NotFound("Resource"),
            E::Database(db) if db.is_unique_violation() => ApiError::DuplicateUsername,
            E::Io(_) | E::Tls(_) | E::PoolTimedOut | E::PoolClosed => {
                ApiError::StoreUnavailable(e)
            }
            _ => ApiError::Internal(e.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::DuplicateUsername => {
                (StatusCode::CONFLICT, "Username already taken".to_string())
            }
            ApiError::CredentialMismatch => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::StoreUnavailable(e) => {
                tracing::error!(error = %e, "store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service unavailable".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

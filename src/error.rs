use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum TrackerError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("Username already taken")]
    UsernameTaken,

    /// Absent and not-owned records are reported identically.
    #[error("record not found")]
    NotFoundOrForbidden,

    /// Bad login. `unknown_user` tells a missing account from a wrong password.
    #[error("invalid credentials")]
    Auth { unknown_user: bool },

    #[error("Database error: {0}")]
    Store(#[from] SqlxError),

    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl TrackerError {
    /// Maps a unique-constraint violation on insert to `UsernameTaken`.
    pub fn from_insert_user(e: SqlxError) -> Self {
        match &e {
            SqlxError::Database(db) if db.is_unique_violation() => TrackerError::UsernameTaken,
            _ => TrackerError::Store(e),
        }
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            TrackerError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            TrackerError::UsernameTaken => (StatusCode::CONFLICT, self.to_string()),
            TrackerError::NotFoundOrForbidden => (StatusCode::NOT_FOUND, "Not found".to_string()),
            TrackerError::Auth { .. } => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            TrackerError::Store(_)
            | TrackerError::Hash(_)
            | TrackerError::Template(_)
            | TrackerError::Pdf(_)
            | TrackerError::Io(_)
            | TrackerError::Join(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };
        (status, message).into_response()
    }
}

pub mod auth;
pub mod companies;
pub mod export;

use axum::response::Redirect;
use serde::Deserialize;

use crate::error::TrackerError;

/// `?error=` carried across a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorQuery {
    pub error: Option<String>,
}

pub fn redirect_with_error(path: &str, message: &str) -> Redirect {
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Redirect::to(&format!("{path}?error={encoded}"))
}

/// Text safe to show the user: validation messages verbatim, anything else the fallback.
pub fn user_message(err: &TrackerError, fallback: &str) -> String {
    match err {
        TrackerError::Validation(msg) => msg.clone(),
        TrackerError::UsernameTaken => err.to_string(),
        _ => fallback.to_string(),
    }
}

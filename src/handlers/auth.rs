use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::db::{User, UserStore};
use crate::error::TrackerError;
use crate::handlers::{ErrorQuery, redirect_with_error};
use crate::middleware::auth::{clear_session_cookie, session_cookie, session_token};
use crate::router::TrackerState;
use crate::views::{LoginPage, RegisterPage, render};

/// bcrypt work factor for new passwords.
pub const PASSWORD_COST: u32 = 10;

const NO_ACCOUNT: &str = "No account found with these credentials";
const INCORRECT_PASSWORD: &str = "Incorrect password";
const DATABASE_ERROR: &str = "Database error";
const USERNAME_TAKEN: &str = "Username already taken";
const INSERT_FAILED: &str = "Error inserting user";
const CREDENTIALS_REQUIRED: &str = "Username and password are required";

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /login
pub async fn login_page(Query(query): Query<ErrorQuery>) -> Result<Response, TrackerError> {
    login_view(query.error.as_deref())
}

/// POST /login
pub async fn login(
    State(state): State<TrackerState>,
    jar: PrivateCookieJar,
    Form(creds): Form<Credentials>,
) -> Result<Response, TrackerError> {
    let user = match authenticate(&state.users, creds).await {
        Ok(user) => user,
        Err(TrackerError::Auth { unknown_user: true }) => return login_view(Some(NO_ACCOUNT)),
        Err(TrackerError::Auth { unknown_user: false }) => {
            return login_view(Some(INCORRECT_PASSWORD));
        }
        Err(e) => {
            error!(error = %e, "user lookup failed");
            return login_view(Some(DATABASE_ERROR));
        }
    };

    let previous = session_token(&jar);
    let token = state.sessions.login(user.id, previous.as_deref()).await;
    let max_age = time::Duration::seconds(state.sessions.ttl().num_seconds());
    let jar = jar.add(session_cookie(token, state.secure_cookie, max_age));

    info!(user_id = user.id, "user logged in");
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

/// GET /register
pub async fn register_page(Query(query): Query<ErrorQuery>) -> Result<Response, TrackerError> {
    Ok(render(&RegisterPage {
        error: query.error.as_deref(),
    })?
    .into_response())
}

/// POST /register
pub async fn register(
    State(state): State<TrackerState>,
    Form(creds): Form<Credentials>,
) -> Redirect {
    if creds.username.trim().is_empty() || creds.password.is_empty() {
        return redirect_with_error("/register", CREDENTIALS_REQUIRED);
    }

    match state.users.find_by_username(&creds.username).await {
        Ok(Some(_)) => return redirect_with_error("/register", USERNAME_TAKEN),
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "user lookup failed");
            return redirect_with_error("/register", DATABASE_ERROR);
        }
    }

    let password_hash = match hash_password(creds.password).await {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "password hashing failed");
            return redirect_with_error("/register", INSERT_FAILED);
        }
    };

    match state.users.create(&creds.username, &password_hash).await {
        Ok(user) => {
            info!(user_id = user.id, "user registered");
            Redirect::to("/login")
        }
        // lost a race with a concurrent registration
        Err(TrackerError::UsernameTaken) => redirect_with_error("/register", USERNAME_TAKEN),
        Err(e) => {
            error!(error = %e, "error inserting user");
            redirect_with_error("/register", INSERT_FAILED)
        }
    }
}

/// GET /logout
pub async fn logout(State(state): State<TrackerState>, jar: PrivateCookieJar) -> Response {
    if let Some(token) = session_token(&jar) {
        state.sessions.logout(&token).await;
        info!("session invalidated");
    }
    (jar.remove(clear_session_cookie()), Redirect::to("/login")).into_response()
}

/// Resolve the user behind a login form, or say which half of the credentials was wrong.
async fn authenticate(users: &UserStore, creds: Credentials) -> Result<User, TrackerError> {
    let user = users
        .find_by_username(&creds.username)
        .await?
        .ok_or(TrackerError::Auth { unknown_user: true })?;
    if !verify_password(creds.password, user.password_hash.clone()).await {
        warn!(username = %user.username, "failed login attempt");
        return Err(TrackerError::Auth {
            unknown_user: false,
        });
    }
    Ok(user)
}

fn login_view(error: Option<&str>) -> Result<Response, TrackerError> {
    Ok(render(&LoginPage { error })?.into_response())
}

/// Salted bcrypt hash, computed off the async workers.
pub async fn hash_password(password: String) -> Result<String, TrackerError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_COST)).await??;
    Ok(hash)
}

/// Any verification failure, including a malformed stored hash, counts as a mismatch.
pub async fn verify_password(password: String, hash: String) -> bool {
    match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
        Ok(Ok(matched)) => matched,
        Ok(Err(e)) => {
            warn!(error = %e, "password verification failed");
            false
        }
        Err(e) => {
            error!(error = %e, "password verification task failed");
            false
        }
    }
}

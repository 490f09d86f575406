use axum::{
    Router,
    extract::FromRef,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect},
    routing::get,
};
use axum_extra::extract::cookie::Key;
use chrono::Duration;
use sha2::{Digest, Sha512};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{CompanyStore, SqlitePool, UserStore};
use crate::handlers::{auth, companies, export};
use crate::middleware::no_cache;
use crate::session::SessionManager;

#[derive(Clone)]
pub struct TrackerState {
    pub users: UserStore,
    pub companies: CompanyStore,
    pub sessions: SessionManager,
    pub cookie_key: Key,
    pub secure_cookie: bool,
}

impl TrackerState {
    pub fn new(pool: SqlitePool, cfg: &Config) -> Self {
        Self::with_parts(
            pool,
            SessionManager::new(Duration::minutes(cfg.session_ttl_minutes)),
            &cfg.session_secret,
            cfg.is_production(),
        )
    }

    pub fn with_parts(
        pool: SqlitePool,
        sessions: SessionManager,
        session_secret: &str,
        secure_cookie: bool,
    ) -> Self {
        Self {
            users: UserStore::new(pool.clone()),
            companies: CompanyStore::new(pool),
            sessions,
            cookie_key: cookie_key(session_secret),
            secure_cookie,
        }
    }
}

impl FromRef<TrackerState> for Key {
    fn from_ref(state: &TrackerState) -> Self {
        state.cookie_key.clone()
    }
}

/// Stretch an arbitrary-length secret to the 64 bytes the cookie key needs.
fn cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

pub fn tracker_router(state: TrackerState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(companies::dashboard))
        .route("/add", get(companies::add_form).post(companies::add_company))
        .route(
            "/edit/{id}",
            get(companies::edit_form).post(companies::edit_company),
        )
        .route("/delete/{id}", get(companies::delete_company))
        .route("/download", get(export::download))
        .route_layer(middleware::from_fn(no_cache));

    Router::new()
        .route("/", get(|| async { Redirect::to("/login") }))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
        .merge(protected)
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found").into_response() })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

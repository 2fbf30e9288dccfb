pub mod api;
pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod extract;
pub mod index;
pub mod messages;
pub mod profiles;
pub mod res;
pub mod rooms;
pub mod session;

use axum::{Router, extract::FromRef, routing::get};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};

pub use appresult::{AppError, AppResult};
pub use config::Config;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
}

/// Builds the whole application: page routes, the read-only API, sessions
/// and request tracing.
pub fn app(app_state: AppState, config: &Config) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.session_inactivity_minutes,
        )));

    Router::new()
        .route("/", get(index::index))
        .route("/style.css", get(res::stylesheet))
        .merge(auth::router())
        .merge(rooms::router())
        .merge(messages::router())
        .merge(profiles::router())
        .merge(api::router())
        .fallback(res::not_found)
        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}

pub mod credentials;
mod login;
mod logout;
pub mod password;
mod register;

use axum::{Router, routing::get};
use sqlx::SqlitePool;
use tracing::info;

use crate::{AppResult, AppState, db::{self, User}};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", get(logout::logout))
        .route("/register", get(register::register_page).post(register::register))
}

/// Stores a new account. `username` must already be normalized.
pub async fn create_user(db_pool: &SqlitePool, username: &str, password: &str) -> AppResult<User> {
    let password_hash = password::hash(password.to_owned()).await?;
    let user = db::users::create(db_pool, username, &password_hash).await?;

    info!("adding @{}#{}", user.username, user.id);
    Ok(user)
}

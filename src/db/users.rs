use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::Timestamp;
use crate::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub created: Timestamp,
}

pub struct ProfileFields<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub bio: Option<&'a str>,
}

/// Inserts a user. The username must already be normalized.
pub async fn create(db_pool: &SqlitePool, username: &str, password_hash: &str) -> AppResult<User> {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO users (id,username,password_hash,created) VALUES (?,?,?,?)")
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .bind(Timestamp::now())
        .execute(db_pool)
        .await?;

    get(db_pool, id).await
}

pub async fn find(db_pool: &SqlitePool, id: Uuid) -> AppResult<Option<User>> {
    Ok(sqlx::query_as("SELECT * FROM users WHERE id=?")
        .bind(id)
        .fetch_optional(db_pool)
        .await?)
}

pub async fn get(db_pool: &SqlitePool, id: Uuid) -> AppResult<User> {
    find(db_pool, id).await?.ok_or(AppError::NotFound("user"))
}

pub async fn find_by_username(db_pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    Ok(sqlx::query_as("SELECT * FROM users WHERE username=?")
        .bind(username)
        .fetch_optional(db_pool)
        .await?)
}

/// Whether `username` belongs to anyone other than `except`.
pub async fn username_taken(
    db_pool: &SqlitePool,
    username: &str,
    except: Option<Uuid>,
) -> AppResult<bool> {
    Ok(find_by_username(db_pool, username)
        .await?
        .is_some_and(|user| Some(user.id) != except))
}

pub async fn all(db_pool: &SqlitePool) -> AppResult<Vec<User>> {
    Ok(sqlx::query_as("SELECT * FROM users ORDER BY created")
        .fetch_all(db_pool)
        .await?)
}

pub async fn update_profile(
    db_pool: &SqlitePool,
    id: Uuid,
    ProfileFields { username, email, bio }: ProfileFields<'_>,
) -> AppResult<User> {
    let result = sqlx::query("UPDATE users SET username=?, email=?, bio=? WHERE id=?")
        .bind(username)
        .bind(email)
        .bind(bio)
        .bind(id)
        .execute(db_pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("user"));
    }

    get(db_pool, id).await
}

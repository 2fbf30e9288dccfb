use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::Timestamp;
use crate::{AppError, AppResult};

/// A message joined with its author's username and its room's name.
#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub content: String,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub username: String,
    pub room_name: String,
}

const MESSAGE_SELECT: &str = "SELECT m.id, m.user_id, m.room_id, m.content, m.created, m.updated, \
    u.username, r.name AS room_name \
    FROM messages m \
    JOIN users u ON u.id = m.user_id \
    JOIN rooms r ON r.id = m.room_id";

/// Stores a message and makes its author a participant of the room.
pub async fn post(db_pool: &SqlitePool, room_id: Uuid, user_id: Uuid, content: &str) -> AppResult<Message> {
    let id = Uuid::now_v7();
    let now = Timestamp::now();

    let mut tx = db_pool.begin().await?;
    sqlx::query("INSERT INTO messages (id,user_id,room_id,content,created,updated) VALUES (?,?,?,?,?,?)")
        .bind(id)
        .bind(user_id)
        .bind(room_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    sqlx::query("INSERT OR IGNORE INTO room_participants (room_id,user_id) VALUES (?,?)")
        .bind(room_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    get(db_pool, id).await
}

pub async fn find(db_pool: &SqlitePool, id: Uuid) -> AppResult<Option<Message>> {
    Ok(sqlx::query_as(&format!("{MESSAGE_SELECT} WHERE m.id=?"))
        .bind(id)
        .fetch_optional(db_pool)
        .await?)
}

pub async fn get(db_pool: &SqlitePool, id: Uuid) -> AppResult<Message> {
    find(db_pool, id).await?.ok_or(AppError::NotFound("message"))
}

/// Newest first.
pub async fn in_room(db_pool: &SqlitePool, room_id: Uuid) -> AppResult<Vec<Message>> {
    Ok(sqlx::query_as(&format!("{MESSAGE_SELECT} WHERE m.room_id=? ORDER BY m.created DESC"))
        .bind(room_id)
        .fetch_all(db_pool)
        .await?)
}

/// Newest first.
pub async fn by_user(db_pool: &SqlitePool, user_id: Uuid) -> AppResult<Vec<Message>> {
    Ok(sqlx::query_as(&format!("{MESSAGE_SELECT} WHERE m.user_id=? ORDER BY m.created DESC"))
        .bind(user_id)
        .fetch_all(db_pool)
        .await?)
}

/// Messages from rooms whose topic name contains `q`, newest first. Rooms
/// without a topic never match.
pub async fn in_topics_matching(db_pool: &SqlitePool, q: &str) -> AppResult<Vec<Message>> {
    Ok(sqlx::query_as(&format!(
        "{MESSAGE_SELECT} \
         JOIN topics t ON t.id = r.topic_id \
         WHERE instr(lower(t.name), lower(?)) > 0 \
         ORDER BY m.created DESC"
    ))
    .bind(q)
    .fetch_all(db_pool)
    .await?)
}

pub async fn edit(db_pool: &SqlitePool, id: Uuid, content: &str) -> AppResult<Message> {
    let result = sqlx::query("UPDATE messages SET content=?, updated=MAX(?, updated) WHERE id=?")
        .bind(content)
        .bind(Timestamp::now())
        .bind(id)
        .execute(db_pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("message"));
    }

    get(db_pool, id).await
}

pub async fn delete(db_pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM messages WHERE id=?")
        .bind(id)
        .execute(db_pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("message"));
    }
    Ok(())
}

use std::collections::HashMap;

use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::{Timestamp, User, topics};
use crate::{AppError, AppResult};

/// A room joined with the names of its topic and host.
#[derive(Debug, Clone, FromRow)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub host_id: Option<Uuid>,
    pub topic_id: Option<Uuid>,
    pub description: Option<String>,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub topic_name: Option<String>,
    pub host_username: Option<String>,
}

impl Room {
    pub fn is_hosted_by(&self, user: &User) -> bool {
        self.host_id == Some(user.id)
    }
}

/// Editable fields of a room. Blank topic means no topic.
#[derive(Debug, Clone, Copy)]
pub struct RoomFields<'a> {
    pub name: &'a str,
    pub topic: Option<&'a str>,
    pub description: Option<&'a str>,
}

const ROOM_SELECT: &str = "SELECT r.id, r.name, r.host_id, r.topic_id, r.description, \
    r.created, r.updated, t.name AS topic_name, u.username AS host_username \
    FROM rooms r \
    LEFT JOIN topics t ON t.id = r.topic_id \
    LEFT JOIN users u ON u.id = r.host_id";

const ROOM_ORDER: &str = "ORDER BY r.updated DESC, r.created DESC";

/// Rooms whose topic name, name or description contains `q`, ignoring ASCII
/// case. An empty `q` matches every room.
pub async fn search(db_pool: &SqlitePool, q: &str) -> AppResult<Vec<Room>> {
    Ok(sqlx::query_as(&format!(
        "{ROOM_SELECT} \
         WHERE (t.name IS NOT NULL AND instr(lower(t.name), lower(?1)) > 0) \
            OR instr(lower(r.name), lower(?1)) > 0 \
            OR (r.description IS NOT NULL AND instr(lower(r.description), lower(?1)) > 0) \
         {ROOM_ORDER}"
    ))
    .bind(q)
    .fetch_all(db_pool)
    .await?)
}

pub async fn all(db_pool: &SqlitePool) -> AppResult<Vec<Room>> {
    Ok(sqlx::query_as(&format!("{ROOM_SELECT} {ROOM_ORDER}"))
        .fetch_all(db_pool)
        .await?)
}

pub async fn find(db_pool: &SqlitePool, id: Uuid) -> AppResult<Option<Room>> {
    Ok(sqlx::query_as(&format!("{ROOM_SELECT} WHERE r.id=?"))
        .bind(id)
        .fetch_optional(db_pool)
        .await?)
}

pub async fn get(db_pool: &SqlitePool, id: Uuid) -> AppResult<Room> {
    find(db_pool, id).await?.ok_or(AppError::NotFound("room"))
}

pub async fn hosted_by(db_pool: &SqlitePool, user_id: Uuid) -> AppResult<Vec<Room>> {
    Ok(sqlx::query_as(&format!("{ROOM_SELECT} WHERE r.host_id=? {ROOM_ORDER}"))
        .bind(user_id)
        .fetch_all(db_pool)
        .await?)
}

/// Creates a room hosted by `host_id`, resolving the topic by name.
pub async fn create(db_pool: &SqlitePool, host_id: Uuid, fields: RoomFields<'_>) -> AppResult<Room> {
    let id = Uuid::now_v7();
    let now = Timestamp::now();

    let mut tx = db_pool.begin().await?;
    let topic_id = match fields.topic {
        Some(name) => Some(topics::find_or_create(&mut *tx, name).await?.id),
        None => None,
    };
    sqlx::query(
        "INSERT INTO rooms (id,name,host_id,topic_id,description,created,updated) \
         VALUES (?,?,?,?,?,?,?)",
    )
    .bind(id)
    .bind(fields.name)
    .bind(host_id)
    .bind(topic_id)
    .bind(fields.description)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    get(db_pool, id).await
}

/// Overwrites name, topic and description. The host never changes and
/// `updated` never moves backwards.
pub async fn update(db_pool: &SqlitePool, id: Uuid, fields: RoomFields<'_>) -> AppResult<Room> {
    let mut tx = db_pool.begin().await?;
    let topic_id = match fields.topic {
        Some(name) => Some(topics::find_or_create(&mut *tx, name).await?.id),
        None => None,
    };
    let result = sqlx::query(
        "UPDATE rooms SET name=?, topic_id=?, description=?, updated=MAX(?, updated) WHERE id=?",
    )
    .bind(fields.name)
    .bind(topic_id)
    .bind(fields.description)
    .bind(Timestamp::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("room"));
    }
    tx.commit().await?;

    get(db_pool, id).await
}

/// Deletes the room; its messages and participant rows go with it.
pub async fn delete(db_pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM rooms WHERE id=?")
        .bind(id)
        .execute(db_pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("room"));
    }
    Ok(())
}

pub async fn participants(db_pool: &SqlitePool, room_id: Uuid) -> AppResult<Vec<User>> {
    Ok(sqlx::query_as(
        "SELECT u.* FROM users u \
         JOIN room_participants p ON p.user_id = u.id \
         WHERE p.room_id=? ORDER BY u.username",
    )
    .bind(room_id)
    .fetch_all(db_pool)
    .await?)
}

/// Participant ids of every room, keyed by room id.
pub async fn participant_map(db_pool: &SqlitePool) -> AppResult<HashMap<Uuid, Vec<Uuid>>> {
    let rows: Vec<(Uuid, Uuid)> = sqlx::query_as("SELECT room_id,user_id FROM room_participants")
        .fetch_all(db_pool)
        .await?;

    let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (room_id, user_id) in rows {
        map.entry(room_id).or_default().push(user_id);
    }
    Ok(map)
}

use serde::Serialize;
use sqlx::{FromRow, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::AppResult;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Topic {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct TopicCount {
    pub id: Uuid,
    pub name: String,
    pub room_count: i64,
}

/// Returns the topic called `name`, creating it first if needed. The unique
/// index on `name` settles concurrent creators on a single row.
pub async fn find_or_create<'e, E>(executor: E, name: &str) -> AppResult<Topic>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    Ok(sqlx::query_as(
        "INSERT INTO topics (id,name) VALUES (?,?) \
         ON CONFLICT(name) DO UPDATE SET name=excluded.name \
         RETURNING id,name",
    )
    .bind(Uuid::now_v7())
    .bind(name)
    .fetch_one(executor)
    .await?)
}

/// Topics by name with how many rooms use each; `None` lists them all.
pub async fn with_room_counts(db_pool: &SqlitePool, limit: Option<u32>) -> AppResult<Vec<TopicCount>> {
    Ok(sqlx::query_as(
        "SELECT t.id, t.name, COUNT(r.id) AS room_count \
         FROM topics t LEFT JOIN rooms r ON r.topic_id = t.id \
         GROUP BY t.id, t.name \
         ORDER BY t.name \
         LIMIT ?",
    )
    .bind(limit.map_or(-1, i64::from))
    .fetch_all(db_pool)
    .await?)
}

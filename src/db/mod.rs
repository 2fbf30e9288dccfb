//! Storage layer. Every table gets a module with its row type and the queries
//! the handlers need; foreign-key actions live in `migrations/`.

pub mod messages;
pub mod rooms;
pub mod topics;
pub mod users;

use std::str::FromStr;

use serde::{Serialize, Serializer};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::info;

use crate::{AppResult, Config};

pub use messages::Message;
pub use rooms::Room;
pub use topics::{Topic, TopicCount};
pub use users::User;

/// Opens the pool and brings the schema up to date.
pub async fn connect(config: &Config) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // in-memory databases vanish with their last connection
    let db_pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&db_pool).await?;
    info!("database ready at {}", config.database_url);

    Ok(db_pool)
}

/// Microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn now() -> Self {
        Self((OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000) as i64)
    }

    pub fn micros(&self) -> i64 {
        self.0
    }

    pub fn to_datetime(&self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * 1_000)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }

    /// "5 minutes ago" style rendering for pages.
    pub fn ago(&self, now: Timestamp) -> String {
        let secs = (now.0 - self.0).max(0) / 1_000_000;
        let (n, unit) = match secs {
            0..60 => return "just now".to_owned(),
            60..3_600 => (secs / 60, "minute"),
            3_600..86_400 => (secs / 3_600, "hour"),
            86_400..2_592_000 => (secs / 86_400, "day"),
            2_592_000..31_536_000 => (secs / 2_592_000, "month"),
            _ => (secs / 31_536_000, "year"),
        };
        let plural = if n == 1 { "" } else { "s" };
        format!("{n} {unit}{plural} ago")
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = self
            .to_datetime()
            .format(&Rfc3339)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

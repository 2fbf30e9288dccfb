use axum::{
    debug_handler,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    AppResult, AppState, include_res,
    db::{self, Message, Room, Timestamp, TopicCount},
    res::{self, escape},
    session::Caller,
};

/// How many topics the sidebar shows.
pub const TOPIC_LIMIT: u32 = 5;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Everything the home page shows for one search.
pub struct Listing {
    pub rooms: Vec<Room>,
    pub topics: Vec<TopicCount>,
    pub room_count: usize,
    pub activity: Vec<Message>,
}

pub async fn listing(db_pool: &SqlitePool, q: &str) -> AppResult<Listing> {
    let rooms = db::rooms::search(db_pool, q).await?;
    let topics = db::topics::with_room_counts(db_pool, Some(TOPIC_LIMIT)).await?;
    let activity = db::messages::in_topics_matching(db_pool, q).await?;

    Ok(Listing {
        room_count: rooms.len(),
        rooms,
        topics,
        activity,
    })
}

#[debug_handler(state = AppState)]
pub async fn index(
    Query(SearchQuery { q }): Query<SearchQuery>,
    State(db_pool): State<SqlitePool>,
    caller: Caller,
) -> AppResult<Response> {
    let Listing { rooms, topics, room_count, activity } = listing(&db_pool, &q).await?;
    let now = Timestamp::now();

    let body = include_res!(str, "/pages/home.html")
        .replace("{room_count}", &room_count.to_string())
        .replace("{topics}", &topics_to_html(&topics))
        .replace("{rooms}", &rooms_to_html(&rooms, now))
        .replace("{activity}", &activity_to_html(&activity, now));

    Ok(res::page("Home", caller.user.as_ref(), &body).into_response())
}

pub(crate) fn topics_to_html(topics: &[TopicCount]) -> String {
    let mut items = String::new();
    for topic in topics {
        items += &include_res!(str, "/pages/topic_item.html")
            .replace("{query}", &escape(&search_link(&topic.name)))
            .replace("{room_count}", &topic.room_count.to_string())
            .replace("{name}", &escape(&topic.name));
    }
    items
}

pub(crate) fn rooms_to_html(rooms: &[Room], now: Timestamp) -> String {
    let mut items = String::new();
    for room in rooms {
        items += &include_res!(str, "/pages/room_item.html")
            .replace("{host_id}", &room.host_id.map(|id| id.to_string()).unwrap_or_default())
            .replace("{id}", &room.id.to_string())
            .replace("{updated}", &room.updated.ago(now))
            .replace("{host}", &escape(room.host_username.as_deref().unwrap_or("deleted")))
            .replace("{topic}", &escape(room.topic_name.as_deref().unwrap_or("")))
            .replace("{name}", &escape(&room.name));
    }
    if items.is_empty() {
        items = "<p>No rooms yet.</p>".to_owned();
    }
    items
}

pub(crate) fn activity_to_html(messages: &[Message], now: Timestamp) -> String {
    let mut items = String::new();
    for msg in messages {
        items += &include_res!(str, "/pages/activity_item.html")
            .replace("{user_id}", &msg.user_id.to_string())
            .replace("{room_id}", &msg.room_id.to_string())
            .replace("{created}", &msg.created.ago(now))
            .replace("{username}", &escape(&msg.username))
            .replace("{room_name}", &escape(&msg.room_name))
            .replace("{content}", &res::markdown(&msg.content));
    }
    items
}

/// `q=<value>` ready for a link, encoded the way `Query` decodes it.
pub(crate) fn search_link(value: &str) -> String {
    serde_urlencoded::to_string([("q", value)]).unwrap_or_default()
}

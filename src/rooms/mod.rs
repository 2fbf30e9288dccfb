mod delete;
mod edit;
pub(crate) mod msg;
mod new;
mod room;

use axum::{Router, response::Html, routing::get};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    AppError, AppResult, AppState, include_res,
    db::{self, Room, User, rooms::RoomFields},
    res::{self, escape},
};

pub const NAME_MAX: usize = 200;
pub const TOPIC_MAX: usize = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/room/{id}", get(room::room).post(msg::post_message))
        .route("/create-room", get(new::new_room_page).post(new::new_room))
        .route("/update-room/{id}", get(edit::update_room_page).post(edit::update_room))
        .route("/delete-room/{id}", get(delete::delete_room_page).post(delete::delete_room))
}

/// Submitted room form. A `host` field, if sent, is ignored: the host is
/// always whoever is signed in.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RoomForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    description: String,
}

impl RoomForm {
    pub(crate) fn from_room(room: &Room) -> Self {
        Self {
            name: room.name.clone(),
            topic: room.topic_name.clone().unwrap_or_default(),
            description: room.description.clone().unwrap_or_default(),
        }
    }

    /// Trimmed fields, or the message to show above the form.
    pub(crate) fn fields(&self) -> Result<RoomFields<'_>, &'static str> {
        let name = self.name.trim();
        let topic = self.topic.trim();
        let description = self.description.trim();

        if name.is_empty() {
            return Err("Room name is required.");
        }
        if name.chars().count() > NAME_MAX {
            return Err("Room name is too long.");
        }
        if topic.chars().count() > TOPIC_MAX {
            return Err("Topic name is too long.");
        }

        Ok(RoomFields {
            name,
            topic: (!topic.is_empty()).then_some(topic),
            description: (!description.is_empty()).then_some(description),
        })
    }
}

pub(crate) fn ensure_host(room: &Room, user: &User) -> AppResult<()> {
    if room.is_hosted_by(user) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

pub(crate) async fn room_form_page(
    db_pool: &SqlitePool,
    user: &User,
    heading: &str,
    action: &str,
    form: &RoomForm,
    error: Option<&str>,
) -> AppResult<Html<String>> {
    let mut topic_options = String::new();
    for topic in db::topics::with_room_counts(db_pool, None).await? {
        topic_options += &format!(r#"            <option value="{}">"#, escape(&topic.name));
        topic_options += "\n";
    }

    let body = include_res!(str, "/pages/rooms/room_form.html")
        .replace("{heading}", &escape(heading))
        .replace("{error}", &res::error_box(error))
        .replace("{action}", action)
        .replace("{topic_options}", &topic_options)
        .replace("{name}", &escape(&form.name))
        .replace("{topic}", &escape(&form.topic))
        .replace("{description}", &escape(&form.description));

    Ok(res::page(heading, Some(user), &body))
}

use axum::{
    Form, debug_handler,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::{
    AppResult, AppState, extract::Path, include_res,
    db::{self, Message, Timestamp},
    res::{self, escape},
    session::SignedIn,
};

#[derive(Deserialize)]
pub(crate) struct SendMessageForm {
    #[serde(default)]
    body: String,
}

/// Posting to a room both stores the message and makes the poster a
/// participant. Blank messages are dropped.
#[debug_handler(state = AppState)]
pub(crate) async fn post_message(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Path(room_id): Path<Uuid>,
    Form(SendMessageForm { body }): Form<SendMessageForm>,
) -> AppResult<Response> {
    let room = db::rooms::get(&db_pool, room_id).await?;

    if !body.trim().is_empty() {
        let message = db::messages::post(&db_pool, room.id, user.id, &body).await?;
        debug!("@{} posted {} in {}", user.username, message.id, room.id);
    }

    Ok(Redirect::to(&format!("/room/{room_id}")).into_response())
}

pub(crate) fn msg_to_html(message: &Message, viewer: Option<Uuid>, now: Timestamp) -> String {
    let controls = if viewer == Some(message.user_id) {
        include_res!(str, "/pages/rooms/message_controls.html").replace("{id}", &message.id.to_string())
    } else {
        String::new()
    };

    include_res!(str, "/pages/rooms/message.html")
        .replace("{controls}", &controls)
        .replace("{id}", &message.id.to_string())
        .replace("{user_id}", &message.user_id.to_string())
        .replace("{created}", &message.created.ago(now))
        .replace("{username}", &escape(&message.username))
        .replace("{content}", &res::markdown(&message.content))
}

use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    AppResult, AppState, extract::Path, include_res,
    db::{self, Timestamp},
    res::{self, escape},
    session::Caller,
};

use super::msg;

#[debug_handler(state = AppState)]
pub(crate) async fn room(
    State(db_pool): State<SqlitePool>,
    caller: Caller,
    Path(room_id): Path<Uuid>,
) -> AppResult<Response> {
    let room = db::rooms::get(&db_pool, room_id).await?;
    let msgs = db::messages::in_room(&db_pool, room_id).await?;
    let participants = db::rooms::participants(&db_pool, room_id).await?;
    let now = Timestamp::now();

    let mut messages = String::new();
    for message in &msgs {
        messages += &msg::msg_to_html(message, caller.user_id(), now);
    }

    let mut participant_items = String::new();
    for participant in &participants {
        participant_items += &include_res!(str, "/pages/rooms/participant.html")
            .replace("{id}", &participant.id.to_string())
            .replace("{username}", &escape(&participant.username));
    }

    let host_controls = match &caller.user {
        Some(user) if room.is_hosted_by(user) => {
            include_res!(str, "/pages/rooms/host_controls.html").replace("{room_id}", &room_id.to_string())
        }
        _ => String::new(),
    };
    let message_form = match &caller.user {
        Some(_) => include_res!(str, "/pages/rooms/message_form.html").replace("{room_id}", &room_id.to_string()),
        None => r#"<p><a href="/login">Log in</a> to join the conversation.</p>"#.to_owned(),
    };

    let body = include_res!(str, "/pages/rooms/room.html")
        .replace("{host_controls}", &host_controls)
        .replace("{message_form}", &message_form)
        .replace("{participant_count}", &participants.len().to_string())
        .replace("{participants}", &participant_items)
        .replace("{messages}", &messages)
        .replace("{host_id}", &room.host_id.map(|id| id.to_string()).unwrap_or_default())
        .replace("{created}", &room.created.ago(now))
        .replace("{host}", &escape(room.host_username.as_deref().unwrap_or("deleted")))
        .replace("{topic}", &escape(room.topic_name.as_deref().unwrap_or("No topic")))
        .replace("{description}", &escape(room.description.as_deref().unwrap_or("")))
        .replace("{room_name}", &escape(&room.name));

    Ok(res::page(&room.name, caller.user.as_ref(), &body).into_response())
}

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
    AppResult, AppState, db, extract::Path, include_res,
    res::{self, escape},
    session::SignedIn,
};

use super::ensure_author;

#[derive(Deserialize)]
pub(crate) struct EditMessageForm {
    #[serde(default)]
    content: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn edit_message_page(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Path(message_id): Path<Uuid>,
) -> AppResult<Response> {
    let message = db::messages::get(&db_pool, message_id).await?;
    ensure_author(&message, &user)?;

    let body = include_res!(str, "/pages/rooms/edit_message.html")
        .replace("{id}", &message.id.to_string())
        .replace("{room_id}", &message.room_id.to_string())
        .replace("{room_name}", &escape(&message.room_name))
        .replace("{content}", &escape(&message.content));

    Ok(res::page("Edit Message", Some(&user), &body).into_response())
}

/// Saving blank content does not store anything; the author is sent to the
/// delete confirmation instead.
#[debug_handler(state = AppState)]
pub(crate) async fn edit_message(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Path(message_id): Path<Uuid>,
    Form(EditMessageForm { content }): Form<EditMessageForm>,
) -> AppResult<Response> {
    let message = db::messages::get(&db_pool, message_id).await?;
    ensure_author(&message, &user)?;

    if content.trim().is_empty() {
        return Ok(Redirect::to(&format!("/delete-message/{message_id}")).into_response());
    }

    db::messages::edit(&db_pool, message.id, &content).await?;
    debug!("@{} edited {}", user.username, message.id);

    Ok(Redirect::to(&format!("/room/{}", message.room_id)).into_response())
}

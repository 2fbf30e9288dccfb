use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::{AppResult, AppState, db, extract::Path, res, session::SignedIn};

use super::{ensure_author, preview};

#[debug_handler(state = AppState)]
pub(crate) async fn delete_message_page(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Path(message_id): Path<Uuid>,
) -> AppResult<Response> {
    let message = db::messages::get(&db_pool, message_id).await?;
    ensure_author(&message, &user)?;

    let body = res::confirm_delete(
        &preview(&message.content),
        &format!("/delete-message/{message_id}"),
        &format!("/room/{}", message.room_id),
    );
    Ok(res::page("Delete Message", Some(&user), &body).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_message(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Path(message_id): Path<Uuid>,
) -> AppResult<Response> {
    let message = db::messages::get(&db_pool, message_id).await?;
    ensure_author(&message, &user)?;

    db::messages::delete(&db_pool, message.id).await?;
    debug!("@{} deleted {}", user.username, message.id);

    Ok(Redirect::to("/").into_response())
}

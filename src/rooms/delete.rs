use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::{AppResult, AppState, db, extract::Path, res, session::SignedIn};

use super::ensure_host;

#[debug_handler(state = AppState)]
pub(crate) async fn delete_room_page(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Path(room_id): Path<Uuid>,
) -> AppResult<Response> {
    let room = db::rooms::get(&db_pool, room_id).await?;
    ensure_host(&room, &user)?;

    let body = res::confirm_delete(
        &room.name,
        &format!("/delete-room/{room_id}"),
        &format!("/room/{room_id}"),
    );
    Ok(res::page("Delete Room", Some(&user), &body).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_room(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Path(room_id): Path<Uuid>,
) -> AppResult<Response> {
    let room = db::rooms::get(&db_pool, room_id).await?;
    ensure_host(&room, &user)?;

    db::rooms::delete(&db_pool, room.id).await?;
    info!("@{} deleted room {} ({})", user.username, room.name, room.id);

    Ok(Redirect::to("/").into_response())
}

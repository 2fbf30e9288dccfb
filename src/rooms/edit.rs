use axum::{
    Form, debug_handler,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::{AppResult, AppState, db, extract::Path, session::SignedIn};

use super::{RoomForm, ensure_host, room_form_page};

#[debug_handler(state = AppState)]
pub(crate) async fn update_room_page(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Path(room_id): Path<Uuid>,
) -> AppResult<Response> {
    let room = db::rooms::get(&db_pool, room_id).await?;
    ensure_host(&room, &user)?;

    let action = format!("/update-room/{room_id}");
    Ok(
        room_form_page(&db_pool, &user, "Update Room", &action, &RoomForm::from_room(&room), None)
            .await?
            .into_response(),
    )
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_room(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Path(room_id): Path<Uuid>,
    Form(form): Form<RoomForm>,
) -> AppResult<Response> {
    let room = db::rooms::get(&db_pool, room_id).await?;
    ensure_host(&room, &user)?;

    let fields = match form.fields() {
        Ok(fields) => fields,
        Err(error) => {
            let action = format!("/update-room/{room_id}");
            return Ok(
                room_form_page(&db_pool, &user, "Update Room", &action, &form, Some(error))
                    .await?
                    .into_response(),
            );
        }
    };

    db::rooms::update(&db_pool, room.id, fields).await?;
    info!("@{} updated room {}", user.username, room.id);

    Ok(Redirect::to("/").into_response())
}

use axum::{
    Form, debug_handler,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tracing::info;

use crate::{AppResult, AppState, db, session::SignedIn};

use super::{RoomForm, room_form_page};

#[debug_handler(state = AppState)]
pub(crate) async fn new_room_page(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
) -> AppResult<Response> {
    Ok(
        room_form_page(&db_pool, &user, "Create Room", "/create-room", &RoomForm::default(), None)
            .await?
            .into_response(),
    )
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_room(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Form(form): Form<RoomForm>,
) -> AppResult<Response> {
    let fields = match form.fields() {
        Ok(fields) => fields,
        Err(error) => {
            return Ok(
                room_form_page(&db_pool, &user, "Create Room", "/create-room", &form, Some(error))
                    .await?
                    .into_response(),
            );
        }
    };

    let room = db::rooms::create(&db_pool, user.id, fields).await?;
    info!("@{} opened room {} ({})", user.username, room.name, room.id);

    Ok(Redirect::to("/").into_response())
}

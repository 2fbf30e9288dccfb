mod delete;
mod edit;

use axum::{Router, routing::get};

use crate::{
    AppError, AppResult, AppState,
    db::{Message, User},
};

/// How much of a message the delete confirmation quotes.
pub const PREVIEW_LENGTH: usize = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/edit-message/{id}", get(edit::edit_message_page).post(edit::edit_message))
        .route("/delete-message/{id}", get(delete::delete_message_page).post(delete::delete_message))
}

pub(crate) fn ensure_author(message: &Message, user: &User) -> AppResult<()> {
    if message.user_id == user.id {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

pub(crate) fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_LENGTH) {
        Some((end, _)) => format!("{}…", &content[..end]),
        None => content.to_owned(),
    }
}

use axum::{debug_handler, response::Redirect};

use crate::{AppResult, AppState, session::Caller};

#[debug_handler(state = AppState)]
pub(crate) async fn logout(caller: Caller) -> AppResult<Redirect> {
    caller.sign_out().await?;
    Ok(Redirect::to("/"))
}

use axum::{
    Form, debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    AppResult, AppState, db, include_res,
    db::User,
    res::{self, escape},
    session::Caller,
};

use super::{create_user, credentials};

const REGISTRATION_FAILED: &str = "An error occurred during registration.";

#[derive(Deserialize)]
pub(crate) struct RegisterForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password1: String,
    #[serde(default)]
    password2: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn register_page(caller: Caller) -> AppResult<Response> {
    Ok(register_form(caller.user.as_ref(), "", None).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    caller: Caller,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let username = match credentials::normalize_username(&form.username) {
        Ok(username) => username,
        Err(reason) => return Ok(rejected(&caller, &form.username, reason)),
    };
    if let Err(reason) = credentials::check_new_password(&form.password1, &form.password2) {
        return Ok(rejected(&caller, &username, reason));
    }
    if db::users::username_taken(&db_pool, &username, None).await? {
        return Ok(rejected(&caller, &username, "A user with that username already exists."));
    }

    let user = create_user(&db_pool, &username, &form.password1).await?;
    caller.sign_in(&user).await?;

    Ok(Redirect::to("/").into_response())
}

fn rejected(caller: &Caller, username: &str, reason: &str) -> Response {
    register_form(
        caller.user.as_ref(),
        username,
        Some(&format!("{REGISTRATION_FAILED} {reason}")),
    )
    .into_response()
}

fn register_form(user: Option<&User>, username: &str, error: Option<&str>) -> Html<String> {
    let body = include_res!(str, "/pages/auth/register.html")
        .replace("{error}", &res::error_box(error))
        .replace("{username}", &escape(username));

    res::page("Register", user, &body)
}

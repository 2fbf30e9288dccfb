use axum::{
    Form, debug_handler,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    AppResult, AppState, db, include_res,
    db::User,
    res::{self, escape},
    session::Caller,
};

use super::password;

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) return_url: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login_page(
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    caller: Caller,
) -> AppResult<Response> {
    if caller.user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(login_form(return_url.as_deref(), "", None).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    State(db_pool): State<SqlitePool>,
    caller: Caller,
    Form(LoginForm { username, password }): Form<LoginForm>,
) -> AppResult<Response> {
    if caller.user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let username = username.trim().to_lowercase();
    let Some(user) = db::users::find_by_username(&db_pool, &username).await? else {
        return Ok(login_form(return_url.as_deref(), &username, Some("User does not exist.")).into_response());
    };

    if !password::verify(password, user.password_hash.clone()).await? {
        warn!("failed login for @{username}");
        return Ok(login_form(
            return_url.as_deref(),
            &username,
            Some("Username or password does not match."),
        )
        .into_response());
    }

    caller.sign_in(&user).await?;
    info!("welcome @{}", user.username);

    Ok(Redirect::to(&local_return_url(return_url.as_deref())).into_response())
}

fn login_form(return_url: Option<&str>, username: &str, error: Option<&str>) -> Html<String> {
    let action = match return_url.filter(|url| is_local(url)) {
        Some(url) => format!("/login?{}", serde_urlencoded::to_string([("return_url", url)]).unwrap_or_default()),
        None => "/login".to_owned(),
    };

    let body = include_res!(str, "/pages/auth/login.html")
        .replace("{action}", &escape(&action))
        .replace("{error}", &res::error_box(error))
        .replace("{username}", &escape(username));

    res::page("Login", None::<&User>, &body)
}

/// Where to go after signing in. Only same-site paths are honoured.
pub(crate) fn local_return_url(return_url: Option<&str>) -> String {
    return_url.filter(|url| is_local(url)).unwrap_or("/").to_owned()
}

fn is_local(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.contains('\\')
}

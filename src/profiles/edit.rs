use axum::{
    Form, debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    AppResult, AppState, auth::credentials, db, include_res,
    db::{User, users::ProfileFields},
    res::{self, escape},
    session::SignedIn,
};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    bio: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_user_page(SignedIn { user, .. }: SignedIn) -> AppResult<Response> {
    let form = UserForm {
        username: user.username.clone(),
        email: user.email.clone().unwrap_or_default(),
        bio: user.bio.clone().unwrap_or_default(),
    };
    Ok(user_form(&user, &form, None).into_response())
}

/// Only ever touches the signed-in user's own row.
#[debug_handler(state = AppState)]
pub(crate) async fn update_user(
    State(db_pool): State<SqlitePool>,
    SignedIn { user, .. }: SignedIn,
    Form(form): Form<UserForm>,
) -> AppResult<Response> {
    let username = match credentials::normalize_username(&form.username) {
        Ok(username) => username,
        Err(reason) => return Ok(user_form(&user, &form, Some(reason)).into_response()),
    };
    if db::users::username_taken(&db_pool, &username, Some(user.id)).await? {
        return Ok(user_form(&user, &form, Some("A user with that username already exists.")).into_response());
    }

    let email = form.email.trim();
    if !email.is_empty() && !email.contains('@') {
        return Ok(user_form(&user, &form, Some("Enter a valid email address.")).into_response());
    }
    let bio = form.bio.trim();

    let updated = db::users::update_profile(
        &db_pool,
        user.id,
        ProfileFields {
            username: &username,
            email: (!email.is_empty()).then_some(email),
            bio: (!bio.is_empty()).then_some(bio),
        },
    )
    .await?;
    info!("@{} updated their profile", updated.username);

    Ok(Redirect::to(&format!("/profile/{}", updated.id)).into_response())
}

fn user_form(user: &User, form: &UserForm, error: Option<&str>) -> Html<String> {
    let body = include_res!(str, "/pages/profiles/user_form.html")
        .replace("{error}", &res::error_box(error))
        .replace("{id}", &user.id.to_string())
        .replace("{email}", &escape(&form.email))
        .replace("{bio}", &escape(&form.bio))
        .replace("{username}", &escape(&form.username));

    res::page("Edit Profile", Some(user), &body)
}

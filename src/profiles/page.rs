use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    AppResult, AppState, db, extract::Path, include_res,
    db::Timestamp,
    index::{activity_to_html, rooms_to_html, topics_to_html},
    res::{self, escape},
    session::Caller,
};

/// Public: anyone may look at anyone's profile.
#[debug_handler(state = AppState)]
pub(crate) async fn profile(
    Path(profile_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    caller: Caller,
) -> AppResult<Response> {
    let user = db::users::get(&db_pool, profile_id).await?;
    let rooms = db::rooms::hosted_by(&db_pool, user.id).await?;
    let messages = db::messages::by_user(&db_pool, user.id).await?;
    let topics = db::topics::with_room_counts(&db_pool, None).await?;
    let now = Timestamp::now();

    let settings = if caller.user_id() == Some(user.id) {
        r#"<a class="button" href="/update-user">Edit Profile</a>"#
    } else {
        ""
    };
    let email = match &user.email {
        Some(email) => format!(" · {}", escape(email)),
        None => String::new(),
    };

    let body = include_res!(str, "/pages/profiles/profile.html")
        .replace("{settings}", settings)
        .replace("{topics}", &topics_to_html(&topics))
        .replace("{rooms}", &rooms_to_html(&rooms, now))
        .replace("{activity}", &activity_to_html(&messages, now))
        .replace("{created}", &user.created.ago(now))
        .replace("{email}", &email)
        .replace("{bio}", &escape(user.bio.as_deref().unwrap_or("")))
        .replace("{username}", &escape(&user.username));

    Ok(res::page(&user.username, caller.user.as_ref(), &body).into_response())
}

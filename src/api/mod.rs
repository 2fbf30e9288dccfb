//! Read-only JSON snapshots of rooms and users.

use std::time::Duration;

use axum::{
    Json, Router, debug_handler,
    extract::{FromRequestParts, State, rejection::PathRejection},
    http::{Method, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::{
    AppError, AppState,
    db::{self, Room, Timestamp, User},
};

pub const ROUTES: [&str; 5] = [
    "GET /api",
    "GET /api/rooms",
    "GET /api/room/:id",
    "GET /api/users",
    "GET /api/users/:id",
];

pub fn router() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/", get(get_routes))
        .route("/api/rooms/", get(get_rooms))
        .route("/api/room/{id}/", get(get_room))
        .route("/api/users/", get(get_users))
        .route("/api/users/{id}/", get(get_user))
        .layer(cors)
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// [`AppError`] with a JSON body.
pub struct ApiError(pub AppError);

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(AppError::from(rejection))
    }
}

/// Path extractor whose rejection is a JSON 404 like any other unknown id.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self.0 {
            AppError::Internal(err) => {
                tracing::error!("{err:?}");
                "internal error".to_owned()
            }
            err => err.to_string(),
        };

        (
            self.0.status_code(),
            Json(ErrorBody { error: self.0.kind(), message }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct RoomSnapshot {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub host: Option<Uuid>,
    pub topic: Option<Uuid>,
    pub participants: Vec<Uuid>,
    pub created: Timestamp,
    pub updated: Timestamp,
}

impl RoomSnapshot {
    fn new(room: Room, participants: Vec<Uuid>) -> Self {
        Self {
            id: room.id,
            name: room.name,
            description: room.description,
            host: room.host_id,
            topic: room.topic_id,
            participants,
            created: room.created,
            updated: room.updated,
        }
    }
}

#[debug_handler]
pub async fn get_routes() -> Json<[&'static str; 5]> {
    Json(ROUTES)
}

#[debug_handler(state = AppState)]
pub async fn get_rooms(State(db_pool): State<SqlitePool>) -> ApiResult<Vec<RoomSnapshot>> {
    let rooms = db::rooms::all(&db_pool).await?;
    let mut participants = db::rooms::participant_map(&db_pool).await?;

    Ok(Json(
        rooms
            .into_iter()
            .map(|room| {
                let ids = participants.remove(&room.id).unwrap_or_default();
                RoomSnapshot::new(room, ids)
            })
            .collect(),
    ))
}

#[debug_handler(state = AppState)]
pub async fn get_room(
    State(db_pool): State<SqlitePool>,
    ApiPath(room_id): ApiPath<Uuid>,
) -> ApiResult<RoomSnapshot> {
    let room = db::rooms::get(&db_pool, room_id).await?;
    let participants = db::rooms::participants(&db_pool, room_id)
        .await?
        .into_iter()
        .map(|user| user.id)
        .collect();

    Ok(Json(RoomSnapshot::new(room, participants)))
}

#[debug_handler(state = AppState)]
pub async fn get_users(State(db_pool): State<SqlitePool>) -> ApiResult<Vec<User>> {
    Ok(Json(db::users::all(&db_pool).await?))
}

#[debug_handler(state = AppState)]
pub async fn get_user(
    State(db_pool): State<SqlitePool>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> ApiResult<User> {
    Ok(Json(db::users::get(&db_pool, user_id).await?))
}

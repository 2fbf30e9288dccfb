#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use sqlx::SqlitePool;
use studybud::{AppState, Config, app, db};
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "study-hard-123";

pub struct TestApp {
    pub router: Router,
    pub db_pool: SqlitePool,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub cookie: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn redirects_to(&self, path: &str) -> bool {
        self.status.is_redirection() && self.location.as_deref() == Some(path)
    }
}

impl TestApp {
    pub async fn new() -> TestApp {
        let config = Config::default();
        let db_pool = db::connect(&config).await.expect("failed to open test database");
        let router = app(AppState { db_pool: db_pool.clone() }, &config);

        TestApp { router, db_pool }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, form: &[(&str, &str)]) -> TestResponse {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let body = serde_urlencoded::to_string(form).unwrap();
        self.send(request.body(Body::from(body)).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_owned());
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().unwrap().split(';').next())
            .map(str::to_owned);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            location,
            cookie,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Registers through the web form and returns the session cookie.
    pub async fn register(&self, username: &str) -> String {
        let response = self
            .post(
                "/register",
                None,
                &[("username", username), ("password1", PASSWORD), ("password2", PASSWORD)],
            )
            .await;
        assert!(response.redirects_to("/"), "registration of {username} failed: {}", response.body);
        response.cookie.expect("registration did not set a session cookie")
    }

    pub async fn user(&self, username: &str) -> db::User {
        db::users::find_by_username(&self.db_pool, username)
            .await
            .unwrap()
            .expect("no such user")
    }

    /// Creates a room through the web form and returns it.
    pub async fn create_room(&self, cookie: &str, name: &str, topic: &str) -> db::Room {
        let response = self
            .post(
                "/create-room",
                Some(cookie),
                &[("name", name), ("topic", topic), ("description", "")],
            )
            .await;
        assert!(response.redirects_to("/"), "room creation failed: {}", response.body);

        db::rooms::search(&self.db_pool, name)
            .await
            .unwrap()
            .into_iter()
            .find(|room| room.name == name)
            .expect("room not stored")
    }

    pub async fn message_count(&self, room_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE room_id=?")
            .bind(room_id)
            .fetch_one(&self.db_pool)
            .await
            .unwrap()
    }
}

/// Where an anonymous request for `path` is sent.
pub fn login_url(path: &str) -> String {
    format!("/login?{}", serde_urlencoded::to_string([("return_url", path)]).unwrap())
}

/// A user inserted straight into the database, for tests that never log in.
pub async fn insert_user(db_pool: &SqlitePool, username: &str) -> db::User {
    db::users::create(db_pool, username, "$argon2id$unused").await.unwrap()
}

mod common;

use axum::http::StatusCode;
use common::{TestApp, login_url};
use studybud::db;
use uuid::Uuid;

#[tokio::test]
async fn create_room_requires_login() {
    let app = TestApp::new().await;

    let page = app.get("/create-room", None).await;
    assert!(page.redirects_to(&login_url("/create-room")));

    let submit = app.post("/create-room", None, &[("name", "Lounge")]).await;
    assert!(submit.redirects_to(&login_url("/create-room")));
    assert!(db::rooms::all(&app.db_pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn creator_becomes_host_whatever_the_form_says() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    app.register("bob").await;
    let bob = app.user("bob").await;

    let bob_id = bob.id.to_string();
    let response = app
        .post(
            "/create-room",
            Some(&alice),
            &[("name", "Rustaceans"), ("topic", "Rust"), ("description", "crabs"), ("host", bob_id.as_str())],
        )
        .await;
    assert!(response.redirects_to("/"));

    let rooms = db::rooms::all(&app.db_pool).await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].host_id, Some(app.user("alice").await.id));
    assert_eq!(rooms[0].host_username.as_deref(), Some("alice"));
    assert_eq!(rooms[0].description.as_deref(), Some("crabs"));
}

#[tokio::test]
async fn new_topic_is_created_exactly_once() {
    let app = TestApp::new().await;
    let cookie = app.register("alice").await;

    let first = app.create_room(&cookie, "Jazz night", "Music").await;
    let second = app.create_room(&cookie, "Choir", "Music").await;

    let topics: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics WHERE name='Music'")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(topics, 1);
    assert_eq!(first.topic_id, second.topic_id);
    assert_eq!(first.topic_name.as_deref(), Some("Music"));
}

#[tokio::test]
async fn blank_name_re_renders_the_form() {
    let app = TestApp::new().await;
    let cookie = app.register("alice").await;

    let response = app
        .post("/create-room", Some(&cookie), &[("name", "  "), ("topic", "Rust")])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Room name is required."));
    assert!(db::rooms::all(&app.db_pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn room_page_shows_room_and_404s_for_unknown_ids() {
    let app = TestApp::new().await;
    let cookie = app.register("alice").await;
    let room = app.create_room(&cookie, "Study hall", "Maths").await;

    let page = app.get(&format!("/room/{}", room.id), None).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Study hall"));

    let missing = app.get(&format!("/room/{}", Uuid::now_v7()), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_host_may_update() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let room = app.create_room(&alice, "Lounge", "Chat").await;
    let uri = format!("/update-room/{}", room.id);

    let page = app.get(&uri, Some(&bob)).await;
    assert_eq!(page.status, StatusCode::FORBIDDEN);
    assert!(page.body.contains("not allowed"));

    let submit = app.post(&uri, Some(&bob), &[("name", "Hijacked")]).await;
    assert_eq!(submit.status, StatusCode::FORBIDDEN);

    let anonymous = app.post(&uri, None, &[("name", "Hijacked")]).await;
    assert!(anonymous.redirects_to(&login_url(&uri)));

    assert_eq!(db::rooms::get(&app.db_pool, room.id).await.unwrap().name, "Lounge");
}

#[tokio::test]
async fn host_update_overwrites_fields_and_keeps_host() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let room = app.create_room(&alice, "Lounge", "Chat").await;
    let uri = format!("/update-room/{}", room.id);

    let page = app.get(&uri, Some(&alice)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(r#"value="Lounge""#));

    std::thread::sleep(std::time::Duration::from_millis(2));
    let response = app
        .post(&uri, Some(&alice), &[("name", "Library"), ("topic", "Books"), ("description", "quiet")])
        .await;
    assert!(response.redirects_to("/"));

    let updated = db::rooms::get(&app.db_pool, room.id).await.unwrap();
    assert_eq!(updated.name, "Library");
    assert_eq!(updated.topic_name.as_deref(), Some("Books"));
    assert_eq!(updated.description.as_deref(), Some("quiet"));
    assert_eq!(updated.host_id, room.host_id);
    assert_eq!(updated.created, room.created);
    assert!(updated.updated > room.updated);
    assert!(updated.updated >= updated.created);
}

#[tokio::test]
async fn updated_never_moves_backwards() {
    let app = TestApp::new().await;
    let host = common::insert_user(&app.db_pool, "host").await;
    let fields = db::rooms::RoomFields { name: "Lounge", topic: None, description: None };
    let room = db::rooms::create(&app.db_pool, host.id, fields).await.unwrap();

    // a stamp from the future, as a skewed clock would leave behind
    let future = room.updated.micros() + 3_600_000_000;
    sqlx::query("UPDATE rooms SET updated=? WHERE id=?")
        .bind(future)
        .bind(room.id)
        .execute(&app.db_pool)
        .await
        .unwrap();

    let saved = db::rooms::update(&app.db_pool, room.id, fields).await.unwrap();
    assert_eq!(saved.updated.micros(), future);
    assert!(saved.updated >= saved.created);
}

#[tokio::test]
async fn delete_asks_first_then_cascades_to_messages() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let room = app.create_room(&alice, "Lounge", "Chat").await;
    let room_uri = format!("/room/{}", room.id);
    app.post(&room_uri, Some(&alice), &[("body", "hello")]).await;
    app.post(&room_uri, Some(&bob), &[("body", "hi there")]).await;
    assert_eq!(app.message_count(room.id).await, 2);

    let uri = format!("/delete-room/{}", room.id);
    assert_eq!(app.get(&uri, Some(&bob)).await.status, StatusCode::FORBIDDEN);
    assert_eq!(app.post(&uri, Some(&bob), &[]).await.status, StatusCode::FORBIDDEN);

    let confirm = app.get(&uri, Some(&alice)).await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert!(confirm.body.contains("Are you sure"));
    assert!(db::rooms::find(&app.db_pool, room.id).await.unwrap().is_some());

    assert!(app.post(&uri, Some(&alice), &[]).await.redirects_to("/"));
    assert!(db::rooms::find(&app.db_pool, room.id).await.unwrap().is_none());
    assert_eq!(app.message_count(room.id).await, 0);
    assert!(db::rooms::participants(&app.db_pool, room.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn only_the_host_may_delete() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let room = app.create_room(&alice, "Lounge", "Chat").await;
    let uri = format!("/delete-room/{}", room.id);

    let page = app.get(&uri, Some(&bob)).await;
    assert_eq!(page.status, StatusCode::FORBIDDEN);
    assert!(page.body.contains("not allowed"));
    assert_eq!(app.post(&uri, Some(&bob), &[]).await.status, StatusCode::FORBIDDEN);

    let anonymous = app.post(&uri, None, &[]).await;
    assert!(anonymous.redirects_to(&login_url(&uri)));

    assert!(db::rooms::find(&app.db_pool, room.id).await.unwrap().is_some());
}

#[tokio::test]
async fn malformed_ids_are_not_found() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;

    assert_eq!(app.get("/room/42", None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.post("/room/42", Some(&alice), &[("body", "hi")]).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/update-room/42", Some(&alice)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.post("/delete-room/42", Some(&alice), &[]).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/edit-message/nope", Some(&alice)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/delete-message/nope", Some(&alice)).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_missing_room_is_not_found() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;

    let response = app.post(&format!("/delete-room/{}", Uuid::now_v7()), Some(&alice), &[]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

mod common;

use axum::http::StatusCode;
use common::{TestApp, insert_user};
use serde_json::Value;
use studybud::db::{self, rooms::RoomFields};
use uuid::Uuid;

fn json(body: &str) -> Value {
    serde_json::from_str(body).expect("response is not JSON")
}

#[tokio::test]
async fn lists_routes() {
    let app = TestApp::new().await;
    let response = app.get("/api/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(json(&response.body).as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn rooms_snapshot_includes_participants() {
    let app = TestApp::new().await;
    let host = insert_user(&app.db_pool, "host").await;
    let guest = insert_user(&app.db_pool, "guest").await;
    let fields = RoomFields { name: "Lounge", topic: Some("Chat"), description: Some("sofas") };
    let room = db::rooms::create(&app.db_pool, host.id, fields).await.unwrap();
    db::messages::post(&app.db_pool, room.id, guest.id, "hi").await.unwrap();

    let rooms = json(&app.get("/api/rooms/", None).await.body);
    let rooms = rooms.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["name"], "Lounge");
    assert_eq!(rooms[0]["host"], host.id.to_string());
    assert_eq!(rooms[0]["participants"][0], guest.id.to_string());

    let one = app.get(&format!("/api/room/{}/", room.id), None).await;
    assert_eq!(one.status, StatusCode::OK);
    let one = json(&one.body);
    assert_eq!(one["description"], "sofas");
    assert!(one["created"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn users_never_expose_password_hashes() {
    let app = TestApp::new().await;
    let user = insert_user(&app.db_pool, "alice").await;

    let users = app.get("/api/users/", None).await;
    assert_eq!(users.status, StatusCode::OK);
    assert!(!users.body.contains("password"));
    assert_eq!(json(&users.body)[0]["username"], "alice");

    let one = json(&app.get(&format!("/api/users/{}/", user.id), None).await.body);
    assert_eq!(one["id"], user.id.to_string());
    assert!(one.get("password_hash").is_none());
}

#[tokio::test]
async fn unknown_ids_are_json_404s() {
    let app = TestApp::new().await;

    for uri in [
        format!("/api/room/{}/", Uuid::now_v7()),
        format!("/api/users/{}/", Uuid::now_v7()),
    ] {
        let response = app.get(&uri, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(json(&response.body)["error"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn malformed_ids_are_json_404s() {
    let app = TestApp::new().await;

    for uri in ["/api/room/42/", "/api/users/abc/"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        let body = json(&response.body);
        assert_eq!(body["error"], "NOT_FOUND");
        assert!(body["message"].is_string());
    }
}

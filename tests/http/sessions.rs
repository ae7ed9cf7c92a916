use serde_json::json;

use crate::support::{assert_error, read, spawn_app};

const BAD_REQUEST: &str = "errors.com.epicgames.common.bad_request";
const NOT_FOUND: &str = "errors.com.epicgames.common.not_found";
const SERVER_ERROR: &str = "errors.com.epicgames.common.server_error";

#[tokio::test]
async fn create_and_read_back() {
    let app = spawn_app().await;

    let resp = app
        .post("/gamesessions/create")
        .json(&json!({
            "sessionId": "s-1",
            "status": "waiting",
            "version": "13",
            "port": 7777,
            "address": "10.0.0.4",
            "identifier": "eu-1",
            "options": { "playlist": "Playlist_DefaultSolo" }
        }))
        .send()
        .await
        .unwrap();
    let (status, created) = read(resp).await;
    assert_eq!(status, 200);
    assert_eq!(created["sessionId"], "s-1");
    assert_eq!(created["status"], "waiting");
    assert_eq!(created["version"], 13);
    assert_eq!(created["port"], 7777);
    assert_eq!(created["options"]["playlist"], "Playlist_DefaultSolo");

    let (status, found) = read(app.get("/gamesessions/list/s-1").send().await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(found, created);

    let (status, all) = read(app.get("/gamesessions/list").send().await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(all, json!([created]));
}

#[tokio::test]
async fn unknown_session_is_404() {
    let app = spawn_app().await;
    let (status, body) = read(app.get("/gamesessions/list/ghost").send().await.unwrap()).await;
    assert_eq!(status, 404);
    assert_error(&body, NOT_FOUND, "Server not found.");
    assert!(body["messageVars"][0]
        .as_str()
        .unwrap()
        .ends_with("/gamesessions/list/ghost"));
}

#[tokio::test]
async fn non_numeric_version_persists_nothing() {
    let app = spawn_app().await;
    let resp = app
        .post("/gamesessions/create")
        .json(&json!({ "sessionId": "s-1", "version": "abc", "port": 7777 }))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 400);
    assert_error(&body, BAD_REQUEST, "Version or Port must be valid numbers.");

    let (_, all) = read(app.get("/gamesessions/list").send().await.unwrap()).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn invalid_json_and_duplicates_are_400() {
    let app = spawn_app().await;

    let resp = app
        .post("/gamesessions/create")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 400);
    assert_error(&body, BAD_REQUEST, "Body isn't valid JSON");

    app.register_session("s-1").await;
    let resp = app
        .post("/gamesessions/create")
        .json(&json!({ "sessionId": "s-1", "version": 13, "port": 7777 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn create_store_failure_is_500() {
    let app = spawn_app().await;
    app.store.fail_writes(true);

    let resp = app
        .post("/gamesessions/create")
        .json(&json!({ "sessionId": "s-1", "version": 13, "port": 7777 }))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 500);
    assert_error(&body, SERVER_ERROR, "Failed to create server.");
}

#[tokio::test]
async fn set_status() {
    let app = spawn_app().await;
    app.register_session("s-1").await;

    let resp = app
        .post("/gamesessions/setStatus")
        .json(&json!({ "sessionId": "s-1", "status": "in-progress" }))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 200);
    assert_eq!(
        body["message"],
        "Successfully set server status to 'in-progress'"
    );

    let (_, found) = read(app.get("/gamesessions/list/s-1").send().await.unwrap()).await;
    assert_eq!(found["status"], "in-progress");
}

#[tokio::test]
async fn set_status_on_unknown_session_is_400_and_changes_nothing() {
    let app = spawn_app().await;
    app.register_session("s-1").await;
    let (_, before) = read(app.get("/gamesessions/list").send().await.unwrap()).await;

    let resp = app
        .post("/gamesessions/setStatus")
        .json(&json!({ "sessionId": "ghost", "status": "ended" }))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 400);
    assert_error(&body, BAD_REQUEST, "Failed to set server status to 'ended'");

    let (_, after) = read(app.get("/gamesessions/list").send().await.unwrap()).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn set_status_rejects_bad_input() {
    let app = spawn_app().await;
    app.register_session("s-1").await;

    let resp = app
        .post("/gamesessions/setStatus")
        .body("nope")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = app
        .post("/gamesessions/setStatus")
        .json(&json!({ "sessionId": "s-1", "status": "paused" }))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 400);
    assert_eq!(body["errorMessage"], "Failed to set server status to 'paused'");
}

#[tokio::test]
async fn set_status_store_failure_is_500() {
    let app = spawn_app().await;
    app.register_session("s-1").await;
    app.store.fail_writes(true);

    let resp = app
        .post("/gamesessions/setStatus")
        .json(&json!({ "sessionId": "s-1", "status": "ended" }))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 500);
    assert_error(&body, SERVER_ERROR, "Failed to set server status.");

    let (_, found) = read(app.get("/gamesessions/list/s-1").send().await.unwrap()).await;
    assert_eq!(found["status"], "created");
}

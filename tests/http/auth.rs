use gamesessions::auth::basic_token;

use crate::support::{assert_error, read, spawn_app};

const AUTH_FAILED: &str = "errors.com.epicgames.common.authentication.authentication_failed";

#[tokio::test]
async fn health_needs_no_token() {
    let app = spawn_app().await;
    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = spawn_app().await;
    let resp = app
        .client
        .get(app.url("/gamesessions/list"))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 401);
    assert_error(&body, AUTH_FAILED, "Authorization header is missing.");
    assert_eq!(body["numericErrorCode"], 1032);
}

#[tokio::test]
async fn wrong_secret_is_rejected_everywhere() {
    let app = spawn_app().await;
    let token = basic_token("gameserver", "wrong");

    for (method, path) in [
        ("GET", "/gamesessions/list"),
        ("POST", "/gamesessions/create"),
        ("POST", "/gamesessions/setStatus"),
        ("POST", "/gamesessions/stats/vbucks/Shadow/s-1/3"),
        ("POST", "/gamesessions/levels/Shadow/s-1/100"),
    ] {
        let request = match method {
            "GET" => app.client.get(app.url(path)),
            _ => app.client.post(app.url(path)).body("{}"),
        };
        let resp = request
            .header("Authorization", &token)
            .send()
            .await
            .unwrap();
        let (status, body) = read(resp).await;
        assert_eq!(status, 401, "{method} {path}");
        assert_error(&body, AUTH_FAILED, "Invalid client credentials.");
    }
}

#[tokio::test]
async fn valid_token_passes() {
    let app = spawn_app().await;
    let resp = app.get("/gamesessions/list").send().await.unwrap();
    assert_eq!(resp.status(), 200);
}

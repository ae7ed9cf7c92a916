use gamesessions::notify::GIFT_RECEIVED;
use gamesessions::profile::{BATTLEPASS_GIFT_BOX, MTX_CURRENCY};
use gamesessions::ProfileId;
use serde_json::{json, Value};

use crate::support::{assert_error, read, spawn_app, ACCOUNT_ID, DINO, DINO_TOKEN, SEASON};

const NOT_FOUND: &str = "errors.com.epicgames.common.not_found";
const BAD_REQUEST: &str = "errors.com.epicgames.common.bad_request";

fn changes<'a>(body: &'a Value, change_type: &'a str) -> impl Iterator<Item = &'a Value> {
    body["profileChanges"]
        .as_array()
        .unwrap()
        .iter()
        .filter(move |c| c["changeType"] == change_type)
}

fn stat<'a>(body: &'a Value, name: &str) -> &'a Value {
    changes(body, "statModified")
        .find(|c| c["name"] == name)
        .map(|c| &c["value"])
        .unwrap()
}

#[tokio::test]
async fn victory_credits_currency_and_a_win() {
    let app = spawn_app().await;
    app.register_session("s-1").await;

    let resp = app
        .post("/gamesessions/stats/vbucks/Shadow/s-1/3")
        .json(&json!({ "isVictory": true }))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 200);
    assert_eq!(body["profileId"], "common_core");
    assert_eq!(body["profileRevision"], 2);
    assert_eq!(body["profileChangesBaseRevision"], 1);
    assert_eq!(body["profileCommandRevision"], 2);
    assert_eq!(body["responseVersion"], 1);
    assert_eq!(
        body["profileChanges"],
        json!([{
            "changeType": "itemQuantityChanged",
            "itemId": MTX_CURRENCY,
            "quantity": 350
        }])
    );

    let common_core = app.profile(ProfileId::CommonCore);
    assert_eq!(common_core.rvn, 2);
    assert_eq!(common_core.items[MTX_CURRENCY].quantity, 350);
    let athena = app.profile(ProfileId::Athena);
    assert_eq!(athena.attributes().past_seasons[0].num_wins, 1);
}

#[tokio::test]
async fn loss_credits_eliminations_only() {
    let app = spawn_app().await;
    app.register_session("s-1").await;

    let resp = app
        .post("/gamesessions/stats/vbucks/Shadow/s-1/3")
        .json(&json!({ "isVictory": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    assert_eq!(app.profile(ProfileId::CommonCore).items[MTX_CURRENCY].quantity, 150);
    let athena = app.profile(ProfileId::Athena);
    assert_eq!(athena.rvn, 1);
    assert_eq!(athena.attributes().past_seasons[0].num_wins, 0);
}

#[tokio::test]
async fn match_stats_lookup_failures() {
    let app = spawn_app().await;
    app.register_session("s-1").await;
    let body = json!({ "isVictory": true });

    let (status, err) = read(
        app.post("/gamesessions/stats/vbucks/Nobody/s-1/3")
            .json(&body)
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 404);
    assert_error(&err, NOT_FOUND, "User not found!");

    let (status, err) = read(
        app.post("/gamesessions/stats/vbucks/Shadow/ghost/3")
            .json(&body)
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 404);
    assert_error(&err, NOT_FOUND, "Session not found!");

    let (status, err) = read(
        app.post("/gamesessions/stats/vbucks/Shadow/s-1/lots")
            .json(&body)
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(err["errorCode"], BAD_REQUEST);

    let (status, err) = read(
        app.post("/gamesessions/stats/vbucks/Shadow/s-1/3")
            .body("victory!")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_error(&err, BAD_REQUEST, "Body isn't Valid JSON!");

    assert_eq!(app.profile(ProfileId::CommonCore).rvn, 1);
}

#[tokio::test]
async fn level_up_grants_items_and_one_gift() {
    let app = spawn_app().await;

    let resp = app
        .post("/gamesessions/levels/Shadow/unchecked/150")
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 200);
    assert_eq!(body["profileId"], "athena");
    assert_eq!(body["profileRevision"], 2);
    assert_eq!(body["profileChangesBaseRevision"], 1);

    assert_eq!(*stat(&body, "level"), 2);
    assert_eq!(*stat(&body, "book_level"), 2);
    assert_eq!(*stat(&body, "xp"), 50);
    assert_eq!(*stat(&body, "accountLevel"), 2);
    assert!(changes(&body, "itemAdded").any(|c| c["itemId"] == "AthenaDance:eid_wave"));

    let athena = app.profile(ProfileId::Athena);
    assert_eq!(athena.rvn, 2);
    assert_eq!(athena.attributes().level, Some(2));
    assert_eq!(athena.attributes().past_seasons[0].season_xp, Some(50));
    assert!(athena.attributes().last_xp_interaction.is_some());

    let common_core = app.profile(ProfileId::CommonCore);
    assert_eq!(common_core.rvn, 2);
    assert_eq!(common_core.items[MTX_CURRENCY].quantity, 50);
    let gifts = &common_core.attributes().gifts;
    assert_eq!(gifts.len(), 1);
    assert_eq!(gifts[0].template_id, BATTLEPASS_GIFT_BOX);
    assert_eq!(gifts[0].attributes.loot_list.len(), 2);

    let sent = app.notifications.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, ACCOUNT_ID);
    assert_eq!(sent[0].1.kind, GIFT_RECEIVED);
}

#[tokio::test]
async fn xp_below_a_level_grants_nothing() {
    let app = spawn_app().await;

    let (status, body) = read(
        app.post("/gamesessions/levels/Shadow/s-1/40")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(*stat(&body, "xp"), 40);
    assert_eq!(*stat(&body, "level"), 1);

    assert_eq!(app.profile(ProfileId::CommonCore).rvn, 1);
    assert!(app.notifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn style_token_unlocks_variant_on_owned_outfit() {
    let app = spawn_app().await;

    let resp = app
        .post("/gamesessions/levels/Shadow/s-1/200")
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, 200);
    assert!(changes(&body, "itemAttrChanged").any(|c| c["itemId"] == DINO));

    let athena = app.profile(ProfileId::Athena);
    assert!(athena.items.contains_key(DINO_TOKEN));
    let variants = &athena.items[DINO].attributes.variants;
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0].channel, "Material");
    assert_eq!(variants[0].owned, vec!["Mat2"]);
}

#[tokio::test]
async fn other_season_is_a_quiet_noop() {
    let app = spawn_app().await;
    let mut athena = app.profile(ProfileId::Athena);
    athena.attributes_mut().past_seasons[0].season_number = SEASON - 1;
    app.save(&athena);

    for _ in 0..2 {
        let (status, body) = read(
            app.post("/gamesessions/levels/Shadow/s-1/500")
                .send()
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["profileRevision"], 1);
        assert_eq!(body["profileChanges"], json!([]));
    }

    assert_eq!(app.profile(ProfileId::Athena), athena);
    assert!(app.notifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn level_lookup_failures() {
    let app = spawn_app().await;

    let (status, err) = read(
        app.post("/gamesessions/levels/Nobody/s-1/100")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 404);
    assert_error(&err, NOT_FOUND, "User not found!");

    let (status, err) = read(
        app.post("/gamesessions/levels/Shadow/s-1/NaN")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(err["errorCode"], BAD_REQUEST);
}

#[tokio::test]
async fn level_store_failure_is_500() {
    let app = spawn_app().await;
    app.store.fail_writes(true);

    let (status, err) = read(
        app.post("/gamesessions/levels/Shadow/s-1/150")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 500);
    assert_error(
        &err,
        "errors.com.epicgames.common.server_error",
        "Internal Server Error",
    );
    assert!(app.notifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_grants_for_one_account_serialise() {
    let app = spawn_app().await;

    let requests = (0..10).map(|_| {
        app.post("/gamesessions/levels/Shadow/s-1/10")
            .send()
    });
    for resp in spawn_all(requests).await {
        assert_eq!(resp.unwrap().status(), 200);
    }

    let athena = app.profile(ProfileId::Athena);
    assert_eq!(athena.rvn, 11);
    let season = &athena.attributes().past_seasons[0];
    assert_eq!(season.season_level, Some(2));
    assert_eq!(season.season_xp, Some(0));
}

/// Drive every request concurrently on the test runtime.
async fn spawn_all<F, T>(futures: impl Iterator<Item = F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = futures.map(tokio::spawn).collect();
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use gamesessions::auth::basic_token;
use gamesessions::profile::{Item, MTX_CURRENCY};
use gamesessions::rewards::LevelRow;
use gamesessions::{
    router, Account, AppState, ClientCredential, Config, Grant, GrantTarget, InMemoryRecordStore,
    LogNotifier, PresenceMessage, Profile, ProfileId, Record, RecordStore, StaticSeasonTable,
    StoreError, TablesExt,
};
use gamesessions::store::Versioned;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;

pub const SEASON: u32 = 13;
pub const ACCOUNT_ID: &str = "acc-1";
pub const USERNAME: &str = "Shadow";
pub const DINO: &str = "AthenaCharacter:cid_dinohunter";
pub const DINO_TOKEN: &str = "CosmeticVariantToken:VTID_940_DinoHunter_StyleB";

/// In-memory store whose writes can be switched off mid-test.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryRecordStore,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("backend unavailable".into()));
        }
        Ok(())
    }
}

impl RecordStore for FlakyStore {
    fn get<R: Record>(&self, key: &str) -> Result<Option<Versioned<R>>, StoreError> {
        self.inner.get(key)
    }

    fn insert<R: Record>(&self, record: &R) -> Result<Versioned<R>, StoreError> {
        self.check()?;
        self.inner.insert(record)
    }

    fn upsert<R: Record>(&self, record: &R) -> Result<Versioned<R>, StoreError> {
        self.check()?;
        self.inner.upsert(record)
    }

    fn find<R: Record>(
        &self,
        predicate: &dyn Fn(&R) -> bool,
    ) -> Result<Vec<Versioned<R>>, StoreError> {
        self.inner.find(predicate)
    }
}

/// Four levels at 100 XP each. Level 2 drops an emote and 50 V-Bucks, level
/// 3 a DinoHunter style token, level 4 is the cap.
pub fn season_table() -> StaticSeasonTable {
    let row = |free: Vec<Grant>| LevelRow {
        xp_to_next: 100,
        free,
        paid: Vec::new(),
    };
    StaticSeasonTable {
        levels: vec![
            row(vec![]),
            row(vec![
                Grant::new(GrantTarget::Athena, "AthenaDance:eid_wave", 1),
                Grant::new(GrantTarget::CommonCore, MTX_CURRENCY, 50),
            ]),
            row(vec![Grant::new(GrantTarget::Athena, DINO_TOKEN, 1)]),
            LevelRow::default(),
        ],
    }
}

pub struct TestApp {
    pub base: String,
    pub client: reqwest::Client,
    pub store: FlakyStore,
    pub state: Arc<AppState<FlakyStore>>,
    pub notifications: Arc<Mutex<Vec<(String, PresenceMessage)>>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Authorised POST with a raw body.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", basic_token("gameserver", "hunter2"))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", basic_token("gameserver", "hunter2"))
    }

    pub fn profile(&self, profile_id: ProfileId) -> Profile {
        self.state
            .profiles
            .load(ACCOUNT_ID, profile_id)
            .unwrap()
            .unwrap()
    }

    pub fn save(&self, profile: &Profile) {
        self.store.table::<Profile>().upsert(profile).unwrap();
    }

    pub async fn register_session(&self, session_id: &str) {
        let resp = self
            .post("/gamesessions/create")
            .json(&serde_json::json!({
                "sessionId": session_id,
                "version": 13,
                "port": "7777",
                "address": "10.0.0.4",
                "identifier": "eu-1"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
}

pub fn config() -> Config {
    Config {
        current_season: SEASON,
        client_credentials: vec![ClientCredential {
            client_id: "gameserver".into(),
            secret: "hunter2".into(),
        }],
        ..Config::default()
    }
}

/// Start a server on port 0 with one seeded account owning the DinoHunter
/// outfit.
pub async fn spawn_app() -> TestApp {
    let store = FlakyStore::default();
    let notifications = Arc::new(Mutex::new(Vec::new()));
    let state = AppState::new(config(), store.clone())
        .with_season_table(Arc::new(season_table()))
        .with_notifier(Arc::new(LogNotifier::with_buffer(notifications.clone())));

    state
        .accounts
        .register(&Account::new(ACCOUNT_ID, USERNAME))
        .unwrap();
    state.profiles.ensure_defaults(ACCOUNT_ID, SEASON).unwrap();
    let mut athena = state.profiles.load(ACCOUNT_ID, ProfileId::Athena).unwrap().unwrap();
    athena.items.insert(DINO.into(), Item::new(DINO, 1));
    store.table::<Profile>().upsert(&athena).unwrap();

    let state = Arc::new(state);
    let app = router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        store,
        state,
        notifications,
    }
}

/// Status plus JSON body.
pub async fn read(resp: Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap();
    (status, body)
}

pub fn assert_error(body: &Value, code: &str, message: &str) {
    assert_eq!(body["errorCode"], code);
    assert_eq!(body["errorMessage"], message);
    assert_eq!(body["originatingService"], "gamesessions");
    assert_eq!(body["messageVars"].as_array().unwrap().len(), 2);
}

//! Integration tests for the INHELP backend.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::{AdminCredentials, ADMIN_PASSWORD_HEADER, ADMIN_USERNAME_HEADER};
use crate::config::Config;
use crate::db::{init_database, LocalSlots};
use crate::directory::Directory;
use crate::models::{seed_dataset, Dataset, Status};
use crate::moderation::MISSING_EVENT_CONTACT;
use crate::search::{LlmMatcher, Matcher, SearchDelegate, SEARCH_UNAVAILABLE};
use crate::store::{DocumentStore, RemoteEndpoint};
use crate::{create_router, AppState};

const ADMIN_USER: &str = "moderator";
const ADMIN_PASS: &str = "test-password";

/// Optional collaborators of a test server.
#[derive(Default)]
struct Setup {
    remote_url: Option<String>,
    matcher_url: Option<String>,
    dataset: Option<Dataset>,
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with(Setup::default()).await
    }

    async fn with(setup: Setup) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        let config = Config {
            db_path: db_path.clone(),
            remote_url: setup.remote_url,
            matcher_api_key: setup.matcher_url.as_ref().map(|_| "test-key".to_string()),
            matcher_base_url: setup.matcher_url.unwrap_or_default(),
            matcher_model: "test-model".to_string(),
            admin_username: ADMIN_USER.to_string(),
            admin_password: ADMIN_PASS.to_string(),
            http_timeout: Duration::from_secs(2),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
        };

        // Initialize local fallback, optionally pre-filled
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let slots = LocalSlots::new(pool);
        if let Some(dataset) = &setup.dataset {
            slots.save_dataset(dataset).await.expect("Failed to save dataset");
        }

        let remote = config
            .remote_url
            .as_ref()
            .map(|url| RemoteEndpoint::new(url.clone(), config.http_timeout).unwrap());
        let directory = Directory::open(DocumentStore::new(remote, slots)).await;

        let matcher = LlmMatcher::from_config(&config)
            .unwrap()
            .map(|m| Arc::new(m) as Arc<dyn Matcher>);

        let state = AppState {
            directory: Arc::new(directory),
            search: SearchDelegate::new(matcher),
            credentials: AdminCredentials::new(ADMIN_USER, ADMIN_PASS),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn admin(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(ADMIN_USERNAME_HEADER, ADMIN_USER)
            .header(ADMIN_PASSWORD_HEADER, ADMIN_PASS)
    }

    async fn get_json(&self, path: &str) -> Value {
        self.client
            .get(self.url(path))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn datastore(&self) -> Value {
        self.get_json("/api/datastore").await["data"].clone()
    }
}

fn ids(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

fn help_submission(contacts: &str) -> Value {
    json!({
        "kind": "help",
        "orgName": "Волонтёры района",
        "helpType": "Бытовая помощь",
        "description": "Помощь с покупками",
        "district": "ЮАО",
        "contacts": contacts,
        "conditions": "По записи"
    })
}

fn completion(content: Value) -> Value {
    json!({
        "choices": [{ "message": { "content": content.to_string() } }]
    })
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_remote_down_serves_seed() {
    let fixture = TestFixture::with(Setup {
        remote_url: Some("http://127.0.0.1:9".to_string()),
        ..Setup::default()
    })
    .await;

    let body = fixture.get_json("/api/datastore").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["revisionId"], 0);
    assert_eq!(body["data"], serde_json::to_value(seed_dataset()).unwrap());
}

#[tokio::test]
async fn test_admin_routes_require_credentials() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/admin/requests"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let resp = fixture
        .client
        .delete(fixture.url("/api/admin/event/e1"))
        .header(ADMIN_USERNAME_HEADER, ADMIN_USER)
        .header(ADMIN_PASSWORD_HEADER, "wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Nothing was deleted
    assert_eq!(ids(&fixture.datastore().await["events"]).len(), 5);
}

#[tokio::test]
async fn test_login() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/admin/login"))
        .json(&json!({ "username": ADMIN_USER, "password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["message"], "Неверный логин или пароль");

    let resp = fixture
        .client
        .post(fixture.url("/api/admin/login"))
        .json(&json!({ "username": ADMIN_USER, "password": ADMIN_PASS }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["admin"], true);
}

#[tokio::test]
async fn test_help_submission_without_contacts_is_rejected() {
    let fixture = TestFixture::new().await;
    let before = fixture.datastore().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/submissions"))
        .json(&help_submission("   "))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["revisionId"], 0);

    assert_eq!(fixture.datastore().await, before);
}

#[tokio::test]
async fn test_event_submission_needs_link_or_phone() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/submissions"))
        .json(&json!({
            "kind": "event",
            "title": "Настольные игры",
            "date": "2023-11-02",
            "time": "18:00",
            "location": "Библиотека №5",
            "district": "САО",
            "description": "Вечер настольных игр",
            "registrationLink": " ",
            "contactPhone": ""
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["message"], MISSING_EVENT_CONTACT);
}

#[tokio::test]
async fn test_submission_waits_for_moderation() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/submissions"))
        .json(&help_submission("+7 900 000-00-00"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["revisionId"], 1);
    assert_eq!(body["data"]["record"]["status"], "pending");
    assert_eq!(
        body["data"]["message"],
        "Спасибо! Ваша заявка отправлена на модерацию."
    );
    let id = body["data"]["record"]["id"].as_str().unwrap().to_string();

    // Hidden from the public listing
    let listing = fixture.get_json("/api/help").await;
    assert!(!ids(&listing["data"]["items"]).contains(&id));

    // Listed for the moderator
    let requests: Value = fixture
        .admin(fixture.client.get(fixture.url("/api/admin/requests")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(requests["data"]["pendingCount"], 1);
    assert_eq!(ids(&requests["data"]["help"]), vec![id.clone()]);

    // Approve and it becomes visible
    let resp = fixture
        .admin(
            fixture
                .client
                .post(fixture.url(&format!("/api/admin/help/{}/approve", id))),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["revisionId"], 2);

    let listing = fixture.get_json("/api/help?region=ЮАО").await;
    assert!(ids(&listing["data"]["items"]).contains(&id));
}

#[tokio::test]
async fn test_approve_pending_event_e9() {
    let mut dataset = seed_dataset();
    let mut pending = dataset.events[0].clone();
    pending.id = "e9".to_string();
    pending.status = Status::Pending;
    dataset.events.push(pending);

    let fixture = TestFixture::with(Setup {
        dataset: Some(dataset),
        ..Setup::default()
    })
    .await;

    let resp = fixture
        .admin(fixture.client.post(fixture.url("/api/admin/event/e9/approve")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let events = fixture.datastore().await["events"].clone();
    let events = events.as_array().unwrap();
    let e9: Vec<&Value> = events.iter().filter(|e| e["id"] == "e9").collect();
    assert_eq!(e9.len(), 1);
    assert_eq!(e9[0]["status"], "approved");
    assert!(events.iter().all(|e| e["status"] == "approved"));
}

#[tokio::test]
async fn test_approve_unknown_record_is_not_found() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .admin(fixture.client.post(fixture.url("/api/admin/help/h99/approve")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_absent_event_succeeds() {
    let mut dataset = seed_dataset();
    dataset.events.retain(|e| e.id != "e3");
    let fixture = TestFixture::with(Setup {
        dataset: Some(dataset.clone()),
        ..Setup::default()
    })
    .await;

    let resp = fixture
        .admin(fixture.client.delete(fixture.url("/api/admin/event/e3")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    assert_eq!(
        fixture.datastore().await,
        serde_json::to_value(dataset).unwrap()
    );
}

#[tokio::test]
async fn test_admin_create_is_published() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .admin(fixture.client.post(fixture.url("/api/admin/records")))
        .json(&help_submission("help@example.ru"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "approved");

    let listing = fixture.get_json("/api/help").await;
    assert_eq!(ids(&listing["data"]["items"]).len(), 6);
}

#[tokio::test]
async fn test_region_filter_keeps_all_regions_help() {
    let fixture = TestFixture::new().await;

    let listing = fixture.get_json("/api/help?region=СВАО").await;
    assert_eq!(ids(&listing["data"]["items"]), vec!["h1", "h5"]);

    let listing = fixture.get_json("/api/events?region=САО").await;
    assert_eq!(ids(&listing["data"]["items"]), vec!["e1", "e4"]);

    let resp = fixture
        .client
        .get(fixture.url("/api/events?region=Марс"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_search_wheelchair_finds_workshop() {
    let matcher = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "relevantEventIds": [],
            "relevantHelpIds": ["h5"],
            "reasoning": "Мастерская ремонтирует коляски."
        }))))
        .mount(&matcher)
        .await;

    let mut dataset = seed_dataset();
    dataset.events[1].status = Status::Pending;

    let fixture = TestFixture::with(Setup {
        matcher_url: Some(matcher.uri()),
        dataset: Some(dataset),
        ..Setup::default()
    })
    .await;

    let resp = fixture
        .client
        .post(fixture.url("/api/search"))
        .json(&json!({ "query": "коляска" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let data = &body["data"];

    assert_eq!(data["helpIds"], json!(["h5"]));
    assert_eq!(data["suggestedView"], "help");
    assert!(ids(&data["events"]).is_empty());
    assert_eq!(ids(&data["help"]), vec!["h5"]);

    // The pending event never reached the matcher
    let requests = matcher.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(sent.contains("Движение"));
    assert!(!sent.contains("Купеческая"));
}

#[tokio::test]
async fn test_search_without_matcher_degrades() {
    let fixture = TestFixture::new().await;

    let body: Value = fixture
        .client
        .post(fixture.url("/api/search"))
        .json(&json!({ "query": "юрист" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["reasoning"], SEARCH_UNAVAILABLE);
    assert_eq!(body["data"]["eventIds"], json!([]));
    assert!(body["data"].get("suggestedView").is_none());

    // A blank query is a no-op
    let body: Value = fixture
        .client
        .post(fixture.url("/api/search"))
        .json(&json!({ "query": "  " }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["data"].get("reasoning").is_none());
    assert_eq!(ids(&body["data"]["events"]).len(), 5);
}

#[tokio::test]
async fn test_sync_without_remote_fails() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .admin(fixture.client.post(fixture.url("/api/admin/sync")))
        .json(&json!({ "seed": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "SYNC_FAILED");
    assert_eq!(body["error"]["details"]["itemCount"], 10);
}

#[tokio::test]
async fn test_sync_pushes_current_dataset() {
    let remote = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&remote)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&remote)
        .await;

    let fixture = TestFixture::with(Setup {
        remote_url: Some(remote.uri()),
        ..Setup::default()
    })
    .await;

    let resp = fixture
        .admin(fixture.client.post(fixture.url("/api/admin/sync")))
        .json(&json!({ "seed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["itemCount"], 10);
    // The directory was not empty, so the current dataset went out
    assert_eq!(body["data"]["seeded"], false);

    let requests = remote.received_requests().await.unwrap();
    let pushed: Value = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap();
    assert_eq!(pushed, serde_json::to_value(seed_dataset()).unwrap());
}

#[tokio::test]
async fn test_withdraw_pending_submission() {
    let fixture = TestFixture::new().await;

    let body: Value = fixture
        .client
        .post(fixture.url("/api/submissions"))
        .json(&help_submission("+7 900 000-00-00"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = body["data"]["record"]["id"].as_str().unwrap().to_string();

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/submissions/help/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Published records cannot be withdrawn publicly
    let resp = fixture
        .client
        .delete(fixture.url("/api/submissions/help/h1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    assert_eq!(ids(&fixture.datastore().await["help"]).len(), 5);
}

#[tokio::test]
async fn test_drafts_open_the_form() {
    let fixture = TestFixture::new().await;

    let body = fixture.get_json("/api/submissions/draft/help").await;
    assert_eq!(body["data"]["kind"], "help");
    assert_eq!(body["data"]["district"], "Онлайн");
    assert_eq!(body["data"]["isFree"], true);

    let body: Value = fixture
        .admin(fixture.client.get(fixture.url("/api/admin/event/e2/draft")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["kind"], "event");
    assert_eq!(body["data"]["id"], "e2");
    assert_eq!(body["data"]["status"], "approved");

    let resp = fixture
        .admin(fixture.client.get(fixture.url("/api/admin/event/e42/draft")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

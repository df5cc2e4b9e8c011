use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use mediawish::config::Config;
use mediawish::error::NotifyError;
use mediawish::notifier::Notifier;
use mediawish::server::router::{WishlistState, wishlist_router};
use mediawish::store::{NotificationConfig, Stores, WishlistEntry, notify_config, wishlist};
use serde_json::{Value, json};
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_added(
        &self,
        config: &NotificationConfig,
        entry: &WishlistEntry,
    ) -> Result<(), NotifyError> {
        self.sent.lock().expect("poisoned").push((
            config.account.clone().unwrap_or_default(),
            entry.title.clone(),
        ));
        Ok(())
    }
}

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify_added(
        &self,
        _config: &NotificationConfig,
        _entry: &WishlistEntry,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured)
    }
}

fn temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "mediawish-routes-{}-{}-{}",
        tag,
        std::process::id(),
        nanos
    ));
    dir
}

async fn spawn_state(tag: &str, admin_password: Option<&str>) -> (WishlistState, PathBuf) {
    let dir = temp_dir(tag);
    let mut cfg = Config::default();
    cfg.basic.data_dir = dir.clone();
    cfg.basic.admin_password = admin_password.map(str::to_string);

    let stores = Stores {
        wishlist: wishlist::spawn(cfg.wishlist_path())
            .await
            .expect("spawn wishlist actor"),
        notify_config: notify_config::spawn(cfg.notify_config_path())
            .await
            .expect("spawn notify config actor"),
    };
    let state = WishlistState::new(stores, &cfg).expect("build state");
    (state, dir)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn list_request() -> Request<Body> {
    Request::builder()
        .uri("/api/wishlist")
        .body(Body::empty())
        .expect("failed to build request")
}

async fn add(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, json_request("POST", "/api/wishlist", body)).await
}

#[tokio::test]
async fn add_list_and_duplicate() {
    let (state, dir) = spawn_state("add", Some("pwd")).await;
    let app = wishlist_router(state);

    let (status, body) = send(&app, list_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = add(
        &app,
        json!({ "tmdbId": 42, "title": "X", "mediaType": "movie", "imdbId": "tt0000042" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["catalogId"], 42);
    assert_eq!(body["externalId"], "tt0000042");
    assert!(body["createdAt"].is_string());

    let (status, body) = add(
        &app,
        json!({ "catalogId": "42", "title": "X", "mediaType": "series" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = add(
        &app,
        json!({
            "catalogId": 7,
            "title": "Same imdb",
            "mediaType": "tv",
            "externalId": "tt0000042"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());

    let (_, body) = send(&app, list_request()).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn add_rejects_missing_fields_and_bad_json() {
    let (state, dir) = spawn_state("add-bad", Some("pwd")).await;
    let app = wishlist_router(state);

    let (status, body) = add(&app, json!({ "title": "No id", "mediaType": "movie" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = add(&app, json!({ "catalogId": 1, "mediaType": "movie" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = add(&app, json!({ "catalogId": 1, "title": "T", "mediaType": "book" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/wishlist")
            .header("content-type", "application/json")
            .body(Body::from("not-json"))
            .expect("failed to build request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/wishlist")
            .body(Body::from(r#"{"catalogId":1,"title":"T","mediaType":"movie"}"#))
            .expect("failed to build request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn admin_checks_run_in_order_and_block_mutation() {
    let (state, dir) = spawn_state("admin", Some("pwd")).await;
    let app = wishlist_router(state);

    add(&app, json!({ "catalogId": 1, "title": "One", "mediaType": "movie" })).await;
    add(&app, json!({ "catalogId": 2, "title": "Two", "mediaType": "movie" })).await;

    // Missing password -> 400, even with empty ids.
    let (status, _) = send(
        &app,
        json_request("DELETE", "/api/wishlist", json!({ "ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Wrong password -> 403 before ids are validated.
    let (status, body) = send(
        &app,
        json_request("DELETE", "/api/wishlist", json!({ "ids": [], "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = send(
        &app,
        json_request("POST", "/api/wishlist/clear", json!({ "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        json_request("DELETE", "/api/wishlist/1", json!({ "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Nothing was removed.
    let (_, body) = send(&app, list_request()).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    // Correct password, empty ids -> 400.
    let (status, _) = send(
        &app,
        json_request("DELETE", "/api/wishlist", json!({ "ids": [], "password": "pwd" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn numeric_passwords_are_compared_as_text() {
    let (state, dir) = spawn_state("numeric", Some("123456")).await;
    let app = wishlist_router(state);

    add(&app, json!({ "catalogId": 1, "title": "One", "mediaType": "movie" })).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/wishlist/clear", json!({ "password": 654321 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = send(
        &app,
        json_request("POST", "/api/wishlist/clear", json!({ "password": true })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send(&app, list_request()).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = send(
        &app,
        json_request("POST", "/api/wishlist/clear", json!({ "password": 123456 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Wishlist cleared.");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn admin_routes_answer_500_without_server_password() {
    let (state, dir) = spawn_state("no-admin", None).await;
    let app = wishlist_router(state);

    let (status, body) = send(
        &app,
        json_request("POST", "/api/wishlist/clear", json!({ "password": "anything" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "SERVER_MISCONFIGURED");

    // Misconfiguration is reported before the body is even parsed.
    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/wishlist")
            .header("content-type", "application/json")
            .body(Body::from("not-json"))
            .expect("failed to build request"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn remove_one_many_and_clear() {
    let (state, dir) = spawn_state("remove", Some("pwd")).await;
    let app = wishlist_router(state);

    for (id, title) in [(1, "One"), (2, "Two"), (3, "Three")] {
        let (status, _) = add(
            &app,
            json!({ "catalogId": id, "title": title, "mediaType": "movie" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        json_request("DELETE", "/api/wishlist/1", json!({ "password": "pwd" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item removed.");

    let (status, _) = send(
        &app,
        json_request("DELETE", "/api/wishlist/1", json!({ "password": "pwd" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        json_request(
            "DELETE",
            "/api/wishlist",
            json!({ "ids": ["2", 99], "password": "pwd" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);

    let (status, _) = send(
        &app,
        json_request("DELETE", "/api/wishlist", json!({ "ids": [2], "password": "pwd" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        json_request("POST", "/api/wishlist/clear", json!({ "password": "pwd" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Wishlist cleared.");

    let (_, body) = send(&app, list_request()).await;
    assert_eq!(body, json!([]));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn stage_route_updates_lifecycle() {
    let (state, dir) = spawn_state("stage", Some("pwd")).await;
    let app = wishlist_router(state);

    add(&app, json!({ "catalogId": 603, "title": "The Matrix", "mediaType": "movie" })).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/wishlist/603/stage",
            json!({ "stage": "on_hold", "password": "pwd" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["onHoldAt"].is_string());
    assert!(body.get("addedAt").is_none());

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/wishlist/603/stage",
            json!({ "stage": "archived", "password": "pwd" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/wishlist/603/stage",
            json!({ "stage": "archived", "password": "nope" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/wishlist/404/stage",
            json!({ "stage": "added", "password": "pwd" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn successful_add_dispatches_notifier_when_configured() {
    let (state, dir) = spawn_state("notify", Some("pwd")).await;
    state
        .notify_config
        .write(Some("me@example.com".into()), Some("secret".into()))
        .await
        .expect("configure notifications");

    let recorder = Arc::new(RecordingNotifier::default());
    let app = wishlist_router(state.with_notifier(recorder.clone()));

    let (status, _) = add(
        &app,
        json!({ "catalogId": 550, "title": "Fight Club", "mediaType": "movie" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Duplicates are not announced.
    let (status, _) = add(
        &app,
        json!({ "catalogId": 550, "title": "Fight Club", "mediaType": "movie" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let mut sent = Vec::new();
    for _ in 0..50 {
        sent = recorder.sent.lock().expect("poisoned").clone();
        if !sent.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(
        sent,
        vec![("me@example.com".to_string(), "Fight Club".to_string())]
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn notifier_is_skipped_when_unconfigured_and_failures_do_not_leak() {
    let (state, dir) = spawn_state("notify-skip", Some("pwd")).await;

    let recorder = Arc::new(RecordingNotifier::default());
    let app = wishlist_router(state.clone().with_notifier(recorder.clone()));
    let (status, _) = add(
        &app,
        json!({ "catalogId": 1, "title": "One", "mediaType": "movie" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(recorder.sent.lock().expect("poisoned").is_empty());

    state
        .notify_config
        .write(Some("me@example.com".into()), Some("secret".into()))
        .await
        .expect("configure notifications");
    let app = wishlist_router(state.with_notifier(Arc::new(FailingNotifier)));
    let (status, body) = add(
        &app,
        json!({ "catalogId": 2, "title": "Two", "mediaType": "movie" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Two");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn unknown_routes_and_request_ids() {
    let (state, dir) = spawn_state("misc", Some("pwd")).await;
    let app = wishlist_router(state);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-123")
    );

    let _ = std::fs::remove_dir_all(&dir);
}

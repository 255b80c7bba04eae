use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use syncboard::config::Config;
use tower::ServiceExt;

/// Default API key seeded by migration (must match m20240101_initial.rs)
const DEFAULT_API_KEY: &str = "syncboard_default_api_key_please_regenerate";

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("syncboard-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = syncboard::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    syncboard::api::router(state).await
}

fn get(uri: &str, api_key: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Api-Key", api_key)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, api_key: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Api-Key", api_key)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Public (pre-auth) JSON request, e.g. register/login
fn public_json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_auth_gate() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/tasks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/tasks", "wrong-key"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/tasks", DEFAULT_API_KEY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_login() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "correct-horse"
    });

    let response = app
        .clone()
        .oneshot(public_json_request("POST", "/api/auth/register", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let api_key = body["data"]["api_key"].as_str().unwrap().to_string();
    assert!(!api_key.is_empty());
    assert_eq!(body["data"]["user"]["username"], "alice");

    // The freshly issued bearer credential authenticates requests
    let response = app
        .clone()
        .oneshot(get("/api/users", &api_key))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let usernames: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert!(usernames.contains(&"admin"));
    assert!(usernames.contains(&"alice"));

    // Duplicate registration is rejected
    let response = app
        .clone()
        .oneshot(public_json_request("POST", "/api/auth/register", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Login round-trip
    let response = app
        .clone()
        .oneshot(public_json_request(
            "POST",
            "/api/auth/login",
            &serde_json::json!({"username": "alice", "password": "correct-horse"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(public_json_request(
            "POST",
            "/api/auth/login",
            &serde_json::json!({"username": "alice", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_task_lifecycle_and_conflict() {
    let app = spawn_app().await;

    // Create: version 1, status Todo, creator resolved
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tasks",
            DEFAULT_API_KEY,
            &serde_json::json!({"title": "Design spec", "priority": "High"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let task_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["version"], 1);
    assert_eq!(body["data"]["status"], "Todo");
    assert_eq!(body["data"]["priority"], "High");
    assert_eq!(body["data"]["creator"]["username"], "admin");

    // Move to In Progress against version 1
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tasks/{task_id}"),
            DEFAULT_API_KEY,
            &serde_json::json!({"status": "In Progress", "version": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["data"]["status"], "In Progress");

    // A stale writer carrying version 1 gets a conflict with the
    // authoritative record, and no mutation happens
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tasks/{task_id}"),
            DEFAULT_API_KEY,
            &serde_json::json!({"status": "Done", "version": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["conflict"], true);
    assert_eq!(body["current_task"]["version"], 2);
    assert_eq!(body["current_task"]["status"], "In Progress");

    // Resubmitting against the fresh version succeeds
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tasks/{task_id}"),
            DEFAULT_API_KEY,
            &serde_json::json!({"status": "Done", "version": 2}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["version"], 3);
    assert_eq!(body["data"]["status"], "Done");

    // Unknown task id
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/tasks/99999",
            DEFAULT_API_KEY,
            &serde_json::json!({"title": "Ghost"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_title_validation() {
    let app = spawn_app().await;

    for reserved in ["Todo", "todo", "In Progress", "DONE"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/tasks",
                DEFAULT_API_KEY,
                &serde_json::json!({"title": reserved}),
            ))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "reserved title {reserved:?} must be rejected"
        );
    }

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tasks",
            DEFAULT_API_KEY,
            &serde_json::json!({"title": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tasks",
            DEFAULT_API_KEY,
            &serde_json::json!({"title": "Ship it"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let task_id = body["data"]["id"].as_i64().unwrap();

    // Duplicate title
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tasks",
            DEFAULT_API_KEY,
            &serde_json::json!({"title": "Ship it"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Renaming a task to its own current title succeeds
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tasks/{task_id}"),
            DEFAULT_API_KEY,
            &serde_json::json!({"title": "Ship it", "version": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Renaming to a reserved name fails
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tasks/{task_id}"),
            DEFAULT_API_KEY,
            &serde_json::json!({"title": "in progress", "version": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_keeps_action_log() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tasks",
            DEFAULT_API_KEY,
            &serde_json::json!({"title": "Doomed"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let task_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/tasks/{task_id}"),
            DEFAULT_API_KEY,
            &serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/tasks", DEFAULT_API_KEY))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|t| t["id"].as_i64().unwrap() != task_id)
    );

    // The log keeps both entries, newest first
    let response = app
        .clone()
        .oneshot(get("/api/actions", DEFAULT_API_KEY))
        .await
        .unwrap();
    let body = body_json(response).await;
    let actions = body["data"].as_array().unwrap();
    assert_eq!(actions[0]["kind"], "Deleted");
    assert_eq!(actions[0]["details"], "Deleted task: Doomed");
    assert_eq!(actions[1]["kind"], "Created");
}

#[tokio::test]
async fn test_actions_limit() {
    let app = spawn_app().await;

    for i in 0..3 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/tasks",
                DEFAULT_API_KEY,
                &serde_json::json!({"title": format!("Task {i}")}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get("/api/actions?limit=2", DEFAULT_API_KEY))
        .await
        .unwrap();
    let body = body_json(response).await;
    let actions = body["data"].as_array().unwrap();
    assert_eq!(actions.len(), 2);
    assert!(actions[0]["id"].as_i64().unwrap() > actions[1]["id"].as_i64().unwrap());
}

#[tokio::test]
async fn test_smart_assign_endpoint() {
    let app = spawn_app().await;

    let mut user_ids = vec![1]; // seeded admin
    for name in ["bob", "carol"] {
        let response = app
            .clone()
            .oneshot(public_json_request(
                "POST",
                "/api/auth/register",
                &serde_json::json!({
                    "username": name,
                    "email": format!("{name}@example.com"),
                    "password": "password123"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        user_ids.push(body["data"]["user"]["id"].as_i64().unwrap());
    }

    // Load: admin carries two active tasks, bob one, carol none
    for (title, assignee) in [
        ("Alpha", user_ids[0]),
        ("Beta", user_ids[0]),
        ("Gamma", user_ids[1]),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/tasks",
                DEFAULT_API_KEY,
                &serde_json::json!({"title": title, "assignee_id": assignee}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tasks",
            DEFAULT_API_KEY,
            &serde_json::json!({"title": "Unassigned"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let task_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/tasks/{task_id}/smart-assign"),
            DEFAULT_API_KEY,
            &serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["assignee"]["username"], "carol");
    assert_eq!(body["data"]["version"], 2);
}

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticketsmith::api::{build_router, AppState};

use super::{chat_body, tags_body, test_config, UNREACHABLE_HOST};

fn router(ollama_host: &str, jira_base_url: &str) -> Router {
    build_router(AppState::new(test_config(ollama_host, jira_base_url)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn ollama_with_chat(content: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tags_body(&["gemma3:27b"])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(content)))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_index_serves_client_page() {
    let app = router(UNREACHABLE_HOST, UNREACHABLE_HOST);
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("ticketForm"));
}

#[tokio::test]
async fn test_health_when_ollama_unreachable() {
    let app = router(UNREACHABLE_HOST, UNREACHABLE_HOST);
    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["ollama_host"], UNREACHABLE_HOST);
    assert_eq!(body["default_model"], "gemma3:27b");
    assert_eq!(body["model_available"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_health_when_model_installed() {
    let ollama = ollama_with_chat("{}").await;
    let app = router(&ollama.uri(), UNREACHABLE_HOST);
    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_available"], true);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_preview_success() {
    let ollama = ollama_with_chat(
        r#"{"summary": "Add dark mode toggle", "description": "Provide a settings toggle for a dark theme."}"#,
    )
    .await;
    let app = router(&ollama.uri(), UNREACHABLE_HOST);

    let (status, body) = send(
        app,
        post_json(
            "/preview-ticket",
            serde_json::json!({ "username": "ab12", "prompt": "Add dark mode toggle" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["generated_content"]["summary"], "Add dark mode toggle");
    assert_eq!(
        body["generated_content"]["description"],
        "Provide a settings toggle for a dark theme."
    );
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_preview_malformed_output_is_500() {
    let ollama = ollama_with_chat("this is not json").await;
    let app = router(&ollama.uri(), UNREACHABLE_HOST);

    let (status, body) = send(
        app,
        post_json(
            "/preview-ticket",
            serde_json::json!({ "username": "ab12", "prompt": "Add dark mode toggle" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Failed to parse Ollama response:"));
    assert!(detail.contains("expected"));
}

#[tokio::test]
async fn test_preview_unreachable_is_soft_failure() {
    let app = router(UNREACHABLE_HOST, UNREACHABLE_HOST);
    let (status, body) = send(
        app,
        post_json(
            "/preview-ticket",
            serde_json::json!({ "username": "ab12", "prompt": "Add dark mode toggle" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["generated_content"].is_null());
    assert!(body["error"].as_str().unwrap().contains("unreachable"));
}

#[tokio::test]
async fn test_preview_missing_model_is_soft_failure() {
    let ollama = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tags_body(&["llama3:8b"])))
        .mount(&ollama)
        .await;
    let app = router(&ollama.uri(), UNREACHABLE_HOST);

    let (status, body) = send(
        app,
        post_json(
            "/preview-ticket",
            serde_json::json!({ "username": "ab12", "prompt": "Add dark mode toggle" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Model gemma3:27b is not available on the Ollama server. Please ensure the model is installed."
    );
}

#[tokio::test]
async fn test_preview_without_prompt_is_rejected() {
    let app = router(UNREACHABLE_HOST, UNREACHABLE_HOST);
    let response = app
        .oneshot(post_json(
            "/preview-ticket",
            serde_json::json!({ "username": "ab12" }),
        ))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_create_ticket_end_to_end() {
    let jira = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .and(body_partial_json(serde_json::json!({
            "fields": {
                "project": { "id": "14202" },
                "issuetype": { "id": "10002" },
                "customfield_10110": "HI-229",
                "assignee": { "name": "ab12" },
                "reporter": { "name": "ab12" }
            }
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "key": "HSS-12" })),
        )
        .expect(1)
        .mount(&jira)
        .await;
    let app = router(UNREACHABLE_HOST, &jira.uri());

    let (status, body) = send(
        app,
        post_json(
            "/create-ticket",
            serde_json::json!({
                "username": "ab12",
                "project": "HSS",
                "summary": "Add dark mode toggle",
                "description": "Provide a settings toggle for a dark theme."
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["jira_key"], "HSS-12");
    assert_eq!(body["jira_url"], format!("{}/browse/HSS-12", jira.uri()));
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_create_story_for_admin() {
    let jira = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .and(body_partial_json(serde_json::json!({
            "fields": {
                "project": { "id": "14101" },
                "issuetype": { "id": "10001" },
                "customfield_10110": null
            }
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "key": "HI-300" })),
        )
        .expect(1)
        .mount(&jira)
        .await;
    let app = router(UNREACHABLE_HOST, &jira.uri());

    let (_, body) = send(
        app,
        post_json(
            "/create-ticket",
            serde_json::json!({
                "username": "ab12",
                "summary": "As a user, I want dark mode so that my eyes rest",
                "description": "Acceptance criteria",
                "softpackAdmin": true,
                "userStory": true
            }),
        ),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["jira_key"], "HI-300");
}

#[tokio::test]
async fn test_create_ticket_tracker_error_is_soft_failure() {
    let jira = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&jira)
        .await;
    let app = router(UNREACHABLE_HOST, &jira.uri());

    let (status, body) = send(
        app,
        post_json(
            "/create-ticket",
            serde_json::json!({
                "username": "ab12",
                "summary": "Add dark mode toggle",
                "description": "Details"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["jira_key"].is_null());
    assert!(body["jira_url"].is_null());
    assert!(body["error"].as_str().unwrap().contains("401"));
}

//! Handler tests for the Tasks domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! They exercise only the tasks domain router over an in-memory
//! repository, not the full application.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_tasks::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

fn test_app() -> (axum::Router, TaskService<InMemoryTaskRepository>) {
    let repo = InMemoryTaskRepository::new();
    let service = TaskService::new(repo);
    (handlers::router(service.clone()), service)
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn patch_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_create_task_returns_201() {
    let (app, _service) = test_app();

    let response = app
        .oneshot(post_json(
            "/",
            json!({"user_id": Uuid::now_v7(), "text": "write tests"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let task: TaskResponse = json_body(response.into_body()).await;
    assert_eq!(task.text, "write tests");
    assert!(!task.is_done);
    assert!(!task.id.is_nil());
}

#[tokio::test]
async fn test_create_task_rejects_blank_text() {
    let (app, _service) = test_app();

    let response = app
        .oneshot(post_json(
            "/",
            json!({"user_id": Uuid::now_v7(), "text": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_task_rejects_nil_user_id() {
    let (app, _service) = test_app();

    let response = app
        .oneshot(post_json(
            "/",
            json!({"user_id": Uuid::nil(), "text": "orphan task"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_tasks_returns_created_tasks() {
    let (app, service) = test_app();

    let user_id = Uuid::now_v7();
    for text in ["first", "second"] {
        service
            .create_task(CreateTask {
                user_id,
                text: text.to_string(),
                is_done: false,
            })
            .await
            .unwrap();
    }

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let tasks: Vec<TaskResponse> = json_body(response.into_body()).await;
    assert_eq!(tasks.len(), 2);
}

#[tokio::test]
async fn test_update_task_patches_single_field() {
    let (app, service) = test_app();

    let task = service
        .create_task(CreateTask {
            user_id: Uuid::now_v7(),
            text: "unfinished".to_string(),
            is_done: false,
        })
        .await
        .unwrap();

    let response = app
        .oneshot(patch_json(
            &format!("/{}", task.id),
            json!({"is_done": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let updated: TaskResponse = json_body(response.into_body()).await;
    assert!(updated.is_done);
    assert_eq!(updated.text, "unfinished");
}

#[tokio::test]
async fn test_update_task_reassigns_owner() {
    let (app, service) = test_app();

    let task = service
        .create_task(CreateTask {
            user_id: Uuid::now_v7(),
            text: "handed over".to_string(),
            is_done: false,
        })
        .await
        .unwrap();

    let new_owner = Uuid::now_v7();
    let response = app
        .oneshot(patch_json(
            &format!("/{}", task.id),
            json!({"user_id": new_owner}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let updated: TaskResponse = json_body(response.into_body()).await;
    assert_eq!(updated.user_id, new_owner);
}

#[tokio::test]
async fn test_update_task_rejects_nil_user_id() {
    let (app, service) = test_app();

    let task = service
        .create_task(CreateTask {
            user_id: Uuid::now_v7(),
            text: "keeps its owner".to_string(),
            is_done: false,
        })
        .await
        .unwrap();

    let response = app
        .oneshot(patch_json(
            &format!("/{}", task.id),
            json!({"user_id": Uuid::nil()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_task_rejects_empty_payload() {
    let (app, service) = test_app();

    let task = service
        .create_task(CreateTask {
            user_id: Uuid::now_v7(),
            text: "something".to_string(),
            is_done: false,
        })
        .await
        .unwrap();

    let response = app
        .oneshot(patch_json(&format!("/{}", task.id), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_task_returns_404() {
    let (app, _service) = test_app();

    let response = app
        .oneshot(patch_json(
            &format!("/{}", Uuid::now_v7()),
            json!({"is_done": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_task_returns_204_then_404() {
    let (app, service) = test_app();

    let task = service
        .create_task(CreateTask {
            user_id: Uuid::now_v7(),
            text: "short lived".to_string(),
            is_done: false,
        })
        .await
        .unwrap();

    let delete = |id: Uuid| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/{}", id))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete(task.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Deleting again finds nothing live
    let response = app.oneshot(delete(task.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_uuid_in_path_returns_400() {
    let (app, _service) = test_app();

    let request = Request::builder()
        .method("DELETE")
        .uri("/not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

//! Handler tests for the Users domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! They exercise only the users domain router over in-memory
//! repositories, not the full application.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_tasks::{CreateTask, InMemoryTaskRepository, TaskRepository, TaskResponse};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

type TestService = UserService<InMemoryUserRepository, InMemoryTaskRepository>;

fn test_app() -> (axum::Router, TestService, InMemoryTaskRepository) {
    let task_repo = InMemoryTaskRepository::new();
    let service = UserService::new(InMemoryUserRepository::new(), task_repo.clone());
    (handlers::router(service.clone()), service, task_repo)
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
async fn test_create_user_returns_201_without_password_hash() {
    let (app, _service, _tasks) = test_app();

    let response = app
        .oneshot(post_json(
            "/",
            json!({"email": "person@example.com", "password": "hunter2!"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let raw: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(raw["email"], "person@example.com");
    assert!(raw.get("password_hash").is_none());
    assert!(raw.get("password").is_none());
}

#[tokio::test]
async fn test_create_user_rejects_invalid_email() {
    let (app, _service, _tasks) = test_app();

    let response = app
        .oneshot(post_json(
            "/",
            json!({"email": "nope", "password": "hunter2!"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_duplicate_email_returns_409() {
    let (app, service, _tasks) = test_app();

    service
        .create_user(CreateUser {
            email: "taken@example.com".to_string(),
            password: "hunter2!".to_string(),
        })
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/",
            json!({"email": "taken@example.com", "password": "other-password"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_users_returns_created_users() {
    let (app, service, _tasks) = test_app();

    for email in ["a@example.com", "b@example.com"] {
        service
            .create_user(CreateUser {
                email: email.to_string(),
                password: "hunter2!".to_string(),
            })
            .await
            .unwrap();
    }

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let users: Vec<UserResponse> = json_body(response.into_body()).await;
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn test_update_user_rejects_empty_payload() {
    let (app, service, _tasks) = test_app();

    let user = service
        .create_user(CreateUser {
            email: "person@example.com".to_string(),
            password: "hunter2!".to_string(),
        })
        .await
        .unwrap();

    let response = app
        .oneshot(patch_json(&format!("/{}", user.id), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_changes_email() {
    let (app, service, _tasks) = test_app();

    let user = service
        .create_user(CreateUser {
            email: "old@example.com".to_string(),
            password: "hunter2!".to_string(),
        })
        .await
        .unwrap();

    let response = app
        .oneshot(patch_json(
            &format!("/{}", user.id),
            json!({"email": "new@example.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let updated: UserResponse = json_body(response.into_body()).await;
    assert_eq!(updated.email, "new@example.com");
}

#[tokio::test]
async fn test_delete_user_returns_204_then_404() {
    let (app, service, _tasks) = test_app();

    let user = service
        .create_user(CreateUser {
            email: "person@example.com".to_string(),
            password: "hunter2!".to_string(),
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

    let response = app.clone().oneshot(delete(user.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(delete(user.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_user_tasks_scopes_to_owner() {
    let (app, service, task_repo) = test_app();

    let user = service
        .create_user(CreateUser {
            email: "person@example.com".to_string(),
            password: "hunter2!".to_string(),
        })
        .await
        .unwrap();

    task_repo
        .create(CreateTask {
            user_id: user.id,
            text: "theirs".to_string(),
            is_done: false,
        })
        .await
        .unwrap();
    task_repo
        .create(CreateTask {
            user_id: Uuid::now_v7(),
            text: "someone else's".to_string(),
            is_done: false,
        })
        .await
        .unwrap();

    let request = Request::builder()
        .uri(format!("/{}/tasks", user.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let tasks: Vec<TaskResponse> = json_body(response.into_body()).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "theirs");
}

#[tokio::test]
async fn test_list_tasks_for_missing_user_returns_404() {
    let (app, _service, _tasks) = test_app();

    let request = Request::builder()
        .uri(format!("/{}/tasks", Uuid::now_v7()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

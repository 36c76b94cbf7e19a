use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use axum_helpers::errors::responses::{
    BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
};
use axum_helpers::extractors::{UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use domain_tasks::{TaskRepository, TaskResponse};

use crate::error::UserResult;
use crate::models::{CreateUser, UpdateUser, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, update_user, delete_user, list_user_tasks),
    components(
        schemas(UserResponse, CreateUser, UpdateUser, TaskResponse),
        responses(
            BadRequestValidationResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "users", description = "User management operations")
    )
)]
pub struct ApiDoc;

/// Create the users router with its state applied
pub fn router<R, T>(service: UserService<R, T>) -> Router
where
    R: UserRepository + 'static,
    T: TaskRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", patch(update_user).delete(delete_user))
        .route("/{id}/tasks", get(list_user_tasks))
        .with_state(shared_service)
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = "users",
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_users<R: UserRepository, T: TaskRepository>(
    State(service): State<Arc<UserService<R, T>>>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.get_users().await?;
    Ok(Json(users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already in use"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_user<R: UserRepository, T: TaskRepository>(
    State(service): State<Arc<UserService<R, T>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_user<R: UserRepository, T: TaskRepository>(
    State(service): State<Arc<UserService<R, T>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.update_user(id, input).await?;
    Ok(Json(user))
}

/// Soft-delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_user<R: UserRepository, T: TaskRepository>(
    State(service): State<Arc<UserService<R, T>>>,
    UuidPath(id): UuidPath,
) -> UserResult<impl IntoResponse> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the tasks owned by a user
#[utoipa::path(
    get,
    path = "/{id}/tasks",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Tasks owned by the user", body = Vec<TaskResponse>),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_user_tasks<R: UserRepository, T: TaskRepository>(
    State(service): State<Arc<UserService<R, T>>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<Vec<TaskResponse>>> {
    let tasks = service.get_tasks_for_user(id).await?;
    Ok(Json(tasks.into_iter().map(Into::into).collect()))
}

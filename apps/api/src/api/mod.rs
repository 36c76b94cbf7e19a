use axum::Router;
use sea_orm::DatabaseConnection;

use domain_tasks::{PgTaskRepository, TaskService};
use domain_users::{PgUserRepository, UserService};

mod health;

/// Composes the domain routers that live under `/api`.
///
/// Each domain router carries its own service state, so this function
/// only needs the database connection to construct the repositories.
pub fn routes(db: &DatabaseConnection) -> Router {
    let task_service = TaskService::new(PgTaskRepository::new(db.clone()));
    let user_service = UserService::new(
        PgUserRepository::new(db.clone()),
        PgTaskRepository::new(db.clone()),
    );

    Router::new()
        .nest("/tasks", domain_tasks::handlers::router(task_service))
        .nest("/users", domain_users::handlers::router(user_service))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app
/// router from `create_router`. The /ready endpoint checks the database
/// connection.
pub fn ready_router(db: DatabaseConnection) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(db)
}

use utoipa::OpenApi;

/// Combined API documentation for the taskboard service.
///
/// Nests each domain's own `ApiDoc` under the prefix its router is
/// mounted at, so the rendered docs match the live routes.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskboard API",
        description = "Task and user management service",
    ),
    nest(
        (path = "/api/tasks", api = domain_tasks::ApiDoc),
        (path = "/api/users", api = domain_users::ApiDoc),
    )
)]
pub struct ApiDoc;

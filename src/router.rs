// router.rs - Route table and global middleware

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/api", get(public::root))
        .route("/health", get(public::health))
        // Protected (bearer token)
        .merge(protected_routes(state.clone()))
        .layer(TraceLayer::new_for_http());

    let router = if security.enable_cors {
        router.layer(cors_layer(&security.cors_origins))
    } else {
        router
    };

    router.with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/test", get(protected::identity::whoami))
        .merge(project_routes())
        .merge(task_routes())
        .merge(tag_routes())
        .merge(journal_routes())
        .merge(calendar_routes())
        .route_layer(from_fn_with_state(state, require_auth))
}

fn project_routes() -> Router<AppState> {
    use protected::projects;

    Router::new()
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/:id",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/projects/:id/tasks", get(projects::tasks))
}

fn task_routes() -> Router<AppState> {
    use protected::tasks;

    Router::new()
        .route("/tasks", get(tasks::list_completed).post(tasks::create))
        .route("/tasks/active", get(tasks::active))
        .route("/tasks/:id", get(tasks::get).delete(tasks::delete))
        .route("/tasks/:id/stop", put(tasks::stop))
        .route("/tasks/:id/project", put(tasks::update_project))
        .route("/tasks/:id/project/:project_id", put(tasks::assign_project))
}

fn tag_routes() -> Router<AppState> {
    use protected::tags;

    Router::new()
        .route("/tags", get(tags::list).post(tags::create))
        .route("/tags/:id", put(tags::rename).delete(tags::delete))
        // Task/tag associations
        .route("/tasks/:id/tags", get(tags::list_for_task).post(tags::attach))
        .route("/tasks/:id/tags/:tag_id", axum::routing::delete(tags::detach))
}

fn journal_routes() -> Router<AppState> {
    use protected::journals;

    Router::new()
        .route("/journals", get(journals::list).post(journals::create))
        .route(
            "/journals/:id",
            get(journals::get)
                .put(journals::update)
                .delete(journals::delete),
        )
}

fn calendar_routes() -> Router<AppState> {
    use protected::calendar;

    Router::new()
        .route("/calendar", get(calendar::list).post(calendar::create))
        .route(
            "/calendar/:id",
            get(calendar::get)
                .put(calendar::update)
                .delete(calendar::delete),
        )
}

/// Permissive when no origins are listed
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(allowed))
}

pub mod auth;
pub mod catalog;
pub mod error;
pub mod middleware;
pub mod placements;
pub mod projects;
pub mod token;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tracing::error;

use roomplan_db::{Database, StoreError};

use crate::error::ApiError;
use crate::token::TokenService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenService,
}

/// All routes, mounted under `/api`. Everything except registration, login
/// and the catalog sits behind `require_auth`.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/rooms", get(catalog::list_rooms))
        .route("/rooms/{id}", get(catalog::get_room))
        .route("/assets/{id}", get(catalog::get_asset))
        .route("/furniture/all", get(catalog::list_furniture));

    let protected_routes = Router::new()
        .route("/users", get(auth::list_users))
        .route("/projects", post(projects::create_project))
        .route("/projects/{username}", get(projects::list_projects))
        .route("/projects_id/{id}", get(projects::get_project))
        .route(
            "/users/projects/{project_id}/furniture",
            get(placements::list_placements),
        )
        .route("/furniture", post(placements::add_placement))
        .route("/furniture/{id}", put(placements::update_position))
        .route("/furniture/delete/{id}", delete(placements::delete_placement))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(state)
}

/// Run a blocking store call off the async runtime.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

/// Row ids are positive integers; anything else in a path is a client error.
pub(crate) fn parse_id(raw: &str, what: &'static str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::Validation(format!("Invalid {} ID", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42", "project").unwrap(), 42);
        for raw in ["", "abc", "0", "-3", "1.5"] {
            let err = parse_id(raw, "project").unwrap_err();
            assert_eq!(err.to_string(), "Invalid project ID");
        }
    }
}

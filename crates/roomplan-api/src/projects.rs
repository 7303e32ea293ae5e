use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use roomplan_types::api::CreateProjectRequest;

use crate::error::{ApiError, ApiJson, NotFoundExt};
use crate::middleware::AuthUser;
use crate::{AppState, parse_id, with_db};

/// The owner is always the caller; the body cannot assign a project to
/// someone else.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(req), _): ApiJson<CreateProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim().to_string();
    if name.is_empty() || req.room_layout_id <= 0 {
        return Err(ApiError::Validation(
            "Project name and room layout are required".into(),
        ));
    }

    let owner_id = user.user_id;
    let project = with_db(&state, move |db| {
        db.create_project(owner_id, &name, &req.description, req.room_layout_id)
    })
    .await?;

    info!("User {} created project {}", user.username, project.id);
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_projects(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    if username != user.username {
        return Err(ApiError::Forbidden);
    }

    let projects = with_db(&state, move |db| db.list_projects_by_owner(&username)).await?;
    Ok(Json(projects))
}

/// Projects owned by someone else answer exactly like missing ones.
pub async fn get_project(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&raw_id, "project")?;

    let project = with_db(&state, move |db| db.get_project(id))
        .await
        .not_found("Project not found")?;

    if project.user_id != user.user_id {
        return Err(ApiError::NotFound("Project not found"));
    }
    Ok(Json(project))
}

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use roomplan_db::{Database, Position, StoreError};
use roomplan_types::api::{AddFurnitureRequest, UpdatePositionRequest};

use crate::error::{ApiError, ApiJson, NotFoundExt};
use crate::middleware::AuthUser;
use crate::{AppState, parse_id, with_db};

pub async fn list_placements(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let project_id = parse_id(&raw_id, "project")?;
    let user_id = user.user_id;

    let placed = with_db(&state, move |db| {
        guard_project(db, project_id, user_id)?;
        db.list_placements(project_id)
    })
    .await
    .not_found("Project not found")?;

    Ok(Json(placed))
}

pub async fn add_placement(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(req), _): ApiJson<AddFurnitureRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.project_id <= 0 || req.furniture_id <= 0 {
        return Err(ApiError::Validation(
            "project_id and furniture_id are required".into(),
        ));
    }

    let user_id = user.user_id;
    let pos = Position {
        x: req.x,
        y: req.y,
        z: req.z,
        rotation: req.rotation,
    };

    let placed = with_db(&state, move |db| {
        guard_project(db, req.project_id, user_id)?;
        db.add_placement(req.project_id, req.furniture_id, pos)
    })
    .await
    .not_found("Project not found")?;

    Ok((StatusCode::CREATED, Json(placed)))
}

pub async fn update_position(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(req), _): ApiJson<UpdatePositionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&raw_id, "furniture")?;
    let user_id = user.user_id;
    let pos = Position {
        x: req.x,
        y: req.y,
        z: req.z,
        rotation: req.rotation,
    };

    let placed = with_db(&state, move |db| {
        guard_placement(db, id, user_id)?;
        db.update_placement_position(id, pos)
    })
    .await
    .not_found("Furniture not found")?;

    Ok(Json(placed))
}

pub async fn delete_placement(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&raw_id, "furniture")?;
    let user_id = user.user_id;

    let deleted = with_db(&state, move |db| {
        guard_placement(db, id, user_id)?;
        db.delete_placement(id)
    })
    .await
    .not_found("Furniture not found")?;

    Ok(Json(deleted))
}

/// Another user's project reads as missing. A project that does not exist
/// at all passes, so listing yields nothing and inserts hit the foreign key.
fn guard_project(db: &Database, project_id: i64, user_id: i64) -> Result<(), StoreError> {
    match db.get_project(project_id) {
        Ok(project) if project.user_id != user_id => Err(StoreError::NotFound),
        Ok(_) | Err(StoreError::NotFound) => Ok(()),
        Err(e) => Err(e),
    }
}

fn guard_placement(db: &Database, id: i64, user_id: i64) -> Result<(), StoreError> {
    match db.placement_owner(id)? {
        Some(owner) if owner == user_id => Ok(()),
        _ => Err(StoreError::NotFound),
    }
}

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use roomplan_types::models::Asset;

use crate::error::{ApiError, NotFoundExt};
use crate::{AppState, parse_id, with_db};

pub async fn list_furniture(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = with_db(&state, |db| db.list_furniture()).await?;
    Ok(Json(items))
}

pub async fn list_rooms(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rooms = with_db(&state, |db| db.list_rooms()).await?;
    Ok(Json(rooms))
}

pub async fn get_room(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&raw_id, "room")?;
    let room = with_db(&state, move |db| db.get_room(id))
        .await
        .not_found("Room not found")?;
    Ok(Json(room))
}

/// Room geometry in the short-field shape the 3D viewer loads.
pub async fn get_asset(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&raw_id, "asset")?;
    let room = with_db(&state, move |db| db.get_room(id))
        .await
        .not_found("Asset not found")?;
    Ok(Json(Asset::from(room)))
}

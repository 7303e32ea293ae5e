use serde::{Deserialize, Serialize};

/// Public view of an account. The password hash never leaves the store crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub room_layout_id: i64,
}

/// Immutable catalog entry for a piece of furniture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Furniture {
    pub id: i64,
    pub name: String,
    pub obj_file_path: String,
    pub texture_path: String,
    pub thumbnail_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub obj_file_path: String,
    pub texture_path: String,
    pub thumbnail_path: String,
}

/// Room row as served by `/assets/{id}`, using the short field names the
/// viewer expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub object: String,
    pub texture: String,
    pub thumbnail: String,
}

impl From<Room> for Asset {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            name: room.name,
            object: room.obj_file_path,
            texture: room.texture_path,
            thumbnail: room.thumbnail_path,
        }
    }
}

/// A catalog item placed in a project, joined with its catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedFurniture {
    pub id: i64,
    pub project_id: i64,
    pub furniture_id: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation: f64,
    pub furniture: Furniture,
}

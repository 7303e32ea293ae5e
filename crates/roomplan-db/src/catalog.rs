use rusqlite::Row;

use roomplan_types::models::{Furniture, Room};

use crate::{Database, StoreError};

/// Prefix the asset files were stored under. Served paths are relative to it.
const ASSET_PREFIX: &str = "assets/objects/";

/// Canonical form of a stored asset path: forward slashes, relative to the
/// asset root.
pub fn normalize_asset_path(stored: &str) -> String {
    let clean = stored.replace('\\', "/");
    match clean.strip_prefix(ASSET_PREFIX) {
        Some(rest) => rest.to_string(),
        None => clean,
    }
}

impl Database {
    pub fn list_furniture(&self) -> Result<Vec<Furniture>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, obj_file_path, texture_path, thumbnail_path
                 FROM furniture ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], |row| map_furniture(row, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, obj_file_path, texture_path, thumbnail_path
                 FROM room ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], map_room)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_room(&self, id: i64) -> Result<Room, StoreError> {
        self.with_conn(|conn| {
            let room = conn.query_row(
                "SELECT id, name, obj_file_path, texture_path, thumbnail_path
                 FROM room WHERE id = ?1",
                [id],
                map_room,
            )?;
            Ok(room)
        })
    }
}

fn map_room(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        name: row.get(1)?,
        obj_file_path: normalize_asset_path(&row.get::<_, String>(2)?),
        texture_path: normalize_asset_path(&row.get::<_, String>(3)?),
        thumbnail_path: normalize_asset_path(&row.get::<_, String>(4)?),
    })
}

/// Maps five furniture columns starting at `offset`, so joined queries can
/// reuse it for the catalog half of the row.
pub(crate) fn map_furniture(row: &Row<'_>, offset: usize) -> rusqlite::Result<Furniture> {
    Ok(Furniture {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        obj_file_path: normalize_asset_path(&row.get::<_, String>(offset + 2)?),
        texture_path: normalize_asset_path(&row.get::<_, String>(offset + 3)?),
        thumbnail_path: normalize_asset_path(&row.get::<_, String>(offset + 4)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_windows_paths() {
        assert_eq!(normalize_asset_path("assets\\objects\\chair.obj"), "chair.obj");
        assert_eq!(
            normalize_asset_path("assets\\objects\\thumbnails\\chair.png"),
            "thumbnails/chair.png"
        );
    }

    #[test]
    fn leaves_foreign_prefixes_alone() {
        assert_eq!(normalize_asset_path("chair.obj"), "chair.obj");
        assert_eq!(normalize_asset_path("models\\chair.obj"), "models/chair.obj");
        assert_eq!(normalize_asset_path(""), "");
    }

    #[test]
    fn catalog_reads_are_normalized() {
        let db = Database::open_in_memory().unwrap();

        let furniture = db.list_furniture().unwrap();
        assert_eq!(furniture.len(), 4);
        assert_eq!(furniture[0].name, "Chair");
        assert_eq!(furniture[0].obj_file_path, "chair.obj");
        assert!(furniture.iter().all(|f| !f.texture_path.contains('\\')));

        let room = db.get_room(1).unwrap();
        assert_eq!(room.obj_file_path, "living_room.obj");
        assert_eq!(db.list_rooms().unwrap().len(), 3);
    }

    #[test]
    fn missing_catalog_rows_are_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_room(999), Err(StoreError::NotFound)));
    }
}

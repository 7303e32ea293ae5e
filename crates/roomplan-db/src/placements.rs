//! Project-scoped furniture placements.
//!
//! Every mutation runs in its own transaction and returns the row joined with
//! its catalog entry, read inside that same transaction. Readers therefore
//! never see a placement whose catalog join is unresolved, and the caller
//! always gets the post-mutation view.

use rusqlite::{Connection, OptionalExtension, Row};
use tracing::info;

use roomplan_types::models::PlacedFurniture;

use crate::catalog::map_furniture;
use crate::{Database, StoreError};

const ENRICHED_SELECT: &str = "
    SELECT pf.id, pf.project_id, pf.furniture_id, pf.x, pf.y, pf.z, pf.rotation,
           f.id, f.name, f.obj_file_path, f.texture_path, f.thumbnail_path
    FROM placed_furniture pf
    JOIN furniture f ON pf.furniture_id = f.id";

/// Spatial fields of a placement. Updates overwrite all four at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation: f64,
}

impl Database {
    pub fn list_placements(&self, project_id: i64) -> Result<Vec<PlacedFurniture>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{ENRICHED_SELECT} WHERE pf.project_id = ?1 ORDER BY pf.id"
            ))?;
            // A failing row aborts the whole listing; no partial results.
            let rows = stmt
                .query_map([project_id], map_placement)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Owner of the project a placement belongs to, if the placement exists.
    pub fn placement_owner(&self, id: i64) -> Result<Option<i64>, StoreError> {
        self.with_conn(|conn| {
            let owner = conn
                .query_row(
                    "SELECT p.user_id FROM placed_furniture pf
                     JOIN projects p ON pf.project_id = p.id
                     WHERE pf.id = ?1",
                    [id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(owner)
        })
    }

    /// Fails with `ForeignKeyViolation` when either the project or the
    /// catalog item does not exist; nothing is inserted in that case.
    pub fn add_placement(
        &self,
        project_id: i64,
        furniture_id: i64,
        pos: Position,
    ) -> Result<PlacedFurniture, StoreError> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "INSERT INTO placed_furniture (project_id, furniture_id, x, y, z, rotation)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![project_id, furniture_id, pos.x, pos.y, pos.z, pos.rotation],
            )?;
            let placed = query_placement(&tx, tx.last_insert_rowid())?;
            tx.commit()?;

            info!(
                "Placed furniture {} (catalog {}) in project {}",
                placed.id, furniture_id, project_id
            );
            Ok(placed)
        })
    }

    /// Overwrites the full position. Applying the same position twice leaves
    /// the same row.
    pub fn update_placement_position(
        &self,
        id: i64,
        pos: Position,
    ) -> Result<PlacedFurniture, StoreError> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            let affected = tx.execute(
                "UPDATE placed_furniture SET x = ?1, y = ?2, z = ?3, rotation = ?4 WHERE id = ?5",
                rusqlite::params![pos.x, pos.y, pos.z, pos.rotation, id],
            )?;
            if affected == 0 {
                return Err(StoreError::NotFound);
            }
            let placed = query_placement(&tx, id)?;
            tx.commit()?;
            Ok(placed)
        })
    }

    /// Removes a placement and returns it as it was just before removal.
    pub fn delete_placement(&self, id: i64) -> Result<PlacedFurniture, StoreError> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            // Read first: the row is gone afterwards.
            let existing = query_placement(&tx, id)?;
            let affected = tx.execute("DELETE FROM placed_furniture WHERE id = ?1", [id])?;
            if affected == 0 {
                return Err(StoreError::NotFound);
            }
            tx.commit()?;

            info!("Removed furniture {} from project {}", id, existing.project_id);
            Ok(existing)
        })
    }
}

fn query_placement(conn: &Connection, id: i64) -> Result<PlacedFurniture, StoreError> {
    let placed = conn.query_row(
        &format!("{ENRICHED_SELECT} WHERE pf.id = ?1"),
        [id],
        map_placement,
    )?;
    Ok(placed)
}

fn map_placement(row: &Row<'_>) -> rusqlite::Result<PlacedFurniture> {
    Ok(PlacedFurniture {
        id: row.get(0)?,
        project_id: row.get(1)?,
        furniture_id: row.get(2)?,
        x: row.get(3)?,
        y: row.get(4)?,
        z: row.get(5)?,
        rotation: row.get(6)?,
        furniture: map_furniture(row, 7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0, rotation: 0.0 };

    fn db_with_project() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let owner = db.create_user("alice", "alice@example.com", "hash").unwrap();
        let project = db.create_project(owner, "Living Room", "", 1).unwrap();
        (db, project.id)
    }

    fn count_placements(db: &Database) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM placed_furniture", [], |r| r.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn added_placement_is_listed_with_catalog_fields() {
        let (db, project) = db_with_project();
        let pos = Position { x: 1.0, y: 0.0, z: 2.0, rotation: 90.0 };

        let placed = db.add_placement(project, 1, pos).unwrap();
        assert_eq!(placed.project_id, project);
        assert_eq!(placed.furniture.name, "Chair");
        assert_eq!(placed.furniture.obj_file_path, "chair.obj");
        assert_eq!((placed.x, placed.z, placed.rotation), (1.0, 2.0, 90.0));

        let listed = db.list_placements(project).unwrap();
        assert_eq!(listed, vec![placed]);
    }

    #[test]
    fn empty_project_lists_nothing() {
        let (db, project) = db_with_project();
        assert!(db.list_placements(project).unwrap().is_empty());
        assert!(db.list_placements(project + 1).unwrap().is_empty());
    }

    #[test]
    fn add_with_unknown_references_leaves_no_row() {
        let (db, project) = db_with_project();

        assert!(matches!(
            db.add_placement(project, 999, ORIGIN),
            Err(StoreError::ForeignKeyViolation)
        ));
        assert!(matches!(
            db.add_placement(project + 50, 1, ORIGIN),
            Err(StoreError::ForeignKeyViolation)
        ));
        assert_eq!(count_placements(&db), 0);
    }

    #[test]
    fn position_update_is_an_idempotent_overwrite() {
        let (db, project) = db_with_project();
        let placed = db.add_placement(project, 2, ORIGIN).unwrap();
        let target = Position { x: 5.0, y: 0.0, z: 2.0, rotation: 90.0 };

        let first = db.update_placement_position(placed.id, target).unwrap();
        let second = db.update_placement_position(placed.id, target).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.x, 5.0);
        let stored = db.with_conn(|conn| query_placement(conn, placed.id)).unwrap();
        assert_eq!(stored, first);
    }

    #[test]
    fn updating_a_missing_placement_is_not_found() {
        let (db, _) = db_with_project();
        assert!(matches!(
            db.update_placement_position(12345, ORIGIN),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn delete_returns_prior_row_then_not_found() {
        let (db, project) = db_with_project();
        let placed = db
            .add_placement(project, 3, Position { x: -1.5, y: 0.25, z: 3.0, rotation: 45.0 })
            .unwrap();

        let deleted = db.delete_placement(placed.id).unwrap();
        assert_eq!(deleted, placed);
        assert!(matches!(db.delete_placement(placed.id), Err(StoreError::NotFound)));
        assert!(db.list_placements(project).unwrap().is_empty());
    }

    #[test]
    fn placements_follow_their_project_out() {
        let (db, project) = db_with_project();
        db.add_placement(project, 1, ORIGIN).unwrap();
        db.add_placement(project, 2, ORIGIN).unwrap();

        db.with_conn_mut(|conn| {
            conn.execute("DELETE FROM projects WHERE id = ?1", [project])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(count_placements(&db), 0);
    }

    #[test]
    fn owner_is_resolved_through_the_project() {
        let (db, project) = db_with_project();
        let placed = db.add_placement(project, 1, ORIGIN).unwrap();
        let owner = db.get_project(project).unwrap().user_id;

        assert_eq!(db.placement_owner(placed.id).unwrap(), Some(owner));
        assert_eq!(db.placement_owner(placed.id + 1).unwrap(), None);
    }
}

use rusqlite::{Connection, OptionalExtension, Row};

use roomplan_types::models::{Project, User};

use crate::models::UserRow;
use crate::{Database, StoreError};

impl Database {
    // -- Users --

    /// Returns the generated user id.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i64, StoreError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3)",
                (username, email, password_hash),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, username, email FROM users ORDER BY id")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Projects --

    pub fn create_project(
        &self,
        owner_id: i64,
        name: &str,
        description: &str,
        room_layout_id: i64,
    ) -> Result<Project, StoreError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO projects (user_id, name, description, room_layout_id)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![owner_id, name, description, room_layout_id],
            )?;
            Ok(Project {
                id: conn.last_insert_rowid(),
                user_id: owner_id,
                name: name.to_string(),
                description: description.to_string(),
                room_layout_id,
            })
        })
    }

    /// Projects owned by `username`. An unknown user simply owns nothing.
    pub fn list_projects_by_owner(&self, username: &str) -> Result<Vec<Project>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.user_id, p.name, p.description, p.room_layout_id
                 FROM projects p
                 JOIN users u ON p.user_id = u.id
                 WHERE u.username = ?1
                 ORDER BY p.id",
            )?;
            let rows = stmt
                .query_map([username], map_project)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_project(&self, id: i64) -> Result<Project, StoreError> {
        self.with_conn(|conn| {
            let project = conn.query_row(
                "SELECT id, user_id, name, description, room_layout_id FROM projects WHERE id = ?1",
                [id],
                map_project,
            )?;
            Ok(project)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>, StoreError> {
    // `column` is always one of our own literals, never caller input.
    let row = conn
        .query_row(
            &format!("SELECT id, username, email, password FROM users WHERE {column} = ?1"),
            [value],
            map_user,
        )
        .optional()?;
    Ok(row)
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
    })
}

fn map_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        room_layout_id: row.get(4)?,
    })
}

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema + catalog seed)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                username    TEXT NOT NULL UNIQUE,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE room (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                obj_file_path   TEXT NOT NULL,
                texture_path    TEXT NOT NULL DEFAULT '',
                thumbnail_path  TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE furniture (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                obj_file_path   TEXT NOT NULL,
                texture_path    TEXT NOT NULL DEFAULT '',
                thumbnail_path  TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE projects (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id         INTEGER NOT NULL REFERENCES users(id),
                name            TEXT NOT NULL,
                description     TEXT NOT NULL DEFAULT '',
                room_layout_id  INTEGER NOT NULL REFERENCES room(id),
                created_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_projects_user ON projects(user_id);

            CREATE TABLE placed_furniture (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id    INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                furniture_id  INTEGER NOT NULL REFERENCES furniture(id),
                x             REAL NOT NULL,
                y             REAL NOT NULL,
                z             REAL NOT NULL,
                rotation      REAL NOT NULL DEFAULT 0
            );

            CREATE INDEX idx_placed_furniture_project ON placed_furniture(project_id);

            -- Seed catalog. Paths keep the on-disk form; reads normalize them.
            INSERT INTO room (name, obj_file_path, texture_path, thumbnail_path) VALUES
                ('Living Room', 'assets\\objects\\living_room.obj', 'assets\\objects\\living_room.png', 'assets\\objects\\thumbnails\\living_room.png'),
                ('Bedroom',     'assets\\objects\\bedroom.obj',     'assets\\objects\\bedroom.png',     'assets\\objects\\thumbnails\\bedroom.png'),
                ('Kitchen',     'assets/objects/kitchen.obj',       'assets/objects/kitchen.png',       'assets/objects/thumbnails/kitchen.png');

            INSERT INTO furniture (name, obj_file_path, texture_path, thumbnail_path) VALUES
                ('Chair', 'assets\\objects\\chair.obj', 'assets\\objects\\chair.png', 'assets\\objects\\thumbnails\\chair.png'),
                ('Sofa',  'assets\\objects\\sofa.obj',  'assets\\objects\\sofa.png',  'assets\\objects\\thumbnails\\sofa.png'),
                ('Table', 'assets/objects/table.obj',   'assets/objects/table.png',   'assets/objects/thumbnails/table.png'),
                ('Lamp',  'assets/objects/lamp.obj',    'assets/objects/lamp.png',    'assets/objects/thumbnails/lamp.png');

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let rooms: i64 = conn
            .query_row("SELECT COUNT(*) FROM room", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rooms, 3);
    }

    #[test]
    fn users_table_holds_only_account_columns() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('users')").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(columns, ["id", "username", "email", "password", "created_at"]);
    }
}

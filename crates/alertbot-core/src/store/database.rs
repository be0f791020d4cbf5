use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use super::error::StoreError;

const CREATE_SCHEMA_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS alerts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        alert_type TEXT,
        priority TEXT,
        message TEXT,
        timestamp TEXT,
        read INTEGER DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS config (
        key TEXT PRIMARY KEY,
        value TEXT
    );
"#;

/// Worker and display side may write at the same moment.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the SQLite database file.
///
/// Holds only the path; [`Database::connect`] opens a fresh connection.
#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Open (creating if needed) the database at `path` and ensure the schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database { path };
        db.create_schema()?;
        debug!(path = %db.path.display(), "database ready");
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a new connection to the database.
    pub fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch(CREATE_SCHEMA_SQL)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT count(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count > 0)
        .unwrap()
    }

    #[test]
    fn test_open_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("alerts.db")).unwrap();

        let conn = db.connect().unwrap();
        assert!(table_exists(&conn, "alerts"));
        assert!(table_exists(&conn, "config"));
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("alerts.db");

        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), path.as_path());
    }

    #[test]
    fn test_open_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.db");

        Database::open(&path).unwrap();
        Database::open(&path).unwrap();
    }
}

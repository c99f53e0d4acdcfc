use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, params};

use super::StoreError;

/// Durable key-value table shared by all record namespaces.
///
/// Writes are committed before any call returns, so a completed `put`
/// survives a process restart.
pub struct KvStore {
    conn: Arc<Mutex<Connection>>,
}

impl KvStore {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("Failed to create directory: {}", e)))?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| StoreError::Backend(format!("Failed to open database: {}", e)))?;

        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Backend(format!("Failed to open database: {}", e)))?;

        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError::Backend(format!("Failed to create records table: {}", e)))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO records (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .map_err(|e| StoreError::Backend(format!("Failed to write record: {}", e)))?;

        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT value FROM records WHERE key = ?1")
            .map_err(|e| StoreError::Backend(format!("Failed to prepare statement: {}", e)))?;

        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Backend(format!("Failed to read record: {}", e))),
        }
    }

    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM records WHERE key = ?1", params![key])
            .map_err(|e| StoreError::Backend(format!("Failed to delete record: {}", e)))?;

        Ok(())
    }

    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT key FROM records WHERE key LIKE ?1 ORDER BY key")
            .map_err(|e| StoreError::Backend(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map(params![format!("{}%", prefix)], |row| row.get(0))
            .map_err(|e| StoreError::Backend(format!("Failed to query keys: {}", e)))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(
                row.map_err(|e| StoreError::Backend(format!("Failed to read key: {}", e)))?,
            );
        }

        Ok(keys)
    }
}

pub mod migrations;
pub mod queries;
pub mod state;
pub mod store;

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use tracing::info;

pub use state::{DuplicateEmail, LocalState};
pub use store::{KeyValueStore, MemoryStore};

/// SQLite file holding the dashboard's local key-value state
/// (session, accounts, emergency retry queue).
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(Duration::from_secs(5))?;

        let db = Self::from_connection(conn)?;
        info!("Local state database at {}", path.display());
        Ok(db)
    }

    /// Throwaway database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow!("local state lock poisoned: {}", e))?;
        f(&conn)
    }
}

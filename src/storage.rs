// 🗄️ Key-Value Storage - persistent and session-scoped slots
//
// The quote store only needs string slots under fixed keys. SQLite backs
// the durable slots (WAL mode, one `kv` table); a HashMap backs the
// session slots and tests.

use crate::errors::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

// ============================================================================
// STORAGE KEYS
// ============================================================================

/// Serialized quote collection (durable)
pub const QUOTES_KEY: &str = "quotes";

/// Last category filter the user picked (durable)
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Last quote shown (session only)
pub const LAST_QUOTE_KEY: &str = "lastQuote";

// ============================================================================
// STORAGE TRAIT
// ============================================================================

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    /// Number of successful `set` calls since the store was opened
    fn write_count(&self) -> usize;
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
    writes: usize,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        setup_database(&conn)?;
        log::debug!("[STORE] Opened key-value database at {:?}", path);
        Ok(SqliteStore { conn, writes: 0 })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn, writes: 0 })
    }

    /// When the slot was last written, as RFC 3339
    pub fn updated_at(&self, key: &str) -> Result<Option<String>> {
        let updated = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated)
    }
}

pub fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    // WAL for crash recovery; in-memory databases silently keep "memory"
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn write_count(&self) -> usize {
        self.writes
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// HashMap-backed store. Lives as long as the process, which is exactly the
/// lifetime of session-scoped data.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }

    fn write_count(&self) -> usize {
        self.writes
    }
}

// Lets callers keep ownership of a store while lending it to a QuoteStore
impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn write_count(&self) -> usize {
        (**self).write_count()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn write_count(&self) -> usize {
        (**self).write_count()
    }
}

/// In-memory store whose writes can be switched off, for exercising
/// storage failures
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ReadOnlySwitch {
    pub inner: MemoryStore,
    pub read_only: bool,
}

#[cfg(test)]
impl KeyValueStore for ReadOnlySwitch {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.read_only {
            return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "store is read-only").into());
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }

    fn write_count(&self) -> usize {
        self.inner.write_count()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_set_get_overwrite() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        assert_eq!(store.get(QUOTES_KEY).unwrap(), None);

        store.set(QUOTES_KEY, "[]").unwrap();
        store.set(QUOTES_KEY, "[1]").unwrap();

        assert_eq!(store.get(QUOTES_KEY).unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.write_count(), 2);
        assert!(store.updated_at(QUOTES_KEY).unwrap().is_some());
    }

    #[test]
    fn test_sqlite_remove() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        store.set(SELECTED_CATEGORY_KEY, "life").unwrap();
        store.remove(SELECTED_CATEGORY_KEY).unwrap();

        assert_eq!(store.get(SELECTED_CATEGORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_sqlite_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set(SELECTED_CATEGORY_KEY, "motivation").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(),
            Some("motivation")
        );
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();

        store.set(LAST_QUOTE_KEY, "{}").unwrap();
        assert_eq!(store.get(LAST_QUOTE_KEY).unwrap().as_deref(), Some("{}"));

        store.remove(LAST_QUOTE_KEY).unwrap();
        assert_eq!(store.get(LAST_QUOTE_KEY).unwrap(), None);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_borrowed_store_forwards() {
        fn write_through<S: KeyValueStore>(mut store: S) {
            store.set("k", "v").unwrap();
        }

        let mut inner = MemoryStore::new();
        write_through(&mut inner);

        assert_eq!(inner.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(inner.write_count(), 1);
    }
}

//! Durable key-value slots for the serialized state tree.
//!
//! # Responsibility
//! - Define the storage contract used by [`crate::StateStore`].
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - One slot key holds exactly one serialized payload; saves overwrite.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::rc::Rc;

/// Storage key used for the globe state blob unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "globeState";

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// The backing store refused the operation.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "state storage database error: {err}"),
            Self::Unavailable(message) => write!(f, "state storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable slot contract.
pub trait StateStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>>;
    fn save(&mut self, key: &str, payload: &str) -> StorageResult<()>;
}

/// Slots kept in a migrated SQLite database.
pub struct SqliteStateStorage {
    conn: Connection,
}

impl SqliteStateStorage {
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps a connection that already went through [`crate::db::open_db`].
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl StateStorage for SqliteStateStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM state_slots WHERE slot_key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save(&mut self, key: &str, payload: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO state_slots (slot_key, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at",
            params![key, payload, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }
}

/// In-memory slots. Clones share the same slot map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStorage {
    slots: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a slot without going through the trait.
    pub fn slot(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    /// Seeds a slot, e.g. with a blob written by an older build.
    pub fn insert(&self, key: &str, payload: impl Into<String>) {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), payload.into());
    }
}

impl StateStorage for MemoryStateStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slot(key))
    }

    fn save(&mut self, key: &str, payload: &str) -> StorageResult<()> {
        self.insert(key, payload);
        Ok(())
    }
}

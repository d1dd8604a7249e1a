//! Reactive globe state.
//!
//! # Responsibility
//! - Hold the single serializable [`StateTree`] behind typed [`StatePath`]s.
//! - Persist every successful mutation and notify subscribers inline.
//! - Own pin lifecycle (create, remove, select).
//!
//! # Invariants
//! - A failed mutation leaves the tree unchanged and emits no notification.
//! - Storage failures never fail a mutation; the in-memory tree stays
//!   authoritative.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod path;
mod pins;
mod storage;
mod store;
mod tree;

pub use path::{StatePath, WILDCARD_PATH};
pub use pins::NewPin;
pub use storage::{
    MemoryStateStorage, SqliteStateStorage, StateStorage, StorageError, StorageResult,
    DEFAULT_STORAGE_KEY,
};
pub use store::{StateChange, StateStore, Subscription};
pub use tree::{Camera, Pin, StateTree};

pub type StateResult<T> = Result<T, StateError>;

/// Programmer-error class failures for state mutation.
#[derive(Debug)]
pub enum StateError {
    /// Dotted path does not name a field of the tree.
    UnknownPath(String),
    /// Path cannot be the target of `set` (the wildcard).
    NotAssignable(StatePath),
    /// An intermediate segment is absent or not a mapping.
    MissingParent { path: StatePath, segment: String },
    /// Value does not fit the tree schema at `path`.
    InvalidValue { path: StatePath, message: String },
    Serialize(serde_json::Error),
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPath(raw) => write!(f, "unknown state path `{raw}`"),
            Self::NotAssignable(path) => write!(f, "state path `{path}` is not assignable"),
            Self::MissingParent { path, segment } => {
                write!(f, "state path `{path}` has no mapping at `{segment}`")
            }
            Self::InvalidValue { path, message } => {
                write!(f, "invalid value for state path `{path}`: {message}")
            }
            Self::Serialize(err) => write!(f, "state serialization failed: {err}"),
        }
    }
}

impl Error for StateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StateError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

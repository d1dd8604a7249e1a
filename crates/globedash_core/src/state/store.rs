//! Path-addressable state container with persistence and subscriptions.

use crate::config::GlobeConfig;
use crate::logging::sanitize_message;
use crate::state::storage::{
    SqliteStateStorage, StateStorage, StorageResult, DEFAULT_STORAGE_KEY,
};
use crate::state::{MemoryStateStorage, StateError, StatePath, StateResult, StateTree};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

const MAX_LOGGED_ERROR_CHARS: usize = 120;

/// Payload handed to subscribers after each mutation.
#[derive(Debug, Clone, Copy)]
pub struct StateChange<'a> {
    /// Mutated path; [`StatePath::All`] for reset and import.
    pub path: &'a StatePath,
    /// Value written at `path` (the whole tree for [`StatePath::All`]).
    pub value: &'a Value,
    /// Tree after the mutation.
    pub state: &'a StateTree,
}

type Callback = Rc<RefCell<Box<dyn FnMut(&StateChange<'_>)>>>;

#[derive(Default)]
struct SubscriberList {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

/// Handle returned by [`StateStore::subscribe`].
///
/// Dropping the handle keeps the subscription alive; call
/// [`Subscription::unsubscribe`] to end it.
pub struct Subscription {
    id: u64,
    list: Weak<RefCell<SubscriberList>>,
}

impl Subscription {
    /// Removes the callback. Safe to call from inside a notification.
    pub fn unsubscribe(self) {
        if let Some(list) = self.list.upgrade() {
            list.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Reactive container for the globe [`StateTree`].
///
/// Created once at application start and passed by reference to whatever
/// needs it.
pub struct StateStore {
    pub(super) tree: StateTree,
    storage: Box<dyn StateStorage>,
    storage_key: String,
    subscribers: Rc<RefCell<SubscriberList>>,
}

impl StateStore {
    /// Creates a store over `storage` using [`DEFAULT_STORAGE_KEY`].
    pub fn new(storage: impl StateStorage + 'static) -> Self {
        Self::with_storage_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Creates a store and merges any blob found under `key` over defaults.
    pub fn with_storage_key(storage: impl StateStorage + 'static, key: impl Into<String>) -> Self {
        let storage_key = key.into();
        let tree = load_persisted(&storage, &storage_key);
        Self {
            tree,
            storage: Box::new(storage),
            storage_key,
            subscribers: Rc::new(RefCell::new(SubscriberList::default())),
        }
    }

    /// Creates a store with no durable backing.
    pub fn in_memory() -> Self {
        Self::new(MemoryStateStorage::new())
    }

    /// Opens the store described by `config`.
    ///
    /// Uses the SQLite slot database at `state_db_path` when set, otherwise
    /// in-memory slots.
    pub fn open(config: &GlobeConfig) -> StorageResult<Self> {
        match config.state_db_path.as_deref() {
            Some(path) => Ok(Self::with_storage_key(
                SqliteStateStorage::open(path)?,
                config.storage_key.clone(),
            )),
            None => Ok(Self::with_storage_key(
                MemoryStateStorage::new(),
                config.storage_key.clone(),
            )),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Whole typed tree.
    pub fn tree(&self) -> &StateTree {
        &self.tree
    }

    /// Value at `path`; [`StatePath::All`] yields the whole tree.
    pub fn get(&self, path: &StatePath) -> Option<Value> {
        let root = self.tree_value();
        path.segments()
            .into_iter()
            .try_fold(root, |value, segment| descend(value, segment))
    }

    /// Resolves raw dot-separated segments; `""` yields the whole tree.
    ///
    /// Never errors: any absent segment yields `None`. Numeric segments index
    /// into sequences (`pins.0.id`).
    pub fn get_dotted(&self, raw: &str) -> Option<Value> {
        let root = self.tree_value();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Some(root);
        }
        trimmed
            .split('.')
            .try_fold(root, |value, segment| descend(value, segment))
    }

    /// Assigns `value` at `path`, then persists and notifies.
    ///
    /// # Errors
    /// - [`StateError::NotAssignable`] for [`StatePath::All`].
    /// - [`StateError::MissingParent`] when an intermediate mapping is absent.
    /// - [`StateError::InvalidValue`] when the result does not fit the schema
    ///   or an opacity leaves `0..=1`; the tree is left unchanged.
    pub fn set(&mut self, path: StatePath, value: Value) -> StateResult<()> {
        let mut root = serde_json::to_value(&self.tree)?;
        assign(&mut root, &path, value.clone())?;

        let next = serde_json::from_value::<StateTree>(root)
            .map_err(|err| err.to_string())
            .and_then(|next| next.check_ranges().map(|()| next))
            .map_err(|message| StateError::InvalidValue {
                path: path.clone(),
                message,
            })?;

        self.tree = next;
        self.persist();
        self.notify(&path, &value);
        Ok(())
    }

    /// Parses `raw` as a dotted path and calls [`StateStore::set`].
    pub fn set_dotted(&mut self, raw: &str, value: Value) -> StateResult<()> {
        self.set(raw.parse()?, value)
    }

    /// Applies each entry with [`StateStore::set`] in order.
    ///
    /// Stops at the first failure; entries applied before it stay applied.
    pub fn update(
        &mut self,
        entries: impl IntoIterator<Item = (StatePath, Value)>,
    ) -> StateResult<()> {
        for (path, value) in entries {
            self.set(path, value)?;
        }
        Ok(())
    }

    /// Registers `callback` for every subsequent notification.
    pub fn subscribe(&mut self, callback: impl FnMut(&StateChange<'_>) + 'static) -> Subscription {
        let callback: Box<dyn FnMut(&StateChange<'_>)> = Box::new(callback);
        let mut list = self.subscribers.borrow_mut();
        let id = list.next_id;
        list.next_id += 1;
        list.entries.push((id, Rc::new(RefCell::new(callback))));
        Subscription {
            id,
            list: Rc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().entries.len()
    }

    /// JSON serialization of the whole tree.
    pub fn export_state(&self) -> StateResult<String> {
        Ok(serde_json::to_string_pretty(&self.tree)?)
    }

    /// Shallow-merges a JSON object over the current tree.
    ///
    /// Top-level keys in `text` replace the current values wholesale; unknown
    /// keys are kept. Returns `false` and leaves state untouched when `text`
    /// is not a JSON object or the merged tree does not fit the schema.
    pub fn import_state(&mut self, text: &str) -> bool {
        let merged = serde_json::from_str::<Value>(text)
            .map_err(|err| err.to_string())
            .and_then(|incoming| match incoming {
                Value::Object(overlay) => merge_over(&self.tree, overlay),
                other => Err(format!("expected object, got {}", json_kind(&other))),
            });

        match merged {
            Ok(tree) => {
                self.tree = tree;
                self.persist();
                self.notify_all();
                info!("event=state_import module=state status=ok");
                true
            }
            Err(message) => {
                warn!(
                    "event=state_import module=state status=rejected error={}",
                    sanitize_message(&message, MAX_LOGGED_ERROR_CHARS)
                );
                false
            }
        }
    }

    /// Restores the default tree.
    pub fn reset(&mut self) {
        self.tree = StateTree::default();
        self.persist();
        self.notify_all();
        info!("event=state_reset module=state status=ok");
    }

    /// Persists and notifies for a mutation already applied to `self.tree`.
    pub(super) fn commit(&mut self, path: StatePath) {
        let value = self.get(&path).unwrap_or(Value::Null);
        self.persist();
        self.notify(&path, &value);
    }

    fn tree_value(&self) -> Value {
        serde_json::to_value(&self.tree).unwrap_or(Value::Null)
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.tree) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("event=state_persist module=state status=error error_code=serialize_failed error={err}");
                return;
            }
        };
        match self.storage.save(&self.storage_key, &payload) {
            Ok(()) => debug!(
                "event=state_persist module=state status=ok key={} bytes={}",
                self.storage_key,
                payload.len()
            ),
            Err(err) => warn!(
                "event=state_persist module=state status=error error_code=write_failed key={} error={err}",
                self.storage_key
            ),
        }
    }

    fn notify_all(&self) {
        let value = self.tree_value();
        self.notify(&StatePath::All, &value);
    }

    fn notify(&self, path: &StatePath, value: &Value) {
        let callbacks: Vec<(u64, Callback)> = self
            .subscribers
            .borrow()
            .entries
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();
        let change = StateChange {
            path,
            value,
            state: &self.tree,
        };

        for (id, callback) in callbacks {
            if !self.is_subscribed(id) {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                let mut callback = callback.borrow_mut();
                (*callback)(&change);
            }));
            if let Err(payload) = outcome {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|message| (*message).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                warn!(
                    "event=state_notify module=state status=subscriber_failed subscriber={id} path={path} error={}",
                    sanitize_message(&message, MAX_LOGGED_ERROR_CHARS)
                );
            }
        }
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers
            .borrow()
            .entries
            .iter()
            .any(|(entry_id, _)| *entry_id == id)
    }
}

fn descend(value: Value, segment: &str) -> Option<Value> {
    match value {
        Value::Object(mut map) => map.remove(segment),
        Value::Array(mut items) => {
            let index = segment.parse::<usize>().ok()?;
            (index < items.len()).then(|| items.swap_remove(index))
        }
        _ => None,
    }
}

fn assign(root: &mut Value, path: &StatePath, value: Value) -> StateResult<()> {
    let segments = path.segments();
    let Some((last, parents)) = segments.split_last() else {
        return Err(StateError::NotAssignable(path.clone()));
    };

    let mut cursor = root;
    for segment in parents {
        cursor = match cursor.get_mut(*segment) {
            Some(next) if next.is_object() => next,
            _ => {
                return Err(StateError::MissingParent {
                    path: path.clone(),
                    segment: (*segment).to_string(),
                })
            }
        };
    }

    match cursor.as_object_mut() {
        Some(parent) => {
            parent.insert((*last).to_string(), value);
            Ok(())
        }
        None => Err(StateError::MissingParent {
            path: path.clone(),
            segment: (*last).to_string(),
        }),
    }
}

fn merge_over(base: &StateTree, overlay: Map<String, Value>) -> Result<StateTree, String> {
    let mut root = serde_json::to_value(base).map_err(|err| err.to_string())?;
    if let Value::Object(fields) = &mut root {
        fields.extend(overlay);
    }
    let merged: StateTree = serde_json::from_value(root).map_err(|err| err.to_string())?;
    merged.check_ranges()?;
    Ok(merged)
}

fn load_persisted(storage: &dyn StateStorage, key: &str) -> StateTree {
    let defaults = StateTree::default();
    let payload = match storage.load(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            debug!("event=state_load module=state status=empty key={key}");
            return defaults;
        }
        Err(err) => {
            warn!("event=state_load module=state status=error error_code=read_failed key={key} error={err}");
            return defaults;
        }
    };

    let merged = match serde_json::from_str::<Value>(&payload) {
        Ok(Value::Object(overlay)) => merge_over(&defaults, overlay),
        Ok(other) => Err(format!("expected object, got {}", json_kind(&other))),
        Err(err) => Err(err.to_string()),
    };

    match merged {
        Ok(tree) => {
            info!("event=state_load module=state status=ok key={key}");
            tree
        }
        Err(message) => {
            warn!(
                "event=state_load module=state status=error error_code=parse_failed key={key} error={}",
                sanitize_message(&message, MAX_LOGGED_ERROR_CHARS)
            );
            defaults
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

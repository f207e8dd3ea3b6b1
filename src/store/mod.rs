//! Application store: the single owner of [`AppState`].
//!
//! Every change goes through [`Store::dispatch`], which runs the pure
//! [`reduce`] function and then writes the whole state back to storage.
//! Writes are fire-and-forget: a failed save is logged, never returned.

pub mod action;
pub mod reducer;
pub mod storage;

use std::rc::Rc;

pub use action::Action;
pub use reducer::{reduce, Outcome, Rejection};
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage, StorageError, STORAGE_KEY};

use crate::models::{AppState, AppStatePatch};

pub struct Store {
    state: AppState,
    storage: Box<dyn SnapshotStorage>,
}

impl Store {
    /// Load the saved snapshot (if any) and replay it through `LOAD_DATA`.
    ///
    /// A snapshot that cannot be read or parsed is logged and ignored; the
    /// store then starts from the default state.
    pub fn open(storage: impl SnapshotStorage + 'static) -> Self {
        let mut store = Self {
            state: AppState::default(),
            storage: Box::new(storage),
        };

        let patch = match store.storage.load() {
            Ok(Some(raw)) => match decode_patch(&raw) {
                Ok(patch) => Some(patch),
                Err(e) => {
                    tracing::error!(error = %e, "Error loading saved data, starting fresh");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, "Cannot read saved data, starting fresh");
                None
            }
        };

        if let Some(patch) = patch {
            store.dispatch(Action::LoadData(patch));
            tracing::info!(
                users = store.state.users.len(),
                tracks = store.state.tracks.len(),
                "Snapshot loaded"
            );
        }
        store
    }

    /// Store backed by a fresh in-memory snapshot.
    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let kind = action.kind();
        let (next, outcome) = reduce(std::mem::take(&mut self.state), action);
        self.state = next;

        match &outcome {
            Outcome::Applied => {
                tracing::debug!(action = kind, "Action applied");
                self.persist();
            }
            Outcome::Unchanged => tracing::debug!(action = kind, "Action ignored"),
            Outcome::Rejected(reason) => {
                tracing::info!(action = kind, reason = %reason, "Action rejected")
            }
        }
        outcome
    }

    /// Decode a raw JSON action and dispatch it.
    pub fn dispatch_json(&mut self, raw: &str) -> Result<Outcome, StorageError> {
        let action = Action::decode(raw)?;
        Ok(self.dispatch(action))
    }

    /// Merge an exported snapshot into the current state.
    pub fn import(&mut self, raw: &str) -> Result<Outcome, StorageError> {
        let patch = decode_patch(raw)?;
        Ok(self.dispatch(Action::LoadData(patch)))
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.state)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.save(&json));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to save snapshot");
        }
    }
}

/// Parse a snapshot document. Only a JSON object is accepted; the derived
/// decoder would otherwise map a positional array onto fields in order.
fn decode_patch(raw: &str) -> Result<AppStatePatch, StorageError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(StorageError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

impl<S: SnapshotStorage + ?Sized> SnapshotStorage for Rc<S> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &str) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }
}

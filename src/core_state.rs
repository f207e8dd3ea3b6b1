//! Application state shared by every command: the store, the chat assistant
//! and the emergency notifier.

use std::path::{Path, PathBuf};

use crate::ai::{self, AiGateway};
use crate::config::AiConfig;
use crate::safety::{EmergencyNotifier, LogNotifier};
use crate::store::{FileStorage, Store};

pub struct CoreState {
    store: Store,
    gateway: AiGateway,
    notifier: Box<dyn EmergencyNotifier>,
    /// Directory holding the snapshot file. `None` for in-memory state.
    data_dir: Option<PathBuf>,
}

impl CoreState {
    /// Open the snapshot under `data_dir` and build the assistant from `ai`.
    pub fn open(data_dir: &Path, ai: &AiConfig) -> Self {
        let storage = FileStorage::new(data_dir);
        tracing::debug!(path = %storage.path().display(), "Opening snapshot");
        Self {
            store: Store::open(storage),
            gateway: ai::gateway_from_config(ai),
            notifier: Box::new(LogNotifier),
            data_dir: Some(data_dir.to_path_buf()),
        }
    }

    /// Assemble from parts; used by tests.
    pub fn from_parts(store: Store, gateway: AiGateway, notifier: Box<dyn EmergencyNotifier>) -> Self {
        Self {
            store,
            gateway,
            notifier,
            data_dir: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn gateway(&self) -> &AiGateway {
        &self.gateway
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Mutable store alongside the assistant and notifier, for flows that
    /// need all three.
    pub fn parts_mut(&mut self) -> (&mut Store, &AiGateway, &dyn EmergencyNotifier) {
        (&mut self.store, &self.gateway, self.notifier.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_persists_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut core = CoreState::open(dir.path(), &AiConfig::default());
        assert!(!core.gateway().is_configured());
        assert_eq!(core.data_dir(), Some(dir.path()));

        core.store_mut().dispatch(crate::store::Action::ToggleTheme);
        assert!(dir.path().join("arogyaSahayakData.json").exists());

        let reopened = CoreState::open(dir.path(), &AiConfig::default());
        assert_eq!(reopened.store().state().theme, crate::models::Theme::Dark);
    }
}

use std::sync::Arc;

use bevy::prelude::*;

use super::config::{ConfigPatch, EngineConfig};

/// Result of offering a patch to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The value was replaced. `rebuild` is set when the particle set is stale.
    Applied { rebuild: bool },
    /// Merge produced an identical value.
    Unchanged,
    /// Text did not fit after sanitizing; nothing changed.
    Rejected,
}

/// Single owner of the live [`EngineConfig`]. Readers get a shared snapshot;
/// every accepted change swaps in a whole new value.
#[derive(Resource, Debug, Clone)]
pub struct ConfigStore {
    current: Arc<EngineConfig>,
    revision: u64,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ConfigStore {
    pub fn new(initial: EngineConfig) -> Self {
        Self {
            current: Arc::new(initial.normalized()),
            revision: 0,
        }
    }

    pub fn current(&self) -> Arc<EngineConfig> {
        Arc::clone(&self.current)
    }

    pub fn get(&self) -> &EngineConfig {
        &self.current
    }

    /// Bumped once per accepted change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn apply(&mut self, patch: &ConfigPatch) -> ApplyOutcome {
        let Some(next) = self.current.merged(patch) else {
            debug!(target: "config", "rejected patch {patch:?}");
            return ApplyOutcome::Rejected;
        };
        if next == *self.current {
            return ApplyOutcome::Unchanged;
        }
        let rebuild = self.current.needs_rebuild(&next);
        self.current = Arc::new(next);
        self.revision += 1;
        ApplyOutcome::Applied { rebuild }
    }
}

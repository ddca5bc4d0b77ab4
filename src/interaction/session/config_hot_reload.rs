// This file is part of Kinetic Type.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::core::config::{AppConfig, ApplyOutcome, ConfigPatch, ConfigStore};

/// Files watched for edits; the engine section is pushed through the store.
#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}

impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/kinetic.ron"),
                PathBuf::from("assets/config/kinetic.local.ron"),
            ],
            interval_secs: 1.0,
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Option<Timer>,
}

impl ConfigReloadState {
    /// Records current modification times. True if any file is newer than
    /// last seen, including the first time a file shows up.
    pub fn poll(&mut self, paths: &[PathBuf]) -> bool {
        let mut dirty = false;
        for path in paths {
            let Ok(mod_time) = std::fs::metadata(path).and_then(|m| m.modified()) else {
                continue;
            };
            match self.last_mod.get(path) {
                Some(seen) if *seen >= mod_time => {}
                _ => {
                    self.last_mod.insert(path.clone(), mod_time);
                    dirty = true;
                }
            }
        }
        dirty
    }
}

pub struct ConfigHotReloadPlugin;

impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Startup, prime_reload_state)
                .add_systems(Update, poll_and_reload_config);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = app;
    }
}

/// The files were already read at startup; only later edits should apply.
fn prime_reload_state(settings: Res<ConfigReloadSettings>, mut state: ResMut<ConfigReloadState>) {
    state.poll(&settings.paths);
}

/// Re-reads the layered files after an edit and applies the engine section.
/// Returns the store outcome, or `None` when nothing changed on disk.
pub fn reload_if_changed(
    settings: &ConfigReloadSettings,
    state: &mut ConfigReloadState,
    store: &mut ConfigStore,
) -> Option<ApplyOutcome> {
    if !state.poll(&settings.paths) {
        return None;
    }
    let (cfg, used, errors) = AppConfig::load_layered(settings.paths.iter());
    for e in errors {
        warn!(target: "config", "CONFIG HOT-RELOAD issue: {e}");
    }
    let outcome = store.apply(&ConfigPatch::from(&cfg.engine));
    if let ApplyOutcome::Applied { rebuild } = outcome {
        info!(target: "config", "Config hot-reload applied from {used:?} (rebuild={rebuild})");
    }
    Some(outcome)
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
    mut store: ResMut<ConfigStore>,
) {
    let interval = settings.interval_secs.max(0.05);
    let timer = state
        .timer
        .get_or_insert_with(|| Timer::from_seconds(interval, TimerMode::Repeating));
    if !timer.tick(time.delta()).just_finished() {
        return;
    }
    // Only flag the store when the reload actually replaced the config.
    let outcome = reload_if_changed(&settings, &mut state, store.bypass_change_detection());
    if matches!(outcome, Some(ApplyOutcome::Applied { .. })) {
        store.set_changed();
    }
}

// This file is part of Kinetic Type.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::core::config::{AppConfig, ConfigStore};
use crate::core::system::system_order::{InputSet, PresentSet, SimulateSet, SyncSet};
use crate::debug::DebugPlugin;
use crate::gameplay::field::ParticleField;
use crate::gameplay::systems::ParticleFieldPlugin;
use crate::gameplay::text_sampler::SampleFont;
use crate::interaction::input::host_input::HostInputPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::rendering::canvas::PixelCanvas;
use crate::rendering::presenter::PresenterPlugin;
use crate::ui::ControlPanelPlugin;

/// Problems found while assembling the start-up config; logged once the
/// log plugin is up.
#[derive(Resource, Debug, Default, Clone)]
pub struct ConfigDiagnostics {
    pub used: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub struct KineticTypePlugin;

impl Plugin for KineticTypePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<AppConfig>() {
            app.insert_resource(AppConfig::default());
        }
        let cfg = app.world().resource::<AppConfig>().clone();
        let viewport = UVec2::new(
            cfg.window.width.max(1.0) as u32,
            cfg.window.height.max(1.0) as u32,
        );
        if !app.world().contains_resource::<ConfigStore>() {
            app.insert_resource(ConfigStore::new(cfg.engine.clone()));
        }
        if let Some(font) = SampleFont::load(&cfg.font_paths) {
            app.insert_resource(font);
        }

        app.insert_resource(ParticleField::new(viewport))
            .insert_resource(PixelCanvas::new(viewport.x, viewport.y))
            .init_resource::<ConfigDiagnostics>()
            .configure_sets(
                Update,
                (InputSet, SyncSet, SimulateSet, PresentSet).chain(),
            )
            .add_systems(Startup, log_config_diagnostics)
            .add_plugins((
                PresenterPlugin,
                HostInputPlugin,
                ParticleFieldPlugin,
                ControlPanelPlugin,
                DebugPlugin,
                ConfigHotReloadPlugin,
                AutoClosePlugin,
            ));
    }
}

fn log_config_diagnostics(diag: Res<ConfigDiagnostics>, font: Option<Res<SampleFont>>) {
    if diag.used.is_empty() {
        info!(target: "config", "No config files found; using defaults");
    } else {
        info!(target: "config", "Loaded config layers: {:?}", diag.used);
    }
    for e in &diag.errors {
        warn!(target: "config", "CONFIG issue: {e}");
    }
    for w in &diag.warnings {
        warn!(target: "config", "CONFIG warning: {w}");
    }
    match font {
        Some(f) => info!(target: "text_sampler", "Sampling text with {}", f.source()),
        None => warn!(target: "text_sampler", "No usable font; the field stays empty"),
    }
}

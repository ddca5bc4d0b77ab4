use bevy::prelude::*;
use clap::Parser;

use kinetic_type::app::cli::Cli;
use kinetic_type::app::headless::{render_snapshot, SnapshotRequest};
use kinetic_type::app::{ConfigDiagnostics, KineticTypePlugin};
use kinetic_type::interaction::session::config_hot_reload::ConfigReloadSettings;
use kinetic_type::AppConfig;

fn main() -> anyhow::Result<()> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cli = Cli::parse();
    let paths = cli.config_paths();
    let (mut cfg, used, errors) = AppConfig::load_layered(&paths);
    let mut warnings = cli.apply_overrides(&mut cfg);
    warnings.extend(cfg.validate());

    if let Some(output) = &cli.snapshot {
        for problem in errors.iter().chain(&warnings) {
            eprintln!("config: {problem}");
        }
        let report = render_snapshot(
            &cfg,
            &SnapshotRequest {
                output: output.clone(),
                frames: cli.frames,
                seed: cli.seed,
                pointer: cli.pointer,
            },
        )?;
        println!(
            "wrote {} ({} frames, {} particles, {} segments)",
            output.display(),
            cli.frames,
            report.particles,
            report.segments
        );
        return Ok(());
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ConfigDiagnostics {
            used,
            errors,
            warnings,
        })
        .insert_resource(ConfigReloadSettings {
            paths,
            ..default()
        })
        .insert_resource(cfg)
        .add_plugins(KineticTypePlugin)
        .run();
    Ok(())
}

use bevy::prelude::*;
use bevy::window::WindowClosing;

use super::field::{FrameReport, ParticleField};
use super::text_sampler::SampleFont;
use crate::core::config::ConfigStore;
use crate::core::system::frame_loop::FrameLoop;
use crate::core::system::system_order::{SimulateSet, SyncSet};
use crate::rendering::canvas::PixelCanvas;

/// Report of the most recent tick, for readouts and debug stats.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct LastFrame(pub FrameReport);

pub struct ParticleFieldPlugin;

impl Plugin for ParticleFieldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameLoop>()
            .init_resource::<LastFrame>()
            .add_event::<WindowClosing>()
            .add_systems(Update, sync_particles.in_set(SyncSet))
            .add_systems(Update, advance_frame.in_set(SimulateSet))
            .add_systems(Last, stop_frame_loop);
    }
}

/// Rebuilds the set before the next tick when the live config made it stale.
pub fn sync_particles(
    store: Res<ConfigStore>,
    font: Option<Res<SampleFont>>,
    field: Option<ResMut<ParticleField>>,
) {
    let (Some(font), Some(mut field)) = (font, field) else {
        return;
    };
    let cfg = store.get();
    if field.is_stale(cfg) {
        field.rebuild(&font, cfg, &mut rand::thread_rng());
    }
}

/// One frame-loop tick per Bevy frame, timestamped from `Time::elapsed`.
pub fn advance_frame(
    time: Res<Time>,
    store: Res<ConfigStore>,
    mut frame_loop: ResMut<FrameLoop>,
    mut last: ResMut<LastFrame>,
    field: Option<ResMut<ParticleField>>,
    canvas: Option<ResMut<PixelCanvas>>,
) {
    let (Some(mut field), Some(mut canvas)) = (field, canvas) else {
        return;
    };
    let cfg = store.current();
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    let Some(report) = frame_loop.tick(now_ms, |t| field.frame(t, &cfg, &mut *canvas)) else {
        return;
    };
    if let Some(fps) = report.fps {
        debug!(
            target: "frame_loop",
            "fps={fps:.1} particles={} segments={} lines_skipped={}",
            report.particles, report.segments, report.lines_skipped
        );
    }
    last.0 = report;
}

/// Cancels the loop once, on window close or app exit.
fn stop_frame_loop(
    mut exits: EventReader<AppExit>,
    mut closing: EventReader<WindowClosing>,
    mut frame_loop: ResMut<FrameLoop>,
) {
    let exiting = exits.read().count() > 0;
    let closing = closing.read().count() > 0;
    if (exiting || closing) && frame_loop.is_running() {
        frame_loop.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ConfigPatch, EngineConfig};
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new();
        app.insert_resource(Time::<()>::default())
            .insert_resource(ConfigStore::new(EngineConfig {
                text: "HI".into(),
                ..default()
            }))
            .insert_resource(SampleFont::bundled().expect("bundled font"))
            .insert_resource(ParticleField::new(UVec2::new(320, 200)))
            .insert_resource(PixelCanvas::new(320, 200))
            .configure_sets(Update, (SyncSet, SimulateSet).chain())
            .add_plugins(ParticleFieldPlugin);
        app
    }

    fn step(app: &mut App) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(16));
        app.update();
    }

    #[test]
    fn first_update_builds_and_ticks() {
        let mut app = test_app();
        step(&mut app);
        let field = app.world().resource::<ParticleField>();
        assert!(!field.is_empty());
        assert_eq!(app.world().resource::<LastFrame>().0.particles, field.len());
        assert_eq!(app.world().resource::<FrameLoop>().ticks(), 1);
    }

    #[test]
    fn density_change_rebuilds_before_the_next_tick() {
        let mut app = test_app();
        step(&mut app);
        let before = app.world().resource::<ParticleField>().len();
        app.world_mut()
            .resource_mut::<ConfigStore>()
            .apply(&ConfigPatch::density(8));
        step(&mut app);
        let after = app.world().resource::<ParticleField>().len();
        assert!(after < before, "{after} >= {before}");
        assert_eq!(app.world().resource::<LastFrame>().0.particles, after);
    }

    #[test]
    fn app_exit_cancels_the_loop() {
        let mut app = test_app();
        step(&mut app);
        app.world_mut().send_event(AppExit::Success);
        step(&mut app);
        let frame_loop = app.world().resource::<FrameLoop>();
        assert!(!frame_loop.is_running());
        let ticks = frame_loop.ticks();
        step(&mut app);
        assert_eq!(app.world().resource::<FrameLoop>().ticks(), ticks);
    }
}

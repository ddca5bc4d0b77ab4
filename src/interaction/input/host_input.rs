use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::config::ConfigStore;
use crate::core::system::system_order::InputSet;
use crate::gameplay::field::ParticleField;
use crate::gameplay::text_sampler::SampleFont;
use crate::rendering::canvas::PixelCanvas;

/// Feeds pointer position and window size into the particle field.
pub struct HostInputPlugin;

impl Plugin for HostInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (follow_window_size, track_pointer).chain().in_set(InputSet),
        );
    }
}

/// Window size in whole logical pixels, never zero.
pub fn viewport_of(window: &Window) -> UVec2 {
    UVec2::new(
        window.width().round().max(1.0) as u32,
        window.height().round().max(1.0) as u32,
    )
}

/// Resizes field and canvas with the primary window and rebuilds the set
/// right here, so the next tick already draws text centered in the new size.
pub fn follow_window_size(
    windows: Query<&Window, With<PrimaryWindow>>,
    store: Res<ConfigStore>,
    font: Option<Res<SampleFont>>,
    field: Option<ResMut<ParticleField>>,
    canvas: Option<ResMut<PixelCanvas>>,
) {
    let (Ok(window), Some(mut field), Some(mut canvas)) = (windows.single(), field, canvas) else {
        return;
    };
    let viewport = viewport_of(window);
    if viewport == field.viewport() {
        return;
    }
    field.resize(viewport);
    canvas.resize(viewport.x, viewport.y);
    debug!("viewport resized to {}x{}", viewport.x, viewport.y);
    if let Some(font) = font {
        field.rebuild(&font, store.get(), &mut rand::thread_rng());
    }
}

/// Touch beats mouse. Otherwise the window's current cursor position is
/// used, and a cursor outside the window parks the pointer at the sentinel.
pub fn track_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    touches: Option<Res<Touches>>,
    field: Option<ResMut<ParticleField>>,
) {
    let (Ok(window), Some(mut field)) = (windows.single(), field) else {
        return;
    };
    let touch = touches
        .as_ref()
        .and_then(|t| t.iter().next())
        .map(|t| t.position());
    match touch.or_else(|| window.cursor_position()) {
        Some(pos) => field.set_pointer(pos),
        None => field.clear_pointer(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::window::WindowResolution;
    use crate::core::config::EngineConfig;
    use crate::physics::particle::POINTER_SENTINEL;
    use rand::{rngs::StdRng, SeedableRng};

    fn window(width: f32, height: f32) -> (Window, PrimaryWindow) {
        (
            Window {
                resolution: WindowResolution::new(width, height),
                ..default()
            },
            PrimaryWindow,
        )
    }

    fn pointer_app() -> (App, Entity) {
        let mut app = App::new();
        app.insert_resource(ParticleField::new(UVec2::new(100, 100)))
            .add_systems(Update, track_pointer);
        let id = app.world_mut().spawn(window(100.0, 100.0)).id();
        (app, id)
    }

    fn set_cursor(app: &mut App, id: Entity, pos: Option<Vec2>) {
        let mut entity = app.world_mut().entity_mut(id);
        let Some(mut window) = entity.get_mut::<Window>() else {
            panic!("window entity lost");
        };
        window.set_cursor_position(pos);
    }

    fn pointer(app: &App) -> Vec2 {
        app.world().resource::<ParticleField>().pointer()
    }

    #[test]
    fn cursor_moves_then_leaves() {
        let (mut app, id) = pointer_app();
        set_cursor(&mut app, id, Some(Vec2::new(5.0, 6.0)));
        set_cursor(&mut app, id, Some(Vec2::new(40.0, 30.0)));
        app.update();
        assert_eq!(pointer(&app), Vec2::new(40.0, 30.0));

        set_cursor(&mut app, id, None);
        app.update();
        assert_eq!(pointer(&app), POINTER_SENTINEL);
    }

    #[test]
    fn leaving_and_reentering_in_one_frame_keeps_the_last_position() {
        let (mut app, id) = pointer_app();
        set_cursor(&mut app, id, Some(Vec2::new(10.0, 10.0)));
        app.update();
        set_cursor(&mut app, id, None);
        set_cursor(&mut app, id, Some(Vec2::new(40.0, 30.0)));
        app.update();
        assert_eq!(pointer(&app), Vec2::new(40.0, 30.0));
    }

    #[test]
    fn resize_rebuilds_the_field_in_the_same_system() {
        let cfg = EngineConfig {
            text: "AB".into(),
            ..default()
        };
        let font = SampleFont::bundled().expect("bundled font");
        let mut field = ParticleField::new(UVec2::new(400, 300));
        field.rebuild(&font, &cfg, &mut StdRng::seed_from_u64(5));
        let old_count = field.len();

        let mut app = App::new();
        app.insert_resource(ConfigStore::new(cfg.clone()))
            .insert_resource(font)
            .insert_resource(field)
            .insert_resource(PixelCanvas::new(400, 300))
            .add_systems(Update, follow_window_size);
        app.world_mut().spawn(window(800.0, 600.0));
        app.update();

        let field = app.world().resource::<ParticleField>();
        assert_eq!(field.viewport(), UVec2::new(800, 600));
        assert!(!field.is_stale(&cfg));
        let (lo, hi) = field.particles().iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(p.home), hi.max(p.home)),
        );
        let center = (lo + hi) * 0.5;
        assert!((center.x - 400.0).abs() <= cfg.density as f32, "center {center}");
        assert!((center.y - 300.0).abs() <= cfg.density as f32, "center {center}");
        assert!(field.len() > old_count);
        let canvas = app.world().resource::<PixelCanvas>();
        assert_eq!(canvas.image().dimensions(), (800, 600));

        // Same size again: no rebuild.
        let homes: Vec<Vec2> = field.particles().iter().map(|p| p.home).collect();
        app.update();
        let field = app.world().resource::<ParticleField>();
        assert_eq!(field.particles().iter().map(|p| p.home).collect::<Vec<_>>(), homes);
    }

    #[test]
    fn viewport_never_hits_zero() {
        let mut window = Window::default();
        window.resolution.set(0.2, 600.0);
        assert_eq!(viewport_of(&window), UVec2::new(1, 600));
    }
}

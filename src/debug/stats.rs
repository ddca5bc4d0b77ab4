use bevy::prelude::*;

use crate::gameplay::systems::LastFrame;

#[derive(Resource, Debug)]
pub struct DebugState {
    pub overlay_visible: bool,
    pub log_interval: f32,
    pub time_accum: f32,
    pub frame_counter: u64,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            overlay_visible: false,
            log_interval: 1.0,
            time_accum: 0.0,
            frame_counter: 0,
        }
    }
}

/// Smoothed host frame timing plus the latest field report.
#[derive(Resource, Debug, Default)]
pub struct DebugStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub particles: usize,
    pub segments: usize,
    pub lines_skipped: bool,
}

#[derive(Component)]
pub(crate) struct DebugOverlayText;

pub fn debug_key_input_system(keys: Option<Res<ButtonInput<KeyCode>>>, mut state: ResMut<DebugState>) {
    if keys.is_some_and(|k| k.just_pressed(KeyCode::F3)) {
        state.overlay_visible = !state.overlay_visible;
    }
}

pub fn debug_stats_collect_system(
    time: Res<Time>,
    last: Option<Res<LastFrame>>,
    mut state: ResMut<DebugState>,
    mut stats: ResMut<DebugStats>,
) {
    state.frame_counter += 1;
    let dt = time.delta_secs().max(1e-6);
    let inst_fps = 1.0 / dt;
    if stats.fps == 0.0 {
        stats.fps = inst_fps;
    } else {
        stats.fps = stats.fps * 0.9 + inst_fps * 0.1;
    }
    let inst_ms = dt * 1000.0;
    if stats.frame_time_ms == 0.0 {
        stats.frame_time_ms = inst_ms;
    } else {
        stats.frame_time_ms = stats.frame_time_ms * 0.9 + inst_ms * 0.1;
    }
    if let Some(last) = last {
        stats.particles = last.0.particles;
        stats.segments = last.0.segments;
        stats.lines_skipped = last.0.lines_skipped;
    }
}

pub fn debug_logging_system(time: Res<Time>, mut state: ResMut<DebugState>, stats: Res<DebugStats>) {
    state.time_accum += time.delta_secs();
    if state.time_accum >= state.log_interval {
        state.time_accum = 0.0;
        info!(
            "SIM frame={} t={:.3}s fps={:.1} ft_ms={:.1} particles={} segments={} lines_skipped={}",
            state.frame_counter,
            time.elapsed_secs(),
            stats.fps,
            stats.frame_time_ms,
            stats.particles,
            stats.segments,
            stats.lines_skipped
        );
    }
}

pub(crate) fn debug_overlay_spawn(mut commands: Commands) {
    commands.spawn((
        Text::new(String::new()),
        TextFont {
            font_size: 12.0,
            ..Default::default()
        },
        TextColor(Color::srgb(0.75, 0.85, 0.95)),
        bevy::ui::Node {
            position_type: bevy::ui::PositionType::Absolute,
            top: Val::Px(4.0),
            right: Val::Px(6.0),
            ..Default::default()
        },
        DebugOverlayText,
    ));
}

pub(crate) fn debug_overlay_update(
    state: Res<DebugState>,
    stats: Res<DebugStats>,
    mut q_text: Query<&mut Text, With<DebugOverlayText>>,
) {
    let Ok(mut text) = q_text.single_mut() else {
        return;
    };
    if !state.overlay_visible {
        if !text.0.is_empty() {
            text.0.clear();
        }
        return;
    }
    text.0 = format!(
        "FPS {:.1} ft {:.1}ms particles {} segments {}{}",
        stats.fps,
        stats.frame_time_ms,
        stats.particles,
        stats.segments,
        if stats.lines_skipped { " (lines skipped)" } else { "" }
    );
}

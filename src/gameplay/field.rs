//! The particle set plus the per-frame simulate-and-draw pass.

use bevy::color::Srgba;
use bevy::prelude::*;
use rand::Rng;

use super::fps_meter::FpsMeter;
use super::text_sampler::{spawn_particles, SampleFont};
use crate::core::config::EngineConfig;
use crate::physics::particle::{Particle, POINTER_SENTINEL};
use crate::rendering::palette::palette::color_for_index;
use crate::rendering::surface::{DrawSurface, Dot, Segment};

pub const GLOW_BLUR: f32 = 10.0;
/// Proximity lines are skipped entirely at or above this many particles.
pub const LINE_PARTICLE_LIMIT: usize = 2500;
/// Only every Nth particle takes part in the proximity test (both loops).
pub const LINE_STRIDE: usize = 4;
pub const LINE_MAX_DIST: f32 = 45.0;
pub const LINE_WIDTH: f32 = 0.4;
pub const LINE_COLOR: Srgba = Srgba::new(1.0, 1.0, 1.0, 0.15);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub fps: Option<f32>,
    pub particles: usize,
    pub segments: usize,
    pub lines_skipped: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct BuildKey {
    config: EngineConfig,
    viewport: UVec2,
}

#[derive(Resource, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    pointer: Vec2,
    viewport: UVec2,
    fps: FpsMeter,
    built: Option<BuildKey>,
    // Scratch buffers reused across frames.
    batches: Vec<Vec<Dot>>,
    segments: Vec<Segment>,
}

impl ParticleField {
    pub fn new(viewport: UVec2) -> Self {
        Self {
            particles: Vec::new(),
            pointer: POINTER_SENTINEL,
            viewport,
            fps: FpsMeter::default(),
            built: None,
            batches: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Field over an explicit particle set (the sampler is bypassed).
    pub fn from_particles(viewport: UVec2, particles: Vec<Particle>) -> Self {
        Self {
            particles,
            ..Self::new(viewport)
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    /// Parks the pointer far off-surface so it no longer repels anything.
    pub fn clear_pointer(&mut self) {
        self.pointer = POINTER_SENTINEL;
    }

    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    pub fn resize(&mut self, viewport: UVec2) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        true
    }

    pub fn last_fps(&self) -> Option<f32> {
        self.fps.last_report()
    }

    /// True when the set was never built, or was built for a different
    /// viewport or for config values baked into the particles.
    pub fn is_stale(&self, cfg: &EngineConfig) -> bool {
        match &self.built {
            None => true,
            Some(key) => key.viewport != self.viewport || key.config.needs_rebuild(cfg),
        }
    }

    /// Discards the set and samples a new one. Returns the particle count.
    pub fn rebuild<R: Rng + ?Sized>(
        &mut self,
        font: &SampleFont,
        cfg: &EngineConfig,
        rng: &mut R,
    ) -> usize {
        let seeds = font.sample(&cfg.text, self.viewport, cfg.density);
        self.particles = spawn_particles(&seeds, cfg, self.viewport, rng);
        self.built = Some(BuildKey {
            config: cfg.clone(),
            viewport: self.viewport,
        });
        info!(
            target: "text_sampler",
            "rebuilt particle field text=\"{}\" density={} viewport={}x{} particles={}",
            cfg.text, cfg.density, self.viewport.x, self.viewport.y, self.particles.len()
        );
        self.particles.len()
    }

    /// One tick: clear, simulate, draw dots per color, then optional lines.
    pub fn frame<S: DrawSurface + ?Sized>(
        &mut self,
        time_ms: f64,
        cfg: &EngineConfig,
        surface: &mut S,
    ) -> FrameReport {
        let fps = self.fps.tick(time_ms);

        if cfg.trail_alpha >= 1.0 {
            surface.clear();
        } else {
            surface.fade(cfg.trail_alpha);
        }
        surface.set_glow(cfg.use_glow.then_some(GLOW_BLUR));

        let slots = cfg.palette.len().max(1);
        self.batches.resize_with(slots, Vec::new);
        for batch in &mut self.batches {
            batch.clear();
        }
        for p in &mut self.particles {
            p.update(
                self.pointer,
                cfg.repulsion_radius,
                cfg.repulsion_strength,
                time_ms,
            );
            self.batches[p.swatch % slots].push(Dot {
                center: p.position,
                radius: p.radius,
            });
        }
        for (slot, batch) in self.batches.iter().enumerate() {
            if !batch.is_empty() {
                surface.fill_dots(color_for_index(&cfg.palette, slot), batch);
            }
        }

        self.segments.clear();
        let mut lines_skipped = false;
        if cfg.show_lines {
            if self.particles.len() < LINE_PARTICLE_LIMIT {
                collect_proximity_segments(&self.particles, &mut self.segments);
                surface.stroke_segments(LINE_COLOR, LINE_WIDTH, &self.segments);
            } else {
                lines_skipped = true;
            }
        }

        FrameReport {
            fps,
            particles: self.particles.len(),
            segments: self.segments.len(),
            lines_skipped,
        }
    }
}

/// Pairs `(i, j)` with `i` and `j - i - 1` both multiples of [`LINE_STRIDE`]
/// that sit closer than [`LINE_MAX_DIST`].
pub fn collect_proximity_segments(particles: &[Particle], out: &mut Vec<Segment>) {
    let max_sq = LINE_MAX_DIST * LINE_MAX_DIST;
    for i in (0..particles.len()).step_by(LINE_STRIDE) {
        let a = particles[i].position;
        for j in (i + 1..particles.len()).step_by(LINE_STRIDE) {
            let b = particles[j].position;
            if a.distance_squared(b) < max_sq {
                out.push(Segment { from: a, to: b });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::surface::{DrawCommand, RecordingSurface};

    fn grid(n: usize, spacing: f32) -> Vec<Particle> {
        (0..n)
            .map(|i| {
                let home = Vec2::new((i % 50) as f32 * spacing, (i / 50) as f32 * spacing);
                Particle::new(home, home, 2.0, i % 4, i as u32, 0.95, 0.08)
            })
            .collect()
    }

    #[test]
    fn frame_draws_one_batch_per_used_color() {
        let mut field = ParticleField::from_particles(UVec2::new(800, 600), grid(40, 10.0));
        let mut surface = RecordingSurface::new(800, 600);
        let report = field.frame(16.0, &EngineConfig::default(), &mut surface);
        assert_eq!(report.particles, 40);
        let cmds = surface.take();
        assert_eq!(cmds[0], DrawCommand::Clear);
        assert_eq!(cmds[1], DrawCommand::Glow(Some(GLOW_BLUR)));
        let fills: Vec<usize> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillDots { count, .. } => Some(*count),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![10, 10, 10, 10]);
    }

    #[test]
    fn lines_are_skipped_for_big_sets() {
        let cfg = EngineConfig {
            show_lines: true,
            ..default()
        };
        let mut big = ParticleField::from_particles(UVec2::new(800, 600), grid(LINE_PARTICLE_LIMIT, 2.0));
        let mut surface = RecordingSurface::new(800, 600);
        let report = big.frame(16.0, &cfg, &mut surface);
        assert!(report.lines_skipped);
        assert!(!surface
            .take()
            .iter()
            .any(|c| matches!(c, DrawCommand::StrokeSegments { .. })));

        let mut small = ParticleField::from_particles(UVec2::new(800, 600), grid(LINE_PARTICLE_LIMIT - 1, 2.0));
        let report = small.frame(16.0, &cfg, &mut surface);
        assert!(!report.lines_skipped);
        assert!(report.segments > 0);
    }

    #[test]
    fn proximity_pairs_use_the_stride() {
        let ps: Vec<Particle> = (0..9)
            .map(|i| Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 0, i, 0.9, 0.1))
            .collect();
        let mut out = Vec::new();
        collect_proximity_segments(&ps, &mut out);
        // (0,1) (0,5) (4,5)
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn trail_alpha_only_swaps_the_clear_step() {
        let cfg = EngineConfig {
            trail_alpha: 0.08,
            use_glow: false,
            ..default()
        };
        let mut field = ParticleField::from_particles(UVec2::new(100, 100), grid(8, 5.0));
        let mut surface = RecordingSurface::new(100, 100);
        field.frame(16.0, &cfg, &mut surface);
        let cmds = surface.take();
        assert_eq!(cmds[0], DrawCommand::Fade(0.08));
        assert_eq!(cmds[1], DrawCommand::Glow(None));
        assert!(!cmds[2..]
            .iter()
            .any(|c| matches!(c, DrawCommand::Clear | DrawCommand::Fade(_))));
    }

    #[test]
    fn pointer_defaults_to_sentinel() {
        let mut field = ParticleField::new(UVec2::new(10, 10));
        assert_eq!(field.pointer(), POINTER_SENTINEL);
        field.set_pointer(Vec2::new(3.0, 4.0));
        field.clear_pointer();
        assert_eq!(field.pointer(), POINTER_SENTINEL);
    }

    #[test]
    fn staleness_tracks_viewport_and_baked_fields() {
        let font = SampleFont::bundled().unwrap();
        let mut rng = rand::thread_rng();
        let cfg = EngineConfig::default();
        let mut field = ParticleField::new(UVec2::new(320, 200));
        assert!(field.is_stale(&cfg));
        field.rebuild(&font, &cfg, &mut rng);
        assert!(!field.is_stale(&cfg));
        let glow_off = EngineConfig { use_glow: false, ..cfg.clone() };
        assert!(!field.is_stale(&glow_off));
        let retexted = EngineConfig { text: "HEY".into(), ..cfg.clone() };
        assert!(field.is_stale(&retexted));
        field.resize(UVec2::new(640, 200));
        assert!(field.is_stale(&cfg));
    }
}

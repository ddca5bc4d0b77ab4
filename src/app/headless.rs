//! Runs the frame loop without a window and writes the canvas to a PNG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::math::{UVec2, Vec2};
use rand::{rngs::StdRng, SeedableRng};

use crate::core::config::AppConfig;
use crate::core::system::frame_loop::{FrameLoop, SyntheticTicks};
use crate::gameplay::field::{FrameReport, ParticleField};
use crate::gameplay::text_sampler::SampleFont;
use crate::rendering::canvas::PixelCanvas;

pub const SNAPSHOT_HZ: f64 = 60.0;

#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    pub output: PathBuf,
    pub frames: u32,
    pub seed: u64,
    pub pointer: Option<Vec2>,
}

/// Simulates `frames` ticks at 60 Hz and saves the last one.
pub fn render_snapshot(cfg: &AppConfig, req: &SnapshotRequest) -> Result<FrameReport> {
    let font = SampleFont::load(&cfg.font_paths).context("no usable font for text sampling")?;
    let viewport = UVec2::new(
        cfg.window.width.max(1.0) as u32,
        cfg.window.height.max(1.0) as u32,
    );
    let engine = cfg.engine.clone().normalized();
    let mut field = ParticleField::new(viewport);
    let mut canvas = PixelCanvas::new(viewport.x, viewport.y);
    let mut rng = StdRng::seed_from_u64(req.seed);
    field.rebuild(&font, &engine, &mut rng);
    if let Some(p) = req.pointer {
        field.set_pointer(p);
    }

    let mut frame_loop = FrameLoop::new();
    let mut last = FrameReport {
        particles: field.len(),
        ..Default::default()
    };
    frame_loop.drive(
        SyntheticTicks::at_hz(SNAPSHOT_HZ, req.frames as usize),
        |_, t| {
            last = field.frame(t, &engine, &mut canvas);
        },
    );
    frame_loop.cancel();

    if let Some(dir) = req.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create snapshot directory {}", dir.display()))?;
    }
    canvas
        .image()
        .save(&req.output)
        .with_context(|| format!("write snapshot {}", req.output.display()))?;
    Ok(last)
}

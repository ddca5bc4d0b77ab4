//! What the particle field needs from a 2D raster target.

use bevy::color::Srgba;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub center: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

/// Raster target for one frame. Calls arrive in draw order.
pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Full clear to the background.
    fn clear(&mut self);
    /// Composite black at `alpha` over the whole surface (motion trails).
    fn fade(&mut self, alpha: f32);
    /// Blur radius for the glow around subsequent fills; `None` disables it.
    fn set_glow(&mut self, blur: Option<f32>);
    /// One filled batch; the glow (when enabled) takes the same color.
    fn fill_dots(&mut self, color: Srgba, dots: &[Dot]);
    /// One stroked batch of independent segments.
    fn stroke_segments(&mut self, color: Srgba, width: f32, segments: &[Segment]);
}

/// Records calls instead of drawing; used by tests and the debug stats.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Fade(f32),
    Glow(Option<f32>),
    FillDots { color: Srgba, count: usize },
    StrokeSegments { color: Srgba, width: f32, count: usize },
}

#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub size: UVec2,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: UVec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.size.x
    }
    fn height(&self) -> u32 {
        self.size.y
    }
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }
    fn fade(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::Fade(alpha));
    }
    fn set_glow(&mut self, blur: Option<f32>) {
        self.commands.push(DrawCommand::Glow(blur));
    }
    fn fill_dots(&mut self, color: Srgba, dots: &[Dot]) {
        self.commands.push(DrawCommand::FillDots {
            color,
            count: dots.len(),
        });
    }
    fn stroke_segments(&mut self, color: Srgba, width: f32, segments: &[Segment]) {
        self.commands.push(DrawCommand::StrokeSegments {
            color,
            width,
            count: segments.len(),
        });
    }
}

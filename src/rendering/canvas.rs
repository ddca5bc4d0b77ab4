// This file is part of Kinetic Type.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! CPU raster target backed by an `image::RgbaImage`.
//!
//! The buffer stays opaque: "clear" paints the black background and trails
//! darken it in place, so the presenter can upload the bytes as-is.

use bevy::color::Srgba;
use bevy::prelude::*;
use image::{Rgba, RgbaImage};

use super::surface::{DrawSurface, Dot, Segment};

pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Peak opacity of the glow halo right at the dot's edge.
const GLOW_PEAK: f32 = 0.45;

#[derive(Resource, Debug, Clone)]
pub struct PixelCanvas {
    image: RgbaImage,
    glow: Option<f32>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), BACKGROUND),
            glow: None,
        }
    }

    /// Reallocates (and clears) only when the size actually changes.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let (w, h) = (width.max(1), height.max(1));
        if self.image.dimensions() == (w, h) {
            return false;
        }
        self.image = RgbaImage::from_pixel(w, h, BACKGROUND);
        true
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    #[inline]
    fn blend(&mut self, x: i32, y: i32, rgb: [f32; 3], alpha: f32) {
        if x < 0 || y < 0 || alpha <= 0.0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }
        let a = alpha.min(1.0);
        let px = self.image.get_pixel_mut(x, y);
        for c in 0..3 {
            let dst = px.0[c] as f32;
            px.0[c] = (dst + (rgb[c] * 255.0 - dst) * a).round().clamp(0.0, 255.0) as u8;
        }
    }

    fn halo(&mut self, dot: &Dot, rgb: [f32; 3], blur: f32) {
        let reach = dot.radius + blur * 0.5;
        let span = blur * 0.5;
        self.for_each_pixel_near(dot.center, reach, |canvas, x, y, d| {
            if d <= dot.radius || span <= 0.0 {
                return;
            }
            let t = (1.0 - (d - dot.radius) / span).max(0.0);
            canvas.blend(x, y, rgb, GLOW_PEAK * t * t);
        });
    }

    fn disc(&mut self, dot: &Dot, rgb: [f32; 3]) {
        self.for_each_pixel_near(dot.center, dot.radius + 0.5, |canvas, x, y, d| {
            let coverage = (dot.radius + 0.5 - d).clamp(0.0, 1.0);
            canvas.blend(x, y, rgb, coverage);
        });
    }

    /// Visits pixels whose centers lie within `reach` of `center`.
    fn for_each_pixel_near(
        &mut self,
        center: Vec2,
        reach: f32,
        mut visit: impl FnMut(&mut Self, i32, i32, f32),
    ) {
        if !center.is_finite() {
            return;
        }
        let min_x = (center.x - reach).floor().max(0.0) as i32;
        let min_y = (center.y - reach).floor().max(0.0) as i32;
        let max_x = ((center.x + reach).ceil() as i32).min(self.image.width() as i32 - 1);
        let max_y = ((center.y + reach).ceil() as i32).min(self.image.height() as i32 - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                if d <= reach {
                    visit(self, x, y, d);
                }
            }
        }
    }
}

fn rgb_of(color: Srgba) -> [f32; 3] {
    [color.red, color.green, color.blue]
}

impl DrawSurface for PixelCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = BACKGROUND;
        }
    }

    fn fade(&mut self, alpha: f32) {
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for px in self.image.pixels_mut() {
            for c in 0..3 {
                // Truncate so faint trails reach true black.
                px.0[c] = (px.0[c] as f32 * keep) as u8;
            }
        }
    }

    fn set_glow(&mut self, blur: Option<f32>) {
        self.glow = blur.filter(|b| *b > 0.0);
    }

    fn fill_dots(&mut self, color: Srgba, dots: &[Dot]) {
        let rgb = rgb_of(color);
        let alpha = color.alpha;
        if let Some(blur) = self.glow {
            for dot in dots {
                self.halo(dot, rgb, blur);
            }
        }
        for dot in dots {
            if alpha >= 1.0 {
                self.disc(dot, rgb);
            } else {
                let inner = *dot;
                self.for_each_pixel_near(inner.center, inner.radius + 0.5, |canvas, x, y, d| {
                    let coverage = (inner.radius + 0.5 - d).clamp(0.0, 1.0);
                    canvas.blend(x, y, rgb, coverage * alpha);
                });
            }
        }
    }

    fn stroke_segments(&mut self, color: Srgba, width: f32, segments: &[Segment]) {
        let rgb = rgb_of(color);
        let alpha = color.alpha * width.clamp(0.0, 1.0);
        for seg in segments {
            let delta = seg.to - seg.from;
            if !delta.is_finite() {
                continue;
            }
            let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u32;
            for i in 0..=steps {
                let p = seg.from + delta * (i as f32 / steps as f32);
                self.blend(p.x.floor() as i32, p.y.floor() as i32, rgb, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_paint_their_color() {
        let mut c = PixelCanvas::new(20, 20);
        c.fill_dots(
            Srgba::rgb(1.0, 0.0, 0.0),
            &[Dot { center: Vec2::new(10.0, 10.0), radius: 2.0 }],
        );
        assert_eq!(c.image().get_pixel(9, 9).0, [255, 0, 0, 255]);
        assert_eq!(c.image().get_pixel(0, 0).0, BACKGROUND.0);
    }

    #[test]
    fn glow_spills_past_the_radius() {
        let dot = Dot { center: Vec2::new(10.0, 10.0), radius: 1.5 };
        let mut plain = PixelCanvas::new(20, 20);
        plain.fill_dots(Srgba::WHITE, &[dot]);
        let mut glowing = PixelCanvas::new(20, 20);
        glowing.set_glow(Some(10.0));
        glowing.fill_dots(Srgba::WHITE, &[dot]);
        assert_eq!(plain.image().get_pixel(13, 10).0[0], 0);
        assert!(glowing.image().get_pixel(13, 10).0[0] > 0);
    }

    #[test]
    fn fade_decays_to_black() {
        let mut c = PixelCanvas::new(4, 4);
        c.fill_dots(Srgba::WHITE, &[Dot { center: Vec2::new(2.0, 2.0), radius: 3.0 }]);
        for _ in 0..200 {
            c.fade(0.08);
        }
        assert!(c.image().pixels().all(|p| p.0 == BACKGROUND.0));
    }

    #[test]
    fn segments_leave_a_faint_trace() {
        let mut c = PixelCanvas::new(50, 10);
        c.stroke_segments(
            Srgba::new(1.0, 1.0, 1.0, 0.15),
            0.4,
            &[Segment { from: Vec2::new(1.0, 5.0), to: Vec2::new(40.0, 5.0) }],
        );
        let v = c.image().get_pixel(20, 5).0[0];
        assert!(v > 0 && v < 64, "got {v}");
    }

    #[test]
    fn offscreen_drawing_is_ignored() {
        let mut c = PixelCanvas::new(8, 8);
        c.fill_dots(Srgba::WHITE, &[Dot { center: Vec2::new(-50.0, 400.0), radius: 2.0 }]);
        c.stroke_segments(
            Srgba::WHITE,
            1.0,
            &[Segment { from: Vec2::new(-10.0, -10.0), to: Vec2::new(-1.0, -3.0) }],
        );
        assert!(c.image().pixels().all(|p| p.0 == BACKGROUND.0));
    }

    #[test]
    fn resize_is_lazy() {
        let mut c = PixelCanvas::new(8, 8);
        assert!(!c.resize(8, 8));
        assert!(c.resize(16, 4));
        assert_eq!((c.width(), c.height()), (16, 4));
    }
}

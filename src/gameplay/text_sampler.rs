use std::fmt;
use std::ops::Range;
use std::path::Path;

use ab_glyph::{point, Font, FontArc, GlyphId, OutlinedGlyph, PxScale, ScaleFont};
use bevy::prelude::*;
use image::GrayImage;
use rand::Rng;

use crate::core::config::EngineConfig;
use crate::physics::particle::Particle;

/// Bold sans face shipped with the crate; used when no configured font loads.
pub const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
pub const BUNDLED_FONT_NAME: &str = "bundled:DejaVuSans-Bold";

pub const MAX_FONT_PX: f32 = 250.0;
/// Sampled pixels must be strictly more opaque than this to seed a particle.
pub const INK_THRESHOLD: u8 = 128;
pub const RADIUS_RANGE: Range<f32> = 1.2..2.7;

/// Font used to rasterize the text mask.
#[derive(Resource, Clone)]
pub struct SampleFont {
    font: FontArc,
    source: String,
}

impl fmt::Debug for SampleFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleFont").field("source", &self.source).finish()
    }
}

impl SampleFont {
    pub fn bundled() -> Result<Self, ab_glyph::InvalidFont> {
        Ok(Self {
            font: FontArc::try_from_slice(BUNDLED_FONT)?,
            source: BUNDLED_FONT_NAME.into(),
        })
    }

    /// Tries each path in order, then the bundled face.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Option<Self> {
        for path in paths {
            let path = path.as_ref();
            let Ok(bytes) = std::fs::read(path) else {
                debug!(target: "text_sampler", "font '{}' not readable; trying next", path.display());
                continue;
            };
            match FontArc::try_from_vec(bytes) {
                Ok(font) => {
                    info!(target: "text_sampler", "Loaded font '{}' for text sampling", path.display());
                    return Some(Self {
                        font,
                        source: path.display().to_string(),
                    });
                }
                Err(e) => warn!(target: "text_sampler", "Failed to parse font '{}': {e}", path.display()),
            }
        }
        match Self::bundled() {
            Ok(f) => {
                info!(target: "text_sampler", "Using {BUNDLED_FONT_NAME} for text sampling");
                Some(f)
            }
            Err(e) => {
                warn!(target: "text_sampler", "Bundled font unusable ({e}); text sampling disabled");
                None
            }
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Seed points for `text` laid out in a `viewport`-sized bitmap.
    pub fn sample(&self, text: &str, viewport: UVec2, density: u32) -> Vec<Vec2> {
        let mask = render_text_mask(self, text, viewport);
        sample_seeds(&mask, density)
    }
}

/// Em size for `char_count` characters across `viewport_width`, capped at [`MAX_FONT_PX`].
pub fn font_px_for(viewport_width: f32, char_count: usize) -> f32 {
    (viewport_width * 1.8 / (char_count as f32 + 1.0)).min(MAX_FONT_PX)
}

/// White-on-transparent coverage mask of `text`, ink centered in the viewport.
pub fn render_text_mask(font: &SampleFont, text: &str, viewport: UVec2) -> GrayImage {
    let mut mask = GrayImage::new(viewport.x, viewport.y);
    if text.trim().is_empty() || viewport.x == 0 || viewport.y == 0 {
        return mask;
    }
    let f = &font.font;
    let em_px = font_px_for(viewport.x as f32, text.chars().count());
    // ab_glyph scales by ascent-descent height; convert from em size.
    let units_per_em = f.units_per_em().unwrap_or_else(|| f.height_unscaled());
    let scale = PxScale::from(em_px * f.height_unscaled() / units_per_em);
    let scaled = f.as_scaled(scale);

    let mut caret = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    let mut outlined: Vec<OutlinedGlyph> = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, 0.0));
        caret += scaled.h_advance(id);
        prev = Some(id);
        if let Some(og) = f.outline_glyph(glyph) {
            outlined.push(og);
        }
    }
    let Some(first) = outlined.first() else {
        return mask;
    };

    let mut min = first.px_bounds().min;
    let mut max = first.px_bounds().max;
    for og in &outlined[1..] {
        let b = og.px_bounds();
        min.x = min.x.min(b.min.x);
        min.y = min.y.min(b.min.y);
        max.x = max.x.max(b.max.x);
        max.y = max.y.max(b.max.y);
    }
    let offset = Vec2::new(
        viewport.x as f32 * 0.5 - (min.x + max.x) * 0.5,
        viewport.y as f32 * 0.5 - (min.y + max.y) * 0.5,
    )
    .round();

    let (w, h) = (viewport.x as i32, viewport.y as i32);
    for og in &outlined {
        let b = og.px_bounds();
        let ox = (b.min.x + offset.x) as i32;
        let oy = (b.min.y + offset.y) as i32;
        og.draw(|x, y, coverage| {
            let px = ox + x as i32;
            let py = oy + y as i32;
            if px < 0 || py < 0 || px >= w || py >= h {
                return;
            }
            let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            let cell = mask.get_pixel_mut(px as u32, py as u32);
            cell.0[0] = cell.0[0].max(alpha);
        });
    }
    mask
}

/// Row-major scan with `density` stride on both axes; one seed per inked sample.
pub fn sample_seeds(mask: &GrayImage, density: u32) -> Vec<Vec2> {
    let stride = density.max(1) as usize;
    let mut seeds = Vec::new();
    for y in (0..mask.height()).step_by(stride) {
        for x in (0..mask.width()).step_by(stride) {
            if mask.get_pixel(x, y).0[0] > INK_THRESHOLD {
                seeds.push(Vec2::new(x as f32, y as f32));
            }
        }
    }
    seeds
}

/// One particle per seed, scattered over the viewport so the set gathers
/// into the text over the first frames.
pub fn spawn_particles<R: Rng + ?Sized>(
    seeds: &[Vec2],
    cfg: &EngineConfig,
    viewport: UVec2,
    rng: &mut R,
) -> Vec<Particle> {
    let w = viewport.x.max(1) as f32;
    let h = viewport.y.max(1) as f32;
    let swatches = cfg.palette.len();
    seeds
        .iter()
        .enumerate()
        .map(|(id, home)| {
            let start = Vec2::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
            let radius = rng.gen_range(RADIUS_RANGE);
            let swatch = if swatches > 1 { rng.gen_range(0..swatches) } else { 0 };
            Particle::new(start, *home, radius, swatch, id as u32, cfg.friction, cfg.ease)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn font() -> SampleFont {
        SampleFont::bundled().expect("bundled font parses")
    }

    #[test]
    fn font_size_caps_at_250() {
        assert_eq!(font_px_for(800.0, 2), 250.0);
        assert!((font_px_for(800.0, 11) - 120.0).abs() < 1e-3);
    }

    #[test]
    fn blank_text_has_no_seeds() {
        let f = font();
        assert!(f.sample("", UVec2::new(320, 200), 4).is_empty());
        assert!(f.sample("   ", UVec2::new(320, 200), 4).is_empty());
    }

    #[test]
    fn seeds_lie_on_the_stride_grid() {
        let seeds = font().sample("HI", UVec2::new(400, 300), 5);
        assert!(!seeds.is_empty());
        for s in &seeds {
            assert_eq!(s.x as u32 % 5, 0);
            assert_eq!(s.y as u32 % 5, 0);
        }
    }

    #[test]
    fn sampling_is_reproducible() {
        let f = font();
        let a = f.sample("CODE", UVec2::new(640, 360), 4);
        let b = f.sample("CODE", UVec2::new(640, 360), 4);
        assert_eq!(a, b);
    }

    #[test]
    fn threshold_is_strict() {
        let mut mask = GrayImage::new(4, 1);
        mask.put_pixel(0, 0, image::Luma([128]));
        mask.put_pixel(2, 0, image::Luma([129]));
        assert_eq!(sample_seeds(&mask, 1), vec![Vec2::new(2.0, 0.0)]);
    }

    #[test]
    fn spawned_particles_follow_the_config() {
        let cfg = EngineConfig::default();
        let seeds = vec![Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), Vec2::new(50.0, 60.0)];
        let mut rng = StdRng::seed_from_u64(7);
        let viewport = UVec2::new(100, 80);
        let ps = spawn_particles(&seeds, &cfg, viewport, &mut rng);
        assert_eq!(ps.len(), 3);
        for (i, p) in ps.iter().enumerate() {
            assert_eq!(p.id, i as u32);
            assert_eq!(p.home, seeds[i]);
            assert!(RADIUS_RANGE.contains(&p.radius));
            assert!(p.position.x >= 0.0 && p.position.x < 100.0);
            assert!(p.position.y >= 0.0 && p.position.y < 80.0);
            assert!(p.swatch < cfg.palette.len());
            assert_eq!(p.velocity, Vec2::ZERO);
            assert_eq!((p.friction, p.ease), (cfg.friction, cfg.ease));
        }
    }
}

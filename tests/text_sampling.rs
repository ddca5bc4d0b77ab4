use bevy::prelude::*;
use kinetic_type::gameplay::text_sampler::{font_px_for, spawn_particles, SampleFont, MAX_FONT_PX};
use kinetic_type::EngineConfig;
use rand::{rngs::StdRng, SeedableRng};

fn bounds(seeds: &[Vec2]) -> (Vec2, Vec2) {
    seeds.iter().fold(
        (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
        |(lo, hi), s| (lo.min(*s), hi.max(*s)),
    )
}

#[test]
fn ab_is_centered_within_one_stride() {
    let font = SampleFont::bundled().expect("bundled font");
    let viewport = UVec2::new(800, 600);
    let seeds = font.sample("AB", viewport, 4);
    assert!(!seeds.is_empty());
    let (lo, hi) = bounds(&seeds);
    let center = (lo + hi) * 0.5;
    assert!((center.x - 400.0).abs() <= 4.0, "horizontal center {}", center.x);
    assert!((center.y - 300.0).abs() <= 4.0, "vertical center {}", center.y);
    for s in &seeds {
        assert!(s.x >= 0.0 && s.x < 800.0 && s.y >= 0.0 && s.y < 600.0);
    }
}

#[test]
fn coarser_stride_gives_fewer_particles() {
    let font = SampleFont::bundled().expect("bundled font");
    let viewport = UVec2::new(800, 600);
    let dense = font.sample("CODE", viewport, 3).len();
    let sparse = font.sample("CODE", viewport, 6).len();
    assert!(sparse < dense, "{sparse} >= {dense}");
}

#[test]
fn seed_count_is_deterministic_for_same_inputs() {
    let font = SampleFont::bundled().expect("bundled font");
    let viewport = UVec2::new(1024, 400);
    let a = font.sample("KINETIC", viewport, 4);
    let b = font.sample("KINETIC", viewport, 4);
    assert_eq!(a.len(), b.len());

    let cfg = EngineConfig::default();
    let p1 = spawn_particles(&a, &cfg, viewport, &mut StdRng::seed_from_u64(1));
    let p2 = spawn_particles(&a, &cfg, viewport, &mut StdRng::seed_from_u64(2));
    assert_eq!(p1.len(), p2.len());
    assert!(p1.iter().zip(&p2).all(|(x, y)| x.home == y.home));
}

#[test]
fn twelve_characters_use_the_width_scaled_size() {
    assert!((font_px_for(800.0, 12) - 800.0 * 1.8 / 13.0).abs() < 1e-3);
    assert_eq!(font_px_for(2000.0, 2), MAX_FONT_PX);

    let font = SampleFont::bundled().expect("bundled font");
    let viewport = UVec2::new(800, 600);
    let seeds = font.sample("IIIIIIIIIIII", viewport, 3);
    assert!(!seeds.is_empty());
    let (lo, hi) = bounds(&seeds);
    let center = (lo + hi) * 0.5;
    assert!((center.x - 400.0).abs() <= 3.0, "horizontal center {}", center.x);
}

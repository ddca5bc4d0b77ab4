use bevy::prelude::*;

/// Pointer position used when no pointer is over the surface.
pub const POINTER_SENTINEL: Vec2 = Vec2::new(-1000.0, -1000.0);

/// Ambient "breathing" jitter amplitude (pixels per axis).
pub const JITTER_AMPLITUDE: f32 = 0.2;
/// Ambient jitter angular rate (radians per millisecond).
pub const JITTER_RATE: f64 = 0.002;

/// One dot of the text field. Positions are surface pixels, y down.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Rest position sampled from the text; fixed for the particle's lifetime.
    pub home: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Index into the palette the set was built with.
    pub swatch: usize,
    /// Unique within the set; doubles as the jitter phase offset.
    pub id: u32,
    pub friction: f32,
    pub ease: f32,
}

impl Particle {
    pub fn new(
        position: Vec2,
        home: Vec2,
        radius: f32,
        swatch: usize,
        id: u32,
        friction: f32,
        ease: f32,
    ) -> Self {
        Self {
            position,
            home,
            velocity: Vec2::ZERO,
            radius,
            swatch,
            id,
            friction,
            ease,
        }
    }

    /// Advances one frame: pointer repulsion, spring toward home, friction,
    /// integration, then the cosmetic jitter.
    pub fn update(
        &mut self,
        pointer: Vec2,
        repulsion_radius: f32,
        repulsion_strength: f32,
        time_ms: f64,
    ) {
        self.velocity += repulsion_impulse(
            self.position - pointer,
            repulsion_radius,
            repulsion_strength,
        );
        self.velocity += (self.home - self.position) * self.ease;
        self.velocity *= self.friction;
        self.position += self.velocity;
        self.position += jitter(self.id, time_ms);
    }
}

/// Velocity kick for a particle at `offset` from the pointer.
///
/// Magnitude falls linearly from `strength` at the pointer to zero at
/// `radius`. A particle sitting exactly on the pointer is pushed along +x.
pub fn repulsion_impulse(offset: Vec2, radius: f32, strength: f32) -> Vec2 {
    if !(radius > 0.0) {
        return Vec2::ZERO;
    }
    let d = offset.length();
    if !(d < radius) {
        return Vec2::ZERO;
    }
    let dir = if d < 1e-6 { Vec2::X } else { offset / d };
    dir * (1.0 - d / radius) * strength
}

/// Ambient oscillation offset; recomputed from scratch each frame.
#[inline]
pub fn jitter(id: u32, time_ms: f64) -> Vec2 {
    let phase = time_ms * JITTER_RATE + id as f64;
    Vec2::new(phase.sin() as f32, phase.cos() as f32) * JITTER_AMPLITUDE
}

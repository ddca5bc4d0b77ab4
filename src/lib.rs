pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod rendering;
pub mod ui;

// Curated re-exports
pub use app::KineticTypePlugin;
pub use crate::core::config::{AppConfig, ConfigPatch, ConfigStore, EngineConfig};
pub use gameplay::{FrameReport, ParticleField, SampleFont};
pub use physics::particle::Particle;

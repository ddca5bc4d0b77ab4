pub mod field;
pub mod fps_meter;
pub mod systems;
pub mod text_sampler;

pub use field::{FrameReport, ParticleField};
pub use systems::{LastFrame, ParticleFieldPlugin};
pub use text_sampler::SampleFont;

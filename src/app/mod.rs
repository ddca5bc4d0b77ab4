pub mod cli;
pub mod headless;
pub mod kinetic;

pub use kinetic::{ConfigDiagnostics, KineticTypePlugin};

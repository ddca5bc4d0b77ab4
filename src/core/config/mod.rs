pub mod config;
pub mod store;

pub use config::{
    sanitize_text, AppConfig, ConfigPatch, EngineConfig, WindowConfig, MAX_CHARACTERS,
};
pub use store::{ApplyOutcome, ConfigStore};

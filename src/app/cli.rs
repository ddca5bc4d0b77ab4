use std::path::PathBuf;

use bevy::math::Vec2;
use clap::Parser;

use crate::core::config::{sanitize_text, AppConfig};

pub const DEFAULT_CONFIG_PATHS: [&str; 2] = [
    "assets/config/kinetic.ron",
    "assets/config/kinetic.local.ron",
];

#[derive(Parser, Debug, Clone, Default)]
#[command(about = "Text as a field of particles that scatter from the pointer", version)]
pub struct Cli {
    /// Layered RON config; later files override earlier ones. Defaults to
    /// assets/config/kinetic.ron then assets/config/kinetic.local.ron.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Vec<PathBuf>,
    /// Text to draw (A-Z and space, at most 12 characters).
    #[arg(long)]
    pub text: Option<String>,
    /// Sampling stride in pixels; lower is denser.
    #[arg(long)]
    pub density: Option<u32>,
    /// Exit after this many seconds (0 keeps running).
    #[arg(long, value_name = "SECS")]
    pub auto_close: Option<f32>,
    /// Render headless to this PNG instead of opening a window.
    #[arg(long, value_name = "PNG")]
    pub snapshot: Option<PathBuf>,
    /// Frames simulated before the snapshot is written.
    #[arg(long, default_value_t = 120)]
    pub frames: u32,
    /// Pointer position held during the snapshot.
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    pub pointer: Option<Vec2>,
    /// RNG seed for the snapshot's particle scatter.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

impl Cli {
    pub fn config_paths(&self) -> Vec<PathBuf> {
        if self.config.is_empty() {
            DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).collect()
        } else {
            self.config.clone()
        }
    }

    /// Applies flag overrides on top of the file config. Returns warnings
    /// for values that had to be adjusted.
    pub fn apply_overrides(&self, cfg: &mut AppConfig) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(text) = &self.text {
            if sanitize_text(text).is_none() {
                warnings.push(format!("--text {text:?} is longer than 12 characters; truncated"));
            }
            cfg.engine.text = text.clone();
        }
        if let Some(d) = self.density {
            if d == 0 {
                warnings.push("--density 0 is invalid; using 1".into());
            }
            cfg.engine.density = d;
        }
        if let Some(secs) = self.auto_close {
            cfg.window.auto_close = secs;
        }
        cfg.engine = cfg.engine.clone().normalized();
        warnings
    }
}

/// Parses `X,Y` into a point.
fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|e| format!("bad coordinate {v:?}: {e}"))
    };
    Ok(Vec2::new(coord(x)?, coord(y)?))
}

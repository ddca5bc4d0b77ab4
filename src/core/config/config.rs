use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::rendering::palette::palette::{neon_palette, PaletteColor};

pub const MAX_CHARACTERS: usize = 12;

/// Upper-cases `raw` and drops everything outside A-Z and space.
/// Returns `None` when the cleaned text would not fit in [`MAX_CHARACTERS`].
pub fn sanitize_text(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .flat_map(char::to_uppercase)
        .filter(|c| c.is_ascii_uppercase() || *c == ' ')
        .collect();
    (cleaned.chars().count() <= MAX_CHARACTERS).then_some(cleaned)
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Kinetic Typography".into(),
            auto_close: 0.0,
        }
    }
}

/// Everything a user can tune while the effect runs.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub text: String,
    pub repulsion_radius: f32,
    pub repulsion_strength: f32,
    pub friction: f32,
    pub ease: f32,
    /// Sampling stride in pixels.
    pub density: u32,
    pub show_lines: bool,
    pub use_glow: bool,
    /// 1.0 clears every frame; lower values leave motion trails.
    pub trail_alpha: f32,
    pub palette: Vec<PaletteColor>,
}
impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            text: "CODE".into(),
            repulsion_radius: 120.0,
            repulsion_strength: 80.0,
            friction: 0.95,
            ease: 0.08,
            density: 4,
            show_lines: false,
            use_glow: true,
            trail_alpha: 1.0,
            palette: neon_palette(),
        }
    }
}

/// Partial update; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub text: Option<String>,
    pub repulsion_radius: Option<f32>,
    pub repulsion_strength: Option<f32>,
    pub friction: Option<f32>,
    pub ease: Option<f32>,
    pub density: Option<u32>,
    pub show_lines: Option<bool>,
    pub use_glow: Option<bool>,
    pub trail_alpha: Option<f32>,
    pub palette: Option<Vec<PaletteColor>>,
}

impl ConfigPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..default()
        }
    }
    pub fn density(density: u32) -> Self {
        Self {
            density: Some(density),
            ..default()
        }
    }
    pub fn trail_alpha(alpha: f32) -> Self {
        Self {
            trail_alpha: Some(alpha),
            ..default()
        }
    }
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Patch that sets every field, e.g. to push a reloaded file into the store.
impl From<&EngineConfig> for ConfigPatch {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            text: Some(cfg.text.clone()),
            repulsion_radius: Some(cfg.repulsion_radius),
            repulsion_strength: Some(cfg.repulsion_strength),
            friction: Some(cfg.friction),
            ease: Some(cfg.ease),
            density: Some(cfg.density),
            show_lines: Some(cfg.show_lines),
            use_glow: Some(cfg.use_glow),
            trail_alpha: Some(cfg.trail_alpha),
            palette: Some(cfg.palette.clone()),
        }
    }
}

impl EngineConfig {
    /// Returns a new value with `patch` merged over `self`, or `None` when the
    /// patch text is too long once sanitized.
    pub fn merged(&self, patch: &ConfigPatch) -> Option<Self> {
        let mut next = self.clone();
        if let Some(text) = &patch.text {
            next.text = sanitize_text(text)?;
        }
        if let Some(v) = patch.repulsion_radius {
            next.repulsion_radius = v;
        }
        if let Some(v) = patch.repulsion_strength {
            next.repulsion_strength = v;
        }
        if let Some(v) = patch.friction {
            next.friction = v;
        }
        if let Some(v) = patch.ease {
            next.ease = v;
        }
        if let Some(v) = patch.density {
            next.density = v;
        }
        if let Some(v) = patch.show_lines {
            next.show_lines = v;
        }
        if let Some(v) = patch.use_glow {
            next.use_glow = v;
        }
        if let Some(v) = patch.trail_alpha {
            next.trail_alpha = v;
        }
        if let Some(v) = &patch.palette {
            next.palette = v.clone();
        }
        Some(next.normalized())
    }

    /// Forces every field into its valid domain. Overlong text is truncated
    /// here since this path only sees file/CLI input, never live typing.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.text = sanitize_text(&self.text).unwrap_or_else(|| {
            let cleaned: String = self
                .text
                .chars()
                .flat_map(char::to_uppercase)
                .filter(|c| c.is_ascii_uppercase() || *c == ' ')
                .take(MAX_CHARACTERS)
                .collect();
            cleaned
        });
        if !(self.repulsion_radius.is_finite() && self.repulsion_radius > 0.0) {
            self.repulsion_radius = defaults.repulsion_radius;
        }
        if !(self.repulsion_strength.is_finite() && self.repulsion_strength > 0.0) {
            self.repulsion_strength = defaults.repulsion_strength;
        }
        if !(self.friction.is_finite() && self.friction > 0.0) {
            self.friction = defaults.friction;
        }
        if !(self.ease.is_finite() && self.ease > 0.0) {
            self.ease = defaults.ease;
        }
        self.density = self.density.max(1);
        self.trail_alpha = if self.trail_alpha.is_finite() {
            self.trail_alpha.clamp(0.01, 1.0)
        } else {
            1.0
        };
        if self.palette.is_empty() {
            self.palette = defaults.palette;
        }
        self
    }

    /// True when switching from `self` to `other` invalidates the particle set
    /// (geometry, colors, or per-particle friction/ease).
    pub fn needs_rebuild(&self, other: &Self) -> bool {
        self.text != other.text
            || self.density != other.density
            || self.palette != other.palette
            || self.friction != other.friction
            || self.ease != other.ease
    }

    pub fn trails_enabled(&self) -> bool {
        self.trail_alpha < 1.0
    }
}

/// Top-level file layout: `assets/config/kinetic.ron`.
#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub engine: EngineConfig,
    /// TTF files tried in order before falling back to the bundled face.
    pub font_paths: Vec<String>,
}
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            engine: Default::default(),
            font_paths: vec!["assets/fonts/DejaVuSans-Bold.ttf".into()],
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        let cfg: Self = ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))?;
        Ok(cfg.normalized())
    }

    pub fn normalized(mut self) -> Self {
        self.engine = self.engine.normalized();
        self
    }

    /// Reads every path that exists, merging RON maps key-wise so later files
    /// only need to name what they override. Returns the config, the files
    /// actually used, and any read/parse problems.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                // Layers are optional; a missing one is simply skipped.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (Self::default(), used, errors);
        };
        match val.into_rust::<AppConfig>() {
            Ok(cfg) => (cfg.normalized(), used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (Self::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.width * self.window.height > 10_000_000.0 {
            w.push(format!(
                "very large window area: {}x{}",
                self.window.width, self.window.height
            ));
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        let e = &self.engine;
        if e.text.trim().is_empty() {
            w.push("engine.text is empty; no particles will spawn".into());
        }
        if e.friction >= 1.0 {
            w.push(format!(
                "engine.friction {} >= 1 -> particles never settle",
                e.friction
            ));
        }
        if e.ease > 1.0 {
            w.push(format!(
                "engine.ease {} > 1 -> spring overshoots every frame",
                e.ease
            ));
        }
        if e.density == 1 {
            w.push("engine.density 1 samples every pixel; expect a very large particle count".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_uppercases_and_strips() {
        assert_eq!(sanitize_text("hello, w0rld!").as_deref(), Some("HELLO WRLD"));
        assert_eq!(sanitize_text("").as_deref(), Some(""));
        assert_eq!(sanitize_text("abcdefghijklm"), None);
        assert_eq!(sanitize_text("123456789012345").as_deref(), Some(""));
    }

    #[test]
    fn merged_rejects_overlong_text() {
        let base = EngineConfig::default();
        assert!(base.merged(&ConfigPatch::text("THIS IS TOO LONG")).is_none());
        let ok = base.merged(&ConfigPatch::text("rust")).unwrap();
        assert_eq!(ok.text, "RUST");
        assert_eq!(ok.density, base.density);
    }

    #[test]
    fn normalized_clamps_domains() {
        let cfg = EngineConfig {
            text: "way too long for the field".into(),
            density: 0,
            trail_alpha: 3.0,
            friction: -1.0,
            palette: Vec::new(),
            ..default()
        }
        .normalized();
        assert_eq!(cfg.text.chars().count(), MAX_CHARACTERS);
        assert_eq!(cfg.density, 1);
        assert_eq!(cfg.trail_alpha, 1.0);
        assert_eq!(cfg.friction, 0.95);
        assert!(!cfg.palette.is_empty());
    }

    #[test]
    fn rebuild_only_for_sampled_fields() {
        let base = EngineConfig::default();
        let glow = base.merged(&ConfigPatch { use_glow: Some(false), ..default() }).unwrap();
        assert!(!base.needs_rebuild(&glow));
        let dense = base.merged(&ConfigPatch::density(3)).unwrap();
        assert!(base.needs_rebuild(&dense));
        let eased = base.merged(&ConfigPatch { ease: Some(0.12), ..default() }).unwrap();
        assert!(base.needs_rebuild(&eased));
    }
}

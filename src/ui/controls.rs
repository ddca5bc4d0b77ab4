//! Widget model for the control panel. Everything here turns a user gesture
//! into a [`ConfigPatch`]; the panel only renders and dispatches.

use bevy::color::Srgba;
use bevy::prelude::*;

use crate::core::config::{
    sanitize_text, ApplyOutcome, ConfigPatch, ConfigStore, EngineConfig, MAX_CHARACTERS,
};
use crate::rendering::palette::palette::NEON_COLORS;

/// `trail_alpha` written when "Motion Trails" is switched on.
pub const TRAIL_ON_ALPHA: f32 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slider {
    RepulsionForce,
    MouseRadius,
    MagneticEase,
}

impl Slider {
    pub const ALL: [Slider; 3] = [Slider::RepulsionForce, Slider::MouseRadius, Slider::MagneticEase];

    pub fn label(self) -> &'static str {
        match self {
            Slider::RepulsionForce => "Repulsion Force",
            Slider::MouseRadius => "Mouse Radius",
            Slider::MagneticEase => "Magnetic Ease",
        }
    }

    /// Inclusive range in slider units.
    pub fn range(self) -> (f32, f32) {
        match self {
            Slider::RepulsionForce => (10.0, 200.0),
            Slider::MouseRadius => (50.0, 300.0),
            Slider::MagneticEase => (1.0, 20.0),
        }
    }

    /// Amount one button press moves the slider.
    pub fn step(self) -> f32 {
        match self {
            Slider::RepulsionForce => 10.0,
            Slider::MouseRadius => 10.0,
            Slider::MagneticEase => 1.0,
        }
    }

    pub fn accent(self) -> Srgba {
        match self {
            Slider::RepulsionForce => NEON_COLORS[0],
            Slider::MouseRadius => NEON_COLORS[1],
            Slider::MagneticEase => NEON_COLORS[2],
        }
    }

    /// Current position in slider units (ease is shown as hundredths).
    pub fn read(self, cfg: &EngineConfig) -> f32 {
        match self {
            Slider::RepulsionForce => cfg.repulsion_strength,
            Slider::MouseRadius => cfg.repulsion_radius,
            Slider::MagneticEase => (cfg.ease * 100.0).round(),
        }
    }

    /// Patch for moving the slider to `value`; snapped to whole units and
    /// clamped into [`Slider::range`].
    pub fn patch(self, value: f32) -> ConfigPatch {
        let (min, max) = self.range();
        let v = value.round().clamp(min, max);
        match self {
            Slider::RepulsionForce => ConfigPatch {
                repulsion_strength: Some(v),
                ..Default::default()
            },
            Slider::MouseRadius => ConfigPatch {
                repulsion_radius: Some(v),
                ..Default::default()
            },
            Slider::MagneticEase => ConfigPatch {
                ease: Some(v / 100.0),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    NetworkLines,
    NeonGlow,
    MotionTrails,
}

impl Toggle {
    pub const ALL: [Toggle; 3] = [Toggle::NetworkLines, Toggle::NeonGlow, Toggle::MotionTrails];

    pub fn label(self) -> &'static str {
        match self {
            Toggle::NetworkLines => "Network Lines",
            Toggle::NeonGlow => "Neon Glow",
            Toggle::MotionTrails => "Motion Trails",
        }
    }

    pub fn accent(self) -> Srgba {
        match self {
            Toggle::NetworkLines => NEON_COLORS[0],
            Toggle::NeonGlow => NEON_COLORS[1],
            Toggle::MotionTrails => NEON_COLORS[2],
        }
    }

    pub fn is_on(self, cfg: &EngineConfig) -> bool {
        match self {
            Toggle::NetworkLines => cfg.show_lines,
            Toggle::NeonGlow => cfg.use_glow,
            Toggle::MotionTrails => cfg.trails_enabled(),
        }
    }

    pub fn patch(self, on: bool) -> ConfigPatch {
        match self {
            Toggle::NetworkLines => ConfigPatch {
                show_lines: Some(on),
                ..Default::default()
            },
            Toggle::NeonGlow => ConfigPatch {
                use_glow: Some(on),
                ..Default::default()
            },
            Toggle::MotionTrails => ConfigPatch::trail_alpha(if on { TRAIL_ON_ALPHA } else { 1.0 }),
        }
    }
}

/// The three sampling strides offered by the density select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityOption {
    High,
    Medium,
    Low,
}

impl DensityOption {
    pub const ALL: [DensityOption; 3] = [DensityOption::High, DensityOption::Medium, DensityOption::Low];

    pub fn stride(self) -> u32 {
        match self {
            DensityOption::High => 3,
            DensityOption::Medium => 4,
            DensityOption::Low => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DensityOption::High => "High (Intense)",
            DensityOption::Medium => "Medium (Balanced)",
            DensityOption::Low => "Low (Performant)",
        }
    }

    pub fn from_stride(stride: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.stride() == stride)
    }

    /// Next option, wrapping. A stride that matches no option (set from a
    /// config file) cycles to the first one.
    pub fn cycle(stride: u32) -> Self {
        match Self::from_stride(stride) {
            Some(DensityOption::High) => DensityOption::Medium,
            Some(DensityOption::Medium) => DensityOption::Low,
            Some(DensityOption::Low) | None => DensityOption::High,
        }
    }
}

/// Everything the panel and keyboard can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    Nudge { slider: Slider, steps: i32 },
    SetSlider { slider: Slider, value: f32 },
    CycleDensity,
    SelectDensity(DensityOption),
    Toggle(Toggle),
    SetText(String),
    TypeChar(char),
    Backspace,
}

/// Translates `action` against the current config. `None` means the gesture
/// is dropped, e.g. typing past [`MAX_CHARACTERS`].
pub fn action_patch(action: &ControlAction, cfg: &EngineConfig) -> Option<ConfigPatch> {
    match action {
        ControlAction::Nudge { slider, steps } => {
            Some(slider.patch(slider.read(cfg) + slider.step() * *steps as f32))
        }
        ControlAction::SetSlider { slider, value } => Some(slider.patch(*value)),
        ControlAction::CycleDensity => Some(ConfigPatch::density(DensityOption::cycle(cfg.density).stride())),
        ControlAction::SelectDensity(opt) => Some(ConfigPatch::density(opt.stride())),
        ControlAction::Toggle(t) => Some(t.patch(!t.is_on(cfg))),
        ControlAction::SetText(raw) => text_input_patch(raw),
        ControlAction::TypeChar(c) => {
            let mut next = cfg.text.clone();
            next.push(*c);
            text_input_patch(&next)
        }
        ControlAction::Backspace => {
            let mut next = cfg.text.clone();
            next.pop()?;
            text_input_patch(&next)
        }
    }
}

/// Runs `action` through the store. `None` when the gesture produced no patch.
pub fn submit(store: &mut ConfigStore, action: &ControlAction) -> Option<ApplyOutcome> {
    let Some(patch) = action_patch(action, store.get()) else {
        debug!(target: "controls", "{action:?} dropped");
        return None;
    };
    let outcome = store.apply(&patch);
    match outcome {
        ApplyOutcome::Applied { rebuild } => {
            info!(target: "controls", "{action:?} applied (rebuild={rebuild})");
        }
        ApplyOutcome::Unchanged => {}
        ApplyOutcome::Rejected => warn!(target: "controls", "{action:?} rejected by the config store"),
    }
    Some(outcome)
}

/// Text field edit: sanitized, and dropped when it would not fit.
pub fn text_input_patch(raw: &str) -> Option<ConfigPatch> {
    sanitize_text(raw).map(ConfigPatch::text)
}

pub fn char_counter(text: &str) -> String {
    format!("{} / {}", text.chars().count(), MAX_CHARACTERS)
}

pub fn fps_label(fps: Option<f32>) -> String {
    match fps {
        Some(f) => format!("FPS: {}", f.round() as i64),
        None => "FPS: 0".to_string(),
    }
}

/// Green above 55 fps, yellow otherwise.
pub fn fps_color(fps: Option<f32>) -> Srgba {
    match fps {
        Some(f) if f > 55.0 => Srgba::rgb(0.29, 0.87, 0.5),
        _ => Srgba::rgb(0.98, 0.8, 0.08),
    }
}

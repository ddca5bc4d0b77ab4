//! Control surface: the widget model and the Bevy UI panel that drives it.

pub mod controls;
pub mod panel;

pub use panel::ControlPanelPlugin;

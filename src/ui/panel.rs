use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::ui::{AlignItems, FlexDirection, JustifyContent, Node, PositionType};

use super::controls::{
    char_counter, fps_color, fps_label, submit, ControlAction, DensityOption, Slider, Toggle,
};
use crate::core::config::{ConfigStore, EngineConfig};
use crate::core::system::system_order::{InputSet, PresentSet};
use crate::gameplay::field::ParticleField;
use crate::rendering::palette::palette::ACCENT;

const HUD_TITLE: &str = "KINETIC TYPOGRAPHY";
const HUD_SUBTITLE: &str = "PX-EXPLOSION ENGINE V2.5.0 // [READY]";
const HINT: &str = "USE MOUSE TO DISPLACE // TYPE TO REDRAW";
const PLACEHOLDER: &str = "TYPE TEXT...";

const BUTTON_IDLE: Color = Color::srgba(1.0, 1.0, 1.0, 0.05);
const BUTTON_HOVER: Color = Color::srgba(1.0, 1.0, 1.0, 0.12);
const BUTTON_PRESSED: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
const DIM_TEXT: Color = Color::srgba(1.0, 1.0, 1.0, 0.4);

pub struct ControlPanelPlugin;

impl Plugin for ControlPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_control_panel)
            .add_systems(
                Update,
                (control_button_system, text_entry_system).in_set(InputSet),
            )
            .add_systems(Update, refresh_readouts.in_set(PresentSet));
    }
}

/// Clicking dispatches the wrapped action.
#[derive(Component, Debug, Clone)]
pub struct ControlButton(pub ControlAction);

/// Text that mirrors part of the live config.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readout {
    Slider(Slider),
    Toggle(Toggle),
    Density,
    Text,
    Counter,
    Fps,
}

impl Readout {
    pub fn text(self, cfg: &EngineConfig, fps: Option<f32>) -> String {
        match self {
            Readout::Slider(s) => format!("{:.0}", s.read(cfg)),
            Readout::Toggle(t) => {
                let mark = if t.is_on(cfg) { "[x]" } else { "[ ]" };
                format!("{mark} {}", t.label().to_uppercase())
            }
            Readout::Density => match DensityOption::from_stride(cfg.density) {
                Some(opt) => opt.label().to_string(),
                None => format!("Custom ({})", cfg.density),
            },
            Readout::Text if cfg.text.is_empty() => PLACEHOLDER.to_string(),
            Readout::Text => cfg.text.clone(),
            Readout::Counter => char_counter(&cfg.text),
            Readout::Fps => fps_label(fps),
        }
    }

    pub fn color(self, cfg: &EngineConfig, fps: Option<f32>) -> Color {
        match self {
            Readout::Toggle(t) if t.is_on(cfg) => t.accent().into(),
            Readout::Toggle(_) => DIM_TEXT,
            Readout::Slider(s) => s.accent().into(),
            Readout::Text if cfg.text.is_empty() => Color::srgba(1.0, 1.0, 1.0, 0.2),
            Readout::Text => ACCENT.into(),
            Readout::Fps => fps_color(fps).into(),
            Readout::Density => Color::srgba(1.0, 1.0, 1.0, 0.7),
            Readout::Counter => Color::srgba(1.0, 1.0, 1.0, 0.3),
        }
    }
}

fn small_font(size: f32) -> TextFont {
    TextFont {
        font_size: size,
        ..default()
    }
}

fn spawn_button(
    parent: &mut ChildSpawnerCommands,
    action: ControlAction,
    label: impl Into<String>,
    readout: Option<Readout>,
) {
    parent
        .spawn((
            Button,
            ControlButton(action),
            Node {
                padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.1)),
            BorderRadius::all(Val::Px(6.0)),
            BackgroundColor(BUTTON_IDLE),
        ))
        .with_children(|b| {
            let mut text = b.spawn((Text::new(label), small_font(12.0), TextColor(DIM_TEXT)));
            if let Some(r) = readout {
                text.insert(r);
            }
        });
}

fn row() -> Node {
    Node {
        flex_direction: FlexDirection::Row,
        align_items: AlignItems::Center,
        justify_content: JustifyContent::SpaceBetween,
        column_gap: Val::Px(12.0),
        ..default()
    }
}

fn spawn_control_panel(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(32.0),
            left: Val::Px(32.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|hud| {
            hud.spawn((
                Text::new(HUD_TITLE),
                small_font(18.0),
                TextColor(ACCENT.with_alpha(0.4).into()),
            ));
            hud.spawn((
                Text::new(HUD_SUBTITLE),
                small_font(10.0),
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.2)),
            ));
        });

    commands.spawn((
        Text::new(HINT),
        small_font(10.0),
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.2)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(16.0),
            right: Val::Px(16.0),
            ..default()
        },
    ));

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Percent(5.0),
                width: Val::Percent(90.0),
                max_width: Val::Px(672.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(20.0)),
                row_gap: Val::Px(12.0),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.1)),
            BorderRadius::all(Val::Px(16.0)),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
        ))
        .with_children(|panel| {
            panel.spawn(row()).with_children(|top| {
                top.spawn((
                    Node {
                        flex_grow: 1.0,
                        justify_content: JustifyContent::SpaceBetween,
                        padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                        ..default()
                    },
                    BackgroundColor(BUTTON_IDLE),
                    BorderRadius::all(Val::Px(8.0)),
                ))
                .with_children(|field| {
                    field.spawn((Text::new(""), small_font(16.0), TextColor(ACCENT.into()), Readout::Text));
                    field.spawn((Text::new(""), small_font(10.0), TextColor(DIM_TEXT), Readout::Counter));
                });
                top.spawn((Text::new(""), small_font(12.0), TextColor(DIM_TEXT), Readout::Fps));
            });

            for slider in Slider::ALL {
                panel.spawn(row()).with_children(|r| {
                    r.spawn((
                        Text::new(slider.label().to_uppercase()),
                        small_font(10.0),
                        TextColor(DIM_TEXT),
                        Node {
                            flex_grow: 1.0,
                            ..default()
                        },
                    ));
                    spawn_button(r, ControlAction::Nudge { slider, steps: -1 }, "-", None);
                    r.spawn((
                        Text::new(""),
                        small_font(14.0),
                        TextColor(slider.accent().into()),
                        Readout::Slider(slider),
                        Node {
                            min_width: Val::Px(40.0),
                            justify_content: JustifyContent::Center,
                            ..default()
                        },
                    ));
                    spawn_button(r, ControlAction::Nudge { slider, steps: 1 }, "+", None);
                });
            }

            panel.spawn(row()).with_children(|r| {
                r.spawn((
                    Text::new("PARTICLE DENSITY"),
                    small_font(10.0),
                    TextColor(DIM_TEXT),
                    Node {
                        flex_grow: 1.0,
                        ..default()
                    },
                ));
                spawn_button(r, ControlAction::CycleDensity, "", Some(Readout::Density));
            });

            panel.spawn(row()).with_children(|r| {
                for toggle in Toggle::ALL {
                    spawn_button(r, ControlAction::Toggle(toggle), "", Some(Readout::Toggle(toggle)));
                }
            });
        });
}

fn control_button_system(
    mut q_btn: Query<(&Interaction, &ControlButton, &mut BackgroundColor), Changed<Interaction>>,
    mut store: ResMut<ConfigStore>,
) {
    for (interaction, button, mut bg) in q_btn.iter_mut() {
        match *interaction {
            Interaction::Pressed => {
                *bg = BackgroundColor(BUTTON_PRESSED);
                submit(&mut store, &button.0);
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVER),
            Interaction::None => *bg = BackgroundColor(BUTTON_IDLE),
        }
    }
}

/// Maps a pressed key to a text edit.
pub fn key_action(key: &Key) -> Vec<ControlAction> {
    match key {
        Key::Character(s) => s.chars().map(ControlAction::TypeChar).collect(),
        Key::Space => vec![ControlAction::TypeChar(' ')],
        Key::Backspace => vec![ControlAction::Backspace],
        _ => Vec::new(),
    }
}

fn text_entry_system(mut keys: EventReader<KeyboardInput>, mut store: ResMut<ConfigStore>) {
    for ev in keys.read() {
        if ev.state != ButtonState::Pressed {
            continue;
        }
        for action in key_action(&ev.logical_key) {
            submit(&mut store, &action);
        }
    }
}

fn refresh_readouts(
    store: Res<ConfigStore>,
    field: Option<Res<ParticleField>>,
    mut q: Query<(&Readout, &mut Text, &mut TextColor)>,
) {
    let cfg = store.get();
    let fps = field.and_then(|f| f.last_fps());
    for (readout, mut text, mut color) in q.iter_mut() {
        let s = readout.text(cfg, fps);
        if text.0 != s {
            text.0 = s;
        }
        let c = readout.color(cfg, fps);
        if color.0 != c {
            color.0 = c;
        }
    }
}

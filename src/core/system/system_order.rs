//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. Input (pointer, resize, control panel edits to the config store)
//! 2. Sync (rebuild the particle set when the config made it stale)
//! 3. Simulate (one frame-loop tick: physics + draw into the canvas)
//! 4. Present (upload the canvas to the sprite texture, refresh readouts)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct InputSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SyncSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SimulateSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PresentSet;

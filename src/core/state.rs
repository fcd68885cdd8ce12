//! Core domain: game state definitions.

use bevy::prelude::*;

#[derive(States, Debug, Hash, Eq, PartialEq, Clone, Default)]
pub enum GameState {
    /// Level data is being loaded and entities spawned.
    #[default]
    Boot,
    /// The fixed-tick simulation is running.
    Run,
}

//! Player domain: the knight's state machine, abilities, and input.

mod actions;
mod components;
mod resources;
mod systems;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

use bevy::prelude::*;

use crate::anim::{ActionTag, AnimationController, EntityKind};
use crate::core::TickSet;
use crate::physics::{Body, Contacts, Facing, Gravity, MoveIntent, Velocity};

pub use actions::{release_jump, try_dash, try_jump, DashStart, JumpKind};
pub use components::{
    Abilities, AbilityKind, Charges, Player, PlayerControl, PlayerTimers, SpawnAnchor, WallGrip,
};
pub use resources::{PlayerInput, PlayerTuning};

/// Collision box in pixels.
pub const PLAYER_SIZE: Vec2 = Vec2::new(10.0, 14.0);

const TUNING_PATH: &str = "assets/tuning.ron";

/// Spawn the player at `pos`, which also becomes the initial respawn
/// anchor.
pub fn spawn_player(commands: &mut Commands, pos: Vec2) -> Entity {
    commands
        .spawn((
            Player,
            Body::new(pos, PLAYER_SIZE),
            Velocity::default(),
            Gravity::default(),
            Contacts::default(),
            MoveIntent::default(),
            Facing::default(),
            Abilities::default(),
            Charges { jumps: 1, dashes: 1 },
            PlayerTimers::default(),
            WallGrip::default(),
            PlayerControl::default(),
            SpawnAnchor(pos),
            AnimationController::new(EntityKind::Player, ActionTag::Idle),
            (
                Sprite {
                    color: Color::srgb(0.85, 0.9, 0.95),
                    custom_size: Some(PLAYER_SIZE),
                    ..default()
                },
                Transform::default(),
            ),
        ))
        .id()
}

/// Load tuning overrides from `assets/tuning.ron` when present; a missing
/// or malformed file leaves the defaults in place.
fn load_tuning(mut tuning: ResMut<PlayerTuning>) {
    if !Path::new(TUNING_PATH).exists() {
        return;
    }
    match fs::read_to_string(TUNING_PATH) {
        Ok(text) => match ron::from_str::<PlayerTuning>(&text) {
            Ok(loaded) => {
                info!("loaded tuning overrides from {TUNING_PATH}");
                *tuning = loaded;
            }
            Err(err) => warn!("ignoring malformed {TUNING_PATH}: {err}"),
        },
        Err(err) => warn!("could not read {TUNING_PATH}: {err}"),
    }
}

#[cfg(feature = "dev-tools")]
fn dev_unlock(keys: Res<ButtonInput<KeyCode>>, mut players: Query<&mut Abilities>) {
    if keys.just_pressed(KeyCode::F1) {
        for mut abilities in &mut players {
            abilities.grant(AbilityKind::Dash);
            abilities.grant(AbilityKind::Claw);
            abilities.grant(AbilityKind::Wings);
            abilities.grant(AbilityKind::Cloak);
            info!("dev unlock: all abilities granted");
        }
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerTuning>()
            .init_resource::<PlayerInput>()
            .add_systems(Startup, load_tuning)
            .add_systems(Update, systems::read_input)
            .add_systems(
                FixedUpdate,
                (
                    systems::apply_actions.in_set(TickSet::Actions),
                    systems::shape_move_intent.in_set(TickSet::Intent),
                    systems::update_player_state.in_set(TickSet::PostStep),
                    systems::clear_input_edges.in_set(TickSet::Flush),
                ),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Update, dev_unlock);
    }
}

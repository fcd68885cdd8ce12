//! Physics domain: the shared kinematic step for every moving entity.

mod components;
mod step;


use bevy::prelude::*;

pub use components::{Body, Contacts, Facing, Gravity, MoveIntent, SolidRect, Velocity};
pub use step::{GRAVITY_CONST, TERMINAL_VELOCITY, step_body};

pub(crate) use step::integrate_bodies;

use crate::core::TickSet;

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<crate::tilemap::TileMap>()
            .add_systems(FixedUpdate, step::integrate_bodies.in_set(TickSet::Integrate));
    }
}

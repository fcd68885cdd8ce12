//! Physics domain: the axis-separated kinematic step.

use bevy::prelude::*;

use crate::physics::{Body, Contacts, Facing, Gravity, MoveIntent, SolidRect, Velocity};
use crate::tilemap::{Aabb, TileMap};

/// Downward acceleration in pixels per tick squared.
pub const GRAVITY_CONST: f32 = 0.2;

/// Fall speed cap in pixels per tick.
pub const TERMINAL_VELOCITY: f32 = 5.0;

/// One kinematic step. Order is load-bearing: X displacement is applied and
/// resolved fully before Y, so a diagonal approach into a corner stops on X
/// first, then Y. Vertical contacts overwrite vertical velocity, which is
/// what rests an entity on a floor or under a ceiling.
pub fn step_body(
    map: &TileMap,
    extra_solids: &[Aabb],
    body: &mut Body,
    velocity: &mut Velocity,
    gravity: f32,
    contacts: &mut Contacts,
    facing: &mut Facing,
    intent: Vec2,
) {
    contacts.clear();

    let frame = intent + velocity.0;

    // X axis: move, then clamp against every solid overlapping the new box.
    body.pos.x += frame.x;
    let mut rect = body.aabb();
    for solid in solids_near(map, extra_solids, body.pos) {
        if rect.overlaps(&solid) {
            if frame.x > 0.0 {
                rect.set_right(solid.left());
                contacts.right = true;
            }
            if frame.x < 0.0 {
                rect.set_left(solid.right());
                contacts.left = true;
            }
            body.pos.x = rect.pos.x;
        }
    }

    // Y axis.
    body.pos.y += frame.y;
    let mut rect = body.aabb();
    for solid in solids_near(map, extra_solids, body.pos) {
        if rect.overlaps(&solid) {
            if frame.y > 0.0 {
                rect.set_bottom(solid.top());
                contacts.down = true;
            }
            if frame.y < 0.0 {
                rect.set_top(solid.bottom());
                contacts.up = true;
            }
            body.pos.y = rect.pos.y;
        }
    }

    velocity.0.y = (velocity.0.y + gravity).min(TERMINAL_VELOCITY);
    if contacts.down || contacts.up {
        velocity.0.y = 0.0;
    }

    // Facing follows the requested movement, not the resolved displacement;
    // zero input leaves it unchanged.
    if intent.x > 0.0 {
        *facing = Facing::Right;
    }
    if intent.x < 0.0 {
        *facing = Facing::Left;
    }
}

fn solids_near(map: &TileMap, extra_solids: &[Aabb], pos: Vec2) -> Vec<Aabb> {
    let mut solids = map.physics_rects_nearby(pos);
    solids.extend_from_slice(extra_solids);
    solids
}

pub(crate) fn integrate_bodies(
    map: Res<TileMap>,
    solids: Query<&SolidRect, Without<Body>>,
    mut bodies: Query<(
        &mut Body,
        &mut Velocity,
        &Gravity,
        &mut Contacts,
        &mut Facing,
        &MoveIntent,
    )>,
) {
    let extra: Vec<Aabb> = solids
        .iter()
        .filter(|s| s.enabled)
        .map(|s| s.rect)
        .collect();

    for (mut body, mut velocity, gravity, mut contacts, mut facing, intent) in &mut bodies {
        step_body(
            &map,
            &extra,
            &mut body,
            &mut velocity,
            gravity.0,
            &mut contacts,
            &mut facing,
            intent.0,
        );
    }
}

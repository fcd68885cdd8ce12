//! Interact domain: checkpoints, grubs, pickups, hazards, gates, levers.

mod components;
mod systems;


use bevy::prelude::*;

use crate::anim::{ActionTag, AnimationController, EntityKind};
use crate::core::TickSet;
use crate::physics::{Body, Contacts, Facing, Gravity, MoveIntent, SolidRect, Velocity};
use crate::player::AbilityKind;
use crate::tilemap::Aabb;

pub use components::{
    AbilityPickup, Crawler, Gate, GateRegistry, Grub, Lever, RespawnPoint, Saw, ShadeGate,
};

/// Collision extents shared with the level spawner.
pub const GATE_SIZE: Vec2 = Vec2::new(16.0, 32.0);
pub const LEVER_SIZE: Vec2 = Vec2::new(8.0, 10.0);

pub fn spawn_respawn_point(commands: &mut Commands, pos: Vec2) -> Entity {
    let size = Vec2::new(16.0, 16.0);
    commands
        .spawn((
            RespawnPoint,
            Body::new(pos, size),
            AnimationController::new(EntityKind::RespawnPoint, ActionTag::Idle),
            Sprite {
                color: Color::srgb(0.75, 0.7, 0.5),
                custom_size: Some(size),
                ..default()
            },
            Transform::default(),
        ))
        .id()
}

pub fn spawn_grub(commands: &mut Commands, pos: Vec2) -> Entity {
    let size = Vec2::new(10.0, 12.0);
    commands
        .spawn((
            Grub::default(),
            Body::new(pos, size),
            AnimationController::new(EntityKind::Grub, ActionTag::Idle),
            Sprite {
                color: Color::srgb(0.4, 0.85, 0.4),
                custom_size: Some(size),
                ..default()
            },
            Transform::default(),
        ))
        .id()
}

pub fn spawn_ability_pickup(commands: &mut Commands, pos: Vec2, grant: AbilityKind) -> Entity {
    let size = Vec2::new(12.0, 12.0);
    commands
        .spawn((
            AbilityPickup { grant },
            Body::new(pos, size),
            AnimationController::new(EntityKind::AbilityPickup, ActionTag::Idle),
            Sprite {
                color: Color::srgb(0.9, 0.85, 0.95),
                custom_size: Some(size),
                ..default()
            },
            Transform::default(),
        ))
        .id()
}

pub fn spawn_saw(commands: &mut Commands, pos: Vec2) -> Entity {
    let size = Vec2::new(16.0, 16.0);
    commands
        .spawn((
            Saw,
            Body::new(pos, size),
            AnimationController::new(EntityKind::Saw, ActionTag::Spin),
            Sprite {
                color: Color::srgb(0.8, 0.3, 0.3),
                custom_size: Some(size),
                ..default()
            },
            Transform::default(),
        ))
        .id()
}

pub fn spawn_crawler(commands: &mut Commands, pos: Vec2) -> Entity {
    let size = Vec2::new(14.0, 10.0);
    commands
        .spawn((
            Crawler::default(),
            Body::new(pos, size),
            Velocity::default(),
            Gravity::default(),
            Contacts::default(),
            MoveIntent::default(),
            Facing::default(),
            AnimationController::new(EntityKind::Crawler, ActionTag::Walk),
            Sprite {
                color: Color::srgb(0.7, 0.45, 0.3),
                custom_size: Some(size),
                ..default()
            },
            Transform::default(),
        ))
        .id()
}

/// Gates are pure solids; they take part in collision through `SolidRect`
/// rather than owning a kinematic body.
pub fn spawn_gate(commands: &mut Commands, registry: &mut GateRegistry, id: u32, pos: Vec2) -> Entity {
    let rect = Aabb::new(pos, GATE_SIZE);
    let center = rect.center();
    let entity = commands
        .spawn((
            Gate { id, open: false },
            SolidRect { rect, enabled: true },
            AnimationController::new(EntityKind::Gate, ActionTag::Idle),
            Sprite {
                color: Color::srgb(0.45, 0.45, 0.5),
                custom_size: Some(rect.size),
                ..default()
            },
            Transform::from_xyz(center.x.trunc(), -center.y.trunc(), 0.0),
        ))
        .id();
    registry.register(id, entity);
    entity
}

pub fn spawn_shade_gate(commands: &mut Commands, pos: Vec2) -> Entity {
    let rect = Aabb::new(pos, GATE_SIZE);
    let center = rect.center();
    commands
        .spawn((
            ShadeGate,
            SolidRect { rect, enabled: true },
            Sprite {
                color: Color::srgba(0.2, 0.15, 0.3, 0.8),
                custom_size: Some(rect.size),
                ..default()
            },
            Transform::from_xyz(center.x.trunc(), -center.y.trunc(), 0.0),
        ))
        .id()
}

pub fn spawn_lever(commands: &mut Commands, pos: Vec2, gate_id: u32) -> Entity {
    commands
        .spawn((
            Lever::new(gate_id),
            Body::new(pos, LEVER_SIZE),
            AnimationController::new(EntityKind::Lever, ActionTag::Idle),
            Sprite {
                color: Color::srgb(0.6, 0.55, 0.35),
                custom_size: Some(LEVER_SIZE),
                ..default()
            },
            Transform::default(),
        ))
        .id()
}

pub struct InteractPlugin;

impl Plugin for InteractPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GateRegistry>()
            .add_systems(
                FixedUpdate,
                (systems::phase_shade_gates, systems::crawler_intent).in_set(TickSet::Intent),
            )
            .add_systems(
                FixedUpdate,
                (
                    systems::respawn_contact,
                    systems::grub_contact,
                    systems::pickup_contact,
                    systems::hazard_contact,
                    systems::lever_contact,
                )
                    .in_set(TickSet::Contact),
            );
    }
}

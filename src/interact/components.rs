//! Interact domain: per-kind interactable components.
//!
//! Each kind is its own component with its own contact system, so a new
//! interactable is a new type rather than a new string branch.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::player::AbilityKind;

/// Checkpoint. Touching one moves the player's respawn anchor here.
#[derive(Component, Debug)]
pub struct RespawnPoint;

/// Collectable grub. `collect_timer` is zero until first touched, then
/// counts up through the alert, break-out, and despawn beats.
#[derive(Component, Debug, Default)]
pub struct Grub {
    pub collect_timer: i32,
}

/// One-shot ability grant.
#[derive(Component, Debug)]
pub struct AbilityPickup {
    pub grant: AbilityKind,
}

/// Stationary spinning hazard.
#[derive(Component, Debug)]
pub struct Saw;

/// Walking hazard. Patrols until it hits a wall or a ledge, then turns.
#[derive(Component, Debug)]
pub struct Crawler {
    pub speed: f32,
    pub walking_right: bool,
}

impl Default for Crawler {
    fn default() -> Self {
        Self {
            speed: 0.5,
            walking_right: true,
        }
    }
}

/// Solid barrier opened by a lever.
#[derive(Component, Debug)]
pub struct Gate {
    pub id: u32,
    pub open: bool,
}

/// Barrier that is intangible only to a cloaked player.
#[derive(Component, Debug)]
pub struct ShadeGate;

/// Throwable switch wired to one gate.
#[derive(Component, Debug)]
pub struct Lever {
    pub gate_id: u32,
    pub contact_time: i32,
    pub thrown: bool,
}

impl Lever {
    pub fn new(gate_id: u32) -> Self {
        Self {
            gate_id,
            contact_time: 0,
            thrown: false,
        }
    }
}

/// Gate id to entity, filled while the level spawns.
#[derive(Resource, Debug, Default)]
pub struct GateRegistry {
    gates: HashMap<u32, Entity>,
}

impl GateRegistry {
    pub fn register(&mut self, id: u32, entity: Entity) {
        self.gates.insert(id, entity);
    }

    pub fn get(&self, id: u32) -> Option<Entity> {
        self.gates.get(&id).copied()
    }

    pub fn clear(&mut self) {
        self.gates.clear();
    }
}

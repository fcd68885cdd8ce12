//! Physics domain: components shared by every kinematic entity.

use bevy::prelude::*;

use crate::tilemap::Aabb;

/// Authoritative position and extent. `pos` is the top-left of the
/// axis-aligned bounding box, sub-pixel precision retained.
#[derive(Component, Debug, Clone)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Pixels per tick.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Per-entity gravity rate, mutable (zeroed during dashes, divided at the
/// jump apex).
#[derive(Component, Debug, Clone, Copy)]
pub struct Gravity(pub f32);

impl Default for Gravity {
    fn default() -> Self {
        Self(super::GRAVITY_CONST)
    }
}

/// Contact flags recomputed by every step; never persisted across ticks.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Contacts {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Contacts {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn wall(&self) -> bool {
        self.left || self.right
    }
}

/// Requested movement for this tick, combined with velocity by the step.
/// Written by the player state machine or enemy AI before integration.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct MoveIntent(pub Vec2);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

/// A static rectangle that takes part in collision resolution alongside the
/// tile grid (closed gates). Toggled by interactable scripts.
#[derive(Component, Debug, Clone)]
pub struct SolidRect {
    pub rect: Aabb,
    pub enabled: bool,
}

//! Player domain: components for abilities, charges, and timers.

use bevy::prelude::*;

#[derive(Component, Debug)]
pub struct Player;

/// Permanent ability unlocks. Once granted they are never reset within a
/// session.
#[derive(Component, Debug, Default)]
pub struct Abilities {
    pub dash: bool,
    pub claw: bool,
    pub wings: bool,
    pub cloak: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityKind {
    Dash,
    Claw,
    Wings,
    Cloak,
}

impl Abilities {
    pub fn grant(&mut self, kind: AbilityKind) {
        match kind {
            AbilityKind::Dash => self.dash = true,
            AbilityKind::Claw => self.claw = true,
            AbilityKind::Wings => self.wings = true,
            AbilityKind::Cloak => self.cloak = true,
        }
    }
}

/// Air-jump and dash charges, replenished on ground or wall contact.
#[derive(Component, Debug)]
pub struct Charges {
    pub jumps: u8,
    pub dashes: u8,
}

/// Tick-counted state timers. Elapsed timers count up every tick; the dash
/// timer decays toward zero from either side, its sign doubling as the dash
/// direction.
#[derive(Component, Debug)]
pub struct PlayerTimers {
    /// Ticks since leaving the ground.
    pub air_time: i32,
    /// Ticks spent moving downward; drives the hard-landing cue.
    pub falling_time: i32,
    /// Ticks spent running; paces footstep cues.
    pub running_time: i32,
    /// Ticks since the last wall jump started.
    pub wall_jump: i32,
    /// Consecutive ticks spent wall sliding.
    pub sliding_time: i32,
    /// Ticks since the last moment of wall sliding.
    pub wall_slide: i32,
    /// Dash countdown; sign encodes direction, magnitude remaining ticks.
    pub dash: i32,
    /// Counts up; dashing is blocked until it exceeds the cooldown.
    pub dash_cooldown: i32,
    /// Cloak-dash intangibility window countdown.
    pub cloak: i32,
    /// Post-respawn intangibility countdown.
    pub intangibility: i32,
    /// Consecutive idle ticks; delays the camera look-ahead.
    pub idle: i32,
    /// Nonzero while an air jump's wing flourish is playing.
    pub air_jumping: i32,
}

impl Default for PlayerTimers {
    fn default() -> Self {
        Self {
            air_time: -10,
            falling_time: 0,
            running_time: 0,
            wall_jump: 0,
            sliding_time: 0,
            wall_slide: 1,
            dash: 0,
            dash_cooldown: 0,
            cloak: 0,
            intangibility: 0,
            idle: 0,
            air_jumping: 0,
        }
    }
}

impl PlayerTimers {
    pub fn is_dashing(&self) -> bool {
        self.dash != 0
    }

    pub fn is_cloaked(&self) -> bool {
        self.cloak > 0
    }

    pub fn is_tangible(&self) -> bool {
        self.intangibility <= 0
    }
}

/// Wall-slide grip state plus the direction of the last wall jump.
#[derive(Component, Debug, Default)]
pub struct WallGrip {
    pub sliding: bool,
    /// True when gripping a wall on the player's right.
    pub on_right: bool,
    /// X position at grip start; drifting past it auto-releases the slide.
    pub grip_x: f32,
    /// True when the last wall jump pushes rightward (off a left wall).
    pub jump_dir_right: bool,
}

/// Input gate and camera-look flags.
#[derive(Component, Debug)]
pub struct PlayerControl {
    pub can_move: bool,
    pub looking_up: bool,
    pub looking_down: bool,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self {
            can_move: true,
            looking_up: false,
            looking_down: false,
        }
    }
}

/// Last safe checkpoint; death warps teleport here.
#[derive(Component, Debug)]
pub struct SpawnAnchor(pub Vec2);

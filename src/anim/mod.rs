//! Animation domain: tick-counted clocks with enum-keyed templates.
//!
//! Animation selection is a lookup over `(EntityKind, ActionTag)` rather
//! than runtime string keys, so every kind/action pair is checked at
//! compile time.

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::core::TickSet;

/// Which family of animation templates an entity draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Grub,
    RespawnPoint,
    AbilityPickup,
    Saw,
    Crawler,
    Gate,
    Lever,
}

/// The active animation of an entity. Mutually exclusive per tick; the
/// player state machine picks exactly one each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTag {
    Idle,
    LookUp,
    LookDown,
    Run,
    Jump,
    Fall,
    WallSlide,
    Dash,
    Cloak,
    Hitstun,
    Kneel,
    Alert,
    Collect,
    Walk,
    Spin,
    Open,
}

/// Frame counts and pacing for one animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimTemplate {
    pub total_frames: u32,
    pub frames_per_image: u32,
    pub looping: bool,
}

impl AnimTemplate {
    const fn looping(total_frames: u32, frames_per_image: u32) -> Self {
        Self {
            total_frames,
            frames_per_image,
            looping: true,
        }
    }

    const fn once(total_frames: u32, frames_per_image: u32) -> Self {
        Self {
            total_frames,
            frames_per_image,
            looping: false,
        }
    }
}

/// Template table. Pairs that never occur fall back to a four-frame idle
/// loop rather than failing; unknown is not fatal.
pub fn template(kind: EntityKind, action: ActionTag) -> AnimTemplate {
    match (kind, action) {
        (EntityKind::Player, ActionTag::Idle) => AnimTemplate::looping(4, 5),
        (EntityKind::Player, ActionTag::LookUp) => AnimTemplate::once(2, 4),
        (EntityKind::Player, ActionTag::LookDown) => AnimTemplate::once(2, 4),
        (EntityKind::Player, ActionTag::Run) => AnimTemplate::looping(6, 5),
        (EntityKind::Player, ActionTag::Jump) => AnimTemplate::looping(2, 5),
        (EntityKind::Player, ActionTag::Fall) => AnimTemplate::looping(2, 5),
        (EntityKind::Player, ActionTag::WallSlide) => AnimTemplate::looping(2, 5),
        (EntityKind::Player, ActionTag::Dash) => AnimTemplate::once(4, 3),
        (EntityKind::Player, ActionTag::Cloak) => AnimTemplate::once(4, 3),
        (EntityKind::Player, ActionTag::Hitstun) => AnimTemplate::looping(2, 5),
        (EntityKind::Player, ActionTag::Kneel) => AnimTemplate::looping(2, 8),
        (EntityKind::Grub, ActionTag::Idle) => AnimTemplate::looping(4, 5),
        (EntityKind::Grub, ActionTag::Alert) => AnimTemplate::looping(2, 4),
        (EntityKind::Grub, ActionTag::Collect) => AnimTemplate::once(4, 8),
        (EntityKind::RespawnPoint, ActionTag::Idle) => AnimTemplate::looping(4, 6),
        (EntityKind::AbilityPickup, ActionTag::Idle) => AnimTemplate::looping(4, 5),
        (EntityKind::Saw, ActionTag::Spin) => AnimTemplate::looping(2, 2),
        (EntityKind::Crawler, ActionTag::Walk) => AnimTemplate::looping(4, 6),
        (EntityKind::Gate, ActionTag::Idle) => AnimTemplate::looping(1, 5),
        (EntityKind::Gate, ActionTag::Open) => AnimTemplate::once(4, 6),
        (EntityKind::Lever, ActionTag::Idle) => AnimTemplate::looping(1, 5),
        (EntityKind::Lever, ActionTag::Open) => AnimTemplate::once(2, 6),
        _ => AnimTemplate::looping(4, 5),
    }
}

/// Frame clock for one animation playthrough.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct AnimationClock {
    pub frame_counter: u32,
    pub frames_per_image: u32,
    pub total_frames: u32,
    pub looping: bool,
    pub finished: bool,
}

impl AnimationClock {
    pub fn from_template(template: AnimTemplate) -> Self {
        Self {
            frame_counter: 0,
            frames_per_image: template.frames_per_image,
            total_frames: template.total_frames,
            looping: template.looping,
            finished: false,
        }
    }

    /// Advance by one tick. `finished` latches at most once per
    /// non-looping playthrough.
    pub fn tick(&mut self) {
        let length = self.frames_per_image * self.total_frames;
        if self.looping {
            self.frame_counter = (self.frame_counter + 1) % length;
        } else {
            self.frame_counter = (self.frame_counter + 1).min(length - 1);
            if self.frame_counter >= length - 1 {
                self.finished = true;
            }
        }
    }

    /// Index of the image to present this tick.
    pub fn image_index(&self) -> u32 {
        self.frame_counter / self.frames_per_image
    }
}

/// Current action plus its clock.
#[derive(Component, Debug, Clone)]
pub struct AnimationController {
    pub kind: EntityKind,
    pub action: ActionTag,
    pub clock: AnimationClock,
}

impl AnimationController {
    pub fn new(kind: EntityKind, action: ActionTag) -> Self {
        Self {
            kind,
            action,
            clock: AnimationClock::from_template(template(kind, action)),
        }
    }

    /// Swap the active animation; a no-op when unchanged, so a state held
    /// across ticks keeps its clock.
    pub fn set_action(&mut self, action: ActionTag) {
        if self.action != action {
            self.action = action;
            self.clock = AnimationClock::from_template(template(self.kind, action));
        }
    }
}

pub(crate) fn advance_clocks(mut query: Query<&mut AnimationController>) {
    for mut controller in &mut query {
        controller.clock.tick();
    }
}

pub struct AnimPlugin;

impl Plugin for AnimPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, advance_clocks.in_set(TickSet::Anim));
    }
}

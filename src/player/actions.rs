//! Player domain: action attempts.
//!
//! Pure decision functions over the player's components. Systems call these
//! and translate the returned outcome into cues and particles, which keeps
//! the eligibility rules testable without an app.

use crate::physics::{Facing, Velocity};
use crate::player::components::{Abilities, Charges, PlayerControl, PlayerTimers, WallGrip};
use crate::player::resources::{PlayerInput, PlayerTuning};

/// Which jump fired, for cue and particle selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Off a wall; `dir_right` is the push direction.
    Wall { dir_right: bool },
    Ground,
    Air,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashStart {
    pub dir_right: bool,
    pub cloaked: bool,
}

/// Attempt a jump. Wall jumps take priority over charges; a grounded jump
/// consumes no charge thanks to the coyote buffer, a mid-air jump needs
/// wings and a charge.
pub fn try_jump(
    tuning: &PlayerTuning,
    control: &PlayerControl,
    abilities: &Abilities,
    timers: &mut PlayerTimers,
    grip: &mut WallGrip,
    charges: &mut Charges,
    velocity: &mut Velocity,
) -> Option<JumpKind> {
    if !control.can_move {
        return None;
    }

    // Wall jump while the slide buffer is live and the previous wall jump
    // is stale.
    if timers.wall_slide < tuning.wall_jump_buffer
        && abilities.claw
        && timers.wall_jump > tuning.wall_jump_buffer + 4
    {
        grip.jump_dir_right = !grip.on_right;
        timers.wall_jump = 0;
        velocity.0.y = tuning.wall_jump_velocity;
        timers.air_time = tuning.coyote_buffer + 1;
        return Some(JumpKind::Wall {
            dir_right: grip.jump_dir_right,
        });
    }

    if charges.jumps == 0 || timers.dash.abs() >= tuning.coyote_buffer {
        return None;
    }

    // Past twice the coyote buffer the jump is a mid-air one.
    if timers.air_time > tuning.coyote_buffer * 2 {
        if !abilities.wings {
            return None;
        }
        charges.jumps = charges.jumps.saturating_sub(1);
        velocity.0.y = tuning.air_jump_velocity;
        timers.air_jumping = 1;
        timers.air_time = tuning.coyote_buffer + 1;
        return Some(JumpKind::Air);
    }

    velocity.0.y = tuning.jump_velocity;
    timers.air_time = tuning.coyote_buffer + 1;
    Some(JumpKind::Ground)
}

/// Variable jump height: shear upward velocity on release. Releasing inside
/// the wall-jump lockout shears less, and accelerates the lockout clock so
/// control returns sooner.
pub fn release_jump(tuning: &PlayerTuning, timers: &mut PlayerTimers, velocity: &mut Velocity) {
    if velocity.0.y >= 0.0 {
        return;
    }
    if timers.wall_jump > tuning.wall_jump_cutoff {
        velocity.0.y /= tuning.variable_jump_shear;
    } else {
        velocity.0.y /= tuning.variable_jump_shear / 4.0;
    }
    timers.wall_jump = (timers.wall_jump as f32 * 1.5) as i32;
    timers.air_jumping = 0;
}

/// Attempt a dash. Direction resolution, in priority order: held direction
/// while inside the wall-jump lockout, then the slide side (away from the
/// wall), then facing.
pub fn try_dash(
    tuning: &PlayerTuning,
    input: &PlayerInput,
    control: &PlayerControl,
    abilities: &Abilities,
    facing: Facing,
    timers: &mut PlayerTimers,
    grip: &mut WallGrip,
    charges: &mut Charges,
    velocity: &mut Velocity,
) -> Option<DashStart> {
    if !control.can_move {
        return None;
    }
    if !abilities.dash
        || charges.dashes == 0
        || timers.dash != 0
        || timers.dash_cooldown <= tuning.dash_cooldown_ticks
    {
        return None;
    }

    let locked = timers.wall_jump <= tuning.wall_jump_buffer;
    let sliding = timers.sliding_time > tuning.coyote_buffer + 2;
    let dir_right = if locked {
        if input.holding_right {
            true
        } else if input.holding_left {
            false
        } else {
            return None;
        }
    } else if sliding {
        // Dash away from the gripped wall.
        !grip.on_right
    } else {
        facing == Facing::Right
    };

    timers.dash = if dir_right {
        tuning.dash_ticks
    } else {
        -tuning.dash_ticks
    };
    charges.dashes = charges.dashes.saturating_sub(1);
    timers.sliding_time = 0;
    timers.wall_slide = tuning.wall_jump_buffer;
    timers.dash_cooldown = -tuning.dash_ticks;
    velocity.0.y = 0.0;
    grip.sliding = false;

    let cloaked = abilities.cloak;
    if cloaked {
        timers.cloak = tuning.cloak_ticks;
    }
    Some(DashStart { dir_right, cloaked })
}

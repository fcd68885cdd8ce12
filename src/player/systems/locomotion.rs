//! Player domain: action dispatch, movement shaping, and the post-step
//! state machine.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::anim::{ActionTag, AnimationController};
use crate::core::TICK_RATE;
use crate::fx::{AudioCue, ParticleBurst, ParticleKind, SoundId};
use crate::physics::{
    Body, Contacts, Facing, Gravity, MoveIntent, Velocity, GRAVITY_CONST,
};
use crate::player::actions::{release_jump, try_dash, try_jump, JumpKind};
use crate::player::components::{
    Abilities, Charges, Player, PlayerControl, PlayerTimers, WallGrip,
};
use crate::player::resources::{PlayerInput, PlayerTuning};
use crate::tilemap::{TileKind, TileMap};
use crate::transition::{FadeKind, FadeRequest};

/// Consume this tick's input edges and fire jumps, releases, and dashes.
pub(crate) fn apply_actions(
    tuning: Res<PlayerTuning>,
    input: Res<PlayerInput>,
    mut cues: MessageWriter<AudioCue>,
    mut bursts: MessageWriter<ParticleBurst>,
    mut players: Query<
        (
            &Body,
            &Facing,
            &PlayerControl,
            &Abilities,
            &mut PlayerTimers,
            &mut WallGrip,
            &mut Charges,
            &mut Velocity,
        ),
        With<Player>,
    >,
) {
    for (body, facing, control, abilities, mut timers, mut grip, mut charges, mut velocity) in
        &mut players
    {
        let rect = body.aabb();

        if input.jump_pressed
            && let Some(kind) = try_jump(
                &tuning,
                control,
                abilities,
                &mut timers,
                &mut grip,
                &mut charges,
                &mut velocity,
            )
        {
            match kind {
                JumpKind::Wall { dir_right } => {
                    cues.write(AudioCue::stop(SoundId::WallSlide));
                    cues.write(AudioCue::play(SoundId::WallJump));
                    // Kickoff dust at the foot of the wall just left.
                    let foot = if dir_right {
                        Vec2::new(rect.left(), rect.bottom())
                    } else {
                        Vec2::new(rect.right(), rect.bottom())
                    };
                    bursts.write(ParticleBurst {
                        kind: ParticleKind::Run,
                        pos: foot,
                        vel_min: Vec2::new(-0.1, -0.1),
                        vel_max: Vec2::new(0.1, 0.3),
                        count: 5,
                    });
                }
                JumpKind::Ground => {
                    cues.write(AudioCue::play(SoundId::Jump));
                    bursts.write(ParticleBurst {
                        kind: ParticleKind::Run,
                        pos: Vec2::new(rect.center().x, rect.bottom()),
                        vel_min: Vec2::new(-0.4, -0.4),
                        vel_max: Vec2::new(0.4, -0.1),
                        count: 6,
                    });
                }
                JumpKind::Air => {
                    cues.write(AudioCue::play(SoundId::Wings));
                    bursts.write(ParticleBurst::single(
                        ParticleKind::Wings,
                        rect.center(),
                        Vec2::ZERO,
                    ));
                    bursts.write(ParticleBurst {
                        kind: ParticleKind::LongSlide,
                        pos: rect.center(),
                        vel_min: Vec2::new(-0.4, 0.1),
                        vel_max: Vec2::new(0.4, 0.3),
                        count: 6,
                    });
                }
            }
        }

        if input.jump_released {
            release_jump(&tuning, &mut timers, &mut velocity);
        }

        if input.dash_pressed
            && let Some(dash) = try_dash(
                &tuning,
                &input,
                control,
                abilities,
                *facing,
                &mut timers,
                &mut grip,
                &mut charges,
                &mut velocity,
            )
        {
            let (kind, sound) = if dash.cloaked {
                (ParticleKind::Cloak, SoundId::Cloak)
            } else {
                (ParticleKind::Dash, SoundId::Dash)
            };
            cues.write(AudioCue::play(sound));
            // Trail burst head to toe, drifting against the dash.
            let trail_vel = Vec2::new(if dash.dir_right { -1.5 } else { 1.5 }, 0.0);
            for pos in [
                rect.center(),
                Vec2::new(rect.center().x, rect.top()),
                Vec2::new(rect.center().x, rect.bottom()),
            ] {
                bursts.write(ParticleBurst::single(kind, pos, trail_vel));
            }
        }
    }
}

/// Shape the horizontal movement request and this tick's gravity before
/// integration. The wall-jump lockout overrides input entirely, then a
/// brief stall, then dashes, then plain scaled input.
pub(crate) fn shape_move_intent(
    tuning: Res<PlayerTuning>,
    input: Res<PlayerInput>,
    mut players: Query<
        (
            &PlayerControl,
            &PlayerTimers,
            &WallGrip,
            &Velocity,
            &mut MoveIntent,
            &mut Gravity,
        ),
        With<Player>,
    >,
) {
    for (control, timers, grip, velocity, mut intent, mut gravity) in &mut players {
        if !control.can_move {
            intent.0 = Vec2::ZERO;
            gravity.0 = GRAVITY_CONST;
            continue;
        }

        intent.0.y = 0.0;
        intent.0.x = if timers.wall_jump < tuning.wall_jump_cutoff {
            if grip.jump_dir_right {
                tuning.run_scale
            } else {
                -tuning.run_scale
            }
        } else if timers.wall_jump < tuning.wall_jump_cutoff + tuning.wall_jump_stall {
            0.0
        } else if timers.dash != 0 {
            (timers.dash as f32).signum() * tuning.dash_scale
        } else {
            input.axis * tuning.run_scale
        };

        gravity.0 = if timers.dash != 0 {
            0.0
        } else if timers.air_time > tuning.coyote_buffer
            && velocity.0.y.abs() < tuning.low_grav_threshold
        {
            // Float at the jump apex for precision.
            GRAVITY_CONST / tuning.low_grav_divisor
        } else {
            GRAVITY_CONST
        };
    }
}

/// The looping fall cue fades in over the second after it starts.
pub(crate) fn falling_volume(falling_ticks: i32) -> f32 {
    ((falling_ticks - TICK_RATE) as f32 / TICK_RATE as f32).clamp(0.0, 1.0)
}

/// Post-integration bookkeeping: death planes, timers, charge replenish,
/// wall sliding, and the animation hierarchy.
pub(crate) fn update_player_state(
    map: Res<TileMap>,
    tuning: Res<PlayerTuning>,
    input: Res<PlayerInput>,
    mut cues: MessageWriter<AudioCue>,
    mut bursts: MessageWriter<ParticleBurst>,
    mut fades: MessageWriter<FadeRequest>,
    mut players: Query<
        (
            &Body,
            &mut Velocity,
            &Contacts,
            &MoveIntent,
            &mut Facing,
            &mut PlayerTimers,
            &mut WallGrip,
            &mut Charges,
            &mut PlayerControl,
            &Abilities,
            &mut AnimationController,
        ),
        With<Player>,
    >,
) {
    for (
        body,
        mut velocity,
        contacts,
        intent,
        mut facing,
        mut timers,
        mut grip,
        mut charges,
        mut control,
        abilities,
        mut anim,
    ) in &mut players
    {
        let rect = body.aabb();

        // Void out below the death plane, unless inside the depths, which
        // have their own deeper plane.
        if body.pos.y > tuning.depths_y && body.pos.x > tuning.depths_x {
            fades.write(FadeRequest {
                kind: FadeKind::Damage,
            });
        } else if body.pos.y > tuning.depths_y * 4.0 {
            fades.write(FadeRequest {
                kind: FadeKind::Damage,
            });
        }

        let below = map.tile_below(rect.center()).map(|t| t.kind);
        if below == Some(TileKind::Spikes) && contacts.down {
            fades.write(FadeRequest {
                kind: FadeKind::Damage,
            });
        }

        timers.intangibility -= 1;
        timers.air_time += 1;
        timers.wall_jump += 1;
        timers.dash_cooldown += 1;
        timers.wall_slide += 1;
        let was_gripping = timers.wall_slide <= tuning.coyote_buffer;
        grip.sliding = false;
        if timers.air_jumping > 0 {
            timers.air_jumping += 1;
        }
        if timers.cloak > 0 {
            timers.cloak -= 1;
        }

        // Mobility resets on the ground.
        if contacts.down {
            charges.jumps = tuning.max_air_jumps;
            charges.dashes = tuning.max_dashes;
            timers.air_jumping = 0;

            if timers.air_time > tuning.coyote_buffer
                && timers.dash_cooldown > tuning.dash_ticks
                && below != Some(TileKind::Spikes)
            {
                if timers.falling_time >= tuning.hard_landing_ticks {
                    cues.write(AudioCue::play(SoundId::LandHard));
                    bursts.write(ParticleBurst {
                        kind: ParticleKind::Slide,
                        pos: Vec2::new(rect.center().x, rect.bottom()),
                        vel_min: Vec2::new(-2.5, 0.0),
                        vel_max: Vec2::new(2.5, 0.5),
                        count: 40,
                    });
                } else {
                    cues.write(AudioCue::play(SoundId::Land));
                    bursts.write(ParticleBurst {
                        kind: ParticleKind::Run,
                        pos: Vec2::new(rect.center().x, rect.bottom()),
                        vel_min: Vec2::new(-0.5, 0.1),
                        vel_max: Vec2::new(0.5, 0.3),
                        count: 10,
                    });
                }
            }

            cues.write(AudioCue::stop(SoundId::Falling));
            timers.air_time = 0;
        }

        // And on the wall.
        if timers.sliding_time > 0 {
            charges.jumps = tuning.max_air_jumps;
            charges.dashes = tuning.max_dashes;
            timers.air_jumping = 0;
            cues.write(AudioCue::stop(SoundId::Falling));
        }

        // Dash timer decays toward zero from either sign.
        if timers.dash > 0 {
            timers.dash -= 1;
        }
        if timers.dash < 0 {
            timers.dash += 1;
        }

        let mut idling = false;
        control.looking_up = false;
        control.looking_down = false;

        let wall_sliding = contacts.wall()
            && timers.air_time > tuning.coyote_buffer
            && velocity.0.y > 0.0
            && abilities.claw
            && timers.dash_cooldown > 1;

        if !control.can_move {
            // The transition sequence owns the animation while control is
            // suspended.
        } else if wall_sliding {
            if !was_gripping {
                cues.write(AudioCue::play(SoundId::ClawGrab));
            }
            if timers.sliding_time % tuning.slide_cue_interval == 1 {
                cues.write(AudioCue::play(SoundId::WallSlide));
            }

            grip.sliding = true;
            timers.wall_slide = 0;
            grip.on_right = contacts.right;
            timers.sliding_time += 1;
            if timers.sliding_time == 1 {
                grip.grip_x = body.pos.x;
            }

            timers.dash /= 2;
            velocity.0.y = velocity.0.y.min(tuning.wall_slide_velocity);

            anim.set_action(ActionTag::WallSlide);
            *facing = if grip.on_right {
                Facing::Right
            } else {
                Facing::Left
            };
            let grip_point = if grip.on_right {
                Vec2::new(rect.right(), rect.center().y)
            } else {
                Vec2::new(rect.left(), rect.center().y)
            };
            bursts.write(ParticleBurst {
                kind: ParticleKind::Slide,
                pos: grip_point,
                vel_min: Vec2::new(0.0, 0.5),
                vel_max: Vec2::new(0.0, 2.0),
                count: 1,
            });
        } else if timers.is_dashing() {
            let kind = if timers.is_cloaked() {
                anim.set_action(ActionTag::Cloak);
                ParticleKind::Cloak
            } else {
                anim.set_action(ActionTag::Dash);
                ParticleKind::Dash
            };
            if !contacts.wall() {
                bursts.write(ParticleBurst {
                    kind,
                    pos: rect.center(),
                    vel_min: Vec2::new(0.0, -0.3),
                    vel_max: Vec2::new(0.0, 0.3),
                    count: 1,
                });
            }
        } else if timers.air_time > tuning.coyote_buffer {
            if velocity.0.y < 0.0 {
                anim.set_action(ActionTag::Jump);
                // Wing shimmer trails the start of an air jump.
                if timers.air_jumping > 0 && timers.air_jumping < 16 {
                    bursts.write(ParticleBurst {
                        kind: ParticleKind::LongSlide,
                        pos: rect.center(),
                        vel_min: Vec2::new(-0.1, 0.0),
                        vel_max: Vec2::new(0.1, 0.2),
                        count: 1,
                    });
                }
            } else {
                anim.set_action(ActionTag::Fall);
            }
        } else if intent.0.x != 0.0 && !contacts.wall() {
            anim.set_action(ActionTag::Run);
            timers.running_time += 1;

            if timers.wall_jump % tuning.run_particle_interval == 0 {
                bursts.write(ParticleBurst {
                    kind: ParticleKind::Run,
                    pos: Vec2::new(rect.center().x, rect.bottom()),
                    vel_min: Vec2::new(-0.33, -0.2),
                    vel_max: Vec2::new(0.33, 0.2),
                    count: 1,
                });
            }

            // Footsteps keyed to the ground material.
            if timers.running_time % tuning.run_cue_interval == 5 {
                match map.tile_below(body.pos).map(|t| t.kind) {
                    Some(TileKind::Grass) => {
                        cues.write(AudioCue::play(SoundId::RunGrass));
                    }
                    Some(TileKind::Stone) => {
                        cues.write(AudioCue::play(SoundId::RunStone));
                    }
                    _ => {}
                }
            }
        } else if input.holding_up {
            control.looking_up = true;
            idling = true;
            anim.set_action(ActionTag::LookUp);
        } else if input.holding_down {
            control.looking_down = true;
            idling = true;
            anim.set_action(ActionTag::LookDown);
        } else {
            idling = true;
            anim.set_action(ActionTag::Idle);
        }

        if idling {
            timers.idle += 1;
        } else {
            timers.idle = 0;
        }

        // Drifting past the grip column releases the slide and expires the
        // wall-jump buffer with it.
        if timers.sliding_time > 1 && body.pos.x != grip.grip_x {
            let past = if grip.on_right {
                body.pos.x > grip.grip_x
            } else {
                body.pos.x < grip.grip_x
            };
            if past {
                grip.sliding = false;
                timers.sliding_time = 0;
                timers.wall_slide = tuning.wall_jump_buffer;
            }
        }

        if velocity.0.y > 0.0 {
            timers.falling_time += 1;
        }
        if velocity.0.y < 0.0
            || timers.air_time < tuning.coyote_buffer
            || timers.sliding_time > 0
        {
            timers.falling_time = 0;
        }
        if timers.falling_time == TICK_RATE {
            cues.write(AudioCue::play(SoundId::Falling));
        } else if timers.falling_time > TICK_RATE {
            cues.write(AudioCue::volume(
                SoundId::Falling,
                falling_volume(timers.falling_time),
            ));
        }

        if !grip.sliding && abilities.claw {
            cues.write(AudioCue::stop(SoundId::WallSlide));
            timers.sliding_time = 0;
        }
        if timers.air_time > tuning.coyote_buffer || timers.idle > tuning.coyote_buffer {
            cues.write(AudioCue::stop(SoundId::RunGrass));
            cues.write(AudioCue::stop(SoundId::RunStone));
            timers.running_time = 0;
        }
    }
}

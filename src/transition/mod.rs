//! Transition domain: the death-warp fade sequence and camera scroll.
//!
//! A damage fade plays out over three phases on the fixed tick: hitstun at
//! the first fade-out frame, the warp to the respawn anchor at full black,
//! and control returning when the fade-in completes.


use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::anim::{ActionTag, AnimationController};
use crate::core::{SessionStats, TickSet};
use crate::fx::{AudioCue, ParticleBurst, ParticleKind, SoundId};
use crate::physics::{Body, Gravity, Velocity, GRAVITY_CONST};
use crate::player::{
    Player, PlayerControl, PlayerTimers, PlayerTuning, SpawnAnchor,
};

/// Alpha change per tick.
pub const FADE_SPEED: i32 = 6;

/// Idle ticks before a held look direction starts panning the camera.
pub const LOOK_THRESHOLD: i32 = 30;

/// Vertical pan per tick while looking.
pub const LOOK_OFFSET: f32 = 4.5;

/// Camera smoothing divisor; higher is lazier.
pub const CAMERA_SMOOTH: f32 = 10.0;

/// Alpha a pickup flash jumps to before decaying.
const FLASH_ALPHA: i32 = 140;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeKind {
    /// Full blackout with hitstun and a death warp at the midpoint.
    Damage,
    /// Brief dimming on an ability pickup; no warp, control retained.
    PickupFlash,
}

#[derive(Debug, Clone, Copy)]
pub struct FadeRequest {
    pub kind: FadeKind,
}

impl Message for FadeRequest {}

/// Blackout overlay state. At most one fade is in flight; a damage fade
/// takes over a pickup flash, everything else is dropped while active.
#[derive(Resource, Debug, Default)]
pub struct Fade {
    pub alpha: i32,
    pub fading_out: bool,
    pub fading_in: bool,
    pub kind: Option<FadeKind>,
}

impl Fade {
    pub fn active(&self) -> bool {
        self.fading_out || self.fading_in || self.alpha > 0
    }
}

/// Smoothed camera target in world pixels.
#[derive(Resource, Debug)]
pub struct CameraScroll {
    pub pos: Vec2,
    /// Smoothing divisor for this tick; reset every tick, snapped to 1
    /// during the warp.
    pub smooth: f32,
}

impl Default for CameraScroll {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            smooth: CAMERA_SMOOTH,
        }
    }
}

#[derive(Component, Debug)]
pub(crate) struct FadeOverlay;

pub(crate) fn run_fade(
    mut fade: ResMut<Fade>,
    mut requests: MessageReader<FadeRequest>,
    tuning: Res<PlayerTuning>,
    mut stats: ResMut<SessionStats>,
    mut scroll: ResMut<CameraScroll>,
    mut cues: MessageWriter<AudioCue>,
    mut bursts: MessageWriter<ParticleBurst>,
    mut players: Query<
        (
            &mut Body,
            &mut Velocity,
            &mut Gravity,
            &mut PlayerTimers,
            &mut PlayerControl,
            &SpawnAnchor,
            &mut AnimationController,
        ),
        With<Player>,
    >,
) {
    for request in requests.read() {
        match request.kind {
            FadeKind::Damage => {
                if fade.kind == Some(FadeKind::Damage) {
                    continue;
                }
                // Damage overrides a pickup flash already in flight,
                // picking up from its current alpha.
                fade.kind = Some(FadeKind::Damage);
                fade.fading_out = true;
                fade.fading_in = false;
                fade.alpha = fade.alpha.max(FADE_SPEED);
                if let Ok((body, _, _, mut timers, mut control, _, mut anim)) =
                    players.single_mut()
                {
                    hitstun(
                        &tuning,
                        body.aabb().center(),
                        &mut timers,
                        &mut control,
                        &mut anim,
                        &mut cues,
                        &mut bursts,
                    );
                }
            }
            FadeKind::PickupFlash => {
                if fade.active() {
                    continue;
                }
                fade.kind = Some(FadeKind::PickupFlash);
                fade.fading_in = true;
                fade.alpha = FLASH_ALPHA;
            }
        }
    }

    if fade.fading_out {
        if fade.alpha < 255 {
            fade.alpha = (fade.alpha + FADE_SPEED).min(255);
        } else {
            // Full black: warp and snap the camera before fading back.
            scroll.smooth = 1.0;
            if let Ok((mut body, mut velocity, mut gravity, mut timers, _, anchor, mut anim)) =
                players.single_mut()
            {
                body.pos = anchor.0 + Vec2::new(0.0, 1.0);
                velocity.0.y = 0.0;
                timers.dash = 0;
                gravity.0 = GRAVITY_CONST;
                anim.set_action(ActionTag::Kneel);
            }
            stats.deaths += 1;
            fade.fading_out = false;
            fade.fading_in = true;
        }
    } else if fade.fading_in {
        // The warp epilogue only belongs to a damage fade; a pickup flash
        // just decays.
        let warping = fade.kind == Some(FadeKind::Damage);
        if warping
            && fade.alpha == 255
            && let Ok((_, _, _, mut timers, _, _, _)) = players.single_mut()
        {
            timers.intangibility = tuning.intangibility_ticks;
        }
        if fade.alpha > 0 {
            fade.alpha = (fade.alpha - FADE_SPEED).max(0);
            if warping
                && fade.alpha < 50
                && let Ok((_, _, _, _, control, _, mut anim)) = players.single_mut()
                && !control.can_move
            {
                anim.set_action(ActionTag::Idle);
            }
        } else {
            if warping
                && let Ok((_, _, _, mut timers, mut control, _, mut anim)) = players.single_mut()
            {
                control.can_move = true;
                timers.air_time = 0;
                anim.set_action(ActionTag::Idle);
            }
            fade.fading_in = false;
            fade.kind = None;
        }
    }
}

/// Suspend control, silence movement loops, and burst damage particles.
fn hitstun(
    tuning: &PlayerTuning,
    center: Vec2,
    timers: &mut PlayerTimers,
    control: &mut PlayerControl,
    anim: &mut AnimationController,
    cues: &mut MessageWriter<AudioCue>,
    bursts: &mut MessageWriter<ParticleBurst>,
) {
    anim.set_action(ActionTag::Hitstun);
    for sound in [
        SoundId::Land,
        SoundId::Falling,
        SoundId::Wings,
        SoundId::Cloak,
        SoundId::RunGrass,
        SoundId::RunStone,
        SoundId::WallSlide,
    ] {
        cues.write(AudioCue::stop(sound));
    }
    cues.write(AudioCue::play(SoundId::Hitstun));
    control.can_move = false;
    timers.falling_time = 0;

    bursts.write(ParticleBurst {
        kind: ParticleKind::Cloak,
        pos: center,
        vel_min: Vec2::new(-5.0, -5.0),
        vel_max: Vec2::new(5.0, 5.0),
        count: tuning.hitstun_particles,
    });
}

/// Chase the player's center, panning vertically when a look is held
/// through the idle threshold.
pub(crate) fn follow_player(
    mut scroll: ResMut<CameraScroll>,
    players: Query<(&Body, &PlayerControl, &PlayerTimers), With<Player>>,
) {
    let Ok((body, control, timers)) = players.single() else {
        return;
    };

    let mut smooth = scroll.smooth;
    if timers.idle > LOOK_THRESHOLD {
        if control.looking_up {
            scroll.pos.y -= LOOK_OFFSET;
            smooth = CAMERA_SMOOTH * 1.75;
        }
        if control.looking_down {
            scroll.pos.y += LOOK_OFFSET;
            smooth = CAMERA_SMOOTH * 1.75;
        }
    }

    let target = body.center();
    let delta = (target - scroll.pos) / smooth;
    scroll.pos += delta;
    scroll.smooth = CAMERA_SMOOTH;
}

/// Screen-space sync runs every render frame, outside the fixed tick.
pub(crate) fn sync_camera(
    scroll: Res<CameraScroll>,
    fade: Res<Fade>,
    mut cameras: Query<&mut Transform, (With<Camera2d>, Without<FadeOverlay>)>,
    mut overlays: Query<(&mut Transform, &mut Sprite), With<FadeOverlay>>,
) {
    let cam_pos = Vec2::new(scroll.pos.x.trunc(), -scroll.pos.y.trunc());
    for mut transform in &mut cameras {
        transform.translation.x = cam_pos.x;
        transform.translation.y = cam_pos.y;
    }
    for (mut transform, mut sprite) in &mut overlays {
        transform.translation.x = cam_pos.x;
        transform.translation.y = cam_pos.y;
        sprite.color = Color::srgba(0.0, 0.0, 0.0, fade.alpha as f32 / 255.0);
    }
}

fn setup_overlay(mut commands: Commands) {
    commands.spawn((
        FadeOverlay,
        Sprite {
            color: Color::srgba(0.0, 0.0, 0.0, 0.0),
            custom_size: Some(Vec2::new(4096.0, 4096.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 100.0),
    ));
}

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Fade>()
            .init_resource::<CameraScroll>()
            .add_message::<FadeRequest>()
            .add_systems(Startup, setup_overlay)
            .add_systems(
                FixedUpdate,
                (run_fade, follow_player).chain().in_set(TickSet::Flow),
            )
            .add_systems(Update, sync_camera);
    }
}

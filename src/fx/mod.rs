//! Fx domain: audio cues, HUD prompts, and particle bursts.
//!
//! Gameplay systems never touch sinks directly; they publish messages and
//! this domain drains them. Particle velocities come from a seeded RNG so a
//! session replays identically for a given seed.


use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::{SessionConfig, TickSet};
use crate::physics::Body;

/// Every sound the game can request. Unknown sounds cannot be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundId {
    Jump,
    Wings,
    Dash,
    Cloak,
    WallJump,
    WallSlide,
    ClawGrab,
    Land,
    LandHard,
    Falling,
    RunGrass,
    RunStone,
    Hitstun,
    GrubAlert,
    GrubFree,
    LeverPull,
    GateOpen,
    AbilityPickup,
    RespawnSet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CueAction {
    Play,
    Stop,
    /// Retarget a looping sound's volume, 0.0 to 1.0.
    Volume(f32),
}

/// Request to start or stop a sound.
#[derive(Debug, Clone, Copy)]
pub struct AudioCue {
    pub sound: SoundId,
    pub action: CueAction,
}

impl Message for AudioCue {}

impl AudioCue {
    pub fn play(sound: SoundId) -> Self {
        Self {
            sound,
            action: CueAction::Play,
        }
    }

    pub fn stop(sound: SoundId) -> Self {
        Self {
            sound,
            action: CueAction::Stop,
        }
    }

    pub fn volume(sound: SoundId, level: f32) -> Self {
        Self {
            sound,
            action: CueAction::Volume(level),
        }
    }
}

/// One-shot HUD text, e.g. an ability pickup description.
#[derive(Debug, Clone)]
pub struct HudPrompt {
    pub text: String,
}

impl Message for HudPrompt {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Run,
    Slide,
    LongSlide,
    Dash,
    Cloak,
    Wings,
    Grub,
}

impl ParticleKind {
    /// Drift lifetime in ticks.
    fn life(self) -> i32 {
        match self {
            ParticleKind::Run => 20,
            ParticleKind::Slide => 24,
            ParticleKind::LongSlide => 40,
            ParticleKind::Dash | ParticleKind::Cloak => 12,
            ParticleKind::Wings => 30,
            ParticleKind::Grub => 45,
        }
    }

    fn color(self) -> Color {
        match self {
            ParticleKind::Run => Color::srgb(0.55, 0.5, 0.45),
            ParticleKind::Slide => Color::srgb(0.6, 0.6, 0.65),
            ParticleKind::LongSlide => Color::srgb(0.7, 0.7, 0.75),
            ParticleKind::Dash => Color::srgb(0.85, 0.85, 0.9),
            ParticleKind::Cloak => Color::srgb(0.3, 0.25, 0.4),
            ParticleKind::Wings => Color::srgb(0.9, 0.9, 0.95),
            ParticleKind::Grub => Color::srgb(0.4, 0.9, 0.4),
        }
    }
}

/// Request for `count` particles at `pos`, each with a velocity drawn
/// uniformly from the `vel_min..=vel_max` box. Equal bounds pin the
/// velocity exactly.
#[derive(Debug, Clone, Copy)]
pub struct ParticleBurst {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel_min: Vec2,
    pub vel_max: Vec2,
    pub count: u32,
}

impl Message for ParticleBurst {}

impl ParticleBurst {
    /// A single particle with a fixed velocity.
    pub fn single(kind: ParticleKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            kind,
            pos,
            vel_min: vel,
            vel_max: vel,
            count: 1,
        }
    }
}

/// Cosmetic drift entity. Ignores the tile grid entirely.
#[derive(Component, Debug)]
pub struct Particle {
    pub vel: Vec2,
    pub life: i32,
}

/// Session RNG for particle jitter, split from gameplay randomness.
#[derive(Resource, Debug)]
pub struct FxRng(pub ChaCha8Rng);

impl FromWorld for FxRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world.resource::<SessionConfig>().seed;
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

fn sample(rng: &mut ChaCha8Rng, min: f32, max: f32) -> f32 {
    if min < max { rng.random_range(min..max) } else { min }
}

pub(crate) fn spawn_bursts(
    mut commands: Commands,
    mut bursts: MessageReader<ParticleBurst>,
    mut rng: ResMut<FxRng>,
) {
    for burst in bursts.read() {
        for _ in 0..burst.count {
            let vel = Vec2::new(
                sample(&mut rng.0, burst.vel_min.x, burst.vel_max.x),
                sample(&mut rng.0, burst.vel_min.y, burst.vel_max.y),
            );
            commands.spawn((
                Particle {
                    vel,
                    life: burst.kind.life(),
                },
                Body::new(burst.pos, Vec2::ONE),
                Sprite {
                    color: burst.kind.color(),
                    custom_size: Some(Vec2::ONE),
                    ..default()
                },
                Transform::default(),
            ));
        }
    }
}

pub(crate) fn drift_particles(
    mut commands: Commands,
    mut particles: Query<(Entity, &mut Particle, &mut Body)>,
) {
    for (entity, mut particle, mut body) in &mut particles {
        body.pos += particle.vel;
        particle.life -= 1;
        if particle.life <= 0 {
            commands.entity(entity).despawn();
        }
    }
}

pub(crate) fn drain_cues(mut cues: MessageReader<AudioCue>) {
    for cue in cues.read() {
        debug!(?cue.sound, ?cue.action, "audio cue");
    }
}

pub(crate) fn drain_prompts(mut prompts: MessageReader<HudPrompt>) {
    for prompt in prompts.read() {
        info!("{}", prompt.text);
    }
}

pub struct FxPlugin;

impl Plugin for FxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FxRng>()
            .add_message::<AudioCue>()
            .add_message::<HudPrompt>()
            .add_message::<ParticleBurst>()
            .add_systems(
                FixedUpdate,
                (spawn_bursts, drift_particles, drain_cues, drain_prompts)
                    .chain()
                    .in_set(TickSet::Anim),
            );
    }
}

//! Interact domain: contact scripts.
//!
//! All of these run after integration, against the player's resolved
//! position for the tick. Removal is deferred through `Commands` so a
//! contact never invalidates another system's query mid-tick.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::anim::{ActionTag, AnimationController};
use crate::core::GrubCollected;
use crate::fx::{AudioCue, HudPrompt, ParticleBurst, ParticleKind, SoundId};
use crate::interact::components::{
    AbilityPickup, Crawler, Gate, GateRegistry, Grub, Lever, RespawnPoint, Saw, ShadeGate,
};
use crate::physics::{Body, Contacts, MoveIntent, SolidRect};
use crate::player::{Abilities, AbilityKind, Player, PlayerTimers, SpawnAnchor};
use crate::tilemap::TileMap;
use crate::transition::{FadeKind, FadeRequest};

/// Grub beats, in ticks after first touch.
const GRUB_ALERT_TICK: i32 = 2;
const GRUB_FREE_TICK: i32 = 40;
const GRUB_DESPAWN_TICK: i32 = 120;

/// Standing-contact debounce before a lever throws.
const LEVER_THROW_TICK: i32 = 2;

pub(crate) fn crawler_intent(
    map: Res<TileMap>,
    mut crawlers: Query<(&mut Crawler, &Body, &Contacts, &mut MoveIntent)>,
) {
    for (mut crawler, body, contacts, mut intent) in &mut crawlers {
        if contacts.right {
            crawler.walking_right = false;
        } else if contacts.left {
            crawler.walking_right = true;
        } else if contacts.down {
            // Turn at a ledge: probe the tile under the leading edge.
            let rect = body.aabb();
            let probe = if crawler.walking_right {
                Vec2::new(rect.right() + 1.0, rect.bottom() + 1.0)
            } else {
                Vec2::new(rect.left() - 1.0, rect.bottom() + 1.0)
            };
            let ground_ahead = map
                .get(map.cell_of(probe))
                .is_some_and(|tile| tile.kind.is_solid());
            if !ground_ahead {
                crawler.walking_right = !crawler.walking_right;
            }
        }

        intent.0.x = if crawler.walking_right {
            crawler.speed
        } else {
            -crawler.speed
        };
    }
}

pub(crate) fn respawn_contact(
    mut cues: MessageWriter<AudioCue>,
    mut prompts: MessageWriter<HudPrompt>,
    points: Query<&Body, With<RespawnPoint>>,
    mut players: Query<(&Body, &mut SpawnAnchor), With<Player>>,
) {
    for (player_body, mut anchor) in &mut players {
        let player_rect = player_body.aabb();
        for point_body in &points {
            if !player_rect.overlaps(&point_body.aabb()) {
                continue;
            }
            let rest = point_body.pos;
            if anchor.0 != rest {
                anchor.0 = rest;
                cues.write(AudioCue::play(SoundId::RespawnSet));
                prompts.write(HudPrompt {
                    text: "Checkpoint reached".into(),
                });
            }
        }
    }
}

pub(crate) fn grub_contact(
    mut commands: Commands,
    mut cues: MessageWriter<AudioCue>,
    mut bursts: MessageWriter<ParticleBurst>,
    mut collected: MessageWriter<GrubCollected>,
    mut grubs: Query<(Entity, &Body, &mut Grub, &mut AnimationController)>,
    players: Query<(&Body, &PlayerTimers), With<Player>>,
) {
    let touching = |rect: &crate::tilemap::Aabb| {
        players
            .iter()
            .any(|(body, timers)| timers.is_tangible() && body.aabb().overlaps(rect))
    };

    for (entity, body, mut grub, mut anim) in &mut grubs {
        if grub.collect_timer == 0 {
            if touching(&body.aabb()) {
                grub.collect_timer = 1;
            }
            continue;
        }

        grub.collect_timer += 1;
        match grub.collect_timer {
            GRUB_ALERT_TICK => {
                // The jar breaks here; the session counter moves with it.
                anim.set_action(ActionTag::Alert);
                cues.write(AudioCue::play(SoundId::GrubAlert));
                collected.write(GrubCollected);
            }
            GRUB_FREE_TICK => {
                anim.set_action(ActionTag::Collect);
                cues.write(AudioCue::play(SoundId::GrubFree));
                bursts.write(ParticleBurst {
                    kind: ParticleKind::Grub,
                    pos: body.aabb().center(),
                    vel_min: Vec2::new(-0.6, -0.8),
                    vel_max: Vec2::new(0.6, -0.1),
                    count: 8,
                });
            }
            GRUB_DESPAWN_TICK => {
                commands.entity(entity).despawn();
            }
            _ => {}
        }
    }
}

fn ability_prompt(kind: AbilityKind) -> &'static str {
    match kind {
        AbilityKind::Dash => "Mothwing Cloak acquired. Dash with Shift.",
        AbilityKind::Claw => "Mantis Claw acquired. Cling to walls and jump off them.",
        AbilityKind::Wings => "Monarch Wings acquired. Jump again in mid-air.",
        AbilityKind::Cloak => "Shade Cloak acquired. Dash through shade gates.",
    }
}

pub(crate) fn pickup_contact(
    mut commands: Commands,
    mut cues: MessageWriter<AudioCue>,
    mut prompts: MessageWriter<HudPrompt>,
    mut bursts: MessageWriter<ParticleBurst>,
    mut fades: MessageWriter<FadeRequest>,
    pickups: Query<(Entity, &Body, &AbilityPickup)>,
    mut players: Query<(&Body, &mut Abilities), With<Player>>,
) {
    for (player_body, mut abilities) in &mut players {
        let player_rect = player_body.aabb();
        for (entity, pickup_body, pickup) in &pickups {
            if !player_rect.overlaps(&pickup_body.aabb()) {
                continue;
            }
            abilities.grant(pickup.grant);
            cues.write(AudioCue::play(SoundId::AbilityPickup));
            prompts.write(HudPrompt {
                text: ability_prompt(pickup.grant).into(),
            });
            // Sparkle at both ends of the exchange.
            for pos in [pickup_body.center(), player_rect.center()] {
                bursts.write(ParticleBurst {
                    kind: ParticleKind::Wings,
                    pos,
                    vel_min: Vec2::new(-1.5, -1.5),
                    vel_max: Vec2::new(1.5, 1.5),
                    count: 12,
                });
            }
            fades.write(FadeRequest {
                kind: FadeKind::PickupFlash,
            });
            commands.entity(entity).despawn();
        }
    }
}

/// Round hazards hit from their center; the box test would overreach at
/// the corners of the blade.
fn circle_hits_rect(center: Vec2, radius: f32, rect: &crate::tilemap::Aabb) -> bool {
    let nearest = Vec2::new(
        center.x.clamp(rect.left(), rect.right()),
        center.y.clamp(rect.top(), rect.bottom()),
    );
    nearest.distance_squared(center) < radius * radius
}

/// A tangible, uncloaked player touching a hazard starts the damage fade.
/// Saws are circular, crawlers are boxes.
pub(crate) fn hazard_contact(
    mut fades: MessageWriter<FadeRequest>,
    saws: Query<&Body, With<Saw>>,
    crawlers: Query<&Body, (With<Crawler>, Without<Saw>)>,
    players: Query<(&Body, &PlayerTimers), With<Player>>,
) {
    for (player_body, timers) in &players {
        if !timers.is_tangible() || timers.is_cloaked() {
            continue;
        }
        let player_rect = player_body.aabb();
        let sawed = saws
            .iter()
            .any(|body| circle_hits_rect(body.center(), body.size.x / 2.0, &player_rect));
        let trampled = crawlers
            .iter()
            .any(|body| player_rect.overlaps(&body.aabb()));
        if sawed || trampled {
            fades.write(FadeRequest {
                kind: FadeKind::Damage,
            });
        }
    }
}

/// Shade gates solidify against everything except a cloaked player. Runs
/// before integration so the current tick's step sees the right phase.
pub(crate) fn phase_shade_gates(
    mut gates: Query<&mut SolidRect, With<ShadeGate>>,
    players: Query<&PlayerTimers, With<Player>>,
) {
    let cloaked = players.iter().any(PlayerTimers::is_cloaked);
    for mut solid in &mut gates {
        solid.enabled = !cloaked;
    }
}

pub(crate) fn lever_contact(
    registry: Res<GateRegistry>,
    mut cues: MessageWriter<AudioCue>,
    mut levers: Query<(&Body, &mut Lever, &mut AnimationController), Without<Gate>>,
    mut gates: Query<(&mut Gate, &mut SolidRect, &mut AnimationController), Without<Lever>>,
    players: Query<&Body, With<Player>>,
) {
    for (lever_body, mut lever, mut lever_anim) in &mut levers {
        if lever.thrown {
            continue;
        }

        let touched = players
            .iter()
            .any(|body| body.aabb().overlaps(&lever_body.aabb()));
        if touched {
            lever.contact_time += 1;
        } else {
            lever.contact_time = 0;
        }
        if lever.contact_time < LEVER_THROW_TICK {
            continue;
        }

        lever.thrown = true;
        lever_anim.set_action(ActionTag::Open);
        cues.write(AudioCue::play(SoundId::LeverPull));

        if let Some(gate_entity) = registry.get(lever.gate_id)
            && let Ok((mut gate, mut solid, mut gate_anim)) = gates.get_mut(gate_entity)
        {
            gate.open = true;
            solid.enabled = false;
            gate_anim.set_action(ActionTag::Open);
            cues.write(AudioCue::play(SoundId::GateOpen));
        }
    }
}

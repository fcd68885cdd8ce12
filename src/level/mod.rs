//! Level domain: map loading and entity spawning at startup.

mod loader;

#[cfg(test)]
mod tests;

use std::path::Path;

use bevy::prelude::*;

use crate::core::{GameState, SessionStats};
use crate::interact::{
    spawn_ability_pickup, spawn_crawler, spawn_gate, spawn_grub, spawn_lever,
    spawn_respawn_point, spawn_saw, spawn_shade_gate, GateRegistry, GATE_SIZE, LEVER_SIZE,
};
use crate::player::{spawn_player, AbilityKind};
use crate::tilemap::{SpawnPoint, TileKind, TileMap};
use crate::transition::CameraScroll;

pub use loader::{fallback_map, load_map, parse_map, LevelLoadError};

const MAP_PATH: &str = "assets/map.json";

/// Spawner tile variants. The map editor paints these as tiles; the loader
/// strips them back out into entities.
const SPAWNER_RESPAWN: u8 = 0;
const SPAWNER_GRUB: u8 = 1;
const SPAWNER_PLAYER: u8 = 2;
const SPAWNER_CLOAK: u8 = 3;
const SPAWNER_CLAW: u8 = 4;
const SPAWNER_WINGS: u8 = 5;
const SPAWNER_DASH: u8 = 6;
const SPAWNER_SAW: u8 = 7;
const SPAWNER_CRAWLER: u8 = 8;
const SPAWNER_GATE: u8 = 9;
const SPAWNER_SHADE_GATE: u8 = 10;
const SPAWNER_LEVER: u8 = 11;

fn tile_color(kind: TileKind) -> Color {
    match kind {
        TileKind::Grass => Color::srgb(0.25, 0.45, 0.25),
        TileKind::Stone => Color::srgb(0.35, 0.35, 0.4),
        TileKind::Spikes => Color::srgb(0.75, 0.75, 0.8),
        TileKind::Decor | TileKind::LargeDecor => Color::srgb(0.2, 0.25, 0.3),
        TileKind::Spawners | TileKind::Unknown => Color::NONE,
    }
}

fn spawn_tile_sprites(commands: &mut Commands, map: &TileMap) {
    let size = map.tile_size as f32;
    for tile in map.records() {
        if tile.kind == TileKind::Spawners || tile.kind == TileKind::Unknown {
            continue;
        }
        let center = map.rect_of(tile.grid_pos).center();
        commands.spawn((
            Sprite {
                color: tile_color(tile.kind),
                custom_size: Some(Vec2::splat(size)),
                ..default()
            },
            Transform::from_xyz(center.x.trunc(), -center.y.trunc(), -1.0),
        ));
    }
    for loose in &map.loose {
        commands.spawn((
            Sprite {
                color: tile_color(loose.kind),
                custom_size: Some(Vec2::splat(size)),
                ..default()
            },
            Transform::from_xyz(
                (loose.pos.x + size / 2.0).trunc(),
                -(loose.pos.y + size / 2.0).trunc(),
                -2.0,
            ),
        ));
    }
}

/// Gate centers by id, in the order gates will be spawned. Used to wire
/// each lever to its nearest gate.
fn gate_centers(spawns: &[SpawnPoint]) -> Vec<(u32, Vec2)> {
    spawns
        .iter()
        .filter(|spawn| spawn.variant == SPAWNER_GATE)
        .enumerate()
        .map(|(id, spawn)| (id as u32, spawn.pos + GATE_SIZE / 2.0))
        .collect()
}

fn nearest_gate_id(gates: &[(u32, Vec2)], pos: Vec2) -> u32 {
    gates
        .iter()
        .min_by(|a, b| {
            a.1.distance_squared(pos)
                .total_cmp(&b.1.distance_squared(pos))
        })
        .map(|(id, _)| *id)
        .unwrap_or(0)
}

fn spawn_entities(
    commands: &mut Commands,
    registry: &mut GateRegistry,
    stats: &mut SessionStats,
    scroll: &mut CameraScroll,
    spawns: &[SpawnPoint],
) {
    let gates = gate_centers(spawns);
    let mut next_gate_id = 0;

    for spawn in spawns {
        let pos = spawn.pos;
        match spawn.variant {
            SPAWNER_RESPAWN => {
                spawn_respawn_point(commands, pos);
            }
            SPAWNER_GRUB => {
                spawn_grub(commands, pos);
                stats.grubs_total += 1;
            }
            SPAWNER_PLAYER => {
                spawn_player(commands, pos);
                scroll.pos = pos;
            }
            SPAWNER_CLOAK => {
                spawn_ability_pickup(commands, pos, AbilityKind::Cloak);
            }
            SPAWNER_CLAW => {
                spawn_ability_pickup(commands, pos, AbilityKind::Claw);
            }
            SPAWNER_WINGS => {
                spawn_ability_pickup(commands, pos, AbilityKind::Wings);
            }
            SPAWNER_DASH => {
                spawn_ability_pickup(commands, pos, AbilityKind::Dash);
            }
            SPAWNER_SAW => {
                spawn_saw(commands, pos);
            }
            SPAWNER_CRAWLER => {
                spawn_crawler(commands, pos);
            }
            SPAWNER_GATE => {
                spawn_gate(commands, registry, next_gate_id, pos);
                next_gate_id += 1;
            }
            SPAWNER_SHADE_GATE => {
                spawn_shade_gate(commands, pos);
            }
            SPAWNER_LEVER => {
                // Each lever opens the gate nearest its center.
                let lever_center = pos + LEVER_SIZE / 2.0;
                spawn_lever(commands, pos, nearest_gate_id(&gates, lever_center));
            }
            other => {
                warn!("unhandled spawner variant {other} at {pos:?}");
            }
        }
    }
}

fn load_level(
    mut commands: Commands,
    mut registry: ResMut<GateRegistry>,
    mut stats: ResMut<SessionStats>,
    mut scroll: ResMut<CameraScroll>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let mut map = match load_map(Path::new(MAP_PATH)) {
        Ok(map) => map,
        Err(err) => {
            warn!("{err}; using the fallback room");
            fallback_map()
        }
    };

    let wanted: Vec<(TileKind, u8)> = (SPAWNER_RESPAWN..=SPAWNER_LEVER)
        .map(|v| (TileKind::Spawners, v))
        .collect();
    let spawns = map.extract(&wanted, false);

    registry.clear();
    spawn_entities(
        &mut commands,
        &mut registry,
        &mut stats,
        &mut scroll,
        &spawns,
    );
    spawn_tile_sprites(&mut commands, &map);

    info!(
        tiles = map.len(),
        spawns = spawns.len(),
        grubs = stats.grubs_total,
        "level loaded"
    );
    commands.insert_resource(map);
    next_state.set(GameState::Run);
}

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_level);
    }
}

//! Level domain: tests for map parsing, the fallback room, and spawning.

use bevy::prelude::*;

use super::{
    fallback_map, nearest_gate_id, parse_map, spawn_entities, SPAWNER_GATE, SPAWNER_LEVER,
};
use crate::core::SessionStats;
use crate::interact::{GateRegistry, Lever};
use crate::tilemap::{SpawnPoint, TileKind};
use crate::transition::CameraScroll;

const VALID_MAP: &str = r#"{
    "tile_size": 16,
    "tilemap": {
        "0;4": {"type": "stone", "variant": 1, "pos": [0, 4]},
        "1;4": {"type": "grass", "variant": 1, "pos": [1, 4]},
        "-2;4": {"type": "spikes", "variant": 0, "pos": [-2, 4]},
        "0;3": {"type": "spawners", "variant": 2, "pos": [0, 3]}
    },
    "offgrid": [
        {"type": "decor", "variant": 0, "pos": [37.5, 12.0]}
    ]
}"#;

#[test]
fn test_parse_valid_map() {
    let map = parse_map("test.json", VALID_MAP).expect("map should parse");
    assert_eq!(map.tile_size, 16);
    assert_eq!(map.len(), 4);
    assert_eq!(
        map.get(IVec2::new(0, 4)).map(|t| t.kind),
        Some(TileKind::Stone)
    );
    assert_eq!(
        map.get(IVec2::new(-2, 4)).map(|t| t.kind),
        Some(TileKind::Spikes)
    );
    assert_eq!(map.loose.len(), 1);
    assert_eq!(map.loose[0].kind, TileKind::Decor);
}

#[test]
fn test_parse_tolerates_unknown_kind() {
    let text = r#"{
        "tile_size": 16,
        "tilemap": {
            "0;0": {"type": "lava", "variant": 0, "pos": [0, 0]}
        }
    }"#;
    let map = parse_map("test.json", text).expect("unknown kinds are inert, not fatal");
    assert_eq!(
        map.get(IVec2::ZERO).map(|t| t.kind),
        Some(TileKind::Unknown)
    );
    assert!(map.physics_rects_nearby(bevy::prelude::Vec2::ZERO).is_empty());
}

#[test]
fn test_parse_rejects_bad_grid_key() {
    let text = r#"{
        "tile_size": 16,
        "tilemap": {
            "zero;zero": {"type": "stone", "variant": 0, "pos": [0, 0]}
        }
    }"#;
    let err = parse_map("test.json", text).unwrap_err();
    assert!(err.message.contains("grid key"));
}

#[test]
fn test_parse_rejects_key_position_mismatch() {
    let text = r#"{
        "tile_size": 16,
        "tilemap": {
            "0;0": {"type": "stone", "variant": 0, "pos": [3, 0]}
        }
    }"#;
    let err = parse_map("test.json", text).unwrap_err();
    assert!(err.message.contains("disagrees"));
}

#[test]
fn test_parse_rejects_malformed_json() {
    assert!(parse_map("test.json", "not json").is_err());
}

#[test]
fn test_fallback_map_is_playable() {
    let mut map = fallback_map();
    // A floor to stand on.
    assert!(map
        .get(IVec2::new(0, 4))
        .is_some_and(|t| t.kind.is_solid()));
    // Exactly one player spawner, seated on the floor.
    let spawns = map.extract(&[(TileKind::Spawners, 2)], false);
    assert_eq!(spawns.len(), 1);
}

// -----------------------------------------------------------------------------
// Entity spawning
// -----------------------------------------------------------------------------

fn spawner(variant: u8, pos: Vec2) -> SpawnPoint {
    SpawnPoint {
        kind: TileKind::Spawners,
        variant,
        pos,
    }
}

#[test]
fn test_nearest_gate_wins_ties_by_distance() {
    let gates = [(0, Vec2::new(8.0, 16.0)), (1, Vec2::new(168.0, 16.0))];
    assert_eq!(nearest_gate_id(&gates, Vec2::new(148.0, 21.0)), 1);
    assert_eq!(nearest_gate_id(&gates, Vec2::new(10.0, 10.0)), 0);
    assert_eq!(nearest_gate_id(&[], Vec2::ZERO), 0);
}

#[test]
fn test_lever_pairs_with_nearest_gate() {
    let mut world = World::new();
    let mut registry = GateRegistry::default();
    let mut stats = SessionStats::default();
    let mut scroll = CameraScroll::default();
    // The lever sits beside the second gate, far from the first.
    let spawns = vec![
        spawner(SPAWNER_GATE, Vec2::new(0.0, 0.0)),
        spawner(SPAWNER_GATE, Vec2::new(160.0, 0.0)),
        spawner(SPAWNER_LEVER, Vec2::new(144.0, 16.0)),
    ];

    {
        let mut commands = world.commands();
        spawn_entities(&mut commands, &mut registry, &mut stats, &mut scroll, &spawns);
    }
    world.flush();

    let mut levers = world.query::<&Lever>();
    let lever = levers.single(&world).unwrap();
    assert_eq!(lever.gate_id, 1);
    assert!(registry.get(1).is_some());
}

//! Tile grid domain: tests for storage, queries, autotiling, and extraction.

use bevy::prelude::{IVec2, Vec2};

use super::{
    grid_key, parse_grid_key, Aabb, LooseTile, TileKind, TileMap, TileRecord, TILE_SIZE,
};

fn tile(kind: TileKind, cell: IVec2) -> TileRecord {
    TileRecord {
        kind,
        variant: 0,
        grid_pos: cell,
    }
}

// -----------------------------------------------------------------------------
// Grid key tests
// -----------------------------------------------------------------------------

#[test]
fn test_grid_key_round_trip() {
    for cell in [
        IVec2::new(0, 0),
        IVec2::new(-3, 7),
        IVec2::new(120, -45),
    ] {
        assert_eq!(parse_grid_key(&grid_key(cell)), Some(cell));
    }
}

#[test]
fn test_grid_key_rejects_malformed() {
    assert_eq!(parse_grid_key(""), None);
    assert_eq!(parse_grid_key("3"), None);
    assert_eq!(parse_grid_key("3;"), None);
    assert_eq!(parse_grid_key("a;b"), None);
    assert_eq!(parse_grid_key("1;2;3"), None);
    assert_eq!(parse_grid_key("1,2"), None);
}

// -----------------------------------------------------------------------------
// Aabb tests
// -----------------------------------------------------------------------------

#[test]
fn test_aabb_overlap_is_strict() {
    let a = Aabb::new(Vec2::ZERO, Vec2::splat(16.0));
    let touching = Aabb::new(Vec2::new(16.0, 0.0), Vec2::splat(16.0));
    let overlapping = Aabb::new(Vec2::new(15.0, 0.0), Vec2::splat(16.0));

    // Shared edges do not count as overlap.
    assert!(!a.overlaps(&touching));
    assert!(a.overlaps(&overlapping));
}

#[test]
fn test_aabb_edge_setters() {
    let mut rect = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 14.0));
    rect.set_right(32.0);
    assert_eq!(rect.left(), 22.0);
    rect.set_bottom(64.0);
    assert_eq!(rect.top(), 50.0);
}

// -----------------------------------------------------------------------------
// Kind vocabulary tests
// -----------------------------------------------------------------------------

#[test]
fn test_unknown_tag_degrades_without_failing() {
    let kind = TileKind::from_tag("lava");
    assert_eq!(kind, TileKind::Unknown);
    assert!(!kind.is_solid());
    assert!(!kind.autotiles());
}

#[test]
fn test_spikes_are_solid_but_do_not_autotile() {
    assert!(TileKind::Spikes.is_solid());
    assert!(!TileKind::Spikes.autotiles());
}

// -----------------------------------------------------------------------------
// Collision query tests
// -----------------------------------------------------------------------------

#[test]
fn test_physics_rects_exclude_decor() {
    let mut map = TileMap::default();
    map.insert(tile(TileKind::Stone, IVec2::new(0, 1)));
    map.insert(tile(TileKind::Decor, IVec2::new(1, 1)));

    let rects = map.physics_rects_nearby(Vec2::new(8.0, 8.0));
    assert_eq!(rects.len(), 1);
    assert_eq!(rects[0].pos, Vec2::new(0.0, TILE_SIZE as f32));
}

#[test]
fn test_nearby_window_misses_distant_tiles() {
    let mut map = TileMap::default();
    map.insert(tile(TileKind::Stone, IVec2::new(10, 10)));

    assert!(map.physics_rects_nearby(Vec2::new(0.0, 0.0)).is_empty());
    assert_eq!(
        map.physics_rects_nearby(Vec2::new(160.0, 160.0)).len(),
        1
    );
}

#[test]
fn test_tile_below_probes_one_row_down() {
    let mut map = TileMap::default();
    map.insert(tile(TileKind::Grass, IVec2::new(2, 3)));

    let probe = Vec2::new(2.5 * TILE_SIZE as f32, 2.5 * TILE_SIZE as f32);
    assert_eq!(map.tile_below(probe).map(|t| t.kind), Some(TileKind::Grass));
    assert!(map.tile_below(Vec2::ZERO).is_none());
}

// -----------------------------------------------------------------------------
// Autotile tests
// -----------------------------------------------------------------------------

#[test]
fn test_autotile_plus_shape() {
    let mut map = TileMap::default();
    for cell in [
        IVec2::new(0, 0),
        IVec2::new(-1, 0),
        IVec2::new(1, 0),
        IVec2::new(0, -1),
        IVec2::new(0, 1),
    ] {
        map.insert(tile(TileKind::Stone, cell));
    }
    map.autotile();

    // Center has all four neighbors.
    assert_eq!(map.get(IVec2::ZERO).unwrap().variant, 8);
    // Arm tips have a single neighbor and keep their authored variant.
    assert_eq!(map.get(IVec2::new(1, 0)).unwrap().variant, 0);
}

#[test]
fn test_autotile_floor_run() {
    let mut map = TileMap::default();
    for x in 0..3 {
        map.insert(tile(TileKind::Grass, IVec2::new(x, 0)));
        map.insert(tile(TileKind::Grass, IVec2::new(x, 1)));
    }
    map.autotile();

    // Top-left corner: right and down neighbors.
    assert_eq!(map.get(IVec2::new(0, 0)).unwrap().variant, 0);
    // Top edge: left, right, and down.
    assert_eq!(map.get(IVec2::new(1, 0)).unwrap().variant, 1);
    // Top-right corner: left and down.
    assert_eq!(map.get(IVec2::new(2, 0)).unwrap().variant, 2);
}

#[test]
fn test_autotile_ignores_other_kinds() {
    let mut map = TileMap::default();
    map.insert(tile(TileKind::Grass, IVec2::new(0, 0)));
    map.insert(tile(TileKind::Stone, IVec2::new(1, 0)));
    map.insert(tile(TileKind::Grass, IVec2::new(0, 1)));
    map.autotile();

    // The stone neighbor does not count toward the grass mask.
    assert_eq!(map.get(IVec2::ZERO).unwrap().variant, 0);
}

// -----------------------------------------------------------------------------
// Extraction tests
// -----------------------------------------------------------------------------

#[test]
fn test_extract_removes_and_converts_to_pixels() {
    let mut map = TileMap::default();
    map.insert(tile(TileKind::Spawners, IVec2::new(2, 3)));
    map.insert(tile(TileKind::Stone, IVec2::new(2, 4)));

    let spawns = map.extract(&[(TileKind::Spawners, 0)], false);
    assert_eq!(spawns.len(), 1);
    assert_eq!(spawns[0].pos, Vec2::new(32.0, 48.0));
    assert!(map.get(IVec2::new(2, 3)).is_none());
    assert!(map.get(IVec2::new(2, 4)).is_some());
}

#[test]
fn test_extract_keep_leaves_tiles_in_place() {
    let mut map = TileMap::default();
    map.insert(tile(TileKind::Spawners, IVec2::new(1, 1)));

    let spawns = map.extract(&[(TileKind::Spawners, 0)], true);
    assert_eq!(spawns.len(), 1);
    assert!(map.get(IVec2::new(1, 1)).is_some());
}

#[test]
fn test_extract_matches_variant_exactly() {
    let mut map = TileMap::default();
    let mut spawner = tile(TileKind::Spawners, IVec2::new(0, 0));
    spawner.variant = 2;
    map.insert(spawner);

    assert!(map.extract(&[(TileKind::Spawners, 1)], false).is_empty());
    assert_eq!(map.extract(&[(TileKind::Spawners, 2)], false).len(), 1);
}

#[test]
fn test_extract_includes_loose_tiles() {
    let mut map = TileMap::default();
    map.loose.push(LooseTile {
        kind: TileKind::Spawners,
        variant: 1,
        pos: Vec2::new(40.0, 12.0),
    });

    let spawns = map.extract(&[(TileKind::Spawners, 1)], false);
    assert_eq!(spawns.len(), 1);
    assert_eq!(spawns[0].pos, Vec2::new(40.0, 12.0));
    assert!(map.loose.is_empty());
}

#[test]
fn test_extract_order_is_row_major_regardless_of_insertion() {
    let cells = [
        IVec2::new(3, 2),
        IVec2::new(-1, 0),
        IVec2::new(5, 0),
        IVec2::new(0, 2),
        IVec2::new(2, -4),
    ];
    let mut forward = TileMap::default();
    let mut reversed = TileMap::default();
    for cell in cells {
        forward.insert(tile(TileKind::Spawners, cell));
    }
    for cell in cells.iter().rev() {
        reversed.insert(tile(TileKind::Spawners, *cell));
    }

    let spawns = forward.extract(&[(TileKind::Spawners, 0)], false);
    assert_eq!(
        spawns,
        reversed.extract(&[(TileKind::Spawners, 0)], false)
    );
    let order: Vec<Vec2> = spawns.iter().map(|s| s.pos).collect();
    let size = TILE_SIZE as f32;
    assert_eq!(
        order,
        vec![
            Vec2::new(2.0, -4.0) * size,
            Vec2::new(-1.0, 0.0) * size,
            Vec2::new(5.0, 0.0) * size,
            Vec2::new(0.0, 2.0) * size,
            Vec2::new(3.0, 2.0) * size,
        ]
    );
}

#[test]
fn test_insert_is_keyed_by_record_position() {
    let mut map = TileMap::default();
    map.insert(tile(TileKind::Stone, IVec2::new(4, 4)));
    map.insert(tile(TileKind::Grass, IVec2::new(4, 4)));

    assert_eq!(map.len(), 1);
    assert_eq!(map.get(IVec2::new(4, 4)).unwrap().kind, TileKind::Grass);
}

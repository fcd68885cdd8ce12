//! Tile grid domain: sparse grid storage, collision queries, and autotiling.
//!
//! The grid is keyed by integer cell coordinates. Level files encode cells
//! under canonical `"<x>;<y>"` string keys; `grid_key`/`parse_grid_key`
//! convert at the format boundary.

#[cfg(test)]
mod tests;

use bevy::prelude::*;
use std::collections::HashMap;

/// Side length of a grid cell in pixels.
pub const TILE_SIZE: i32 = 16;

/// 5x5 neighborhood probed around a query point. Bounding boxes are small
/// relative to the tile size, so this window covers every tile a box could
/// overlap without scanning the map.
const NEIGHBOR_OFFSETS: [IVec2; 25] = [
    IVec2::new(-2, -2),
    IVec2::new(-2, -1),
    IVec2::new(-2, 0),
    IVec2::new(-2, 1),
    IVec2::new(-2, 2),
    IVec2::new(-1, -2),
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(-1, 2),
    IVec2::new(0, -2),
    IVec2::new(0, -1),
    IVec2::new(0, 0),
    IVec2::new(0, 1),
    IVec2::new(0, 2),
    IVec2::new(1, -2),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(1, 1),
    IVec2::new(1, 2),
    IVec2::new(2, -2),
    IVec2::new(2, -1),
    IVec2::new(2, 0),
    IVec2::new(2, 1),
    IVec2::new(2, 2),
];

/// Axis-aligned box in pixel space, y-down, position at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn set_left(&mut self, x: f32) {
        self.pos.x = x;
    }

    pub fn set_right(&mut self, x: f32) {
        self.pos.x = x - self.size.x;
    }

    pub fn set_top(&mut self, y: f32) {
        self.pos.y = y;
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Fixed vocabulary of tile kinds. Tags outside the vocabulary degrade to
/// `Unknown`, which never collides and never autotiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Grass,
    Stone,
    Decor,
    LargeDecor,
    Spawners,
    Spikes,
    Unknown,
}

impl TileKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "grass" => TileKind::Grass,
            "stone" => TileKind::Stone,
            "decor" => TileKind::Decor,
            "large_decor" => TileKind::LargeDecor,
            "spawners" => TileKind::Spawners,
            "spikes" => TileKind::Spikes,
            _ => TileKind::Unknown,
        }
    }

    /// Spikes carry collision so landing on them registers a down contact
    /// for the hazard check.
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone | TileKind::Spikes)
    }

    pub fn autotiles(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }
}

/// A grid-aligned tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRecord {
    pub kind: TileKind,
    pub variant: u8,
    pub grid_pos: IVec2,
}

/// A decoration tile that is not grid-aligned; carries a pixel position.
#[derive(Debug, Clone, PartialEq)]
pub struct LooseTile {
    pub kind: TileKind,
    pub variant: u8,
    pub pos: Vec2,
}

/// Pixel-space spawn descriptor produced by `extract`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPoint {
    pub kind: TileKind,
    pub variant: u8,
    pub pos: Vec2,
}

/// Canonical string encoding of a grid cell, used as the map file's key.
pub fn grid_key(cell: IVec2) -> String {
    format!("{};{}", cell.x, cell.y)
}

pub fn parse_grid_key(key: &str) -> Option<IVec2> {
    let (x, y) = key.split_once(';')?;
    Some(IVec2::new(x.parse().ok()?, y.parse().ok()?))
}

/// Sparse tile grid plus loose decoration, queried every tick by the
/// integrator. Mutation happens only at load time or via level scripting,
/// never concurrently with a simulation tick.
#[derive(Resource, Debug)]
pub struct TileMap {
    pub tile_size: i32,
    tiles: HashMap<IVec2, TileRecord>,
    pub loose: Vec<LooseTile>,
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new(TILE_SIZE)
    }
}

impl TileMap {
    pub fn new(tile_size: i32) -> Self {
        Self {
            tile_size,
            tiles: HashMap::new(),
            loose: Vec::new(),
        }
    }

    /// Insert keyed by the record's own grid position, so a key can never
    /// disagree with its record and no two records share a cell.
    pub fn insert(&mut self, record: TileRecord) {
        self.tiles.insert(record.grid_pos, record);
    }

    pub fn get(&self, cell: IVec2) -> Option<&TileRecord> {
        self.tiles.get(&cell)
    }

    pub fn records(&self) -> impl Iterator<Item = &TileRecord> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn cell_of(&self, pos: Vec2) -> IVec2 {
        IVec2::new(
            (pos.x / self.tile_size as f32).floor() as i32,
            (pos.y / self.tile_size as f32).floor() as i32,
        )
    }

    pub fn rect_of(&self, cell: IVec2) -> Aabb {
        let size = self.tile_size as f32;
        Aabb::new(Vec2::new(cell.x as f32 * size, cell.y as f32 * size), Vec2::splat(size))
    }

    /// Every tile in the 5x5 neighborhood of a pixel position.
    pub fn tiles_nearby(&self, pos: Vec2) -> Vec<&TileRecord> {
        let cell = self.cell_of(pos);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|offset| self.tiles.get(&(cell + *offset)))
            .collect()
    }

    /// World-space rectangles of the solid tiles near a pixel position.
    pub fn physics_rects_nearby(&self, pos: Vec2) -> Vec<Aabb> {
        self.tiles_nearby(pos)
            .into_iter()
            .filter(|tile| tile.kind.is_solid())
            .map(|tile| self.rect_of(tile.grid_pos))
            .collect()
    }

    /// Single-cell probe one row below a pixel position. Absent cells give
    /// `None`; callers branch on absence.
    pub fn tile_below(&self, pos: Vec2) -> Option<&TileRecord> {
        let cell = self.cell_of(pos);
        self.tiles.get(&IVec2::new(cell.x, cell.y + 1))
    }

    /// Re-derive visual variants from same-kind neighbor patterns. Collision
    /// is untouched; only `variant` changes, and only for autotile kinds.
    pub fn autotile(&mut self) {
        let cells: Vec<(IVec2, TileKind)> = self
            .tiles
            .values()
            .filter(|t| t.kind.autotiles())
            .map(|t| (t.grid_pos, t.kind))
            .collect();
        for (cell, kind) in cells {
            let mask = self.neighbor_mask(cell, kind);
            if let Some(variant) = autotile_variant(mask) {
                if let Some(tile) = self.tiles.get_mut(&cell) {
                    tile.variant = variant;
                }
            }
        }
    }

    fn neighbor_mask(&self, cell: IVec2, kind: TileKind) -> u8 {
        let mut mask = 0;
        for (bit, offset) in [
            (MASK_LEFT, IVec2::new(-1, 0)),
            (MASK_RIGHT, IVec2::new(1, 0)),
            (MASK_UP, IVec2::new(0, -1)),
            (MASK_DOWN, IVec2::new(0, 1)),
        ] {
            if self.tiles.get(&(cell + offset)).is_some_and(|t| t.kind == kind) {
                mask |= bit;
            }
        }
        mask
    }

    /// Drain (or copy, when `keep`) every tile and loose object matching one
    /// of the given kind/variant pairs, converting grid positions to pixel
    /// space. This is how the level format encodes entity spawn points.
    /// Grid matches come out in row-major cell order so callers that assign
    /// ids by position see the same sequence for the same map.
    pub fn extract(&mut self, wanted: &[(TileKind, u8)], keep: bool) -> Vec<SpawnPoint> {
        let mut spawns = Vec::new();

        let mut matching: Vec<(IVec2, TileKind, u8)> = self
            .tiles
            .values()
            .filter(|t| wanted.contains(&(t.kind, t.variant)))
            .map(|t| (t.grid_pos, t.kind, t.variant))
            .collect();
        matching.sort_by_key(|(cell, _, _)| (cell.y, cell.x));
        for (cell, kind, variant) in matching {
            spawns.push(SpawnPoint {
                kind,
                variant,
                pos: Vec2::new(
                    (cell.x * self.tile_size) as f32,
                    (cell.y * self.tile_size) as f32,
                ),
            });
            if !keep {
                self.tiles.remove(&cell);
            }
        }

        let mut index = 0;
        while index < self.loose.len() {
            let loose = &self.loose[index];
            if wanted.contains(&(loose.kind, loose.variant)) {
                spawns.push(SpawnPoint {
                    kind: loose.kind,
                    variant: loose.variant,
                    pos: loose.pos,
                });
                if !keep {
                    self.loose.remove(index);
                    continue;
                }
            }
            index += 1;
        }

        spawns
    }
}

const MASK_LEFT: u8 = 1;
const MASK_RIGHT: u8 = 2;
const MASK_UP: u8 = 4;
const MASK_DOWN: u8 = 8;

/// Neighbor-pattern to variant table. Patterns not in the table (isolated
/// tiles, single neighbors) keep their authored variant.
fn autotile_variant(mask: u8) -> Option<u8> {
    match mask {
        m if m == MASK_RIGHT | MASK_DOWN => Some(0),
        m if m == MASK_LEFT | MASK_RIGHT | MASK_DOWN => Some(1),
        m if m == MASK_LEFT | MASK_DOWN => Some(2),
        m if m == MASK_LEFT | MASK_UP | MASK_DOWN => Some(3),
        m if m == MASK_LEFT | MASK_UP => Some(4),
        m if m == MASK_LEFT | MASK_UP | MASK_RIGHT => Some(5),
        m if m == MASK_RIGHT | MASK_UP => Some(6),
        m if m == MASK_RIGHT | MASK_UP | MASK_DOWN => Some(7),
        m if m == MASK_LEFT | MASK_RIGHT | MASK_UP | MASK_DOWN => Some(8),
        _ => None,
    }
}

//! Level domain: map file parsing.
//!
//! Maps are JSON: a `tilemap` object keyed by `"<x>;<y>"` grid keys, an
//! `offgrid` list of pixel-positioned decorations, and the tile size.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;

use crate::tilemap::{parse_grid_key, LooseTile, TileKind, TileMap, TileRecord, TILE_SIZE};

/// Error type for map loading failures.
#[derive(Debug)]
pub struct LevelLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

#[derive(Debug, Deserialize)]
struct TileDef {
    #[serde(rename = "type")]
    kind: String,
    variant: u8,
    pos: [f32; 2],
}

#[derive(Debug, Deserialize)]
struct MapFile {
    tile_size: i32,
    tilemap: HashMap<String, TileDef>,
    #[serde(default)]
    offgrid: Vec<TileDef>,
}

/// Parse map JSON into a `TileMap`. Grid entries whose key does not parse
/// or disagrees with the entry's own position are rejected; an unknown
/// tile kind is tolerated and kept inert.
pub fn parse_map(file: &str, text: &str) -> Result<TileMap, LevelLoadError> {
    let data: MapFile = serde_json::from_str(text).map_err(|e| LevelLoadError {
        file: file.to_string(),
        message: format!("Parse error: {}", e),
    })?;

    let mut map = TileMap::new(data.tile_size);

    for (key, def) in &data.tilemap {
        let cell = parse_grid_key(key).ok_or_else(|| LevelLoadError {
            file: file.to_string(),
            message: format!("Bad grid key: {:?}", key),
        })?;
        let pos = IVec2::new(def.pos[0] as i32, def.pos[1] as i32);
        if pos != cell {
            return Err(LevelLoadError {
                file: file.to_string(),
                message: format!("Grid key {:?} disagrees with tile pos {:?}", key, def.pos),
            });
        }
        map.insert(TileRecord {
            kind: TileKind::from_tag(&def.kind),
            variant: def.variant,
            grid_pos: cell,
        });
    }

    for def in &data.offgrid {
        map.loose.push(LooseTile {
            kind: TileKind::from_tag(&def.kind),
            variant: def.variant,
            pos: Vec2::new(def.pos[0], def.pos[1]),
        });
    }

    Ok(map)
}

pub fn load_map(path: &Path) -> Result<TileMap, LevelLoadError> {
    let file = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| LevelLoadError {
        file: file.clone(),
        message: format!("IO error: {}", e),
    })?;
    parse_map(&file, &text)
}

/// A small hand-built room used when no map file is present: a floor, two
/// walls to bounce between, and a player spawner on the floor.
pub fn fallback_map() -> TileMap {
    let mut map = TileMap::new(TILE_SIZE);

    for x in -8..=8 {
        map.insert(TileRecord {
            kind: TileKind::Stone,
            variant: 0,
            grid_pos: IVec2::new(x, 4),
        });
    }
    for y in 0..4 {
        map.insert(TileRecord {
            kind: TileKind::Stone,
            variant: 0,
            grid_pos: IVec2::new(-8, y),
        });
        map.insert(TileRecord {
            kind: TileKind::Stone,
            variant: 0,
            grid_pos: IVec2::new(8, y),
        });
    }
    map.insert(TileRecord {
        kind: TileKind::Spawners,
        variant: 2,
        grid_pos: IVec2::new(0, 3),
    });

    map.autotile();
    map
}

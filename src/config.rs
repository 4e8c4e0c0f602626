//! Level, session and layout configuration.
//!
//! Every struct deserializes with `#[serde(default)]`, so the host may pass a
//! partial JS object and get defaults for the rest.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::types::TILE_TYPE_COUNT;

/// Tiles per matched group. Fixed: the engine only matches triplets.
pub const TILES_PER_TYPE: usize = 3;

/// Upper bound on `rows * cols * layers`. Accessibility is O(n²) in live tiles.
pub const MAX_BOARD_CELLS: usize = 4096;

/// Board shape and type mix for one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelConfig {
    pub rows: usize,
    pub cols: usize,
    pub layers: usize,
    /// Distinct tile types in play (at most [`TILE_TYPE_COUNT`]).
    pub tile_types: usize,
    pub tiles_per_type: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        LEVELS[0]
    }
}

/// Level progression, easiest first.
const LEVELS: [LevelConfig; 5] = [
    LevelConfig { rows: 5, cols: 5, layers: 2, tile_types: 4, tiles_per_type: TILES_PER_TYPE },
    LevelConfig { rows: 6, cols: 6, layers: 3, tile_types: 6, tiles_per_type: TILES_PER_TYPE },
    LevelConfig { rows: 7, cols: 7, layers: 3, tile_types: 8, tiles_per_type: TILES_PER_TYPE },
    LevelConfig { rows: 8, cols: 8, layers: 4, tile_types: 10, tiles_per_type: TILES_PER_TYPE },
    LevelConfig { rows: 8, cols: 8, layers: 5, tile_types: 12, tiles_per_type: TILES_PER_TYPE },
];

impl LevelConfig {
    pub fn new(rows: usize, cols: usize, layers: usize, tile_types: usize) -> Self {
        Self { rows, cols, layers, tile_types, tiles_per_type: TILES_PER_TYPE }
    }

    /// Preset for a 1-based level number. Levels past the table repeat the last entry.
    pub fn for_level(level: u32) -> Self {
        let idx = (level.max(1) as usize - 1).min(LEVELS.len() - 1);
        LEVELS[idx]
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows < 2 || self.cols < 2 {
            bail!("board must be at least 2x2, got {}x{}", self.cols, self.rows);
        }
        if self.layers == 0 {
            bail!("board needs at least one layer");
        }
        let cells = self
            .rows
            .checked_mul(self.cols)
            .and_then(|c| c.checked_mul(self.layers));
        match cells {
            Some(n) if n <= MAX_BOARD_CELLS => {}
            _ => bail!(
                "{}x{}x{} board exceeds {} cells",
                self.cols,
                self.rows,
                self.layers,
                MAX_BOARD_CELLS
            ),
        }
        if self.tile_types == 0 || self.tile_types > TILE_TYPE_COUNT {
            bail!("tile_types must be in 1..={}, got {}", TILE_TYPE_COUNT, self.tile_types);
        }
        if self.tiles_per_type != TILES_PER_TYPE {
            bail!("only triplets are supported, got tiles_per_type = {}", self.tiles_per_type);
        }
        Ok(())
    }
}

/// Tile footprint used to map board positions to presentation space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardGeometry {
    pub tile_width: f32,
    pub tile_height: f32,
    /// Per-layer skew: applied in full vertically, half horizontally.
    pub layer_depth: f32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self { tile_width: 56.0, tile_height: 72.0, layer_depth: 8.0 }
    }
}

/// Placement of the hand's slot row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HandGeometry {
    pub center_x: f32,
    pub baseline_y: f32,
    pub slot_width: f32,
    pub slot_spacing: f32,
}

impl Default for HandGeometry {
    fn default() -> Self {
        Self { center_x: 360.0, baseline_y: 1100.0, slot_width: 64.0, slot_spacing: 8.0 }
    }
}

/// Rules that belong to a play session rather than a board.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub hand_capacity: usize,
    pub match_score: u32,
    pub hint_score: u32,
    /// `None` means unlimited undos.
    pub undo_limit: Option<u32>,
    pub hand_geometry: HandGeometry,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hand_capacity: 7,
            match_score: 100,
            hint_score: 100,
            undo_limit: None,
            hand_geometry: HandGeometry::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hand_capacity < TILES_PER_TYPE {
            bail!(
                "hand capacity {} cannot hold a triplet",
                self.hand_capacity
            );
        }
        Ok(())
    }
}

//! Pyramid layout generation.
//!
//! Each layer is a centered rectangle that shrinks as it climbs. Layers above
//! the base only use checkerboard cells so upper layers never become solid.

use crate::config::{LevelConfig, MAX_BOARD_CELLS, TILES_PER_TYPE};
use crate::types::TilePosition;

/// Smallest extent any layer may shrink to.
const MIN_LAYER_EXTENT: usize = 2;

/// Extent of layer `z` along an axis of `full` cells: `floor(full - z/2)`, at least 2.
#[inline]
fn layer_extent(full: usize, z: usize) -> usize {
    full.saturating_sub(z.div_ceil(2)).max(MIN_LAYER_EXTENT).min(full)
}

/// Enumerate tile positions for `config`, layer by layer, base first.
///
/// The result is truncated to a multiple of three so every position can be
/// covered by a complete triplet. It is not shuffled.
pub fn generate_layout(config: &LevelConfig) -> Vec<TilePosition> {
    let mut positions = Vec::with_capacity(config.rows.saturating_mul(config.cols).min(MAX_BOARD_CELLS));

    for z in 0..config.layers {
        let layer_cols = layer_extent(config.cols, z);
        let layer_rows = layer_extent(config.rows, z);
        let offset_x = (config.cols - layer_cols) / 2;
        let offset_y = (config.rows - layer_rows) / 2;

        for row in 0..layer_rows {
            for col in 0..layer_cols {
                let x = offset_x + col;
                let y = offset_y + row;
                if z > 0 && (x + y) % 2 != 0 {
                    continue;
                }
                positions.push(TilePosition::new(x as i32, y as i32, z as i32));
            }
        }
    }

    let usable = positions.len() - positions.len() % TILES_PER_TYPE;
    positions.truncate(usable);
    positions
}

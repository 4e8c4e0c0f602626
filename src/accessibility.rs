//! Occlusion model: which board tiles can currently be picked.

use crate::types::{Tile, TilePosition};

/// A higher tile occludes a lower one when both column and row differ by less
/// than this many cells. Independent of any click tolerance in the presentation layer.
pub const OCCLUSION_TOLERANCE: f32 = 1.0;

/// True when `upper` sits on a higher layer roughly on top of `lower`.
#[inline]
pub fn occludes(upper: &TilePosition, lower: &TilePosition) -> bool {
    upper.z > lower.z
        && ((upper.x - lower.x) as f32).abs() < OCCLUSION_TOLERANCE
        && ((upper.y - lower.y) as f32).abs() < OCCLUSION_TOLERANCE
}

/// Recompute `is_accessible` for every tile.
///
/// Held and matched tiles are forced inaccessible and never occlude anything.
/// Call after any tile enters or leaves the hand or gets matched. O(n²).
pub fn update_accessibility(tiles: &mut [Tile]) {
    let live: Vec<TilePosition> = tiles
        .iter()
        .filter(|t| t.is_live())
        .map(|t| t.position)
        .collect();

    for tile in tiles.iter_mut() {
        if !tile.is_live() {
            tile.is_accessible = false;
            continue;
        }
        let blocked = live.iter().any(|other| occludes(other, &tile.position));
        tile.is_accessible = !blocked;
    }
}

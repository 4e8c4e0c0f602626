//! Hint solver: find a triplet that can be resolved right now.
//!
//! Prefers using tiles already in the hand:
//! - 2 held + 1 on the board
//! - 1 held + 2 on the board
//! - 3 on the board (any accessibility)
//!
//! Within each tier the first type in grouping order wins. The solver never
//! mutates; the host resolves the hint through `Hand::remove_matched`.

use serde::Serialize;

use crate::config::TILES_PER_TYPE;
use crate::hand::{group_by_type, HeldTile};
use crate::types::{Tile, TileId, TileType};

/// A resolvable triplet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    #[serde(rename = "type")]
    pub tile_type: TileType,
    /// Held tiles first, then board tiles.
    pub tiles: [TileId; TILES_PER_TYPE],
    /// How many of `tiles` come from the hand.
    pub from_hand: usize,
}

impl Hint {
    pub fn hand_tiles(&self) -> &[TileId] {
        &self.tiles[..self.from_hand]
    }

    pub fn board_tiles(&self) -> &[TileId] {
        &self.tiles[self.from_hand..]
    }
}

fn ids_of(groups: &[(TileType, Vec<TileId>)], tile_type: TileType) -> &[TileId] {
    groups
        .iter()
        .find(|(t, _)| *t == tile_type)
        .map(|(_, ids)| ids.as_slice())
        .unwrap_or(&[])
}

/// First type in `hand` order to reach two held tiles, with those two ids.
fn first_pair(hand: &[HeldTile]) -> Option<(TileType, [TileId; 2])> {
    let mut seen: Vec<(TileType, TileId)> = Vec::new();
    for h in hand {
        if let Some(&(_, first)) = seen.iter().find(|(t, _)| *t == h.tile_type) {
            return Some((h.tile_type, [first, h.id]));
        }
        seen.push((h.tile_type, h.id));
    }
    None
}

/// Locate a triplet across `hand` and the live tiles of `board`.
///
/// `hand` is taken in slot order. `board` may include held or matched tiles;
/// they are skipped.
pub fn find_hint(hand: &[HeldTile], board: &[Tile]) -> Option<Hint> {
    let held = group_by_type(hand.iter().map(|h| (h.id, h.tile_type)));
    let live = group_by_type(
        board
            .iter()
            .filter(|t| t.is_live())
            .map(|t| (t.id, t.tile_type)),
    );

    // Two held, one on the board.
    if let Some((tile_type, [held0, held1])) = first_pair(hand) {
        if let Some(&board0) = ids_of(&live, tile_type).first() {
            return Some(Hint {
                tile_type,
                tiles: [held0, held1, board0],
                from_hand: 2,
            });
        }
    }

    // One held, two on the board.
    for (tile_type, ids) in &held {
        if let [board0, board1, ..] = ids_of(&live, *tile_type) {
            return Some(Hint {
                tile_type: *tile_type,
                tiles: [ids[0], *board0, *board1],
                from_hand: 1,
            });
        }
    }

    // All three on the board.
    live.iter()
        .find(|(_, ids)| ids.len() >= TILES_PER_TYPE)
        .map(|(tile_type, ids)| Hint {
            tile_type: *tile_type,
            tiles: [ids[0], ids[1], ids[2]],
            from_hand: 0,
        })
}

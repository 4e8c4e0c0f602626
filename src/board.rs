//! Board generation: layout, type assignment and the board→screen mapping.
//!
//! `generate_board()` is the entry point. Solvability by type is guaranteed by
//! construction: the type list is built from complete triplets before it is
//! shuffled, independently of the shuffled positions.

use anyhow::Result;

use crate::accessibility::update_accessibility;
use crate::config::{BoardGeometry, LevelConfig, TILES_PER_TYPE};
use crate::layout::generate_layout;
use crate::rng::TileRng;
use crate::types::{Board, Point, Rect, Tile, TileId, TilePosition, TileType, TILE_TYPE_COUNT};

/// Build the flat, shuffled type list for `count` tiles: `count / 3` groups,
/// group `i` of type `i mod tile_types`. `tile_types` is clamped to the enumeration.
pub fn build_type_list(count: usize, tile_types: usize, rng: &mut TileRng) -> Vec<TileType> {
    let tile_types = tile_types.clamp(1, TILE_TYPE_COUNT);
    let groups = count / TILES_PER_TYPE;
    let mut types = Vec::with_capacity(groups * TILES_PER_TYPE);

    for group in 0..groups {
        let tile_type = TileType::ALL[group % tile_types];
        types.extend(std::iter::repeat(tile_type).take(TILES_PER_TYPE));
    }

    rng.shuffle(&mut types);
    types
}

/// Zip positions with a freshly shuffled type list, minting ids `tile-0..`.
///
/// All flags start false; accessibility is computed by the caller.
pub fn assign_types(positions: &[TilePosition], tile_types: usize, rng: &mut TileRng) -> Vec<Tile> {
    let types = build_type_list(positions.len(), tile_types, rng);

    positions
        .iter()
        .zip(types)
        .enumerate()
        .map(|(i, (&position, tile_type))| Tile::new(TileId(i as u32), tile_type, position))
        .collect()
}

/// Generate a complete level board with accessibility already resolved.
pub fn generate_board(config: &LevelConfig, rng: &mut TileRng) -> Result<Board> {
    config.validate()?;

    let mut positions = generate_layout(config);
    rng.shuffle(&mut positions);

    let mut tiles = assign_types(&positions, config.tile_types, rng);
    update_accessibility(&mut tiles);

    Ok(Board::from_generated(tiles))
}

/// Map a board position to the centre of its tile in presentation space.
///
/// The `cols × rows` grid of tile-sized cells is centered in `bounds`; each
/// layer is skewed up by `layer_depth` and left by half of it so stacks read as 3D.
pub fn screen_position(
    position: &TilePosition,
    config: &LevelConfig,
    bounds: &Rect,
    geometry: &BoardGeometry,
) -> Point {
    let grid_width = config.cols as f32 * geometry.tile_width;
    let grid_height = config.rows as f32 * geometry.tile_height;
    let origin_x = bounds.x + (bounds.width - grid_width) / 2.0;
    let origin_y = bounds.y + (bounds.height - grid_height) / 2.0;

    let skew = position.z as f32 * geometry.layer_depth;

    Point {
        x: origin_x + position.x as f32 * geometry.tile_width + geometry.tile_width / 2.0 - skew / 2.0,
        y: origin_y + position.y as f32 * geometry.tile_height + geometry.tile_height / 2.0 - skew,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessibility::occludes;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn type_counts(tiles: &[Tile]) -> HashMap<TileType, usize> {
        let mut counts = HashMap::new();
        for t in tiles {
            *counts.entry(t.tile_type).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_single_layer_scenario() {
        let config = LevelConfig::new(4, 4, 1, 4);
        let board = generate_board(&config, &mut TileRng::from_seed(42)).unwrap();

        assert_eq!(board.len(), 15);
        assert!(board.tiles().iter().all(|t| t.is_accessible));
        assert!(board.tiles().iter().all(|t| !t.is_in_hand && !t.is_matched && !t.is_selected));

        // 5 groups over 4 types: type 0 is used twice.
        let counts = type_counts(board.tiles());
        assert_eq!(counts[&TileType::Bamboo], 6);
        assert_eq!(counts[&TileType::Dots], 3);
        assert_eq!(counts[&TileType::Characters], 3);
        assert_eq!(counts[&TileType::East], 3);
    }

    #[test]
    fn test_ids_are_sequential() {
        let board = generate_board(&LevelConfig::for_level(3), &mut TileRng::from_seed(1)).unwrap();
        for (i, t) in board.tiles().iter().enumerate() {
            assert_eq!(t.id, TileId(i as u32));
            assert_eq!(t.id.to_string(), format!("tile-{}", i));
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let config = LevelConfig::for_level(4);
        let a = generate_board(&config, &mut TileRng::from_seed(5)).unwrap();
        let b = generate_board(&config, &mut TileRng::from_seed(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LevelConfig::new(4, 4, 1, 0);
        assert!(generate_board(&config, &mut TileRng::from_seed(5)).is_err());
    }

    #[test]
    fn test_oversized_config_rejected_before_layout() {
        let config = LevelConfig::new(1 << 22, 1 << 22, 1 << 22, 4);
        assert!(generate_board(&config, &mut TileRng::from_seed(5)).is_err());
    }

    #[test]
    fn test_build_type_list_groups() {
        let types = build_type_list(9, 12, &mut TileRng::from_seed(3));
        let mut sorted = types.clone();
        sorted.sort();
        assert_eq!(
            sorted,
            vec![
                TileType::Bamboo, TileType::Bamboo, TileType::Bamboo,
                TileType::Dots, TileType::Dots, TileType::Dots,
                TileType::Characters, TileType::Characters, TileType::Characters,
            ]
        );
    }

    #[test]
    fn test_screen_position_centers_grid() {
        let config = LevelConfig::new(4, 4, 1, 4);
        let geometry = BoardGeometry { tile_width: 10.0, tile_height: 20.0, layer_depth: 4.0 };
        let bounds = Rect { x: 0.0, y: 0.0, width: 100.0, height: 200.0 };

        // Grid is 40x80, origin (30, 60).
        let p = screen_position(&TilePosition::new(0, 0, 0), &config, &bounds, &geometry);
        assert_eq!(p, Point { x: 35.0, y: 70.0 });

        let p = screen_position(&TilePosition::new(2, 1, 0), &config, &bounds, &geometry);
        assert_eq!(p, Point { x: 55.0, y: 90.0 });

        // Layer 2 skews up by 8 and left by 4.
        let p = screen_position(&TilePosition::new(2, 1, 2), &config, &bounds, &geometry);
        assert_eq!(p, Point { x: 51.0, y: 82.0 });
    }

    proptest! {
        #[test]
        fn prop_boards_close_into_triplets(
            rows in 2usize..10,
            cols in 2usize..10,
            layers in 1usize..6,
            tile_types in 1usize..=12,
            seed in any::<u64>(),
        ) {
            let config = LevelConfig::new(rows, cols, layers, tile_types);
            let board = generate_board(&config, &mut TileRng::from_seed(seed)).unwrap();

            prop_assert_eq!(board.len() % 3, 0);
            for (_, count) in type_counts(board.tiles()) {
                prop_assert_eq!(count % 3, 0);
            }
        }

        #[test]
        fn prop_accessible_iff_not_covered(
            rows in 2usize..9,
            cols in 2usize..9,
            layers in 1usize..5,
            seed in any::<u64>(),
        ) {
            let config = LevelConfig::new(rows, cols, layers, 6);
            let board = generate_board(&config, &mut TileRng::from_seed(seed)).unwrap();

            for t in board.tiles() {
                let covered = board
                    .tiles()
                    .iter()
                    .any(|o| o.id != t.id && occludes(&o.position, &t.position));
                prop_assert_eq!(t.is_accessible, !covered);
            }
        }
    }
}

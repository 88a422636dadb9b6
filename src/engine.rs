use bevy::math::{ivec2, IVec2};

use crate::grid::{Grid, GridError};

/// offsets of the eight cells at Chebyshev distance 1
const NEIGHBOUR_OFFSETS: [IVec2; 8] = [
    ivec2(-1, -1),
    ivec2(0, -1),
    ivec2(1, -1),
    ivec2(-1, 0),
    ivec2(1, 0),
    ivec2(-1, 1),
    ivec2(0, 1),
    ivec2(1, 1),
];

/// Computes the next generation of `grid` under B3/S23.
///
/// Every neighbour count is read from `grid`, which is left untouched; the
/// result is a fresh grid of the same dimensions.
pub fn advance(grid: &Grid) -> Grid {
    grid.map_cells(|coord, alive| next_state(alive, neighbour_count(grid, coord.x, coord.y)))
}

/// Number of alive neighbours of `(x, y)`. Coordinates off the grid don't wrap
/// and count as nothing.
pub fn neighbour_count(grid: &Grid, x: i32, y: i32) -> u8 {
    NEIGHBOUR_OFFSETS
        .iter()
        .map(|offs| ivec2(x, y).wrapping_add(*offs))
        .filter(|pos| matches!(grid.get(pos.x, pos.y), Ok(true)))
        .count() as u8
}

#[inline]
pub fn next_state(alive: bool, neighbours: u8) -> bool {
    match (alive, neighbours) {
        (false, 3) => true,
        (true, n) if !(2..=3).contains(&n) => false,
        (state, _) => state,
    }
}

/// all-dead board
pub fn reset(cols: u32, rows: u32) -> Result<Grid, GridError> {
    Grid::new(cols, rows)
}

pub fn randomize(cols: u32, rows: u32, rng: &mut fastrand::Rng) -> Result<Grid, GridError> {
    Grid::randomize(cols, rows, rng)
}

pub fn toggle_at(grid: &mut Grid, x: i32, y: i32) -> Result<bool, GridError> {
    grid.toggle(x, y)
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn grid_with(cols: u32, rows: u32, alive: &[(i32, i32)]) -> Grid {
        let mut grid = reset(cols, rows).unwrap();
        for &(x, y) in alive {
            grid.set(x, y, true).unwrap();
        }
        grid
    }

    fn alive_cells(grid: &Grid) -> Vec<(i32, i32)> {
        grid.iter()
            .filter(|(_, alive)| *alive)
            .map(|(coord, _)| (coord.x, coord.y))
            .collect()
    }

    #[test]
    fn rule_table() {
        for n in 0..=8 {
            assert_eq!(n == 3, next_state(false, n), "dead with {n}");
            assert_eq!(n == 2 || n == 3, next_state(true, n), "alive with {n}");
        }
    }

    #[test]
    fn all_dead_stays_dead() {
        let grid = reset(10, 7).unwrap();
        assert_eq!(grid, advance(&grid));
    }

    #[test]
    fn isolated_cell_dies() {
        let grid = grid_with(5, 5, &[(2, 2)]);
        assert_eq!(0, advance(&grid).population());
    }

    #[test]
    fn blinker_oscillates() {
        let vertical = grid_with(3, 3, &[(1, 0), (1, 1), (1, 2)]);

        let horizontal = advance(&vertical);
        assert_eq!(vec![(0, 1), (1, 1), (2, 1)], alive_cells(&horizontal));

        let back = advance(&horizontal);
        assert_eq!(vec![(1, 0), (1, 1), (1, 2)], alive_cells(&back));
        assert_eq!(vertical, back);
    }

    #[test]
    fn block_is_still_life() {
        let block = grid_with(4, 4, &[(1, 1), (2, 1), (1, 2), (2, 2)]);
        assert_eq!(block, advance(&block));
    }

    #[test]
    fn glider_stops_at_the_edge() {
        // a glider heading to the bottom-right corner of a bounded grid ends
        // up as a block instead of reappearing on the other side
        let mut grid = grid_with(6, 6, &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
        for _ in 0..20 {
            grid = advance(&grid);
        }
        assert_eq!(vec![(4, 4), (5, 4), (4, 5), (5, 5)], alive_cells(&grid));
    }

    #[test]
    fn border_cells_do_not_wrap() {
        let (cols, rows) = (5, 5);
        // everything alive except (0, 0) and its three in-domain neighbours
        let mut grid = grid_with(cols, rows, &[]);
        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                grid.set(x, y, x > 1 || y > 1).unwrap();
            }
        }
        assert_eq!(0, neighbour_count(&grid, 0, 0));

        let full = grid.map_cells(|_, _| true);
        assert_eq!(3, neighbour_count(&full, 0, 0));
        assert_eq!(3, neighbour_count(&full, 4, 4));
        assert_eq!(5, neighbour_count(&full, 2, 0));
        assert_eq!(8, neighbour_count(&full, 2, 2));
    }

    #[test]
    fn toggle_at_twice_is_identity() {
        let mut rng = fastrand::Rng::with_seed(7);
        let original = randomize(8, 8, &mut rng).unwrap();
        let mut grid = original.clone();

        let first = toggle_at(&mut grid, 3, 5).unwrap();
        assert_eq!(Ok(!first), original.get(3, 5));
        assert_eq!(
            original.iter().filter(|(c, _)| *c != ivec2(3, 5)).collect::<Vec<_>>(),
            grid.iter().filter(|(c, _)| *c != ivec2(3, 5)).collect::<Vec<_>>()
        );

        toggle_at(&mut grid, 3, 5).unwrap();
        assert_eq!(original, grid);
    }

    #[test]
    fn toggle_at_out_of_bounds_propagates() {
        let mut grid = reset(4, 4).unwrap();
        assert_eq!(
            Err(GridError::OutOfBounds {
                x: 4,
                y: 0,
                cols: 4,
                rows: 4
            }),
            toggle_at(&mut grid, 4, 0)
        );
        assert_eq!(0, grid.population());
    }

    #[test]
    fn reset_yields_every_cell_dead() {
        let grid = reset(50, 50).unwrap();
        let cells: Vec<_> = grid.iter().collect();
        assert_eq!(2500, cells.len());
        assert!(cells.iter().all(|(_, alive)| !alive));
    }

    #[test]
    fn randomize_same_seed_same_board() {
        let a = randomize(20, 30, &mut fastrand::Rng::with_seed(99)).unwrap();
        let b = randomize(20, 30, &mut fastrand::Rng::with_seed(99)).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn advance_preserves_dimensions_and_input(
            cols in 1u32..30,
            rows in 1u32..30,
            seed in any::<u64>(),
        ) {
            let grid = randomize(cols, rows, &mut fastrand::Rng::with_seed(seed)).unwrap();
            let snapshot = grid.clone();
            let next = advance(&grid);
            prop_assert_eq!(grid.dimensions(), next.dimensions());
            prop_assert_eq!(snapshot, grid);
        }

        #[test]
        fn advance_matches_rule_per_cell(
            cols in 1u32..16,
            rows in 1u32..16,
            seed in any::<u64>(),
        ) {
            let grid = randomize(cols, rows, &mut fastrand::Rng::with_seed(seed)).unwrap();
            let next = advance(&grid);
            for (coord, alive) in grid.iter() {
                let n = neighbour_count(&grid, coord.x, coord.y);
                prop_assert!(n <= 8);
                prop_assert_eq!(Ok(next_state(alive, n)), next.get(coord.x, coord.y));
            }
        }
    }
}

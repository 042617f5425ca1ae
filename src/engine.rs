use crate::grid::Grid;

/// The 8 Moore-neighborhood offsets (all compass directions).
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Count alive cells among the 8 toroidally-wrapped neighbors of `(r, c)`.
/// Each axis wraps independently, corners included.
pub fn neighbor_count(grid: &Grid, r: usize, c: usize) -> u8 {
    NEIGHBOR_OFFSETS
        .iter()
        .map(|&(dr, dc)| u8::from(grid.get_wrapped(r as i64 + dr, c as i64 + dc)))
        .sum()
}

/// Advance the grid by one generation under Conway's B3/S23 rule with
/// toroidal boundaries.
///
/// The input is never mutated; the result is a freshly allocated grid of
/// identical dimensions. The rule is evaluated against the input grid only,
/// so a partially-written output can never leak into neighbor counts.
/// Deterministic: a fixed input always yields the same output.
pub fn advance(grid: &Grid) -> Grid {
    let mut next = Grid::empty(grid.rows(), grid.cols());
    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            let neighbors = neighbor_count(grid, r, c);
            let alive = grid.get(r, c);
            let next_alive = match (alive, neighbors) {
                (_, n) if n < 2 => false,       // underpopulation
                (_, n) if n > 3 => false,       // overpopulation
                (false, 3) => true,             // birth
                (state, _) => state,            // survival / stays dead
            };
            next.set(r, c, next_alive);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{pattern_blinker, pattern_block, Grid, COLS, ROWS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_determinism() {
        let grid = Grid::random(ROWS, COLS, 0.4, &mut StdRng::seed_from_u64(9));
        assert_eq!(advance(&grid), advance(&grid));
    }

    #[test]
    fn test_purity_input_untouched() {
        let grid = Grid::random(ROWS, COLS, 0.4, &mut StdRng::seed_from_u64(3));
        let before = grid.clone();
        let _ = advance(&grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_dimension_preservation() {
        for (rows, cols) in [(ROWS, COLS), (5, 9), (1, 1)] {
            let grid = Grid::empty(rows, cols);
            let next = advance(&grid);
            assert_eq!(next.rows(), rows);
            assert_eq!(next.cols(), cols);
        }
    }

    #[test]
    fn test_corner_wrap_neighbor_counts() {
        // A single alive cell at (0,0) is adjacent, via the torus, to
        // exactly the 8 wrapped positions and nothing else.
        let mut grid = Grid::empty_default();
        grid.set(0, 0, true);

        let wrapped = [
            (ROWS - 1, COLS - 1),
            (ROWS - 1, 0),
            (ROWS - 1, 1),
            (0, COLS - 1),
            (0, 1),
            (1, COLS - 1),
            (1, 0),
            (1, 1),
        ];
        for r in 0..ROWS {
            for c in 0..COLS {
                let expected = if wrapped.contains(&(r, c)) { 1 } else { 0 };
                assert_eq!(
                    neighbor_count(&grid, r, c),
                    expected,
                    "neighbor count at ({r}, {c})"
                );
            }
        }
    }

    #[test]
    fn test_block_still_life() {
        let mut grid = Grid::empty_default();
        grid.place_pattern(&pattern_block(), Some((10, 10)));
        assert_eq!(advance(&grid), grid);
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut horizontal = Grid::empty_default();
        horizontal.place_pattern(&pattern_blinker(), Some((10, 10)));

        let mut vertical = Grid::empty_default();
        vertical.set(9, 10, true);
        vertical.set(10, 10, true);
        vertical.set(11, 10, true);

        let one = advance(&horizontal);
        assert_eq!(one, vertical);
        assert_eq!(advance(&one), horizontal);
    }

    #[test]
    fn test_underpopulation() {
        let mut grid = Grid::empty_default();
        grid.set(5, 5, true);
        assert_eq!(advance(&grid).population(), 0);
    }

    #[test]
    fn test_overpopulation() {
        // Center cell with 4 alive neighbors dies.
        let mut grid = Grid::empty_default();
        grid.set(10, 10, true);
        grid.set(9, 9, true);
        grid.set(9, 11, true);
        grid.set(11, 9, true);
        grid.set(11, 11, true);
        assert!(!advance(&grid).get(10, 10));
    }

    #[test]
    fn test_birth_at_exactly_three() {
        let neighbors = [(9usize, 9usize), (9, 11), (11, 9), (11, 10)];
        for n in 2..=4usize {
            let mut grid = Grid::empty_default();
            for &(r, c) in &neighbors[..n] {
                grid.set(r, c, true);
            }
            assert!(!grid.get(10, 10));
            let born = advance(&grid).get(10, 10);
            assert_eq!(born, n == 3, "dead cell with {n} neighbors");
        }
    }

    #[test]
    fn test_glider_crosses_the_seam() {
        // A glider marching off one edge re-enters on the opposite edge;
        // the population of a lone glider is invariant at 5.
        let mut grid = Grid::empty(12, 12);
        grid.place_pattern(&crate::grid::pattern_glider(), Some((10, 10)));
        for _ in 0..48 {
            grid = advance(&grid);
            assert_eq!(grid.population(), 5);
        }
    }
}

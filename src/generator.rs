//! Randomized depth-first maze carving.
//!
//! The backtracker walks the grid from a start cell, visiting neighbours in
//! a freshly shuffled order at every cell and opening the wall to each
//! neighbour it enters for the first time. The result is a perfect maze:
//! the open walls form a spanning tree over all cells.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Direction, Grid};

/// A candidate step out of a cell. The position may lie outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbour {
    pub row: isize,
    pub col: isize,
    pub direction: Direction,
}

/// The four neighbours of `cell` in a uniformly random order.
pub fn shuffled_neighbours(cell: Cell, rng: &mut impl Rng) -> [Neighbour; 4] {
    let (row, col) = (cell.row as isize, cell.col as isize);
    let mut neighbours = [Direction::Up, Direction::Left, Direction::Down, Direction::Right].map(
        |direction| {
            let (dr, dc) = direction.delta();
            Neighbour {
                row: row + dr,
                col: col + dc,
                direction,
            }
        },
    );
    neighbours.shuffle(rng);
    neighbours
}

/// One pending cell on the backtracking stack.
struct Frame {
    cell: Cell,
    neighbours: [Neighbour; 4],
    next: usize,
}

impl Frame {
    fn enter(cell: Cell, rng: &mut impl Rng) -> Self {
        Self {
            cell,
            neighbours: shuffled_neighbours(cell, rng),
            next: 0,
        }
    }

    fn next_neighbour(&mut self) -> Option<Neighbour> {
        let neighbour = self.neighbours.get(self.next).copied();
        self.next += 1;
        neighbour
    }
}

/// Carves passages into `grid` starting at `start`.
///
/// Equivalent to the recursive backtracker (mark, shuffle, then descend into
/// each unvisited in-bounds neighbour in order), including the order in
/// which random numbers are drawn, but uses an explicit stack so depth is
/// not limited by the call stack. Does nothing if `start` is already visited.
pub fn generate(grid: &mut Grid, start: Cell, rng: &mut impl Rng) {
    if grid.is_visited(start) {
        return;
    }
    grid.visited[start.row][start.col] = true;

    let mut stack = vec![Frame::enter(start, rng)];
    while let Some(frame) = stack.last_mut() {
        let Some(neighbour) = frame.next_neighbour() else {
            stack.pop();
            continue;
        };
        let Some(next) = grid.cell_at(neighbour.row, neighbour.col) else {
            continue;
        };
        if grid.is_visited(next) {
            continue;
        }
        grid.open(frame.cell, neighbour.direction);
        grid.visited[next.row][next.col] = true;
        stack.push(Frame::enter(next, rng));
    }
}

/// Builds a `rows x cols` perfect maze from a uniformly random start cell.
pub fn carve_maze(rows: usize, cols: usize, rng: &mut impl Rng) -> Grid {
    let mut grid = Grid::new(rows, cols);
    if rows == 0 || cols == 0 {
        return grid;
    }
    let start = Cell::new(rng.gen_range(0..rows), rng.gen_range(0..cols));
    debug!("carving {rows}x{cols} maze from {start:?}");
    generate(&mut grid, start, rng);
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn recursive(grid: &mut Grid, cell: Cell, rng: &mut StdRng) {
        if grid.is_visited(cell) {
            return;
        }
        grid.visited[cell.row][cell.col] = true;
        for neighbour in shuffled_neighbours(cell, rng) {
            let Some(next) = grid.cell_at(neighbour.row, neighbour.col) else {
                continue;
            };
            if grid.is_visited(next) {
                continue;
            }
            grid.open(cell, neighbour.direction);
            recursive(grid, next, rng);
        }
    }

    #[test]
    fn three_by_three_from_origin() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(3, 3);
        generate(&mut grid, Cell::new(0, 0), &mut rng);
        assert!(grid.visited().iter().flatten().all(|&v| v));
        assert_eq!(grid.open_edge_count(), 8);
        assert!(grid.is_perfect());
    }

    #[test]
    fn single_cell() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = carve_maze(1, 1, &mut rng);
        assert!(grid.is_visited(Cell::new(0, 0)));
        assert_eq!(grid.open_edge_count(), 0);
    }

    #[test]
    fn visited_start_is_noop() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::new(4, 4);
        grid.visited[2][2] = true;
        generate(&mut grid, Cell::new(2, 2), &mut rng);
        assert_eq!(grid.open_edge_count(), 0);
        assert_eq!(grid.visited().iter().flatten().filter(|&&v| v).count(), 1);
    }

    #[test]
    fn large_grid_does_not_overflow_stack() {
        let mut rng = StdRng::seed_from_u64(99);
        let grid = carve_maze(300, 300, &mut rng);
        assert!(grid.is_perfect());
    }

    #[test]
    fn matches_recursive_backtracker() {
        for seed in 0..20 {
            let start = Cell::new((seed % 5) as usize, (seed % 7) as usize);

            let mut iterative = Grid::new(6, 8);
            generate(&mut iterative, start, &mut StdRng::seed_from_u64(seed));

            let mut reference = Grid::new(6, 8);
            recursive(&mut reference, start, &mut StdRng::seed_from_u64(seed));

            assert_eq!(iterative, reference, "seed {seed}");
        }
    }

    #[test]
    fn shuffle_is_uniform() {
        const TRIALS: usize = 24_000;
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<[Direction; 4], usize> = HashMap::new();
        for _ in 0..TRIALS {
            let order = shuffled_neighbours(Cell::new(5, 5), &mut rng).map(|n| n.direction);
            *counts.entry(order).or_default() += 1;
        }
        assert_eq!(counts.len(), 24);

        let expected = TRIALS as f64 / 24.0;
        let chi_square: f64 = counts
            .values()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        // 23 degrees of freedom, p = 0.001
        assert!(chi_square < 49.73, "chi-square {chi_square}");
    }

    #[test]
    fn neighbours_keep_their_positions() {
        let mut rng = StdRng::seed_from_u64(5);
        for neighbour in shuffled_neighbours(Cell::new(0, 0), &mut rng) {
            let (dr, dc) = neighbour.direction.delta();
            assert_eq!((neighbour.row, neighbour.col), (dr, dc));
        }
    }

    proptest! {
        #[test]
        fn every_maze_is_perfect(rows in 1usize..16, cols in 1usize..16, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = carve_maze(rows, cols, &mut rng);
            prop_assert!(grid.visited().iter().flatten().all(|&v| v));
            prop_assert_eq!(grid.open_edge_count(), rows * cols - 1);
            let last = Cell::new(rows - 1, cols - 1);
            prop_assert!(grid.reachable_from(last).iter().flatten().all(|&seen| seen));
        }
    }
}

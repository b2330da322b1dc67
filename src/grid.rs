use std::collections::VecDeque;

/// A grid cell addressed by row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Row and column offset of the neighbour in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Down => (1, 0),
            Direction::Right => (0, 1),
        }
    }
}

/// Maze topology: which cells have been carved and which walls are open.
///
/// `verticals[r][c]` is the wall between `(r, c)` and `(r, c + 1)`,
/// `horizontals[r][c]` the wall between `(r, c)` and `(r + 1, c)`.
/// `true` means open (a passage).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    pub(crate) visited: Vec<Vec<bool>>,
    pub(crate) verticals: Vec<Vec<bool>>,
    pub(crate) horizontals: Vec<Vec<bool>>,
}

impl Grid {
    /// Fresh grid with nothing visited and every wall closed.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            visited: vec![vec![false; cols]; rows],
            verticals: vec![vec![false; cols.saturating_sub(1)]; rows],
            horizontals: vec![vec![false; cols]; rows.saturating_sub(1)],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn visited(&self) -> &[Vec<bool>] {
        &self.visited
    }

    pub fn verticals(&self) -> &[Vec<bool>] {
        &self.verticals
    }

    pub fn horizontals(&self) -> &[Vec<bool>] {
        &self.horizontals
    }

    pub fn is_visited(&self, cell: Cell) -> bool {
        self.visited[cell.row][cell.col]
    }

    /// Returns the cell at a signed position, or `None` when it lies outside the grid.
    pub fn cell_at(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(Cell { row, col })
    }

    /// Whether the wall on the `direction` side of `cell` is open.
    /// The outer boundary is always closed.
    pub fn is_open(&self, cell: Cell, direction: Direction) -> bool {
        let (dr, dc) = direction.delta();
        if self
            .cell_at(cell.row as isize + dr, cell.col as isize + dc)
            .is_none()
        {
            return false;
        }
        match direction {
            Direction::Left => self.verticals[cell.row][cell.col - 1],
            Direction::Right => self.verticals[cell.row][cell.col],
            Direction::Up => self.horizontals[cell.row - 1][cell.col],
            Direction::Down => self.horizontals[cell.row][cell.col],
        }
    }

    /// Opens the wall on the `direction` side of `cell`.
    ///
    /// The neighbour in that direction must be inside the grid.
    pub(crate) fn open(&mut self, cell: Cell, direction: Direction) {
        match direction {
            Direction::Left => self.verticals[cell.row][cell.col - 1] = true,
            Direction::Right => self.verticals[cell.row][cell.col] = true,
            Direction::Up => self.horizontals[cell.row - 1][cell.col] = true,
            Direction::Down => self.horizontals[cell.row][cell.col] = true,
        }
    }

    /// Number of open walls, i.e. passages between adjacent cells.
    pub fn open_edge_count(&self) -> usize {
        self.verticals
            .iter()
            .chain(self.horizontals.iter())
            .flat_map(|row| row.iter())
            .filter(|&&open| open)
            .count()
    }

    /// Cells reachable from `start` through open walls.
    pub fn reachable_from(&self, start: Cell) -> Vec<Vec<bool>> {
        let mut seen = vec![vec![false; self.cols]; self.rows];
        let mut q = VecDeque::new();
        seen[start.row][start.col] = true;
        q.push_back(start);
        while let Some(cell) = q.pop_front() {
            for direction in [Direction::Up, Direction::Left, Direction::Down, Direction::Right] {
                if !self.is_open(cell, direction) {
                    continue;
                }
                let (dr, dc) = direction.delta();
                let next = Cell {
                    row: (cell.row as isize + dr) as usize,
                    col: (cell.col as isize + dc) as usize,
                };
                if !seen[next.row][next.col] {
                    seen[next.row][next.col] = true;
                    q.push_back(next);
                }
            }
        }
        seen
    }

    /// True when the passages form a spanning tree over every cell.
    pub fn is_perfect(&self) -> bool {
        if self.rows == 0 || self.cols == 0 {
            return false;
        }
        if self.open_edge_count() != self.rows * self.cols - 1 {
            return false;
        }
        self.reachable_from(Cell::new(0, 0))
            .iter()
            .all(|row| row.iter().all(|&seen| seen))
    }
}

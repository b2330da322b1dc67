//! Turns a carved grid into world-space wall rectangles.

use crate::grid::Grid;
use crate::world::Vector;

/// Thickness of walls between cells.
pub const WALL_THICKNESS: f32 = 5.0;
/// Thickness of the four walls around the maze.
pub const BOUNDARY_THICKNESS: f32 = 2.0;
/// Goal side length as a fraction of the cell size.
pub const GOAL_SCALE: f32 = 0.7;

/// World size of the maze and of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Layout {
    /// Splits a `width x height` viewport evenly into `rows x cols` cells.
    pub fn new(rows: usize, cols: usize, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            cell_width: width / cols.max(1) as f32,
            cell_height: height / rows.max(1) as f32,
        }
    }

    /// World position of the center of a cell.
    pub fn cell_center(&self, row: usize, col: usize) -> Vector {
        Vector::new(
            col as f32 * self.cell_width + self.cell_width / 2.0,
            row as f32 * self.cell_height + self.cell_height / 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallKind {
    Interior,
    Boundary,
}

/// A static axis-aligned wall rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub center: Vector,
    pub width: f32,
    pub height: f32,
    pub kind: WallKind,
}

/// A static goal square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalSpec {
    pub center: Vector,
    pub width: f32,
    pub height: f32,
}

/// A dynamic ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSpec {
    pub center: Vector,
    pub radius: f32,
}

/// One wall per closed interior entry of `grid` plus the four outer walls.
///
/// Horizontal entries come first, then vertical ones, both row-major,
/// followed by the top, bottom, left and right boundaries.
pub fn map_to_walls(grid: &Grid, layout: &Layout) -> Vec<WallSegment> {
    let (w, h) = (layout.cell_width, layout.cell_height);
    let mut walls = Vec::new();

    for (row, entries) in grid.horizontals().iter().enumerate() {
        for (col, &open) in entries.iter().enumerate() {
            if open {
                continue;
            }
            walls.push(WallSegment {
                center: Vector::new(col as f32 * w + w / 2.0, (row + 1) as f32 * h),
                width: w,
                height: WALL_THICKNESS,
                kind: WallKind::Interior,
            });
        }
    }

    for (row, entries) in grid.verticals().iter().enumerate() {
        for (col, &open) in entries.iter().enumerate() {
            if open {
                continue;
            }
            walls.push(WallSegment {
                center: Vector::new(col as f32 * w + w, row as f32 * h + h / 2.0),
                width: WALL_THICKNESS,
                height: h,
                kind: WallKind::Interior,
            });
        }
    }

    walls.extend(boundary_walls(layout));
    walls
}

fn boundary_walls(layout: &Layout) -> [WallSegment; 4] {
    let (width, height) = (layout.width, layout.height);
    let boundary = |x: f32, y: f32, w: f32, h: f32| WallSegment {
        center: Vector::new(x, y),
        width: w,
        height: h,
        kind: WallKind::Boundary,
    };
    [
        boundary(width / 2.0, 0.0, width, BOUNDARY_THICKNESS),
        boundary(width / 2.0, height, width, BOUNDARY_THICKNESS),
        boundary(0.0, height / 2.0, BOUNDARY_THICKNESS, height),
        boundary(width, height / 2.0, BOUNDARY_THICKNESS, height),
    ]
}

/// The goal sits in the bottom-right cell.
pub fn goal_spec(grid: &Grid, layout: &Layout) -> GoalSpec {
    GoalSpec {
        center: layout.cell_center(grid.rows().saturating_sub(1), grid.cols().saturating_sub(1)),
        width: layout.cell_width * GOAL_SCALE,
        height: layout.cell_height * GOAL_SCALE,
    }
}

/// The ball starts in the top-left cell.
pub fn ball_spec(layout: &Layout) -> BallSpec {
    BallSpec {
        center: layout.cell_center(0, 0),
        radius: layout.cell_width.min(layout.cell_height) / 4.0,
    }
}

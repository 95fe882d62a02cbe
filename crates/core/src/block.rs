//! Block module - a single occupied cell and per-cell movement legality
//!
//! A [`Block`] is the payload of one grid cell: its shape kind (which fixes
//! the color) and a connectivity bitmask that tells the renderer which
//! cardinal neighbors belong to the same piece. The mask is derived data,
//! never a live reference; the grid keeps it consistent by severing
//! reciprocal bits when a neighbor is cleared.
//!
//! The movement-legality scans walk cell by cell from a coordinate in one
//! direction, stopping at the first occupied or out-of-bounds cell. The grid
//! only stores locked blocks, so an active piece's own blocks never obstruct
//! each other's scans.

use blockfall_types::{Coord, ShapeKind};

use crate::grid::Grid;

/// Connectivity bit: same-piece neighbor directly above.
pub const LINK_UP: u8 = 0b0001;
/// Connectivity bit: same-piece neighbor directly below.
pub const LINK_DOWN: u8 = 0b0010;
/// Connectivity bit: same-piece neighbor to the left.
pub const LINK_LEFT: u8 = 0b0100;
/// Connectivity bit: same-piece neighbor to the right.
pub const LINK_RIGHT: u8 = 0b1000;

/// Opposite link bit, for severing the reciprocal side of a connection.
pub fn opposite_link(link: u8) -> u8 {
    match link {
        LINK_UP => LINK_DOWN,
        LINK_DOWN => LINK_UP,
        LINK_LEFT => LINK_RIGHT,
        LINK_RIGHT => LINK_LEFT,
        _ => 0,
    }
}

/// One occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub kind: ShapeKind,
    /// Bitmask of `LINK_*` flags for sprite selection.
    pub links: u8,
}

impl Block {
    pub fn new(kind: ShapeKind) -> Self {
        Self { kind, links: 0 }
    }

    pub fn with_links(kind: ShapeKind, links: u8) -> Self {
        Self { kind, links }
    }
}

/// Count how many of up to `units` downward steps from `from` are clear.
///
/// Stops at the first occupied or out-of-bounds cell; 0 means blocked
/// immediately.
pub fn clear_steps_down(grid: &Grid, from: Coord, units: u8) -> u8 {
    clear_steps(grid, from, 0, -1, units)
}

/// Count how many of up to `units` leftward steps from `from` are clear.
pub fn clear_steps_left(grid: &Grid, from: Coord, units: u8) -> u8 {
    clear_steps(grid, from, -1, 0, units)
}

/// Count how many of up to `units` rightward steps from `from` are clear.
pub fn clear_steps_right(grid: &Grid, from: Coord, units: u8) -> u8 {
    clear_steps(grid, from, 1, 0, units)
}

fn clear_steps(grid: &Grid, from: Coord, dx: i8, dy: i8, units: u8) -> u8 {
    let mut steps = 0;
    let mut at = from;
    while steps < units {
        at = at.offset(dx, dy);
        if grid.has_block_at(at) {
            break;
        }
        steps += 1;
    }
    steps
}

/// Test a single arbitrary offset from `from` (used by rotation).
///
/// Returns the destination if it is free, `None` otherwise. Nothing moves
/// either way; callers must check the result rather than assume success.
pub fn can_translate(grid: &Grid, from: Coord, dx: i8, dy: i8) -> Option<Coord> {
    let to = from.offset(dx, dy);
    if grid.has_block_at(to) {
        None
    } else {
        Some(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall_types::{GRID_COLUMNS, GRID_ROWS};

    fn empty_grid() -> Grid {
        Grid::new(GRID_COLUMNS, GRID_ROWS)
    }

    #[test]
    fn test_clear_steps_down_stops_at_floor() {
        let grid = empty_grid();
        let from = Coord::new(4, 3);

        assert_eq!(clear_steps_down(&grid, from, 2), 2);
        // Only 3 rows below; the fourth step leaves the grid.
        assert_eq!(clear_steps_down(&grid, from, 10), 3);
    }

    #[test]
    fn test_clear_steps_down_stops_at_block() {
        let mut grid = empty_grid();
        grid.add_block(Coord::new(4, 1), Block::new(ShapeKind::I));

        assert_eq!(clear_steps_down(&grid, Coord::new(4, 3), 10), 1);
        assert_eq!(clear_steps_down(&grid, Coord::new(4, 2), 10), 0);
    }

    #[test]
    fn test_clear_steps_horizontal_walls() {
        let grid = empty_grid();

        assert_eq!(clear_steps_left(&grid, Coord::new(2, 0), 10), 2);
        assert_eq!(
            clear_steps_right(&grid, Coord::new(2, 0), 10),
            (GRID_COLUMNS as u8) - 3
        );
        assert_eq!(clear_steps_left(&grid, Coord::new(0, 0), 1), 0);
    }

    #[test]
    fn test_can_translate_is_a_pure_check() {
        let mut grid = empty_grid();
        grid.add_block(Coord::new(5, 5), Block::new(ShapeKind::T));

        let from = Coord::new(4, 5);
        assert_eq!(can_translate(&grid, from, 1, 0), None);
        assert_eq!(can_translate(&grid, from, -1, 0), Some(Coord::new(3, 5)));
        assert_eq!(can_translate(&grid, from, -5, 0), None);
    }

    #[test]
    fn test_opposite_links() {
        assert_eq!(opposite_link(LINK_UP), LINK_DOWN);
        assert_eq!(opposite_link(LINK_DOWN), LINK_UP);
        assert_eq!(opposite_link(LINK_LEFT), LINK_RIGHT);
        assert_eq!(opposite_link(LINK_RIGHT), LINK_LEFT);
    }
}

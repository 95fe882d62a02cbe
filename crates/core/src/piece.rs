//! Piece module - the active tetromino
//!
//! A piece is a rigid group of exactly 4 blocks: a shape kind, a rotation
//! state, and 4 absolute coordinates (index 0 is the pivot). Shape geometry
//! comes from the static tables in [`crate::shapes`]; the piece itself only
//! tracks position and the technical-move flag used for spin scoring.
//!
//! Movement is all-or-nothing: a translation or rotation either moves every
//! block by the same delta or moves none. The grid never stores the active
//! piece, so legality checks only see locked blocks.

use arrayvec::ArrayVec;
use blockfall_types::{Coord, RotationDir, RotationState, ShapeKind, TechnicalKind};

use crate::block::{
    can_translate, clear_steps_down, clear_steps_left, clear_steps_right, LINK_DOWN, LINK_LEFT,
    LINK_RIGHT, LINK_UP,
};
use crate::grid::Grid;
use crate::shapes;

/// The active falling piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    kind: ShapeKind,
    rotation: RotationState,
    blocks: [Coord; 4],
    /// Set when the latest successful action was a technical rotation;
    /// cleared by any successful translation.
    prev_move_technical: Option<TechnicalKind>,
}

impl Piece {
    /// Construct a piece in spawn orientation with its box at `origin`.
    pub fn spawn(kind: ShapeKind, origin: Coord) -> Self {
        let layout = shapes::layout(kind, RotationState::R0);
        let mut blocks = [origin; 4];
        for (block, &(dc, dr)) in blocks.iter_mut().zip(layout.iter()) {
            *block = origin.offset(dc, dr);
        }
        Self {
            kind,
            rotation: RotationState::R0,
            blocks,
            prev_move_technical: None,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn blocks(&self) -> &[Coord; 4] {
        &self.blocks
    }

    /// The pivot block's coordinate.
    pub fn pivot(&self) -> Coord {
        self.blocks[0]
    }

    pub fn prev_move_technical(&self) -> Option<TechnicalKind> {
        self.prev_move_technical
    }

    /// True if any block overlaps a locked block or sits out of bounds.
    pub fn overlaps(&self, grid: &Grid) -> bool {
        self.blocks.iter().any(|&coord| grid.has_block_at(coord))
    }

    /// True if the piece can descend at least one row.
    pub fn can_fall(&self, grid: &Grid) -> bool {
        self.blocks
            .iter()
            .all(|&coord| clear_steps_down(grid, coord, 1) == 1)
    }

    /// Move down by up to `units` rows, rigid-body. Returns rows moved.
    pub fn move_down(&mut self, grid: &Grid, units: u8) -> u8 {
        let steps = self
            .blocks
            .iter()
            .map(|&coord| clear_steps_down(grid, coord, units))
            .min()
            .unwrap_or(0);
        self.translate(0, -(steps as i8));
        steps
    }

    /// Move left by up to `units` columns, rigid-body. Returns columns moved.
    pub fn move_left(&mut self, grid: &Grid, units: u8) -> u8 {
        let steps = self
            .blocks
            .iter()
            .map(|&coord| clear_steps_left(grid, coord, units))
            .min()
            .unwrap_or(0);
        self.translate(-(steps as i8), 0);
        steps
    }

    /// Move right by up to `units` columns, rigid-body. Returns columns moved.
    pub fn move_right(&mut self, grid: &Grid, units: u8) -> u8 {
        let steps = self
            .blocks
            .iter()
            .map(|&coord| clear_steps_right(grid, coord, units))
            .min()
            .unwrap_or(0);
        self.translate(steps as i8, 0);
        steps
    }

    fn translate(&mut self, dx: i8, dy: i8) {
        if dx == 0 && dy == 0 {
            return;
        }
        for block in self.blocks.iter_mut() {
            *block = block.offset(dx, dy);
        }
        // Landing a translation voids any pending spin bonus.
        self.prev_move_technical = None;
    }

    /// Largest legal downward move, by linear probe.
    pub fn hard_drop_units(&self, grid: &Grid) -> u8 {
        let mut n: u8 = 0;
        loop {
            let next = n + 1;
            let all_clear = self
                .blocks
                .iter()
                .all(|&coord| clear_steps_down(grid, coord, next) == next);
            if all_clear {
                n = next;
            } else {
                return n;
            }
        }
    }

    /// Where the piece would land under a hard drop (the ghost).
    ///
    /// Recomputed on demand from the current position, so it can never go
    /// stale; it is never collision-tested as a piece of its own.
    pub fn ghost_blocks(&self, grid: &Grid) -> [Coord; 4] {
        let drop = self.hard_drop_units(grid) as i8;
        let mut ghost = self.blocks;
        for block in ghost.iter_mut() {
            *block = block.offset(0, -drop);
        }
        ghost
    }

    /// Rotate with wall-kick resolution.
    ///
    /// Kick offsets are tried in table order; the first offset every block
    /// can translate by is committed atomically along with the state change.
    /// If none fits, nothing changes and the call returns false.
    pub fn rotate(&mut self, grid: &Grid, dir: RotationDir) -> bool {
        let deltas = shapes::rotation_deltas(self.kind, self.rotation, dir);
        let kicks = shapes::kick_sequence(self.kind, self.rotation, dir);

        for &(kx, ky) in kicks.iter() {
            let mut moved = [Coord::new(0, 0); 4];
            let mut all_fit = true;

            for (i, &coord) in self.blocks.iter().enumerate() {
                match can_translate(grid, coord, deltas[i].0 + kx, deltas[i].1 + ky) {
                    Some(dest) => moved[i] = dest,
                    None => {
                        all_fit = false;
                        break;
                    }
                }
            }

            if all_fit {
                self.blocks = moved;
                self.rotation = match dir {
                    RotationDir::Cw => self.rotation.cw(),
                    RotationDir::Ccw => self.rotation.ccw(),
                };
                let kicked = (kx, ky) != (0, 0);
                self.prev_move_technical = self.classify_technical(grid, kicked);
                return true;
            }
        }

        false
    }

    /// Shape-specific technical-move check, run after a committed rotation.
    ///
    /// The T piece counts occupied diagonal neighbors of its pivot: 3 or
    /// more makes the rotation technical, downgraded from full to mini when
    /// a non-zero kick offset was needed. Other shapes never qualify.
    fn classify_technical(&self, grid: &Grid, kicked: bool) -> Option<TechnicalKind> {
        if self.kind != ShapeKind::T {
            return None;
        }

        let pivot = self.pivot();
        let occupied = [(-1, -1), (-1, 1), (1, -1), (1, 1)]
            .iter()
            .filter(|&&(dc, dr)| grid.has_block_at(pivot.offset(dc, dr)))
            .count();

        if occupied >= 3 {
            if kicked {
                Some(TechnicalKind::Mini)
            } else {
                Some(TechnicalKind::Full)
            }
        } else {
            None
        }
    }

    /// Connectivity bitmask per block, derived from the coupling graph and
    /// the blocks' current coordinates.
    pub fn link_masks(&self) -> [u8; 4] {
        let mut masks = [0u8; 4];
        for &(a, b) in shapes::coupling_pairs(self.kind) {
            let (from, to) = (self.blocks[a], self.blocks[b]);
            if to.col == from.col + 1 && to.row == from.row {
                masks[a] |= LINK_RIGHT;
                masks[b] |= LINK_LEFT;
            } else if to.col == from.col - 1 && to.row == from.row {
                masks[a] |= LINK_LEFT;
                masks[b] |= LINK_RIGHT;
            } else if to.row == from.row + 1 && to.col == from.col {
                masks[a] |= LINK_UP;
                masks[b] |= LINK_DOWN;
            } else if to.row == from.row - 1 && to.col == from.col {
                masks[a] |= LINK_DOWN;
                masks[b] |= LINK_UP;
            }
        }
        masks
    }

    /// Lowest row any block occupies (lock-out checks).
    pub fn lowest_row(&self) -> i8 {
        self.blocks.iter().map(|c| c.row).min().unwrap_or(0)
    }

    /// Distinct rows the piece occupies, highest first (line-clear order).
    pub fn occupied_rows(&self) -> ArrayVec<i8, 4> {
        let mut rows: ArrayVec<i8, 4> = ArrayVec::new();
        for &coord in self.blocks.iter() {
            if !rows.contains(&coord.row) {
                rows.push(coord.row);
            }
        }
        rows.sort_unstable_by(|a, b| b.cmp(a));
        rows
    }
}

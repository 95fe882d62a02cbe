//! Spawner module - piece placement and the hold mechanic
//!
//! Spawning tries a fixed number of placements, sliding the spawn row up by
//! one per attempt so a piece can escape a stack that has crept into the
//! spawn cells. An attempt succeeds only if none of the 4 blocks overlap a
//! locked block; total failure is the caller's block-out condition.
//!
//! The hold slot stores at most one shape kind behind a once-per-spawn-cycle
//! gate: consumed by a swap, re-armed by the next regular spawn.

use blockfall_types::{Coord, ShapeKind, SPAWN_RETRIES};

use crate::grid::Grid;
use crate::piece::Piece;
use crate::queue::PieceQueue;

/// Result of a hold request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldOutcome {
    /// The hold gate was already spent this spawn cycle; nothing changed.
    Unavailable,
    /// Swap succeeded; the returned piece is now active.
    Swapped(Piece),
    /// The incoming piece could not be placed anywhere (block-out).
    Blocked,
}

/// Places new pieces and manages the hold slot.
#[derive(Debug, Clone)]
pub struct Spawner {
    origin: Coord,
    held: Option<ShapeKind>,
    can_hold: bool,
}

impl Spawner {
    pub fn new(origin: Coord) -> Self {
        Self {
            origin,
            held: None,
            can_hold: true,
        }
    }

    pub fn held_kind(&self) -> Option<ShapeKind> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Spawn the next queue piece. `None` means block-out.
    pub fn spawn_next(&mut self, grid: &Grid, queue: &mut dyn PieceQueue) -> Option<Piece> {
        let kind = queue.shift_next();
        self.place(grid, kind, false)
    }

    /// Swap the active piece's kind with the hold slot.
    ///
    /// An empty slot draws the replacement from the queue instead. The gate
    /// stays consumed until the next regular spawn re-arms it.
    pub fn hold_swap(
        &mut self,
        grid: &Grid,
        active_kind: ShapeKind,
        queue: &mut dyn PieceQueue,
    ) -> HoldOutcome {
        if !self.can_hold {
            return HoldOutcome::Unavailable;
        }

        let incoming = match self.held.take() {
            Some(kind) => kind,
            None => queue.shift_next(),
        };
        self.held = Some(active_kind);
        self.can_hold = false;

        match self.place(grid, incoming, true) {
            Some(piece) => HoldOutcome::Swapped(piece),
            None => HoldOutcome::Blocked,
        }
    }

    /// Attempt placement with retry-offset fallback.
    fn place(&mut self, grid: &Grid, kind: ShapeKind, from_hold: bool) -> Option<Piece> {
        for attempt in 0..SPAWN_RETRIES {
            let origin = self.origin.offset(0, attempt as i8);
            let piece = Piece::spawn(kind, origin);
            if !piece.overlaps(grid) {
                if !from_hold {
                    self.can_hold = true;
                }
                return Some(piece);
            }
        }
        None
    }
}

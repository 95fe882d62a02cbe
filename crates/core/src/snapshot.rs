//! Snapshot module - the renderer-facing view of a game
//!
//! Everything a renderer needs, flattened to primitive fields: visible-grid
//! occupancy as (kind code, connectivity mask) bytes, the active piece and
//! its ghost, the preview, the hold slot and the stat counters. Kind codes
//! are the shape palette ids (0 = empty cell).
//!
//! [`GameSnapshot::capture`] refreshes a caller-owned snapshot without
//! reallocating, so a render loop can reuse one buffer per frame.

use serde::{Deserialize, Serialize};

use blockfall_types::{GameOverCause, PREVIEW_LEN};

use crate::game::{Game, GameStats};
use crate::shapes;

/// The active (or ghost) piece as primitive data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    /// Palette id of the shape kind.
    pub kind: u8,
    /// Rotation state in `0..4`.
    pub rotation: u8,
    /// Absolute `(col, row)` per block, pivot first.
    pub blocks: [(i8, i8); 4],
    /// Connectivity mask per block.
    pub links: [u8; 4],
}

/// Stat counters for the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub score: u32,
    pub combo: i32,
    pub back_to_back: i32,
    pub level: u32,
    pub lines: u32,
    pub quota_current: u32,
    pub quota_target: u32,
}

impl From<GameStats> for StatsSnapshot {
    fn from(stats: GameStats) -> Self {
        Self {
            score: stats.score,
            combo: stats.combo,
            back_to_back: stats.back_to_back,
            level: stats.level,
            lines: stats.lines,
            quota_current: stats.quota_current,
            quota_target: stats.quota_target,
        }
    }
}

/// A complete per-frame view of the game.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub columns: u8,
    pub rows: u8,
    /// Palette id per visible cell, row-major from the bottom row up.
    pub cells: Vec<u8>,
    /// Connectivity mask per visible cell, same layout as `cells`.
    pub links: Vec<u8>,
    pub active: Option<ActiveSnapshot>,
    /// Hard-drop destination of the active piece, `(col, row)` per block.
    pub ghost: Option<[(i8, i8); 4]>,
    /// Palette ids of the upcoming pieces, soonest first.
    pub preview: Vec<u8>,
    /// Palette id of the held piece, if any.
    pub hold: Option<u8>,
    pub can_hold: bool,
    pub paused: bool,
    pub soft_dropping: bool,
    /// Game-over cause string (`blockOut`, `lockOut`, `topOut`).
    pub over: Option<String>,
    pub stats: StatsSnapshot,
}

impl GameSnapshot {
    /// Build a fresh snapshot of `game`.
    pub fn from_game(game: &Game) -> Self {
        let mut snapshot = Self::default();
        snapshot.capture(game);
        snapshot
    }

    /// Refresh this snapshot in place, reusing existing buffers.
    pub fn capture(&mut self, game: &Game) {
        let grid = game.grid();
        self.columns = grid.columns();
        self.rows = grid.visible_rows();

        let cell_count = self.columns as usize * self.rows as usize;
        self.cells.clear();
        self.cells.resize(cell_count, 0);
        self.links.clear();
        self.links.resize(cell_count, 0);

        for row in 0..self.rows as i8 {
            for col in 0..self.columns as i8 {
                let idx = row as usize * self.columns as usize + col as usize;
                if let Some(block) = grid.block_at(blockfall_types::Coord::new(col, row)) {
                    self.cells[idx] = shapes::color_id(block.kind);
                    self.links[idx] = block.links;
                }
            }
        }

        self.active = game.active().map(|piece| {
            let masks = piece.link_masks();
            let mut blocks = [(0i8, 0i8); 4];
            for (slot, coord) in blocks.iter_mut().zip(piece.blocks().iter()) {
                *slot = (coord.col, coord.row);
            }
            ActiveSnapshot {
                kind: shapes::color_id(piece.kind()),
                rotation: piece.rotation().index() as u8,
                blocks,
                links: masks,
            }
        });

        self.ghost = game.active().map(|piece| {
            let mut blocks = [(0i8, 0i8); 4];
            for (slot, coord) in blocks.iter_mut().zip(piece.ghost_blocks(grid).iter()) {
                *slot = (coord.col, coord.row);
            }
            blocks
        });

        self.preview.clear();
        self.preview
            .extend(game.preview(PREVIEW_LEN).iter().map(|&k| shapes::color_id(k)));

        self.hold = game.held_kind().map(shapes::color_id);
        self.can_hold = game.can_hold();
        self.paused = game.paused();
        self.soft_dropping = game.soft_dropping();
        self.over = game.over().map(cause_str);
        self.stats = game.stats().into();
    }

    /// Palette id at a visible cell, 0 if empty or out of range.
    pub fn cell(&self, col: u8, row: u8) -> u8 {
        if col >= self.columns || row >= self.rows {
            return 0;
        }
        self.cells[row as usize * self.columns as usize + col as usize]
    }

    pub fn playable(&self) -> bool {
        self.over.is_none() && !self.paused
    }
}

fn cause_str(cause: GameOverCause) -> String {
    cause.as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use crate::queue::ScriptedQueue;
    use blockfall_types::{Button, InputFrame, ShapeKind};

    fn game() -> Game {
        let mut game = Game::new(
            GameConfig::default(),
            Box::new(ScriptedQueue::new(vec![ShapeKind::T, ShapeKind::I])),
        );
        game.tick(&InputFrame::new());
        game
    }

    #[test]
    fn test_snapshot_dimensions_and_cells() {
        let game = game();
        let snapshot = GameSnapshot::from_game(&game);

        assert_eq!(snapshot.columns, 10);
        assert_eq!(snapshot.rows, 20);
        assert_eq!(snapshot.cells.len(), 200);
        assert_eq!(snapshot.links.len(), 200);
        // Nothing locked yet.
        assert!(snapshot.cells.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_snapshot_tracks_active_and_ghost() {
        let game = game();
        let snapshot = GameSnapshot::from_game(&game);

        let active = snapshot.active.expect("piece spawned");
        assert_eq!(active.kind, shapes::color_id(ShapeKind::T));
        assert_eq!(active.rotation, 0);

        let ghost = snapshot.ghost.expect("ghost follows active");
        // Ghost shares columns with the active piece, at or below it.
        for (g, a) in ghost.iter().zip(active.blocks.iter()) {
            assert_eq!(g.0, a.0);
            assert!(g.1 <= a.1);
        }
    }

    #[test]
    fn test_snapshot_after_lock_shows_cells() {
        let mut game = game();
        let mut frame = InputFrame::new();
        frame.press(Button::HardDrop, 1);
        game.tick(&frame);

        let snapshot = GameSnapshot::from_game(&game);
        let filled = snapshot.cells.iter().filter(|&&c| c != 0).count();
        assert_eq!(filled, 4);
        // Locked T blocks keep their connectivity for sprite selection.
        let linked = snapshot
            .cells
            .iter()
            .zip(snapshot.links.iter())
            .filter(|(&c, &l)| c != 0 && l != 0)
            .count();
        assert_eq!(linked, 4);
    }

    #[test]
    fn test_capture_reuses_buffers() {
        let game = game();
        let mut snapshot = GameSnapshot::from_game(&game);
        let cells_capacity = snapshot.cells.capacity();

        snapshot.capture(&game);
        assert_eq!(snapshot.cells.capacity(), cells_capacity);
    }

    #[test]
    fn test_snapshot_serializes() {
        let game = game();
        let snapshot = GameSnapshot::from_game(&game);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }
}

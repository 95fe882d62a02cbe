//! Game module - the frame-driven simulation state machine
//!
//! One [`Game::tick`] call advances the simulation by exactly one frame:
//! input is dispatched first, then gravity, then the lock-delay timer, in
//! that fixed order. All waiting is frame counters compared against
//! thresholds; pausing freezes every counter in place.
//!
//! The grounded bookkeeping implements the move-reset rule: a piece that
//! grounds at a strictly lower row than ever before gets its grounded-move
//! allowance back, except when the re-ground was caused by a rotation of an
//! already-grounded piece. Exhausting the allowance while unable to fall
//! forces an immediate lock.

use blockfall_types::{
    Button, Coord, GameOverCause, InputFrame, RotationDir, ShapeKind, TechnicalKind, GRID_COLUMNS,
    GRID_ROWS, GROUNDED_MOVE_LIMIT, LEFT_REPEAT_FRAME, LOCK_DELAY_FRAMES, RIGHT_REPEAT_FRAME,
    SOFT_DROP_DIVISOR,
};

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::piece::Piece;
use crate::progress::{gravity_frames_per_cell, ProgressionJudge};
use crate::queue::PieceQueue;
use crate::score::{DropKind, ScoreJudge};
use crate::shapes;
use crate::spawner::{HoldOutcome, Spawner};

/// Construction-time configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub columns: u8,
    pub visible_rows: u8,
    /// Bounding-box origin for spawned pieces.
    pub spawn_origin: Coord,
    pub start_level: u32,
    /// Frames a grounded piece rests before auto-locking; 0 locks at once.
    pub lock_delay_frames: u32,
    /// Grounded moves allowed before a forced lock.
    pub grounded_move_limit: u8,
    /// Held-frame threshold from which move-left auto-repeats.
    pub left_repeat_frame: u32,
    /// Held-frame threshold from which move-right auto-repeats.
    pub right_repeat_frame: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            visible_rows: GRID_ROWS,
            spawn_origin: Coord::new(3, (GRID_ROWS - 1) as i8),
            start_level: 1,
            lock_delay_frames: LOCK_DELAY_FRAMES,
            grounded_move_limit: GROUNDED_MOVE_LIMIT,
            left_repeat_frame: LEFT_REPEAT_FRAME,
            right_repeat_frame: RIGHT_REPEAT_FRAME,
        }
    }
}

/// Record of the most recent lock, consumed by observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub technical: Option<TechnicalKind>,
    pub points: u32,
    pub perfect: bool,
}

/// Aggregate stats for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStats {
    pub score: u32,
    pub combo: i32,
    pub back_to_back: i32,
    pub level: u32,
    pub lines: u32,
    pub quota_current: u32,
    pub quota_target: u32,
}

/// The complete simulation.
pub struct Game {
    config: GameConfig,
    grid: Grid,
    queue: Box<dyn PieceQueue>,
    spawner: Spawner,
    active: Option<Piece>,
    score: ScoreJudge,
    progress: ProgressionJudge,

    paused: bool,
    over: Option<GameOverCause>,
    soft_drop: bool,

    /// Fractional frame accumulator toward the next gravity step.
    auto_drop_frames: f32,
    /// Gravity baseline at the current level, in frames per cell.
    auto_drop_target: f32,
    lock_delay_frames: u32,
    /// Piece is in contact with the stack right now.
    is_grounded: bool,
    /// Piece has touched down at least once in its lifetime.
    has_grounded: bool,
    grounded_moves: u8,
    lowest_grounded_row: i8,

    last_lock: Option<LockEvent>,
}

impl Game {
    /// Build a game around a piece queue.
    ///
    /// Validates the static shape tables once; malformed tables are a
    /// construction bug and panic here rather than surfacing mid-game.
    pub fn new(config: GameConfig, queue: Box<dyn PieceQueue>) -> Self {
        let grid = Grid::new(config.columns, config.visible_rows);
        Self::with_grid(config, queue, grid)
    }

    /// Build a game over a prepared grid (scenario setups and tools).
    ///
    /// The grid's dimensions win over the config's.
    pub fn with_grid(mut config: GameConfig, queue: Box<dyn PieceQueue>, grid: Grid) -> Self {
        shapes::validate();
        config.columns = grid.columns();
        config.visible_rows = grid.visible_rows();
        let spawner = Spawner::new(config.spawn_origin);
        let progress = ProgressionJudge::new(config.start_level);
        let auto_drop_target = gravity_frames_per_cell(progress.level());

        Self {
            config,
            grid,
            queue,
            spawner,
            active: None,
            score: ScoreJudge::new(),
            progress,
            paused: false,
            over: None,
            soft_drop: false,
            auto_drop_frames: 0.0,
            auto_drop_target,
            lock_delay_frames: 0,
            is_grounded: false,
            has_grounded: false,
            grounded_moves: 0,
            lowest_grounded_row: i8::MAX,
            last_lock: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn over(&self) -> Option<GameOverCause> {
        self.over
    }

    pub fn soft_dropping(&self) -> bool {
        self.soft_drop
    }

    pub fn held_kind(&self) -> Option<ShapeKind> {
        self.spawner.held_kind()
    }

    pub fn can_hold(&self) -> bool {
        self.spawner.can_hold()
    }

    /// Upcoming pieces for the preview UI.
    pub fn preview(&self, n: usize) -> ArrayVec<ShapeKind, 7> {
        self.queue.get_next(n)
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            score: self.score.score(),
            combo: self.score.combo(),
            back_to_back: self.score.back_to_back(),
            level: self.progress.level(),
            lines: self.progress.lines_total(),
            quota_current: self.progress.quota_current(),
            quota_target: self.progress.quota_target(),
        }
    }

    /// Take and clear the most recent lock event.
    pub fn take_last_lock(&mut self) -> Option<LockEvent> {
        self.last_lock.take()
    }

    /// Advance the simulation by one frame.
    pub fn tick(&mut self, input: &InputFrame) {
        if self.over.is_some() {
            // Terminal, inert state: ticks are no-ops.
            return;
        }

        if input.just_pressed(Button::Pause) {
            self.paused = !self.paused;
        }
        if self.paused {
            return;
        }

        if self.active.is_none() && !self.spawn_piece() {
            self.over = Some(GameOverCause::BlockOut);
            return;
        }

        self.dispatch_input(input);
        if self.active.is_none() || self.over.is_some() {
            return;
        }

        self.soft_drop = input.held_frames(Button::SoftDrop) > 0;

        self.advance_gravity();
        if self.active.is_none() || self.over.is_some() {
            return;
        }

        self.advance_lock_delay();
    }

    /// Attempt to place the next queue piece. False means block-out.
    fn spawn_piece(&mut self) -> bool {
        match self.spawner.spawn_next(&self.grid, self.queue.as_mut()) {
            Some(piece) => {
                self.active = Some(piece);
                self.reset_piece_timing();
                // A spawn straight onto the stack grounds immediately.
                self.note_piece_settled(false);
                true
            }
            None => false,
        }
    }

    fn dispatch_input(&mut self, input: &InputFrame) {
        if input.just_pressed(Button::Hold) {
            self.try_hold();
            if self.active.is_none() || self.over.is_some() {
                return;
            }
        }

        if input.just_pressed(Button::RotateCw) {
            self.controlled_rotate(RotationDir::Cw);
        }
        if input.just_pressed(Button::RotateCcw) {
            self.controlled_rotate(RotationDir::Ccw);
        }
        if self.active.is_none() || self.over.is_some() {
            return;
        }

        if fires(input.held_frames(Button::MoveLeft), self.config.left_repeat_frame) {
            self.controlled_shift(-1);
        }
        if fires(
            input.held_frames(Button::MoveRight),
            self.config.right_repeat_frame,
        ) {
            self.controlled_shift(1);
        }
        if self.active.is_none() || self.over.is_some() {
            return;
        }

        if input.just_pressed(Button::HardDrop) {
            self.hard_drop();
        }
    }

    fn try_hold(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        match self
            .spawner
            .hold_swap(&self.grid, active.kind(), self.queue.as_mut())
        {
            HoldOutcome::Unavailable => {}
            HoldOutcome::Swapped(piece) => {
                self.active = Some(piece);
                self.reset_piece_timing();
                self.note_piece_settled(false);
            }
            HoldOutcome::Blocked => {
                self.active = None;
                self.over = Some(GameOverCause::BlockOut);
            }
        }
    }

    fn controlled_shift(&mut self, direction: i8) {
        let was_grounded = self.is_grounded;
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        let moved = if direction < 0 {
            piece.move_left(&self.grid, 1)
        } else {
            piece.move_right(&self.grid, 1)
        };
        if moved == 0 {
            return;
        }
        self.after_controlled_move(was_grounded, false);
    }

    fn controlled_rotate(&mut self, dir: RotationDir) {
        let was_grounded = self.is_grounded;
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        if !piece.rotate(&self.grid, dir) {
            return;
        }
        self.after_controlled_move(was_grounded, true);
    }

    /// Shared bookkeeping after any successful player move or rotation.
    fn after_controlled_move(&mut self, was_grounded: bool, was_rotation: bool) {
        self.lock_delay_frames = 0;
        if was_grounded {
            self.grounded_moves = self.grounded_moves.saturating_add(1);
        }
        self.note_piece_settled(was_rotation);

        // Infinity prevention: out of allowance and still unable to fall.
        if self.is_grounded && self.grounded_moves > self.config.grounded_move_limit {
            self.lock_active();
        }
    }

    /// Re-derive the grounded state after the active piece changed position.
    fn note_piece_settled(&mut self, was_rotation: bool) {
        let Some(piece) = self.active.as_ref() else {
            return;
        };

        if piece.can_fall(&self.grid) {
            self.is_grounded = false;
            self.lock_delay_frames = 0;
            return;
        }

        let low = piece.lowest_row();
        let newly_lower = !self.has_grounded || low < self.lowest_grounded_row;
        if newly_lower {
            self.lowest_grounded_row = low;
            // A rotation that re-grounds an already-grounded piece keeps
            // its spent allowance.
            if !(was_rotation && self.has_grounded) {
                self.grounded_moves = 0;
            }
        }
        if !self.is_grounded {
            self.lock_delay_frames = 0;
        }
        self.is_grounded = true;
        self.has_grounded = true;

        if self.config.lock_delay_frames == 0 {
            self.lock_active();
        }
    }

    /// The gravity target for this frame, shortened under soft drop.
    fn current_drop_target(&self) -> f32 {
        if self.soft_drop {
            (self.auto_drop_target / SOFT_DROP_DIVISOR).max(1.0)
        } else {
            self.auto_drop_target
        }
    }

    fn advance_gravity(&mut self) {
        if self.is_grounded {
            return;
        }

        self.auto_drop_frames += 1.0;
        let target = self.current_drop_target();
        if self.auto_drop_frames < target {
            return;
        }

        // At high gravity a single frame can cover several cells.
        let units = (self.auto_drop_frames / target) as u32;
        // Subtract the consumed portion, keeping fractional overrun.
        self.auto_drop_frames -= units as f32 * target;

        let Some(piece) = self.active.as_mut() else {
            return;
        };
        let moved = piece.move_down(&self.grid, units.min(u8::MAX as u32) as u8);
        if moved > 0 && self.soft_drop {
            self.score.add_score_by_drop(moved as u32, DropKind::Soft);
        }
        self.note_piece_settled(false);
    }

    fn advance_lock_delay(&mut self) {
        if !self.is_grounded {
            return;
        }
        self.lock_delay_frames += 1;
        if self.lock_delay_frames >= self.config.lock_delay_frames {
            self.lock_active();
        }
    }

    /// Hard drop: maximum legal descent in one step, then immediate lock.
    fn hard_drop(&mut self) {
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        let units = piece.hard_drop_units(&self.grid);
        piece.move_down(&self.grid, units);
        self.score.add_score_by_drop(units as u32, DropKind::Hard);
        self.lock_active();
    }

    /// Transfer the active piece to the grid, clear lines, settle scoring.
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        // Snapshot before the grid mutates under the piece.
        let technical = piece.prev_move_technical();
        self.grid.lock_piece(&piece);

        if piece.lowest_row() >= self.grid.visible_rows() as i8 {
            self.over = Some(GameOverCause::LockOut);
            self.last_lock = Some(LockEvent {
                lines_cleared: 0,
                technical,
                points: 0,
                perfect: false,
            });
            return;
        }

        // Full rows among the rows the piece occupied, highest first so a
        // shift never invalidates a pending lower index.
        let mut full_rows: ArrayVec<i8, 4> = ArrayVec::new();
        for row in piece.occupied_rows() {
            if self.grid.row_forms_line(row) {
                full_rows.push(row);
            }
        }
        for &row in full_rows.iter() {
            self.grid.clear_rows(row, row + 1);
            self.grid.shift_rows_down(row, 1);
        }

        let lines = full_rows.len();
        let perfect = lines > 0 && self.grid.is_empty();
        let result = self
            .score
            .add_score_by_lock(self.progress.level(), lines, technical, perfect);

        if let Some(change) = self.progress.add_lines_cleared(lines as u32) {
            self.auto_drop_target = gravity_frames_per_cell(change.new_level);
        }

        self.last_lock = Some(LockEvent {
            lines_cleared: lines as u32,
            technical,
            points: result.total,
            perfect,
        });
        self.reset_piece_timing();
    }

    fn reset_piece_timing(&mut self) {
        self.auto_drop_frames = 0.0;
        self.lock_delay_frames = 0;
        self.is_grounded = false;
        self.has_grounded = false;
        self.grounded_moves = 0;
        self.lowest_grounded_row = i8::MAX;
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

/// Whether a held button fires this frame: on the press frame, and again on
/// every frame once the hold reaches its repeat threshold.
fn fires(held_frames: u32, repeat_from: u32) -> bool {
    held_frames == 1 || (held_frames >= repeat_from && repeat_from > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::queue::{BagQueue, ScriptedQueue};

    fn game_with(kinds: Vec<ShapeKind>) -> Game {
        Game::new(
            GameConfig::default(),
            Box::new(ScriptedQueue::new(kinds)),
        )
    }

    fn tick_idle(game: &mut Game, frames: u32) {
        let frame = InputFrame::new();
        for _ in 0..frames {
            game.tick(&frame);
        }
    }

    fn press_once(game: &mut Game, button: Button) {
        let mut frame = InputFrame::new();
        frame.press(button, 1);
        game.tick(&frame);
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut game = game_with(vec![ShapeKind::T]);
        assert!(game.active().is_none());

        tick_idle(&mut game, 1);
        assert!(game.active().is_some());
        assert_eq!(game.active().unwrap().kind(), ShapeKind::T);
    }

    #[test]
    fn test_gravity_moves_piece_down() {
        let mut game = game_with(vec![ShapeKind::T]);
        tick_idle(&mut game, 1);
        let start = game.active().unwrap().pivot().row;

        // Level 1 gravity is 60 frames per cell.
        tick_idle(&mut game, 60);
        assert_eq!(game.active().unwrap().pivot().row, start - 1);
    }

    #[test]
    fn test_soft_drop_divides_gravity() {
        let mut game = game_with(vec![ShapeKind::T]);
        tick_idle(&mut game, 1);
        let start = game.active().unwrap().pivot().row;

        let mut frame = InputFrame::new();
        for i in 0..6 {
            frame.press(Button::SoftDrop, i + 1);
            game.tick(&frame);
        }
        // 60 / 20 = 3 frames per cell: 6 frames move two cells.
        assert_eq!(game.active().unwrap().pivot().row, start - 2);
        // Soft drop pays one point per cell.
        assert_eq!(game.stats().score, 2);
    }

    #[test]
    fn test_move_repeat_thresholds() {
        let mut game = game_with(vec![ShapeKind::T]);
        tick_idle(&mut game, 1);
        let start_col = game.active().unwrap().pivot().col;

        let mut frame = InputFrame::new();
        // Press frame fires.
        frame.press(Button::MoveLeft, 1);
        game.tick(&frame);
        assert_eq!(game.active().unwrap().pivot().col, start_col - 1);

        // Held below the threshold: no repeat.
        frame.press(Button::MoveLeft, 2);
        game.tick(&frame);
        assert_eq!(game.active().unwrap().pivot().col, start_col - 1);

        // At the threshold: repeats every frame.
        frame.press(Button::MoveLeft, LEFT_REPEAT_FRAME);
        game.tick(&frame);
        assert_eq!(game.active().unwrap().pivot().col, start_col - 2);
    }

    #[test]
    fn test_hard_drop_locks_immediately() {
        let mut game = game_with(vec![ShapeKind::O, ShapeKind::T]);
        tick_idle(&mut game, 1);

        press_once(&mut game, Button::HardDrop);

        let event = game.take_last_lock().expect("hard drop must lock");
        assert_eq!(event.lines_cleared, 0);
        // Hard drop pays two points per cell descended.
        assert!(game.stats().score > 0);
        // Locked blocks are in the grid now.
        assert!(game.grid().num_cells_occupied() >= 4);
    }

    #[test]
    fn test_lock_clears_completed_lines() {
        let mut game = game_with(vec![ShapeKind::O, ShapeKind::T]);
        tick_idle(&mut game, 1);

        // Fill rows 0 and 1 except the two columns the O will land in.
        let cols = [game.active().unwrap().blocks()[0].col, game.active().unwrap().blocks()[1].col];
        for row in 0..2 {
            for col in 0..GRID_COLUMNS as i8 {
                if !cols.contains(&col) {
                    game.grid_mut()
                        .add_block(Coord::new(col, row), Block::new(ShapeKind::I));
                }
            }
        }

        press_once(&mut game, Button::HardDrop);

        let event = game.take_last_lock().unwrap();
        assert_eq!(event.lines_cleared, 2);
        assert_eq!(game.stats().lines, 2);
        // The double clear emptied the grid: perfect clear.
        assert!(event.perfect);
        assert!(game.grid().is_empty());
    }

    fn ride_to_ground(game: &mut Game) {
        while game.active().map(|p| p.can_fall(game.grid())) == Some(true) {
            tick_idle(game, 1);
        }
    }

    #[test]
    fn test_lock_delay_expires_into_lock() {
        let mut game = game_with(vec![ShapeKind::O, ShapeKind::T]);
        tick_idle(&mut game, 1);

        // Ride the piece to the floor.
        ride_to_ground(&mut game);

        // Grounded now; the delay has to run out before the lock.
        let before = game.grid().num_cells_occupied();
        tick_idle(&mut game, LOCK_DELAY_FRAMES + 1);
        assert!(game.grid().num_cells_occupied() > before);
    }

    #[test]
    fn test_controlled_move_resets_lock_delay() {
        let mut config = GameConfig::default();
        config.lock_delay_frames = 10;
        let mut game = Game::new(
            config,
            Box::new(ScriptedQueue::new(vec![ShapeKind::O, ShapeKind::T])),
        );
        tick_idle(&mut game, 1);
        ride_to_ground(&mut game);

        // Keep nudging before the delay expires; the piece must stay live.
        for i in 0..5 {
            let mut frame = InputFrame::new();
            frame.press(
                if i % 2 == 0 {
                    Button::MoveLeft
                } else {
                    Button::MoveRight
                },
                1,
            );
            for _ in 0..8 {
                game.tick(&frame);
                frame = InputFrame::new();
            }
            assert!(game.active().is_some(), "nudge {} should keep the piece", i);
        }
    }

    #[test]
    fn test_grounded_move_limit_forces_lock() {
        let mut config = GameConfig::default();
        config.grounded_move_limit = 3;
        let mut game = Game::new(
            config,
            Box::new(ScriptedQueue::new(vec![ShapeKind::O, ShapeKind::T])),
        );
        tick_idle(&mut game, 1);
        ride_to_ground(&mut game);

        // Alternate direction every frame; the allowance runs out first.
        let mut frames_used = 0;
        for i in 0..20 {
            if game.active().is_none() {
                break;
            }
            let mut frame = InputFrame::new();
            frame.press(
                if i % 2 == 0 {
                    Button::MoveLeft
                } else {
                    Button::MoveRight
                },
                1,
            );
            game.tick(&frame);
            frames_used += 1;
        }
        assert!(
            frames_used <= 6,
            "limit of 3 should lock well before 20 nudges, took {}",
            frames_used
        );
    }

    #[test]
    fn test_hold_swaps_and_gates() {
        let mut game = game_with(vec![ShapeKind::T, ShapeKind::I, ShapeKind::O]);
        tick_idle(&mut game, 1);
        assert_eq!(game.active().unwrap().kind(), ShapeKind::T);

        press_once(&mut game, Button::Hold);
        assert_eq!(game.held_kind(), Some(ShapeKind::T));
        assert_eq!(game.active().unwrap().kind(), ShapeKind::I);
        assert!(!game.can_hold());

        // Second hold in the same cycle is a no-op.
        press_once(&mut game, Button::Hold);
        assert_eq!(game.held_kind(), Some(ShapeKind::T));
        assert_eq!(game.active().unwrap().kind(), ShapeKind::I);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut game = game_with(vec![ShapeKind::T]);
        tick_idle(&mut game, 1);
        let row = game.active().unwrap().pivot().row;

        press_once(&mut game, Button::Pause);
        assert!(game.paused());

        tick_idle(&mut game, 200);
        assert_eq!(game.active().unwrap().pivot().row, row);

        // Resume continues exactly where it stopped.
        press_once(&mut game, Button::Pause);
        assert!(!game.paused());
        tick_idle(&mut game, 60);
        assert!(game.active().unwrap().pivot().row < row);
    }

    #[test]
    fn test_block_out_ends_the_game() {
        let mut game = game_with(vec![ShapeKind::O]);
        // Fill the entire hidden buffer so nothing can spawn.
        for row in (GRID_ROWS as i8 - 2)..(2 * GRID_ROWS as i8) {
            for col in 0..GRID_COLUMNS as i8 {
                game.grid_mut()
                    .add_block(Coord::new(col, row), Block::new(ShapeKind::I));
            }
        }

        tick_idle(&mut game, 1);
        assert_eq!(game.over(), Some(GameOverCause::BlockOut));

        // Terminal state is inert.
        tick_idle(&mut game, 10);
        assert_eq!(game.over(), Some(GameOverCause::BlockOut));
    }

    #[test]
    fn test_lock_out_ends_the_game() {
        let mut game = game_with(vec![ShapeKind::O, ShapeKind::T]);
        // A platform entirely above the visible area.
        for col in 0..GRID_COLUMNS as i8 {
            game.grid_mut().add_block(
                Coord::new(col, GRID_ROWS as i8),
                Block::new(ShapeKind::I),
            );
        }

        tick_idle(&mut game, 1);
        press_once(&mut game, Button::HardDrop);

        assert_eq!(game.over(), Some(GameOverCause::LockOut));
    }

    #[test]
    fn test_level_up_speeds_gravity() {
        // An endless supply of O pieces dropped into a two-row slot at
        // columns 4 and 5: every drop is a double clear leaving the grid
        // empty, so progression is fully deterministic.
        let mut game = game_with(vec![ShapeKind::O]);
        tick_idle(&mut game, 1);
        let base_target = game.auto_drop_target;

        for _ in 0..10 {
            for row in 0..2 {
                for col in 0..GRID_COLUMNS as i8 {
                    if col != 4 && col != 5 {
                        game.grid_mut()
                            .add_block(Coord::new(col, row), Block::new(ShapeKind::I));
                    }
                }
            }
            press_once(&mut game, Button::HardDrop);
            tick_idle(&mut game, 1);
            assert!(game.over().is_none());
        }

        // 20 lines at 10 per level: level 1 -> 3, with faster gravity.
        assert_eq!(game.stats().lines, 20);
        assert_eq!(game.stats().level, 3);
        assert!(game.auto_drop_target < base_target);
    }

    #[test]
    fn test_preview_and_queue_agree() {
        let mut game = game_with(vec![
            ShapeKind::I,
            ShapeKind::J,
            ShapeKind::L,
            ShapeKind::O,
            ShapeKind::S,
        ]);
        tick_idle(&mut game, 1);
        // I was dealt; J is next.
        assert_eq!(game.preview(1)[0], ShapeKind::J);
    }

    #[test]
    fn test_bag_queue_integration() {
        let mut game = Game::new(GameConfig::default(), Box::new(BagQueue::new(99)));
        tick_idle(&mut game, 1);
        assert!(game.active().is_some());
        assert_eq!(game.preview(3).len(), 3);
    }

    #[test]
    fn test_zero_lock_delay_locks_on_contact() {
        let mut config = GameConfig::default();
        config.lock_delay_frames = 0;
        let mut game = Game::new(
            config,
            Box::new(ScriptedQueue::new(vec![ShapeKind::O, ShapeKind::T])),
        );
        tick_idle(&mut game, 1);

        // Ride gravity all the way down; contact locks with no grace.
        let mut guard = 0;
        while game.take_last_lock().is_none() && guard < 5000 {
            tick_idle(&mut game, 1);
            guard += 1;
        }
        assert!(guard < 5000, "piece should have locked on contact");
    }
}

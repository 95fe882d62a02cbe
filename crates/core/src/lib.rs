//! Core simulation module - pure, deterministic, and testable
//!
//! This crate contains the whole playfield simulation: grid rules, piece
//! movement and rotation, the bag randomizer, spawn/hold handling, scoring,
//! progression and the frame-driven game state machine. It has **zero
//! dependencies** on rendering, input devices, or I/O, making it:
//!
//! - **Deterministic**: same seed and input sequence, same game
//! - **Testable**: every rule has a seam a test can reach
//! - **Portable**: runs in any driver (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`grid`]: cell store with line detection, clearing and shifting
//! - [`block`]: single-cell payload and cell-by-cell movement legality
//! - [`shapes`]: static tetromino tables (layouts, kicks, coupling, colors)
//! - [`piece`]: the rigid active piece; translation, rotation, wall kicks
//! - [`queue`]: 7-bag randomizer behind the [`queue::PieceQueue`] seam
//! - [`spawner`]: spawn retries and the hold slot
//! - [`score`]: combo/back-to-back scoring judge
//! - [`progress`]: level progression and the gravity curve
//! - [`game`]: the per-frame state machine tying it all together
//! - [`snapshot`]: serializable renderer-facing view
//!
//! # Game Rules
//!
//! Modern guideline behavior: 7-bag randomizer, SRS-style wall kicks,
//! frame-counted lock delay with a grounded-move allowance, hold with a
//! once-per-spawn gate, ghost piece, technical-spin detection on the T
//! piece, and back-to-back/combo scoring with perfect-clear bonuses.
//!
//! # Example
//!
//! ```
//! use blockfall_core::{Game, GameConfig, BagQueue};
//! use blockfall_types::{Button, InputFrame};
//!
//! let mut game = Game::new(GameConfig::default(), Box::new(BagQueue::new(12345)));
//!
//! // First tick spawns a piece; held buttons arrive as frame counters.
//! let mut frame = InputFrame::new();
//! game.tick(&frame);
//! assert!(game.active().is_some());
//!
//! frame.press(Button::HardDrop, 1);
//! game.tick(&frame);
//! assert!(game.stats().score > 0);
//! ```

pub mod block;
pub mod game;
pub mod grid;
pub mod piece;
pub mod progress;
pub mod queue;
pub mod score;
pub mod shapes;
pub mod snapshot;
pub mod spawner;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use block::Block;
pub use game::{Game, GameConfig, GameStats, LockEvent};
pub use grid::Grid;
pub use piece::Piece;
pub use progress::{gravity_frames_per_cell, LevelChanged, ProgressionJudge};
pub use queue::{BagQueue, PieceQueue, ScriptedQueue, SimpleRng};
pub use score::{DropKind, LockScore, ScoreJudge};
pub use snapshot::{ActiveSnapshot, GameSnapshot, StatsSnapshot};
pub use spawner::{HoldOutcome, Spawner};

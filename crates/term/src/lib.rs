//! Terminal rendering for the game.
//!
//! [`game_view`] composes a [`blockfall_core::GameSnapshot`] into a colored
//! character grid; [`renderer`] flushes it to the terminal with crossterm.
//! No simulation rules live here.

pub mod game_view;
pub mod renderer;

pub use game_view::{compose, ViewCell};
pub use renderer::TerminalRenderer;

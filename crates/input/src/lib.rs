//! Input module - terminal key events to abstract button frames
//!
//! [`map`] translates crossterm key events into the core's [`Button`]s;
//! [`tracker`] turns those into per-frame held/released state with an
//! auto-release timeout for terminals that never report key releases.
//!
//! [`Button`]: blockfall_types::Button

pub mod map;
pub mod tracker;

pub use map::{button_for_key, should_quit, should_restart};
pub use tracker::ButtonTracker;

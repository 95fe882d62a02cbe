//! Held-button tracking for terminal environments.
//!
//! Terminals usually repeat key-down events and never report releases, so a
//! button counts as held while its key events keep arriving and is
//! auto-released after a short timeout of silence. Each simulation frame the
//! tracker emits an [`InputFrame`] with per-button held-frame counters.

use std::time::Instant;

use blockfall_types::{Button, InputFrame};

// Without key-release events, a short timeout keeps a single tap from
// turning into a sustained hold.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Turns key events into per-frame button state.
#[derive(Debug, Clone)]
pub struct ButtonTracker {
    held_frames: [u32; Button::COUNT],
    pending_release: [bool; Button::COUNT],
    last_seen: [Option<Instant>; Button::COUNT],
    release_timeout_ms: u32,
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self {
            held_frames: [0; Button::COUNT],
            pending_release: [false; Button::COUNT],
            last_seen: [None; Button::COUNT],
            release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.release_timeout_ms = timeout_ms;
        self
    }

    /// Record a key-down (or key-repeat) event for a button.
    pub fn key_down(&mut self, button: Button) {
        self.last_seen[button.index()] = Some(Instant::now());
    }

    /// Record an explicit key-release event, where the terminal has them.
    pub fn key_up(&mut self, button: Button) {
        let i = button.index();
        self.last_seen[i] = None;
        if self.held_frames[i] > 0 {
            self.held_frames[i] = 0;
            self.pending_release[i] = true;
        }
    }

    /// Advance one frame and emit the resulting input state.
    pub fn frame(&mut self) -> InputFrame {
        let mut out = InputFrame::new();
        let now = Instant::now();

        for i in 0..Button::COUNT {
            // Auto-release buttons whose key events stopped arriving.
            if let Some(seen) = self.last_seen[i] {
                let silent_ms = now.duration_since(seen).as_millis() as u32;
                if silent_ms > self.release_timeout_ms {
                    self.last_seen[i] = None;
                    if self.held_frames[i] > 0 {
                        self.held_frames[i] = 0;
                        self.pending_release[i] = true;
                    }
                }
            }

            if self.last_seen[i].is_some() {
                self.held_frames[i] = self.held_frames[i].saturating_add(1);
            }

            out.held[i] = self.held_frames[i];
            out.released[i] = self.pending_release[i];
            self.pending_release[i] = false;
        }

        out
    }

    /// Drop all held state (used on pause screens and game over).
    pub fn reset(&mut self) {
        self.held_frames = [0; Button::COUNT];
        self.pending_release = [false; Button::COUNT];
        self.last_seen = [None; Button::COUNT];
    }
}

impl Default for ButtonTracker {
    fn default() -> Self {
        Self::new()
    }
}

//! Terminal blockfall runner (default binary).
//!
//! Fixed 60 Hz loop: poll terminal input into the button tracker, feed one
//! input frame to the simulation per tick, redraw from the snapshot.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use blockfall::core::{BagQueue, Game, GameConfig, GameSnapshot};
use blockfall::input::{button_for_key, should_quit, should_restart, ButtonTracker};
use blockfall::term::{compose, TerminalRenderer};
use blockfall::types::FRAME_MS;

fn main() -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn new_game() -> Game {
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(1)
        .wrapping_add(std::process::id());
    Game::new(GameConfig::default(), Box::new(BagQueue::new(seed)))
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let mut game = new_game();
    let mut tracker = ButtonTracker::new();
    let mut snapshot = GameSnapshot::default();

    let tick_duration = Duration::from_micros((FRAME_MS * 1000.0) as u64);
    let mut last_tick = Instant::now();

    loop {
        snapshot.capture(&game);
        term.draw(&compose(&snapshot))?;

        // Input with timeout until the next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if game.over().is_some() && should_restart(key) {
                            game = new_game();
                            tracker.reset();
                            continue;
                        }
                        if let Some(button) = button_for_key(key) {
                            tracker.key_down(button);
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(button) = button_for_key(key) {
                            tracker.key_up(button);
                        }
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            let frame = tracker.frame();
            game.tick(&frame);
        }
    }
}

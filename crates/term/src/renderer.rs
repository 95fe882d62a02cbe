//! TerminalRenderer: flushes a composed view to a real terminal.
//!
//! Full redraws per frame, queued into one buffer and flushed once. The
//! 20x10 well is small enough that diffing would buy nothing measurable.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::game_view::{ViewCell, GHOST_COLOR};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Draw a composed frame, top line first.
    pub fn draw(&mut self, lines: &[Vec<ViewCell>]) -> Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;

        let mut current_color: Option<u8> = None;
        for (y, line) in lines.iter().enumerate() {
            self.buf.queue(cursor::MoveTo(0, y as u16))?;
            for cell in line {
                if current_color != Some(cell.color) {
                    self.buf.queue(SetForegroundColor(palette(cell.color)))?;
                    current_color = Some(cell.color);
                }
                self.buf.queue(Print(cell.ch))?;
            }
        }

        self.buf.queue(ResetColor)?;
        self.flush_buf()?;
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Palette id to terminal color. Ids follow the shape order in
/// `blockfall_types::ShapeKind::ALL` (I, J, L, O, S, T, Z).
pub fn palette(color: u8) -> Color {
    match color {
        1 => Color::Cyan,
        2 => Color::Blue,
        3 => Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        4 => Color::Yellow,
        5 => Color::Green,
        6 => Color::Magenta,
        7 => Color::Red,
        GHOST_COLOR => Color::DarkGrey,
        _ => Color::White,
    }
}

//! Game view - composes a snapshot into a colored character grid.
//!
//! Pure presentation: no terminal I/O here, so every layout decision is
//! unit-testable. Each playfield cell is two characters wide; the well is
//! drawn top row first with a side panel for hold, preview and stats.

use blockfall_core::GameSnapshot;
use blockfall_types::ShapeKind;

/// Ghost blocks use this pseudo-palette id (shapes use 1..=7).
pub const GHOST_COLOR: u8 = 8;

/// One character of composed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewCell {
    pub ch: char,
    /// Palette id: 0 text/border, 1..=7 shapes, 8 ghost.
    pub color: u8,
}

impl ViewCell {
    fn text(ch: char) -> Self {
        Self { ch, color: 0 }
    }
}

/// Compose the full frame: bordered well plus side panel, top line first.
pub fn compose(snapshot: &GameSnapshot) -> Vec<Vec<ViewCell>> {
    let cols = snapshot.columns as usize;
    let rows = snapshot.rows as usize;
    let well_width = cols * 2;

    let mut lines: Vec<Vec<ViewCell>> = Vec::with_capacity(rows + 2);

    // Top border.
    let mut top = vec![ViewCell::text('┌')];
    top.extend(std::iter::repeat(ViewCell::text('─')).take(well_width));
    top.push(ViewCell::text('┐'));
    lines.push(top);

    // Interior, highest visible row first.
    for screen_row in 0..rows {
        let grid_row = (rows - 1 - screen_row) as i8;
        let mut line = vec![ViewCell::text('│')];
        for col in 0..cols {
            let (ch, color) = cell_appearance(snapshot, col as i8, grid_row);
            line.push(ViewCell { ch, color });
            line.push(ViewCell { ch, color });
        }
        line.push(ViewCell::text('│'));

        for cell in panel_text(snapshot, screen_row) {
            line.push(cell);
        }
        lines.push(line);
    }

    // Bottom border.
    let mut bottom = vec![ViewCell::text('└')];
    bottom.extend(std::iter::repeat(ViewCell::text('─')).take(well_width));
    bottom.push(ViewCell::text('┘'));
    lines.push(bottom);

    lines
}

/// What one playfield cell looks like: locked < ghost < active.
fn cell_appearance(snapshot: &GameSnapshot, col: i8, row: i8) -> (char, u8) {
    if let Some(active) = &snapshot.active {
        if active.blocks.iter().any(|&(c, r)| c == col && r == row) {
            return ('█', active.kind);
        }
    }
    if let Some(ghost) = &snapshot.ghost {
        if ghost.iter().any(|&(c, r)| c == col && r == row) {
            return ('░', GHOST_COLOR);
        }
    }
    let locked = snapshot.cell(col as u8, row as u8);
    if locked != 0 {
        ('█', locked)
    } else {
        (' ', 0)
    }
}

/// Side-panel text for a given screen row.
fn panel_text(snapshot: &GameSnapshot, screen_row: usize) -> Vec<ViewCell> {
    let stats = &snapshot.stats;
    let text = match screen_row {
        0 => format!("  HOLD  {}", kind_letter(snapshot.hold)),
        1 => format!("  NEXT  {}", preview_letters(snapshot)),
        3 => format!("  SCORE {}", stats.score),
        4 => format!("  LEVEL {}", stats.level),
        5 => format!(
            "  LINES {} ({}/{})",
            stats.lines, stats.quota_current, stats.quota_target
        ),
        6 => {
            if stats.combo > 0 {
                format!("  COMBO x{}", stats.combo)
            } else {
                String::new()
            }
        }
        7 => {
            if stats.back_to_back > 0 {
                format!("  B2B x{}", stats.back_to_back)
            } else {
                String::new()
            }
        }
        9 => {
            if let Some(cause) = &snapshot.over {
                format!("  GAME OVER ({})", cause)
            } else if snapshot.paused {
                "  PAUSED".to_string()
            } else {
                String::new()
            }
        }
        10 => {
            if snapshot.over.is_some() {
                "  r: restart  q: quit".to_string()
            } else {
                String::new()
            }
        }
        _ => String::new(),
    };
    text.chars().map(ViewCell::text).collect()
}

fn kind_letter(palette_id: Option<u8>) -> String {
    match palette_id.and_then(|id| ShapeKind::from_index(id.saturating_sub(1) as usize)) {
        Some(kind) => kind.as_str().to_uppercase(),
        None => "-".to_string(),
    }
}

fn preview_letters(snapshot: &GameSnapshot) -> String {
    snapshot
        .preview
        .iter()
        .map(|&id| kind_letter(Some(id)))
        .collect::<Vec<_>>()
        .join(" ")
}

//! The flat-text save format.
//!
//! ```text
//! W:<width>
//! H:<height>
//! M:<max color>
//! S:<seed>            optional, absent in saves from older builds
//! <payload>           width * height cells as digits, row-major
//! <stage>:<level>     challenge saves only
//! ```
//!
//! Import is lenient where play can continue: cell values above the stored
//! color count are clamped (and counted for the caller to surface), and a
//! missing `S:` line only costs the exact budget replay. Structural damage
//! is rejected as [`GridError::MalformedSave`].

use crate::grid::{Color, Grid, GridError};

/// Position in a challenge run: 1-based stage, 0-based level within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub stage: u32,
    pub level: u32,
}

/// A successfully imported save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveData {
    pub grid: Grid,
    /// Challenge progression marker, when the save carried one.
    pub progress: Option<Progress>,
    /// Cells whose stored value exceeded the color count and were clamped.
    /// Nonzero counts deserve a user-facing warning.
    pub clamped: usize,
}

/// Serialize a board, with the progression trailer for challenge saves.
pub fn export(grid: &Grid, progress: Option<Progress>) -> String {
    let mut out = String::with_capacity(grid.width() * grid.height() + 48);
    out.push_str(&format!("W:{}\n", grid.width()));
    out.push_str(&format!("H:{}\n", grid.height()));
    out.push_str(&format!("M:{}\n", grid.max_color()));
    if let Some(seed) = grid.seed() {
        out.push_str(&format!("S:{seed}\n"));
    }
    for row in grid.rows() {
        for &cell in row {
            out.push((b'0' + cell) as char);
        }
    }
    out.push('\n');
    if let Some(p) = progress {
        out.push_str(&format!("{}:{}\n", p.stage, p.level));
    }
    out
}

/// Parse save text back into a board and its optional progression marker.
pub fn import(text: &str) -> Result<SaveData, GridError> {
    let mut lines = text.lines();

    let width: usize = tagged(lines.next(), "W:")
        .ok_or(GridError::MalformedSave("missing or invalid W: header"))?;
    let height: usize = tagged(lines.next(), "H:")
        .ok_or(GridError::MalformedSave("missing or invalid H: header"))?;
    let max_color: Color = tagged(lines.next(), "M:")
        .ok_or(GridError::MalformedSave("missing or invalid M: header"))?;

    let mut payload = lines
        .next()
        .ok_or(GridError::MalformedSave("missing cell payload"))?;
    let seed = match payload.strip_prefix("S:") {
        Some(rest) => {
            let seed = rest
                .trim()
                .parse()
                .map_err(|_| GridError::MalformedSave("invalid S: header"))?;
            payload = lines
                .next()
                .ok_or(GridError::MalformedSave("missing cell payload"))?;
            Some(seed)
        }
        None => None,
    };

    let expected = width
        .checked_mul(height)
        .ok_or(GridError::MalformedSave("board dimensions overflow"))?;
    let payload = payload.trim_end();
    if payload.len() != expected {
        return Err(GridError::MalformedSave("cell payload length mismatch"));
    }

    let mut clamped = 0;
    let mut cells = Vec::with_capacity(expected);
    for ch in payload.chars() {
        let value = ch
            .to_digit(10)
            .ok_or(GridError::MalformedSave("cell payload contains a non-digit"))?
            as Color;
        if value > max_color {
            clamped += 1;
            cells.push(max_color);
        } else {
            cells.push(value);
        }
    }
    if clamped > 0 {
        log::warn!("{clamped} saved cells exceeded color {max_color} and were clamped");
    }

    let progress = match lines.next() {
        Some(line) if !line.trim().is_empty() => {
            let line = line.trim();
            let (stage, level) = line
                .split_once(':')
                .ok_or(GridError::MalformedSave("invalid stage:level trailer"))?;
            let stage = stage
                .parse()
                .map_err(|_| GridError::MalformedSave("invalid stage:level trailer"))?;
            let level = level
                .parse()
                .map_err(|_| GridError::MalformedSave("invalid stage:level trailer"))?;
            Some(Progress { stage, level })
        }
        _ => None,
    };

    let grid = Grid::from_parts(width, height, max_color, cells, seed)?;
    Ok(SaveData {
        grid,
        progress,
        clamped,
    })
}

fn tagged<T: std::str::FromStr>(line: Option<&str>, tag: &str) -> Option<T> {
    line?.strip_prefix(tag)?.trim().parse().ok()
}

impl Grid {
    /// Standard-mode save text for this board.
    pub fn export(&self) -> String {
        export(self, None)
    }

    /// Parse a save blob into just the board, discarding any progression
    /// marker. [`import`] keeps the full picture.
    pub fn from_export(text: &str) -> Result<Self, GridError> {
        import(text).map(|data| data.grid)
    }
}

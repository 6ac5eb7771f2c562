//! Character-cell canvas that accepts draw commands.
//!
//! One display unit is one cell. Commands are painted in order; later
//! commands blend over earlier ones according to their alpha.

use crate::ascii::{lerp_color, DrawCommand, Pass, Rgba};

/// How strongly a glow pass tints the cell background.
const GLOW_BACKGROUND_STRENGTH: f32 = 0.35;

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    /// Foreground colour (alpha ignored once painted)
    pub fg: Rgba,
    /// Background colour
    pub bg: Rgba,
    /// Strongest glow painted into this cell, 0.0-1.0
    pub glow: f32,
}

impl Cell {
    pub fn blank(bg: Rgba) -> Self {
        Self {
            glyph: ' ',
            fg: Rgba::rgb(0, 0, 0),
            bg,
            glow: 0.0,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.glyph == ' '
    }
}

/// A grid of cells, row-major.
#[derive(Debug, Clone)]
pub struct CellCanvas {
    cells: Vec<Cell>,
    cols: u16,
    rows: u16,
    background: Rgba,
}

impl Default for CellCanvas {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl CellCanvas {
    /// Create a black canvas of `cols` x `rows` cells.
    pub fn new(cols: u16, rows: u16) -> Self {
        let background = Rgba::rgb(0, 0, 0);
        Self {
            cells: vec![Cell::blank(background); cols as usize * rows as usize],
            cols,
            rows,
            background,
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Resize and clear.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::blank(self.background); cols as usize * rows as usize];
    }

    /// Reset every cell to blank background.
    pub fn clear(&mut self) {
        let blank = Cell::blank(self.background);
        self.cells.iter_mut().for_each(|c| *c = blank);
    }

    #[inline]
    fn index(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        self.index(col as i64, row as i64).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        self.index(col as i64, row as i64).map(|i| &mut self.cells[i])
    }

    /// Iterate rows as slices.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols.max(1) as usize)
    }

    /// Paint a batch of commands.
    ///
    /// # Returns
    /// The number of commands that landed on the canvas.
    pub fn apply(&mut self, commands: &[DrawCommand]) -> usize {
        commands.iter().filter(|cmd| self.apply_one(cmd)).count()
    }

    /// Paint one command; commands outside the canvas are ignored.
    pub fn apply_one(&mut self, cmd: &DrawCommand) -> bool {
        if !cmd.x.is_finite() || !cmd.y.is_finite() {
            return false;
        }
        let Some(i) = self.index(cmd.x.floor() as i64, cmd.y.floor() as i64) else {
            return false;
        };
        let alpha = cmd.color.alpha_f32();
        if alpha <= 0.0 {
            return false;
        }

        let cell = &mut self.cells[i];
        match cmd.pass {
            Pass::Base => {
                let fg = cmd.color.with_alpha(255);
                if cell.is_blank() {
                    // Over bare background the alpha simply dims the glyph
                    cell.fg = fg.scaled(alpha);
                    cell.glyph = cmd.glyph;
                } else {
                    cell.fg = lerp_color(cell.fg, fg, alpha);
                    if alpha >= 0.5 {
                        cell.glyph = cmd.glyph;
                    }
                }
                cell.glow = cell.glow.max(cmd.glow.clamp(0.0, 1.0));
            }
            Pass::Glow => {
                let strength = (alpha * GLOW_BACKGROUND_STRENGTH * cmd.scale.max(1.0)).min(1.0);
                cell.bg = lerp_color(cell.bg, cmd.color.with_alpha(255), strength);
                cell.glow = 1.0;
            }
            Pass::Fill => {
                cell.bg = lerp_color(cell.bg, cmd.color.with_alpha(255), alpha);
            }
        }
        true
    }

    /// Blend a whole row toward `color`.
    pub fn tint_row(&mut self, row: u16, color: Rgba, strength: f32) {
        if row >= self.rows {
            return;
        }
        let start = row as usize * self.cols as usize;
        let color = color.with_alpha(255);
        for cell in &mut self.cells[start..start + self.cols as usize] {
            cell.bg = lerp_color(cell.bg, color, strength);
        }
    }

    /// Scale a cell's colours toward black.
    pub fn darken(&mut self, col: u16, row: u16, factor: f32) {
        if let Some(cell) = self.cell_mut(col, row) {
            let keep = 1.0 - factor.clamp(0.0, 1.0);
            cell.fg = cell.fg.scaled(keep);
            cell.bg = cell.bg.scaled(keep);
        }
    }

    /// Write a glyph directly, replacing whatever is there.
    pub fn put(&mut self, col: u16, row: u16, glyph: char, color: Rgba) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.glyph = glyph;
            cell.fg = color.with_alpha(255);
        }
    }

    /// Plain text rendering, rows joined by newlines.
    pub fn to_plain_string(&self) -> String {
        if self.cols == 0 || self.rows == 0 {
            return String::new();
        }
        self.rows_iter()
            .map(|row| row.iter().map(|c| c.glyph).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

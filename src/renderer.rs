//! ANSI output for the cell canvas.
//!
//! The whole canvas is drawn as one string of escape sequences and written
//! in a single call. Colour codes are only emitted when they change from
//! the previous cell.

use std::io::Write;

use crate::ascii::Rgba;
use crate::terminal::{Cell, CellCanvas};

/// How rows are separated in the ANSI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Absolute cursor moves; for drawing to a live terminal
    Positioned,
    /// Plain newlines; for `.ans` files
    Lines,
}

#[derive(Clone, Copy, PartialEq)]
struct Style {
    fg: Rgba,
    bg: Rgba,
    bold: bool,
}

impl Style {
    fn of(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            bold: cell.glow > 0.5,
        }
    }

    fn push(&self, output: &mut String) {
        // Reset first so dropping bold needs no separate code
        output.push_str("\x1b[0");
        if self.bold {
            output.push_str(";1");
        }
        output.push_str(&format!(
            ";38;2;{};{};{};48;2;{};{};{}m",
            self.fg.r, self.fg.g, self.fg.b, self.bg.r, self.bg.g, self.bg.b
        ));
    }
}

/// Build the ANSI string for a canvas.
pub fn canvas_to_ansi(canvas: &CellCanvas, layout: Layout) -> String {
    let mut output = String::with_capacity(canvas.cols() as usize * canvas.rows() as usize * 4);

    if layout == Layout::Positioned {
        output.push_str("\x1b[?25l"); // Hide cursor
    }

    let mut last: Option<Style> = None;
    for (row, cells) in canvas.rows_iter().enumerate().take(canvas.rows() as usize) {
        match layout {
            // 1-based ANSI coordinates
            Layout::Positioned => output.push_str(&format!("\x1b[{};1H", row + 1)),
            Layout::Lines if row > 0 => {
                // Reset before the newline so the background does not bleed
                output.push_str("\x1b[0m\n");
                last = None;
            }
            Layout::Lines => {}
        }

        for cell in cells {
            let style = Style::of(cell);
            if last != Some(style) {
                style.push(&mut output);
                last = Some(style);
            }
            output.push(cell.glyph);
        }
    }

    output.push_str("\x1b[0m");
    if layout == Layout::Lines && canvas.rows() > 0 {
        output.push('\n');
    }
    output
}

/// Draw the canvas to a terminal at the top-left corner.
pub fn render_canvas<W: Write>(out: &mut W, canvas: &CellCanvas) -> std::io::Result<()> {
    let output = canvas_to_ansi(canvas, Layout::Positioned);
    // Write all at once for efficiency
    out.write_all(output.as_bytes())?;
    out.flush()
}

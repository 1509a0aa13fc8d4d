use std::io::{self, Write};

use crossterm::{cursor, queue, style::Print, terminal};

/// Cell size assumed when the terminal does not report its pixel size.
pub const FALLBACK_CELL_WIDTH: u16 = 8;
pub const FALLBACK_CELL_HEIGHT: u16 = 16;

/// Terminal size in cells, with the pixel size of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermDims {
    pub cols: u16,
    pub rows: u16,
    pub cell_w: u16,
    pub cell_h: u16,
}

impl TermDims {
    fn from_window(cols: u16, rows: u16, width_px: u16, height_px: u16) -> Self {
        let (cell_w, cell_h) = if cols == 0 || rows == 0 || width_px == 0 || height_px == 0 {
            (FALLBACK_CELL_WIDTH, FALLBACK_CELL_HEIGHT)
        } else {
            ((width_px / cols).max(1), (height_px / rows).max(1))
        };
        Self {
            cols,
            rows,
            cell_w,
            cell_h,
        }
    }
}

/// Zero-based cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub row: u16,
    pub col: u16,
}

pub fn terminal_dims() -> io::Result<TermDims> {
    match terminal::window_size() {
        Ok(size) => Ok(TermDims::from_window(
            size.columns,
            size.rows,
            size.width,
            size.height,
        )),
        Err(_) => {
            let (cols, rows) = terminal::size()?;
            Ok(TermDims::from_window(cols, rows, 0, 0))
        }
    }
}

pub fn cursor_pos() -> io::Result<CursorPos> {
    let (col, row) = cursor::position()?;
    Ok(CursorPos { row, col })
}

/// Scrolls `rows` blank lines into view below the cursor and returns the
/// cursor to the top of them, so drawing there does not overwrite earlier
/// output.
pub fn reserve_vertical_space<W: Write>(out: &mut W, rows: u16) -> io::Result<()> {
    if rows == 0 {
        return Ok(());
    }
    for _ in 0..rows {
        queue!(out, Print('\n'))?;
    }
    queue!(out, cursor::MoveUp(rows), cursor::MoveToColumn(0))?;
    out.flush()
}

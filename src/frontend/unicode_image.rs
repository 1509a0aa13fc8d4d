use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::error::{Error, Result};
use crate::region::Region;
use crate::unicode_pixel::{Rgb, UnicodePixel};

/// A grid of glyph cells placed at a terminal position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeImage {
    width: u16,
    height: u16,
    col: u16,
    row: u16,
    pixels: Vec<UnicodePixel>,
}

impl UnicodeImage {
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            col: 0,
            row: 0,
            pixels: vec![UnicodePixel::default(); usize::from(width) * usize::from(height)],
        })
    }

    /// Changes the grid size and clears every cell.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        let resized = Self::new(width, height)?;
        self.width = resized.width;
        self.height = resized.height;
        self.pixels = resized.pixels;
        Ok(())
    }

    pub fn set_pos(&mut self, col: u16, row: u16) {
        self.col = col;
        self.row = row;
    }

    pub fn dims(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Top-left terminal cell as `(col, row)`.
    pub fn pos(&self) -> (u16, u16) {
        (self.col, self.row)
    }

    pub fn pixels(&self) -> &[UnicodePixel] {
        &self.pixels
    }

    pub fn read_pixels(&mut self, source: &[UnicodePixel]) -> Result<()> {
        self.check_source(source)?;
        self.pixels.copy_from_slice(source);
        Ok(())
    }

    /// Copies only the cells of `region` from a full-size `source` grid.
    pub fn read_pixels_region(&mut self, source: &[UnicodePixel], region: Region) -> Result<()> {
        self.check_source(source)?;
        self.check_region(region)?;
        let stride = usize::from(self.width);
        for row in region.rows() {
            let start = row * stride + usize::from(region.x);
            let end = start + usize::from(region.width);
            self.pixels[start..end].copy_from_slice(&source[start..end]);
        }
        Ok(())
    }

    pub fn draw<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.draw_cells(out, Region::full(self.width, self.height))
    }

    /// Draws the cells of `region` at their place in the image.
    ///
    /// A region outside the image fails with `InvalidInput` before anything
    /// is written.
    pub fn draw_region<W: Write>(&self, out: &mut W, region: Region) -> io::Result<()> {
        self.check_region(region)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
        self.draw_cells(out, region)
    }

    fn draw_cells<W: Write>(&self, out: &mut W, region: Region) -> io::Result<()> {
        let stride = usize::from(self.width);
        let mut last_bg: Option<Rgb> = None;
        let mut last_fg: Option<Rgb> = None;

        for row in region.rows() {
            let screen_row = self.row.saturating_add(row as u16);
            let screen_col = self.col.saturating_add(region.x);
            queue!(out, MoveTo(screen_col, screen_row))?;

            let start = row * stride + usize::from(region.x);
            let end = start + usize::from(region.width);
            for cell in &self.pixels[start..end] {
                if last_bg != Some(cell.background) {
                    queue!(out, SetBackgroundColor(rgb(cell.background)))?;
                    last_bg = Some(cell.background);
                }
                if last_fg != Some(cell.foreground) {
                    queue!(out, SetForegroundColor(rgb(cell.foreground)))?;
                    last_fg = Some(cell.foreground);
                }
                queue!(out, Print(cell.symbol().unwrap_or(' ')))?;
            }
        }

        queue!(out, ResetColor)?;
        out.flush()
    }

    fn check_source(&self, source: &[UnicodePixel]) -> Result<()> {
        if source.len() != self.pixels.len() {
            return Err(Error::SizeMismatch {
                what: "unicode image source",
                expected: self.pixels.len(),
                actual: source.len(),
            });
        }
        Ok(())
    }

    fn check_region(&self, region: Region) -> Result<()> {
        if !region.fits_within(self.width, self.height) {
            return Err(Error::InvalidRegion {
                region,
                grid_w: self.width,
                grid_h: self.height,
            });
        }
        Ok(())
    }
}

fn rgb([r, g, b]: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

use std::fmt;
use std::ops::Range;

/// A rectangle of the patch grid, in patch units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole `width x height` grid.
    pub const fn full(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// True when the region is non-empty and lies inside a `grid_w x grid_h` grid.
    pub fn fits_within(&self, grid_w: u16, grid_h: u16) -> bool {
        !self.is_empty()
            && u32::from(self.x) + u32::from(self.width) <= u32::from(grid_w)
            && u32::from(self.y) + u32::from(self.height) <= u32::from(grid_h)
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.columns().contains(&usize::from(x)) && self.rows().contains(&usize::from(y))
    }

    pub fn columns(&self) -> Range<usize> {
        let start = usize::from(self.x);
        start..start + usize::from(self.width)
    }

    pub fn rows(&self) -> Range<usize> {
        let start = usize::from(self.y);
        start..start + usize::from(self.height)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

use crate::glyph_data::{PATCH_AREA, PATCH_HEIGHT, PATCH_WIDTH};
use crate::unicode_pixel::Rgb;

const CHANNELS: usize = 3;

/// Read-only view of one `PATCH_WIDTH x PATCH_HEIGHT` block of an RGB surface.
#[derive(Debug, Clone, Copy)]
pub struct PixelPatch<'a> {
    surface: &'a [u8],
    row_stride: usize,
    origin: usize,
}

impl<'a> PixelPatch<'a> {
    /// Views the patch at grid coordinate (`column`, `row`) of a surface that
    /// is `grid_w` patches wide.
    ///
    /// Returns `None` when the patch does not lie inside `surface`.
    pub fn in_surface(surface: &'a [u8], grid_w: usize, column: usize, row: usize) -> Option<Self> {
        if column >= grid_w {
            return None;
        }
        let row_stride = grid_w * PATCH_WIDTH * CHANNELS;
        let origin = row * PATCH_HEIGHT * row_stride + column * PATCH_WIDTH * CHANNELS;
        let last_byte = origin + (PATCH_HEIGHT - 1) * row_stride + PATCH_WIDTH * CHANNELS;
        if last_byte > surface.len() {
            return None;
        }
        Some(Self {
            surface,
            row_stride,
            origin,
        })
    }

    /// Views a tightly packed patch of exactly `PATCH_AREA * 3` bytes.
    pub fn standalone(pixels: &'a [u8]) -> Option<Self> {
        if pixels.len() != PATCH_AREA * CHANNELS {
            return None;
        }
        Some(Self {
            surface: pixels,
            row_stride: PATCH_WIDTH * CHANNELS,
            origin: 0,
        })
    }

    /// The pixel at `(x, y)` of the patch, `None` outside `PATCH_WIDTH x PATCH_HEIGHT`.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < PATCH_WIDTH && y < PATCH_HEIGHT).then(|| self.pixel(x, y))
    }

    /// Unchecked within the patch; callers keep `x` and `y` in range.
    pub(crate) fn pixel(&self, x: usize, y: usize) -> Rgb {
        let at = self.origin + y * self.row_stride + x * CHANNELS;
        [self.surface[at], self.surface[at + 1], self.surface[at + 2]]
    }

    /// Pixels in row-major order, matching glyph mask bit order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        (0..PATCH_HEIGHT).flat_map(move |y| (0..PATCH_WIDTH).map(move |x| self.pixel(x, y)))
    }
}

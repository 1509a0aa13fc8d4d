use bytemuck::{Pod, Zeroable};
use serde::Serialize;

pub type Rgb = [u8; 3];

/// One output cell: a glyph codepoint drawn in `foreground` over `background`.
///
/// 12 bytes, 4-byte aligned, no implicit padding; output surfaces can be
/// handed out as raw bytes with [`bytemuck::cast_slice`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize)]
pub struct UnicodePixel {
    pub background: Rgb,
    pub foreground: Rgb,
    #[serde(skip)]
    _pad: u16,
    pub codepoint: u32,
}

impl UnicodePixel {
    pub const fn new(background: Rgb, foreground: Rgb, codepoint: u32) -> Self {
        Self {
            background,
            foreground,
            _pad: 0,
            codepoint,
        }
    }

    /// The glyph as a `char`, or `None` for a default-initialized cell or a
    /// codepoint that is not a scalar value.
    pub fn symbol(&self) -> Option<char> {
        if self.codepoint == 0 {
            return None;
        }
        char::from_u32(self.codepoint)
    }
}

pub fn as_bytes(pixels: &[UnicodePixel]) -> &[u8] {
    bytemuck::cast_slice(pixels)
}

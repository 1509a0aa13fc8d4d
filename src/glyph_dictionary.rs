use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::glyph_data::{
    MaskBits, EMPTY_MASK, FULL_MASK, GLYPH_TABLE, PATCH_AREA, PATCH_HEIGHT, PATCH_WIDTH,
};

/// Width of every patch and glyph mask, in pixels.
pub const fn patch_width() -> u8 {
    PATCH_WIDTH as u8
}

/// Height of every patch and glyph mask, in pixels.
pub const fn patch_height() -> u8 {
    PATCH_HEIGHT as u8
}

/// Coverage bitmap of a glyph over one patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphMask(MaskBits);

impl GlyphMask {
    pub const EMPTY: Self = Self(EMPTY_MASK);
    pub const FULL: Self = Self(FULL_MASK);

    pub const fn from_bits(bits: MaskBits) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> MaskBits {
        self.0
    }

    /// Whether the pixel at row-major index `index` is inked.
    pub const fn covers_index(self, index: usize) -> bool {
        index < PATCH_AREA && (self.0 >> index) & 1 == 1
    }

    pub const fn covers(self, x: usize, y: usize) -> bool {
        x < PATCH_WIDTH && y < PATCH_HEIGHT && self.covers_index(y * PATCH_WIDTH + x)
    }

    pub const fn covered_count(self) -> u32 {
        self.0.count_ones()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphEntry {
    pub codepoint: u32,
    pub mask: GlyphMask,
}

impl GlyphEntry {
    pub const fn new(codepoint: u32, mask: GlyphMask) -> Self {
        Self { codepoint, mask }
    }

    pub fn symbol(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }
}

const fn build_entries() -> [GlyphEntry; GLYPH_TABLE.len()] {
    let mut entries = [GlyphEntry::new(0, GlyphMask::EMPTY); GLYPH_TABLE.len()];
    let mut i = 0;
    while i < GLYPH_TABLE.len() {
        let (codepoint, bits) = GLYPH_TABLE[i];
        entries[i] = GlyphEntry::new(codepoint, GlyphMask::from_bits(bits));
        i += 1;
    }
    entries
}

static STANDARD_ENTRIES: [GlyphEntry; GLYPH_TABLE.len()] = build_entries();
static STANDARD: GlyphDictionary = GlyphDictionary::new(&STANDARD_ENTRIES);

/// Ordered, immutable set of candidate glyphs.
///
/// Dictionaries are `'static` data: the matcher iterates entries in order and
/// keeps the first one on ties, so the order is part of the output contract.
#[derive(Debug)]
pub struct GlyphDictionary {
    entries: &'static [GlyphEntry],
}

impl GlyphDictionary {
    /// Panics (at compile time when used in a `static`) on an empty table.
    pub const fn new(entries: &'static [GlyphEntry]) -> Self {
        assert!(!entries.is_empty(), "glyph dictionary must not be empty");
        Self { entries }
    }

    /// Unicode block elements: full block, space, eighth blocks, halves and quadrants.
    pub fn standard() -> &'static GlyphDictionary {
        &STANDARD
    }

    pub fn lookup_all(&self) -> &'static [GlyphEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, codepoint: u32) -> Option<&'static GlyphEntry> {
        self.entries.iter().find(|entry| entry.codepoint == codepoint)
    }

    /// The first entry, which wins every tie against later ones.
    pub(crate) fn first(&self) -> &'static GlyphEntry {
        &self.entries[0]
    }

    /// Checks the invariants the matcher relies on: both degenerate masks are
    /// present, codepoints are unique scalar values and masks stay inside the
    /// patch.
    pub fn validate(&self) -> Result<()> {
        if !self.entries.iter().any(|entry| entry.mask == GlyphMask::EMPTY) {
            return Err(Error::Config(
                "glyph dictionary lacks the empty mask".to_owned(),
            ));
        }
        if !self.entries.iter().any(|entry| entry.mask == GlyphMask::FULL) {
            return Err(Error::Config(
                "glyph dictionary lacks the fully covered mask".to_owned(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in self.entries {
            if entry.symbol().is_none() {
                return Err(Error::Config(format!(
                    "glyph codepoint {:#x} is not a unicode scalar value",
                    entry.codepoint
                )));
            }
            if entry.mask.bits() & !FULL_MASK != 0 {
                return Err(Error::Config(format!(
                    "glyph {:#x} mask exceeds the {}x{} patch",
                    entry.codepoint, PATCH_WIDTH, PATCH_HEIGHT
                )));
            }
            if !seen.insert(entry.codepoint) {
                return Err(Error::Config(format!(
                    "duplicate glyph codepoint {:#x}",
                    entry.codepoint
                )));
            }
        }
        Ok(())
    }
}

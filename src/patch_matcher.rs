//! Least-squares glyph fitting for a single patch.
//!
//! For every dictionary entry the patch is split by the entry's mask into
//! covered and uncovered pixels; each class is represented by its mean color
//! and the entry is scored by the total squared RGB error of that two-color
//! reconstruction. The lowest score wins and ties keep the earlier entry, so
//! the result depends only on the patch pixels and the dictionary order.

use crate::glyph_data::PATCH_AREA;
use crate::glyph_dictionary::{GlyphDictionary, GlyphEntry};
use crate::patch::PixelPatch;
use crate::unicode_pixel::{Rgb, UnicodePixel};

/// Winning glyph and its reconstruction error (sum of squared channel deltas).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchMatch {
    pub pixel: UnicodePixel,
    pub error: u64,
}

pub fn match_patch(patch: &PixelPatch<'_>, dictionary: &GlyphDictionary) -> PatchMatch {
    let mut pixels = [[0u8; 3]; PATCH_AREA];
    let mut total = ClassSums::default();
    for (slot, px) in pixels.iter_mut().zip(patch.pixels()) {
        *slot = px;
        total.add(px);
    }
    let global_mean = total.mean().unwrap_or_default();

    let mut best = fit(dictionary.first(), &pixels, &total, global_mean);
    for entry in &dictionary.lookup_all()[1..] {
        let candidate = fit(entry, &pixels, &total, global_mean);
        if candidate.error < best.error {
            best = candidate;
        }
    }
    best
}

fn fit(
    entry: &GlyphEntry,
    pixels: &[Rgb; PATCH_AREA],
    total: &ClassSums,
    global_mean: Rgb,
) -> PatchMatch {
    let mut covered = ClassSums::default();
    let mut bits = entry.mask.bits();
    while bits != 0 {
        covered.add(pixels[bits.trailing_zeros() as usize]);
        bits &= bits - 1;
    }
    let uncovered = total.without(&covered);

    let foreground = covered.mean().unwrap_or(global_mean);
    let background = uncovered.mean().unwrap_or(global_mean);
    let error = covered.squared_error(foreground) + uncovered.squared_error(background);

    PatchMatch {
        pixel: UnicodePixel::new(background, foreground, entry.codepoint),
        error,
    }
}

/// Per-channel sums and sums of squares over one pixel class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ClassSums {
    count: u64,
    sum: [u64; 3],
    sum_sq: [u64; 3],
}

impl ClassSums {
    fn add(&mut self, px: Rgb) {
        self.count += 1;
        for (channel, value) in px.iter().enumerate() {
            let value = u64::from(*value);
            self.sum[channel] += value;
            self.sum_sq[channel] += value * value;
        }
    }

    fn without(&self, part: &ClassSums) -> ClassSums {
        let mut rest = *self;
        rest.count -= part.count;
        for channel in 0..3 {
            rest.sum[channel] -= part.sum[channel];
            rest.sum_sq[channel] -= part.sum_sq[channel];
        }
        rest
    }

    /// Mean color rounded half up, `None` for an empty class.
    fn mean(&self) -> Option<Rgb> {
        if self.count == 0 {
            return None;
        }
        let half = self.count / 2;
        let mut mean = [0u8; 3];
        for (channel, slot) in mean.iter_mut().enumerate() {
            *slot = ((self.sum[channel] + half) / self.count) as u8;
        }
        Some(mean)
    }

    /// `sum((p - m)^2)` over the class, expanded as `Q - 2mS + n m^2`.
    fn squared_error(&self, color: Rgb) -> u64 {
        let n = self.count as i64;
        (0..3)
            .map(|channel| {
                let m = i64::from(color[channel]);
                let s = self.sum[channel] as i64;
                let q = self.sum_sq[channel] as i64;
                (q - 2 * m * s + n * m * m) as u64
            })
            .sum()
    }
}

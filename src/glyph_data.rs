//! Static glyph table: Unicode block elements and their coverage masks.
//!
//! Masks are row-major over a `PATCH_WIDTH x PATCH_HEIGHT` patch, one bit per
//! pixel, bit index `y * PATCH_WIDTH + x`.

pub const PATCH_WIDTH: usize = 4;
pub const PATCH_HEIGHT: usize = 8;
pub const PATCH_AREA: usize = PATCH_WIDTH * PATCH_HEIGHT;

pub type MaskBits = u32;

const _: () = assert!(PATCH_AREA <= MaskBits::BITS as usize);
const _: () = assert!(PATCH_WIDTH % 4 == 0 && PATCH_HEIGHT % 8 == 0);

pub const FULL_MASK: MaskBits = rect(0, 0, PATCH_WIDTH, PATCH_HEIGHT);
pub const EMPTY_MASK: MaskBits = 0;

const HALF_W: usize = PATCH_WIDTH / 2;
const HALF_H: usize = PATCH_HEIGHT / 2;
const EIGHTH_H: usize = PATCH_HEIGHT / 8;
const QUARTER_W: usize = PATCH_WIDTH / 4;

/// Covers the half-open pixel rectangle `[x0, x1) x [y0, y1)`.
pub const fn rect(x0: usize, y0: usize, x1: usize, y1: usize) -> MaskBits {
    let mut mask = 0;
    let mut y = y0;
    while y < y1 {
        let mut x = x0;
        while x < x1 {
            mask |= 1 << (y * PATCH_WIDTH + x);
            x += 1;
        }
        y += 1;
    }
    mask
}

const fn lower_eighths(n: usize) -> MaskBits {
    rect(0, PATCH_HEIGHT - n * EIGHTH_H, PATCH_WIDTH, PATCH_HEIGHT)
}

const UPPER_LEFT: MaskBits = rect(0, 0, HALF_W, HALF_H);
const UPPER_RIGHT: MaskBits = rect(HALF_W, 0, PATCH_WIDTH, HALF_H);
const LOWER_LEFT: MaskBits = rect(0, HALF_H, HALF_W, PATCH_HEIGHT);
const LOWER_RIGHT: MaskBits = rect(HALF_W, HALF_H, PATCH_WIDTH, PATCH_HEIGHT);

/// `(codepoint, mask)` in matching order. Ties resolve to the earlier row,
/// and the full block leads so that solid patches resolve to it.
#[rustfmt::skip]
pub const GLYPH_TABLE: [(u32, MaskBits); 25] = [
    (0x2588, FULL_MASK),                                 // █ full block
    (0x0020, EMPTY_MASK),                                // space
    (0x2581, lower_eighths(1)),                          // ▁
    (0x2582, lower_eighths(2)),                          // ▂
    (0x2583, lower_eighths(3)),                          // ▃
    (0x2584, lower_eighths(4)),                          // ▄
    (0x2585, lower_eighths(5)),                          // ▅
    (0x2586, lower_eighths(6)),                          // ▆
    (0x2587, lower_eighths(7)),                          // ▇
    (0x2580, rect(0, 0, PATCH_WIDTH, HALF_H)),           // ▀ upper half
    (0x2594, rect(0, 0, PATCH_WIDTH, EIGHTH_H)),         // ▔ upper one eighth
    (0x258E, rect(0, 0, QUARTER_W, PATCH_HEIGHT)),       // ▎ left one quarter
    (0x258C, rect(0, 0, HALF_W, PATCH_HEIGHT)),          // ▌ left half
    (0x258A, rect(0, 0, 3 * QUARTER_W, PATCH_HEIGHT)),   // ▊ left three quarters
    (0x2590, rect(HALF_W, 0, PATCH_WIDTH, PATCH_HEIGHT)),// ▐ right half
    (0x2596, LOWER_LEFT),                                // ▖
    (0x2597, LOWER_RIGHT),                               // ▗
    (0x2598, UPPER_LEFT),                                // ▘
    (0x2599, UPPER_LEFT | LOWER_LEFT | LOWER_RIGHT),     // ▙
    (0x259A, UPPER_LEFT | LOWER_RIGHT),                  // ▚
    (0x259B, UPPER_LEFT | UPPER_RIGHT | LOWER_LEFT),     // ▛
    (0x259C, UPPER_LEFT | UPPER_RIGHT | LOWER_RIGHT),    // ▜
    (0x259D, UPPER_RIGHT),                               // ▝
    (0x259E, UPPER_RIGHT | LOWER_LEFT),                  // ▞
    (0x259F, UPPER_RIGHT | LOWER_LEFT | LOWER_RIGHT),    // ▟
];

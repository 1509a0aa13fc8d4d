//! Experimental terminal output for match results.
//!
//! Colors are emitted as 24-bit escapes, so the terminal needs truecolor
//! support to show them faithfully.

pub mod terminal;
pub mod unicode_image;

pub use terminal::{cursor_pos, reserve_vertical_space, terminal_dims, CursorPos, TermDims};
pub use unicode_image::UnicodeImage;

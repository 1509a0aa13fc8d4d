//! Approximates RGB images with grids of Unicode block glyphs.
//!
//! Each glyph cell covers a fixed `4x8` pixel patch. A [`Context`] owns a
//! worker pool and a bounded set of [`RenderPipeline`]s; executing a pipeline
//! matches every patch of its input surface against the glyph dictionary and
//! writes one [`UnicodePixel`] (glyph plus two colors) per cell.
//!
//! ```no_run
//! use fidelitty::{Context, UnicodePixel};
//!
//! # fn main() -> fidelitty::Result<()> {
//! let mut context = Context::new(1)?;
//! let handle = context.create_render_pipeline(80, 24)?;
//! context.pipeline_mut(handle)?.input_surface_mut()?.fill(128);
//! context.execute_all(handle)?;
//! context.wait(handle)?;
//! let cells: &[UnicodePixel] = context.pipeline(handle)?.output_surface()?;
//! assert_eq!(cells.len(), 80 * 24);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
#[cfg(feature = "frontend")]
pub mod frontend;
pub mod glyph_data;
pub mod glyph_dictionary;
pub mod patch;
pub mod patch_matcher;
pub mod region;
pub mod render_pipeline;
pub mod sampling;
pub mod unicode_pixel;

pub use config::ContextConfig;
pub use context::{Context, PipelineHandle};
pub use error::{Error, Result};
pub use glyph_dictionary::{patch_height, patch_width, GlyphDictionary, GlyphEntry, GlyphMask};
pub use patch::PixelPatch;
pub use patch_matcher::{match_patch, PatchMatch};
pub use region::Region;
pub use render_pipeline::{PipelineState, RenderPipeline};
pub use sampling::resample_nearest;
pub use unicode_pixel::{Rgb, UnicodePixel};

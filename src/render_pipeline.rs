use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::glyph_data::{PATCH_HEIGHT, PATCH_WIDTH};
use crate::glyph_dictionary::GlyphDictionary;
use crate::patch::PixelPatch;
use crate::patch_matcher::match_patch;
use crate::region::Region;
use crate::sampling::resample_nearest;
use crate::unicode_pixel::UnicodePixel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    Executing,
    Error,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Executing => "executing",
            Self::Error => "in error",
        };
        f.write_str(label)
    }
}

struct Surfaces {
    input: Vec<u8>,
    output: Vec<UnicodePixel>,
}

impl Surfaces {
    fn allocate(grid_w: u16, grid_h: u16) -> Result<Self> {
        let (width_px, height_px) = pixel_dims_for(grid_w, grid_h);
        let input_len = width_px
            .checked_mul(height_px)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or(Error::Allocation {
                what: "input surface",
                bytes: usize::MAX,
            })?;
        let output_len = usize::from(grid_w) * usize::from(grid_h);

        Ok(Self {
            input: try_filled(input_len, 0u8, "input surface")?,
            output: try_filled(output_len, UnicodePixel::default(), "output surface")?,
        })
    }
}

fn try_filled<T: Clone>(len: usize, value: T, what: &'static str) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| Error::allocation::<T>(what, len))?;
    buffer.resize(len, value);
    Ok(buffer)
}

fn pixel_dims_for(grid_w: u16, grid_h: u16) -> (usize, usize) {
    (
        usize::from(grid_w) * PATCH_WIDTH,
        usize::from(grid_h) * PATCH_HEIGHT,
    )
}

/// What a finished job hands back to its pipeline.
struct JobOutcome {
    surfaces: Surfaces,
    result: std::result::Result<(), String>,
}

/// A patch grid with its input pixel surface and output glyph surface.
///
/// Pipelines are created, executed, resized and destroyed through the
/// [`Context`](crate::Context) that owns them. While an execution is in
/// flight the surfaces belong to the worker pool and every surface accessor
/// fails with [`Error::InvalidState`].
pub struct RenderPipeline {
    grid_w: u16,
    grid_h: u16,
    state: PipelineState,
    surfaces: Option<Surfaces>,
    job: Option<mpsc::Receiver<JobOutcome>>,
    failure: Option<String>,
}

impl fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("grid_w", &self.grid_w)
            .field("grid_h", &self.grid_h)
            .field("state", &self.state)
            .field("failure", &self.failure)
            .finish()
    }
}

impl RenderPipeline {
    pub(crate) fn new(grid_w: u16, grid_h: u16) -> Result<Self> {
        check_dims(grid_w, grid_h)?;
        let surfaces = Surfaces::allocate(grid_w, grid_h)?;
        Ok(Self {
            grid_w,
            grid_h,
            state: PipelineState::Idle,
            surfaces: Some(surfaces),
            job: None,
            failure: None,
        })
    }

    /// Grid dimensions in patches.
    pub fn dims(&self) -> (u16, u16) {
        (self.grid_w, self.grid_h)
    }

    /// Input surface dimensions in pixels.
    pub fn pixel_dims(&self) -> (usize, usize) {
        pixel_dims_for(self.grid_w, self.grid_h)
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Row-major RGB bytes, `pixel_dims().0 * pixel_dims().1 * 3` long.
    pub fn input_surface(&self) -> Result<&[u8]> {
        self.surfaces("read input surface")
            .map(|surfaces| surfaces.input.as_slice())
    }

    pub fn input_surface_mut(&mut self) -> Result<&mut [u8]> {
        self.surfaces_mut("write input surface")
            .map(|surfaces| surfaces.input.as_mut_slice())
    }

    /// Row-major match results, `grid_w * grid_h` long.
    ///
    /// Cells never covered by a completed execution hold
    /// `UnicodePixel::default()`.
    pub fn output_surface(&self) -> Result<&[UnicodePixel]> {
        self.surfaces("read output surface")
            .map(|surfaces| surfaces.output.as_slice())
    }

    /// Fills the input surface from an arbitrary-size RGB image using
    /// nearest-neighbor sampling.
    pub fn sample_from(&mut self, source: &[u8], source_w: usize, source_h: usize) -> Result<()> {
        let (width_px, height_px) = self.pixel_dims();
        let input = self.input_surface_mut()?;
        resample_nearest(source, source_w, source_h, input, width_px, height_px)
    }

    fn surfaces(&self, operation: &'static str) -> Result<&Surfaces> {
        if self.state == PipelineState::Executing {
            return Err(Error::invalid_state(self.state, operation));
        }
        self.surfaces
            .as_ref()
            .ok_or(Error::invalid_state(self.state, operation))
    }

    fn surfaces_mut(&mut self, operation: &'static str) -> Result<&mut Surfaces> {
        if self.state == PipelineState::Executing {
            return Err(Error::invalid_state(self.state, operation));
        }
        let state = self.state;
        self.surfaces
            .as_mut()
            .ok_or(Error::invalid_state(state, operation))
    }

    /// Moves the surfaces into a job on `pool` that matches every patch of
    /// `region`. Returns as soon as the job is queued.
    pub(crate) fn dispatch(
        &mut self,
        pool: &rayon::ThreadPool,
        dictionary: &'static GlyphDictionary,
        region: Region,
    ) -> Result<()> {
        if self.state != PipelineState::Idle {
            return Err(Error::invalid_state(self.state, "execute"));
        }
        if !region.fits_within(self.grid_w, self.grid_h) {
            return Err(Error::InvalidRegion {
                region,
                grid_w: self.grid_w,
                grid_h: self.grid_h,
            });
        }
        let mut surfaces = self
            .surfaces
            .take()
            .ok_or(Error::invalid_state(self.state, "execute"))?;

        let grid_w = usize::from(self.grid_w);
        let (sender, receiver) = mpsc::sync_channel(1);
        trace!("dispatching region {region} of {}x{} grid", self.grid_w, self.grid_h);

        pool.spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                match_region(&mut surfaces, grid_w, region, dictionary);
            }))
            .map_err(|payload| panic_message(&*payload));
            // The receiver is gone only if the pipeline was dropped without waiting.
            let _ = sender.send(JobOutcome { surfaces, result });
        });

        self.job = Some(receiver);
        self.state = PipelineState::Executing;
        Ok(())
    }

    /// Blocks until the in-flight job, if any, hands the surfaces back.
    pub(crate) fn wait(&mut self) -> Result<()> {
        let Some(receiver) = self.job.take() else {
            return match &self.failure {
                Some(reason) => Err(Error::ExecutionFailed(reason.clone())),
                None => Ok(()),
            };
        };

        match receiver.recv() {
            Ok(JobOutcome { surfaces, result }) => {
                self.surfaces = Some(surfaces);
                match result {
                    Ok(()) => {
                        self.state = PipelineState::Idle;
                        Ok(())
                    }
                    Err(reason) => self.fail(reason),
                }
            }
            Err(_) => {
                // The job vanished together with the surfaces it owned.
                self.surfaces = Surfaces::allocate(self.grid_w, self.grid_h).ok();
                self.fail("worker dropped the job before completion".to_owned())
            }
        }
    }

    fn fail(&mut self, reason: String) -> Result<()> {
        warn!(
            "{}x{} pipeline execution failed: {reason}",
            self.grid_w, self.grid_h
        );
        self.state = PipelineState::Error;
        self.failure = Some(reason.clone());
        Err(Error::ExecutionFailed(reason))
    }

    /// Reallocates both surfaces for a new grid size. Prior output is
    /// discarded and the pipeline returns to `Idle`, also from `Error`.
    pub(crate) fn resize(&mut self, grid_w: u16, grid_h: u16) -> Result<()> {
        if self.state == PipelineState::Executing {
            return Err(Error::invalid_state(self.state, "resize"));
        }
        check_dims(grid_w, grid_h)?;
        let surfaces = Surfaces::allocate(grid_w, grid_h)?;

        debug!(
            "resized pipeline {}x{} -> {}x{}",
            self.grid_w, self.grid_h, grid_w, grid_h
        );
        self.grid_w = grid_w;
        self.grid_h = grid_h;
        self.surfaces = Some(surfaces);
        self.state = PipelineState::Idle;
        self.failure = None;
        Ok(())
    }

    pub(crate) fn is_executing(&self) -> bool {
        self.state == PipelineState::Executing
    }

    /// Shrinks the input surface so the next execution fails partway.
    #[cfg(test)]
    pub(crate) fn truncate_input(&mut self) {
        if let Some(surfaces) = self.surfaces.as_mut() {
            surfaces.input.clear();
        }
    }
}

fn check_dims(grid_w: u16, grid_h: u16) -> Result<()> {
    if grid_w == 0 || grid_h == 0 {
        return Err(Error::InvalidDimensions {
            width: grid_w,
            height: grid_h,
        });
    }
    Ok(())
}

/// Matches the patches of `region` in parallel, one output row per task.
fn match_region(
    surfaces: &mut Surfaces,
    grid_w: usize,
    region: Region,
    dictionary: &GlyphDictionary,
) {
    let Surfaces { input, output } = surfaces;
    let input = input.as_slice();
    let columns = region.columns();

    output
        .par_chunks_mut(grid_w)
        .enumerate()
        .skip(usize::from(region.y))
        .take(usize::from(region.height))
        .for_each(|(row, cells)| {
            for column in columns.clone() {
                let patch = PixelPatch::in_surface(input, grid_w, column, row)
                    .unwrap_or_else(|| panic!("patch ({column}, {row}) outside input surface"));
                cells[column] = match_patch(&patch, dictionary).pixel;
            }
        });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "patch matching panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::{PipelineState, RenderPipeline};
    use crate::error::Error;
    use crate::glyph_dictionary::GlyphDictionary;
    use crate::region::Region;
    use crate::unicode_pixel::UnicodePixel;

    fn pool() -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .expect("test pool")
    }

    #[test]
    fn new_allocates_surfaces_from_patch_dims() {
        let pipeline = RenderPipeline::new(3, 2).unwrap();
        assert_eq!(pipeline.dims(), (3, 2));
        assert_eq!(pipeline.pixel_dims(), (12, 16));
        assert_eq!(pipeline.input_surface().unwrap().len(), 12 * 16 * 3);
        assert_eq!(pipeline.output_surface().unwrap().len(), 6);
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[test]
    fn zero_dims_are_rejected() {
        assert_eq!(
            RenderPipeline::new(0, 5).unwrap_err(),
            Error::InvalidDimensions {
                width: 0,
                height: 5
            }
        );
    }

    #[test]
    fn surfaces_are_unavailable_while_executing() {
        let pool = pool();
        let mut pipeline = RenderPipeline::new(2, 2).unwrap();
        pipeline
            .dispatch(&pool, GlyphDictionary::standard(), Region::full(2, 2))
            .unwrap();

        assert_eq!(pipeline.state(), PipelineState::Executing);
        assert!(matches!(
            pipeline.input_surface_mut(),
            Err(Error::InvalidState {
                state: PipelineState::Executing,
                ..
            })
        ));
        assert!(pipeline.output_surface().is_err());
        // Dims stay readable in every state.
        assert_eq!(pipeline.dims(), (2, 2));

        pipeline.wait().unwrap();
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert!(pipeline
            .output_surface()
            .unwrap()
            .iter()
            .all(|cell| *cell != UnicodePixel::default()));
    }

    #[test]
    fn wait_without_job_is_a_no_op() {
        let mut pipeline = RenderPipeline::new(1, 1).unwrap();
        pipeline.wait().unwrap();
        pipeline.wait().unwrap();
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[test]
    fn failed_resize_leaves_pipeline_untouched() {
        let mut pipeline = RenderPipeline::new(2, 3).unwrap();
        pipeline.input_surface_mut().unwrap()[0] = 42;

        assert!(pipeline.resize(0, 3).is_err());
        assert_eq!(pipeline.dims(), (2, 3));
        assert_eq!(pipeline.input_surface().unwrap()[0], 42);
    }

    #[test]
    fn failed_job_parks_pipeline_in_error_until_resize() {
        let pool = pool();
        let mut pipeline = RenderPipeline::new(2, 2).unwrap();
        pipeline.truncate_input();
        pipeline
            .dispatch(&pool, GlyphDictionary::standard(), Region::full(2, 2))
            .unwrap();

        let first = pipeline.wait().unwrap_err();
        assert!(
            matches!(&first, Error::ExecutionFailed(reason) if reason.contains("outside input surface")),
            "unexpected error: {first}"
        );
        assert_eq!(pipeline.state(), PipelineState::Error);
        assert_eq!(pipeline.wait().unwrap_err(), first);

        assert_eq!(
            pipeline
                .dispatch(&pool, GlyphDictionary::standard(), Region::full(2, 2))
                .unwrap_err(),
            Error::InvalidState {
                state: PipelineState::Error,
                operation: "execute"
            }
        );
        // The job hands its surfaces back even when it fails.
        assert_eq!(pipeline.output_surface().unwrap().len(), 4);

        pipeline.resize(2, 2).unwrap();
        assert_eq!(pipeline.state(), PipelineState::Idle);
        pipeline.wait().unwrap();
        pipeline
            .dispatch(&pool, GlyphDictionary::standard(), Region::full(2, 2))
            .unwrap();
        pipeline.wait().unwrap();
    }

    #[test]
    fn sample_from_fills_the_input_surface() {
        let mut pipeline = RenderPipeline::new(1, 1).unwrap();
        let source = [7u8, 8, 9];
        pipeline.sample_from(&source, 1, 1).unwrap();
        assert!(pipeline
            .input_surface()
            .unwrap()
            .chunks_exact(3)
            .all(|px| px == [7, 8, 9]));
    }
}

use log::{debug, warn};

use crate::config::ContextConfig;
use crate::error::{Error, Result};
use crate::glyph_dictionary::GlyphDictionary;
use crate::region::Region;
use crate::render_pipeline::RenderPipeline;

/// Names one pipeline slot of a [`Context`].
///
/// A handle goes stale once its pipeline is destroyed, even if the slot is
/// later reused by a new pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineHandle {
    slot: u32,
    generation: u32,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    pipeline: Option<RenderPipeline>,
}

/// Owns the worker pool, the glyph dictionary and up to `max_pipelines`
/// render pipelines.
pub struct Context {
    pool: rayon::ThreadPool,
    slots: Vec<Slot>,
    max_pipelines: u8,
    dictionary: &'static GlyphDictionary,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("threads", &self.pool.current_num_threads())
            .field("live_pipelines", &self.live_pipelines())
            .field("max_pipelines", &self.max_pipelines)
            .finish()
    }
}

impl Context {
    pub fn new(max_pipelines: u8) -> Result<Self> {
        Self::with_config(&ContextConfig::with_max_pipelines(max_pipelines))
    }

    pub fn with_config(config: &ContextConfig) -> Result<Self> {
        config.validate()?;

        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|index| format!("ftty-worker-{index}"));
        if let Some(threads) = config.worker_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|error| Error::WorkerPool(error.to_string()))?;

        let dictionary = GlyphDictionary::standard();
        dictionary.validate()?;

        debug!(
            "context ready: {} worker threads, up to {} pipelines, {} glyphs",
            pool.current_num_threads(),
            config.max_pipelines,
            dictionary.len()
        );
        Ok(Self {
            pool,
            slots: Vec::new(),
            max_pipelines: config.max_pipelines,
            dictionary,
        })
    }

    pub fn max_pipelines(&self) -> usize {
        usize::from(self.max_pipelines)
    }

    pub fn live_pipelines(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.pipeline.is_some())
            .count()
    }

    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn dictionary(&self) -> &'static GlyphDictionary {
        self.dictionary
    }

    pub fn create_render_pipeline(&mut self, grid_w: u16, grid_h: u16) -> Result<PipelineHandle> {
        let max = self.max_pipelines();
        let free = self.slots.iter().position(|slot| slot.pipeline.is_none());
        if free.is_none() && self.slots.len() >= max {
            return Err(Error::CapacityExceeded { max });
        }

        let pipeline = RenderPipeline::new(grid_w, grid_h)?;
        let index = match free {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        slot.pipeline = Some(pipeline);

        debug!("created {grid_w}x{grid_h} pipeline in slot {index}");
        Ok(PipelineHandle {
            slot: index as u32,
            generation: slot.generation,
        })
    }

    /// Waits for any in-flight execution, then frees the slot.
    ///
    /// The pipeline is released even when that execution failed; the failure
    /// is still returned.
    pub fn destroy_render_pipeline(&mut self, handle: PipelineHandle) -> Result<()> {
        let slot = self.slot_mut(handle)?;
        let mut pipeline = slot.pipeline.take().ok_or(Error::InvalidHandle)?;
        slot.generation = slot.generation.wrapping_add(1);

        let outcome = if pipeline.is_executing() {
            pipeline.wait()
        } else {
            Ok(())
        };
        debug!("destroyed pipeline in slot {}", handle.slot);
        outcome
    }

    pub fn pipeline(&self, handle: PipelineHandle) -> Result<&RenderPipeline> {
        self.slots
            .get(handle.slot as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.pipeline.as_ref())
            .ok_or(Error::InvalidHandle)
    }

    pub fn pipeline_mut(&mut self, handle: PipelineHandle) -> Result<&mut RenderPipeline> {
        self.slot_mut(handle)?
            .pipeline
            .as_mut()
            .ok_or(Error::InvalidHandle)
    }

    /// Schedules matching of every patch of the pipeline and returns
    /// without waiting for it.
    pub fn execute_all(&mut self, handle: PipelineHandle) -> Result<()> {
        let (grid_w, grid_h) = self.pipeline(handle)?.dims();
        self.execute_region(handle, Region::full(grid_w, grid_h))
    }

    /// Schedules matching of the patches inside `region` only. Output cells
    /// outside it keep their previous contents.
    pub fn execute_region(&mut self, handle: PipelineHandle, region: Region) -> Result<()> {
        let dictionary = self.dictionary;
        let index = handle.slot as usize;
        let slot = self
            .slots
            .get_mut(index)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(Error::InvalidHandle)?;
        let pipeline = slot.pipeline.as_mut().ok_or(Error::InvalidHandle)?;
        pipeline.dispatch(&self.pool, dictionary, region)
    }

    /// Blocks until the pipeline's in-flight execution, if any, completes.
    pub fn wait(&mut self, handle: PipelineHandle) -> Result<()> {
        self.pipeline_mut(handle)?.wait()
    }

    pub fn resize_render_pipeline(
        &mut self,
        handle: PipelineHandle,
        grid_w: u16,
        grid_h: u16,
    ) -> Result<()> {
        self.pipeline_mut(handle)?.resize(grid_w, grid_h)
    }

    /// Waits for all executions and destroys every pipeline, reporting the
    /// first execution failure seen along the way.
    pub fn destroy(mut self) -> Result<()> {
        self.shutdown()
    }

    fn slot_mut(&mut self, handle: PipelineHandle) -> Result<&mut Slot> {
        self.slots
            .get_mut(handle.slot as usize)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(Error::InvalidHandle)
    }

    fn shutdown(&mut self) -> Result<()> {
        let mut first_failure = None;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(mut pipeline) = slot.pipeline.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            if !pipeline.is_executing() {
                continue;
            }
            if let Err(error) = pipeline.wait() {
                debug!("pipeline in slot {index} failed during shutdown");
                first_failure.get_or_insert(error);
            }
        }
        match first_failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if let Err(error) = self.shutdown() {
            warn!("context dropped with a failed execution: {error}");
        }
    }
}

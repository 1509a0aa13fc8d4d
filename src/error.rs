use crate::region::Region;
use crate::render_pipeline::PipelineState;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure categories reported by contexts, pipelines and the frontend.
///
/// Every failing call leaves the object it was called on exactly as it was
/// before the call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The context already holds `max` live pipelines.
    #[error("context is at capacity ({max} pipelines)")]
    CapacityExceeded { max: usize },

    /// Zero width or height passed to a create/resize call.
    #[error("invalid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: u16, height: u16 },

    /// The operation is not allowed in the pipeline's current state.
    #[error("cannot {operation} while pipeline is {state}")]
    InvalidState {
        state: PipelineState,
        operation: &'static str,
    },

    /// The dispatch rectangle is empty or leaves the patch grid.
    #[error("region {region} does not fit a {grid_w}x{grid_h} grid")]
    InvalidRegion {
        region: Region,
        grid_w: u16,
        grid_h: u16,
    },

    /// The handle does not name a live pipeline of this context.
    #[error("unknown or destroyed pipeline handle")]
    InvalidHandle,

    #[error("failed to allocate {what} ({bytes} bytes)")]
    Allocation { what: &'static str, bytes: usize },

    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),

    /// A scheduled execution did not complete.
    #[error("pipeline execution failed: {0}")]
    ExecutionFailed(String),

    #[error("{what} size mismatch (expected {expected}, got {actual})")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid config: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid_state(state: PipelineState, operation: &'static str) -> Self {
        Self::InvalidState { state, operation }
    }

    pub(crate) fn allocation<T>(what: &'static str, len: usize) -> Self {
        Self::Allocation {
            what,
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::region::Region;
    use crate::render_pipeline::PipelineState;

    #[test]
    fn messages_name_the_failing_operation() {
        let error = Error::invalid_state(PipelineState::Executing, "resize");
        assert_eq!(error.to_string(), "cannot resize while pipeline is executing");

        let error = Error::InvalidRegion {
            region: Region::new(3, 0, 2, 1),
            grid_w: 4,
            grid_h: 4,
        };
        assert_eq!(
            error.to_string(),
            "region 2x1 at (3, 0) does not fit a 4x4 grid"
        );
    }

    #[test]
    fn allocation_reports_bytes_not_elements() {
        let error = Error::allocation::<u32>("output surface", 10);
        assert_eq!(
            error,
            Error::Allocation {
                what: "output surface",
                bytes: 40
            }
        );
    }
}

pub mod job_runner;
pub mod orchestrator;
pub mod page_processor;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::layout::LayoutConfig;
use crate::segment::binarize::DEFAULT_THRESHOLD;

/// Immutable parameter snapshot for one pipeline run.
///
/// Every derived result (binarized page, regions, crops, layout) is a pure
/// function of the page and these values; changing any field means
/// recomputing, never patching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineParameters {
    pub binarization_threshold: u8,
    pub erosion_iterations: u32,
    pub min_region_area: f64,
    /// Vertical spacing between stacked crops in the output, in points.
    pub vertical_gap: f32,
}

impl Default for PipelineParameters {
    fn default() -> Self {
        Self {
            binarization_threshold: DEFAULT_THRESHOLD,
            erosion_iterations: 9,
            min_region_area: 40_000.0,
            vertical_gap: 150.0,
        }
    }
}

impl PipelineParameters {
    /// A4 output layout using this run's vertical gap.
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig::a4(self.vertical_gap)
    }
}

/// Cooperative cancellation flag checked between pages.
///
/// Clones share the flag, so a caller can keep one handle and pass another
/// into a run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

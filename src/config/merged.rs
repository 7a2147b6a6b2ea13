use crate::error::BlockCropError;
use crate::layout::LayoutConfig;
use crate::pipeline::PipelineParameters;

use super::job::Job;
use super::settings::Settings;

/// Upper bound on erosion passes; beyond this every page is one blob.
pub const MAX_EROSION_ITERATIONS: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfig {
    pub dpi: u32,
    pub params: PipelineParameters,
    pub layout: LayoutConfig,
    pub parallel_workers: usize,
}

impl MergedConfig {
    /// JobのOption値がSomeならJobの値を、NoneならSettingsの値を使用する。
    pub fn new(settings: &Settings, job: &Job) -> Self {
        let params = PipelineParameters {
            binarization_threshold: job
                .binarization_threshold
                .unwrap_or(settings.binarization_threshold),
            erosion_iterations: job
                .erosion_iterations
                .unwrap_or(settings.erosion_iterations),
            min_region_area: job.min_region_area.unwrap_or(settings.min_region_area),
            vertical_gap: job.vertical_gap.unwrap_or(settings.vertical_gap),
        };
        let layout = LayoutConfig {
            top_margin: settings.top_margin,
            bottom_margin: settings.bottom_margin,
            left_margin: settings.left_margin,
            ..params.layout()
        };
        MergedConfig {
            dpi: job.dpi.unwrap_or(settings.dpi),
            params,
            layout,
            parallel_workers: settings.parallel_workers,
        }
    }

    /// 値の範囲を検証する。
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.dpi == 0 {
            return Err(BlockCropError::config("dpi must be greater than 0"));
        }
        if self.params.erosion_iterations > MAX_EROSION_ITERATIONS {
            return Err(BlockCropError::config(format!(
                "erosion_iterations must be at most {MAX_EROSION_ITERATIONS}, got {}",
                self.params.erosion_iterations
            )));
        }
        if self.params.min_region_area.is_nan() || self.params.min_region_area < 0.0 {
            return Err(BlockCropError::config(format!(
                "min_region_area must be non-negative, got {}",
                self.params.min_region_area
            )));
        }
        if self.params.vertical_gap.is_nan() || self.params.vertical_gap < 0.0 {
            return Err(BlockCropError::config(format!(
                "vertical_gap must be non-negative, got {}",
                self.params.vertical_gap
            )));
        }
        let l = &self.layout;
        if l.top_margin < 0.0 || l.bottom_margin < 0.0 || l.left_margin < 0.0 {
            return Err(BlockCropError::config("margins must be non-negative"));
        }
        if l.max_content_width() <= 0.0 || l.top_margin + l.bottom_margin >= l.page_height {
            return Err(BlockCropError::config(
                "margins leave no room for content on the page",
            ));
        }
        Ok(())
    }
}

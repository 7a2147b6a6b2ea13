use std::path::Path;

use serde::Deserialize;

use crate::layout::LayoutConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dpi: u32,
    pub binarization_threshold: u8,
    pub erosion_iterations: u32,
    pub min_region_area: f64,
    pub vertical_gap: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub left_margin: f32,
    pub parallel_workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let layout = LayoutConfig::a4(150.0);
        Settings {
            dpi: 200,
            binarization_threshold: 127,
            erosion_iterations: 9,
            min_region_area: 40_000.0,
            vertical_gap: layout.vertical_gap,
            top_margin: layout.top_margin,
            bottom_margin: layout.bottom_margin,
            left_margin: layout.left_margin,
            parallel_workers: 0,
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::BlockCropError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

pub mod packer;

use crate::segment::CropRegion;

/// A4 page size in PDF points.
pub const A4_WIDTH: f32 = 595.0;
pub const A4_HEIGHT: f32 = 842.0;

/// Page geometry for the output document, in PDF points.
///
/// Crop pixels are laid out one pixel per point before scale-to-fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub top_margin: f32,
    /// Minimum page height that must remain below a placed crop.
    pub bottom_margin: f32,
    pub left_margin: f32,
    pub vertical_gap: f32,
}

impl LayoutConfig {
    /// A4 page with the default 50pt top/bottom margins and no side margin.
    pub fn a4(vertical_gap: f32) -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            top_margin: 50.0,
            bottom_margin: 50.0,
            left_margin: 0.0,
            vertical_gap,
        }
    }

    /// Width available to a crop after side margins.
    pub fn max_content_width(&self) -> f32 {
        self.page_width - 2.0 * self.left_margin
    }

    /// Cursor position at the top of a fresh page.
    pub fn first_row(&self) -> f32 {
        self.page_height - self.top_margin
    }
}

/// One crop placed on an output page.
///
/// Coordinates are PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<'a> {
    pub crop: &'a CropRegion,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub top: f32,
    pub scale: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement<'_> {
    /// Lower edge, where the image is anchored when drawn.
    pub fn bottom(&self) -> f32 {
        self.top - self.height
    }
}

/// One page of the repacked document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputPage<'a> {
    pub placements: Vec<Placement<'a>>,
}

impl OutputPage<'_> {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }
}

/// Drop the crops whose index is flagged in `excluded`.
///
/// Indices beyond the end of the mask are kept.
pub fn select_crops<'a>(
    crops: impl IntoIterator<Item = &'a CropRegion>,
    excluded: &[bool],
) -> Vec<&'a CropRegion> {
    crops
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !excluded.get(*i).copied().unwrap_or(false))
        .map(|(_, c)| c)
        .collect()
}

/// Build an exclusion mask of `len` entries from 0-based indices.
pub fn exclusion_mask(len: usize, excluded_indices: &[usize]) -> Vec<bool> {
    let mut mask = vec![false; len];
    for &i in excluded_indices {
        if let Some(slot) = mask.get_mut(i) {
            *slot = true;
        }
    }
    mask
}

// Layout packing: ordered crops -> fixed-size output pages

use tracing::debug;

use super::{LayoutConfig, OutputPage, Placement};
use crate::error::{BlockCropError, Result};
use crate::segment::CropRegion;

/// Uniform scale that fits `image_width` into `max_width`; never upscales.
pub fn fit_scale(image_width: u32, max_width: f32) -> f32 {
    if image_width == 0 {
        return 1.0;
    }
    (max_width / image_width as f32).min(1.0)
}

/// Stack crops into a single column across as many pages as needed.
///
/// Greedy, one pass, in input order. A page break happens when the current
/// page already holds a crop and placing the next one would leave less than
/// `bottom_margin` below it. Crops are never split; a crop taller than the
/// usable height is placed alone and overflows the bottom edge.
///
/// # Errors
/// `NothingToPack` when `crops` is empty.
pub fn pack<'a>(crops: &[&'a CropRegion], layout: &LayoutConfig) -> Result<Vec<OutputPage<'a>>> {
    if crops.is_empty() {
        return Err(BlockCropError::NothingToPack);
    }

    let max_width = layout.max_content_width();
    let mut pages = Vec::new();
    let mut current = OutputPage::default();
    let mut cursor_y = layout.first_row();

    for &crop in crops {
        let scale = fit_scale(crop.width(), max_width);
        let width = crop.width() as f32 * scale;
        let height = crop.height() as f32 * scale;

        if !current.is_empty() && cursor_y - height < layout.bottom_margin {
            pages.push(std::mem::take(&mut current));
            cursor_y = layout.first_row();
        }

        current.placements.push(Placement {
            crop,
            x: layout.left_margin,
            top: cursor_y,
            scale,
            width,
            height,
        });

        cursor_y -= height + layout.vertical_gap;
    }
    pages.push(current);

    debug!(crops = crops.len(), pages = pages.len(), "packed crops");
    Ok(pages)
}

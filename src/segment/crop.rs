// Crop extraction: accepted regions -> full-width crops in reading order

use image::imageops;

use super::{CropRegion, Page, Region};

/// Extract one crop per region and return them top to bottom.
///
/// A crop covers the region's rows `[y, y + h)` and the columns
/// `[0, min(x + pad, page_width))` with `pad = page_width`, which always
/// reaches the right page edge. Blocks start at the left margin, and under
/// erosion a region's right edge follows a rule line rather than the content,
/// so the box width is not trusted.
///
/// Crops are sorted by top row (then left edge); the order regions were
/// traced in is irrelevant.
pub fn extract_crops(page: &Page, regions: &[Region]) -> Vec<CropRegion> {
    let page_width = page.width();
    let pad = page_width;

    let mut crops: Vec<CropRegion> = regions
        .iter()
        .filter_map(|region| {
            let bbox = region.bounding_box;
            if bbox.y >= page.height() || bbox.height == 0 {
                return None;
            }
            let height = bbox.height.min(page.height() - bbox.y);
            let width = bbox.x.saturating_add(pad).min(page_width);
            let pixels = imageops::crop_imm(page.image(), 0, bbox.y, width, height).to_image();
            Some(CropRegion {
                source_page_index: page.index(),
                bounding_box: bbox,
                pixels,
            })
        })
        .collect();

    crops.sort_by_key(|c| (c.bounding_box.y, c.bounding_box.x));
    crops
}

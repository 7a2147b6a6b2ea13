// Region filtering by enclosed area

use super::Region;

/// Fraction of the page area above which a region is rejected.
///
/// A blob this large means erosion merged several blocks into one.
pub const MAX_PAGE_FRACTION: f64 = 0.5;

/// Keep regions with `min_region_area < area < 0.5 * page area`.
///
/// Both bounds are exclusive. Regions are only included or excluded, never
/// split; input order is preserved.
pub fn filter_regions(
    regions: Vec<Region>,
    page_width: u32,
    page_height: u32,
    min_region_area: f64,
) -> Vec<Region> {
    let max_area = page_width as f64 * page_height as f64 * MAX_PAGE_FRACTION;
    regions
        .into_iter()
        .filter(|r| accepts(r.area, min_region_area, max_area))
        .collect()
}

fn accepts(area: f64, min_area: f64, max_area: f64) -> bool {
    min_area < area && area < max_area
}

// Segmentation tests: binarize -> regions -> area filter -> crops
//
// Pages are synthesized in memory; no fixture files.

use block_cropper::pipeline::PipelineParameters;
use block_cropper::pipeline::page_processor::segment_page;
use block_cropper::segment::binarize::binarize;
use block_cropper::segment::contour::find_regions;
use block_cropper::segment::crop::extract_crops;
use block_cropper::segment::filter::filter_regions;
use block_cropper::segment::{CropRegion, Page};
use image::{GrayImage, Luma};
use proptest::prelude::*;

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;

/// White page with solid black rectangles `(x, y, w, h)`.
fn page_with_rects(index: usize, rects: &[(u32, u32, u32, u32)]) -> Page {
    let mut img = GrayImage::from_pixel(PAGE_WIDTH, PAGE_HEIGHT, Luma([255]));
    for &(x, y, w, h) in rects {
        for yy in y..y + h {
            for xx in x..x + w {
                img.put_pixel(xx, yy, Luma([0]));
            }
        }
    }
    Page::new(index, img)
}

/// The two-block page used by the scenario tests.
fn two_block_page() -> Page {
    page_with_rects(0, &[(50, 50, 400, 100), (50, 300, 400, 100)])
}

fn params(min_region_area: f64, erosion_iterations: u32) -> PipelineParameters {
    PipelineParameters {
        binarization_threshold: 127,
        erosion_iterations,
        min_region_area,
        vertical_gap: 150.0,
    }
}

// ============================================================
// 1. Scenario A / B
// ============================================================

#[test]
fn test_two_rectangles_yield_two_ordered_crops() {
    let page = two_block_page();
    let result = segment_page(&page, &params(100.0, 1));

    assert_eq!(result.crops.len(), 2, "expected exactly two crops");
    let tops: Vec<u32> = result.crops.iter().map(CropRegion::top_row).collect();
    assert!(tops[0] < tops[1], "crops must be top to bottom: {tops:?}");
    assert!(tops[0].abs_diff(50) <= 2, "first crop near y=50, got {}", tops[0]);
    assert!(tops[1].abs_diff(300) <= 2, "second crop near y=300, got {}", tops[1]);
}

#[test]
fn test_min_area_above_every_region_yields_nothing() {
    let page = two_block_page();
    let result = segment_page(&page, &params(500_000.0, 1));

    assert!(result.accepted.is_empty());
    assert!(result.crops.is_empty());
    assert_eq!(result.candidates.len(), 2, "regions are found but filtered");
}

// ============================================================
// 2. Region and crop invariants
// ============================================================

#[test]
fn test_accepted_regions_respect_area_bounds() {
    // A tiny speck, two normal blocks and one block bigger than half the page.
    let page = page_with_rects(
        0,
        &[(5, 5, 3, 3), (20, 20, 300, 80), (20, 150, 300, 80), (0, 300, 595, 500)],
    );
    let min_area = 1000.0;
    let result = segment_page(&page, &params(min_area, 0));
    let max_area = 0.5 * page.area();

    assert_eq!(result.accepted.len(), 2);
    for region in &result.accepted {
        assert!(region.area > min_area && region.area < max_area);
    }
}

#[test]
fn test_crop_invariants() {
    let page = page_with_rects(4, &[(120, 40, 200, 60), (30, 400, 100, 150)]);
    let result = segment_page(&page, &params(100.0, 2));

    assert_eq!(result.crops.len(), 2);
    for crop in &result.crops {
        assert_eq!(crop.source_page_index, 4);
        assert_eq!(crop.height(), crop.bounding_box.height);
        assert!(crop.width() <= page.width());
        assert_eq!(crop.width(), page.width(), "crops extend to the page edge");
        assert_eq!(crop.top_row(), crop.bounding_box.y);
    }
}

#[test]
fn test_crop_order_is_monotonic_for_many_blocks() {
    let rects: Vec<(u32, u32, u32, u32)> = [700, 20, 460, 240, 580, 120]
        .iter()
        .map(|&y| (40, y, 300, 60))
        .collect();
    let page = page_with_rects(0, &rects);
    let result = segment_page(&page, &params(100.0, 0));

    assert_eq!(result.crops.len(), 6);
    assert!(
        result
            .crops
            .windows(2)
            .all(|w| w[0].top_row() <= w[1].top_row())
    );
}

#[test]
fn test_erosion_merges_lines_of_one_block() {
    // Three text-like lines 6px apart form one block after erosion.
    let page = page_with_rects(0, &[(40, 100, 300, 8), (40, 114, 280, 8), (40, 128, 250, 8)]);

    let without = segment_page(&page, &params(100.0, 0));
    let with = segment_page(&page, &params(100.0, 2));

    assert_eq!(without.crops.len(), 3);
    assert_eq!(with.crops.len(), 1);
}

#[test]
fn test_stages_compose_like_segment_page() {
    let page = two_block_page();
    let p = params(100.0, 1);

    let binary = binarize(page.image(), p.binarization_threshold, p.erosion_iterations);
    let accepted = filter_regions(
        find_regions(&binary),
        page.width(),
        page.height(),
        p.min_region_area,
    );
    let crops = extract_crops(&page, &accepted);

    assert_eq!(crops, segment_page(&page, &p).crops);
}

#[test]
fn test_segmentation_is_idempotent() {
    let page = two_block_page();
    let p = params(100.0, 3);
    assert_eq!(segment_page(&page, &p), segment_page(&page, &p));
}

// ============================================================
// 3. Properties
// ============================================================

proptest! {
    #[test]
    fn prop_filter_bounds_are_exclusive(
        areas in prop::collection::vec(0.0f64..20_000.0, 0..40),
        min_area in 0.0f64..10_000.0,
    ) {
        use block_cropper::segment::{BoundingBox, Region};

        let regions: Vec<Region> = areas
            .iter()
            .map(|&area| Region {
                bounding_box: BoundingBox { x: 0, y: 0, width: 1, height: 1 },
                area,
                contour: Vec::new(),
            })
            .collect();
        // 100x100 page: max area 5000
        let kept = filter_regions(regions, 100, 100, min_area);
        let expected = areas.iter().filter(|&&a| min_area < a && a < 5000.0).count();

        prop_assert_eq!(kept.len(), expected);
        for r in &kept {
            prop_assert!(min_area < r.area && r.area < 5000.0);
        }
    }
}

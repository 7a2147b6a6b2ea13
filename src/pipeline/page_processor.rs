// ページ単位処理: キャッシュ確認 → 二値化 → 輪郭抽出 → 面積フィルタ → クロップ → キャッシュ保存

use std::sync::Arc;

use image::RgbImage;
use tracing::debug;

use crate::cache::hash::compute_cache_key;
use crate::cache::store::CropCache;
use crate::error::BlockCropError;
use crate::pipeline::PipelineParameters;
use crate::segment::binarize::binarize;
use crate::segment::contour::find_regions;
use crate::segment::crop::extract_crops;
use crate::segment::filter::filter_regions;
use crate::segment::preview::annotate;
use crate::segment::{CropRegion, Page, Region};

/// Everything derived from one page for one parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSegmentation {
    pub page_index: usize,
    /// Every traced component, before area filtering.
    pub candidates: Vec<Region>,
    /// Components that passed the area filter.
    pub accepted: Vec<Region>,
    /// One crop per accepted region, top to bottom.
    pub crops: Vec<CropRegion>,
}

/// Single page processing result.
#[derive(Debug, Clone)]
pub struct ProcessedPage {
    pub page: Page,
    pub segmentation: Arc<PageSegmentation>,
    pub cache_key: String,
}

impl ProcessedPage {
    pub fn page_index(&self) -> usize {
        self.page.index()
    }

    pub fn crops(&self) -> &[CropRegion] {
        &self.segmentation.crops
    }

    /// Annotated colour preview of the page.
    pub fn preview(&self) -> RgbImage {
        annotate(
            &self.page,
            &self.segmentation.candidates,
            &self.segmentation.accepted,
        )
    }

    /// `EmptyRegionSet` when no region passed the area filter.
    pub fn ensure_regions(&self) -> crate::error::Result<()> {
        if self.segmentation.accepted.is_empty() {
            Err(BlockCropError::EmptyRegionSet {
                page_index: self.page_index(),
            })
        } else {
            Ok(())
        }
    }
}

/// Run binarize → segment → filter → crop on one page.
///
/// Pure: the same page and parameters always give the same result.
pub fn segment_page(page: &Page, params: &PipelineParameters) -> PageSegmentation {
    let binary = binarize(
        page.image(),
        params.binarization_threshold,
        params.erosion_iterations,
    );
    let candidates = find_regions(&binary);
    let accepted = filter_regions(
        candidates.clone(),
        page.width(),
        page.height(),
        params.min_region_area,
    );
    let crops = extract_crops(page, &accepted);

    debug!(
        page = page.index() + 1,
        candidates = candidates.len(),
        accepted = accepted.len(),
        "segmented page"
    );

    PageSegmentation {
        page_index: page.index(),
        candidates,
        accepted,
        crops,
    }
}

/// Process a single page: check cache -> segment -> store in cache.
///
/// The cache key covers the page pixels and every parameter, so a changed
/// parameter is always a miss.
pub fn process_page(
    page: Page,
    params: &PipelineParameters,
    cache: Option<&CropCache>,
) -> crate::error::Result<ProcessedPage> {
    let cache_key = compute_cache_key(&page, params)?;

    if let Some(store) = cache
        && let Some(cached) = store.retrieve(&cache_key)?
    {
        debug!(page = page.index() + 1, "cache hit");
        return Ok(ProcessedPage {
            page,
            segmentation: cached,
            cache_key,
        });
    }

    let segmentation = Arc::new(segment_page(&page, params));

    if let Some(store) = cache {
        store.store(&cache_key, Arc::clone(&segmentation))?;
    }

    Ok(ProcessedPage {
        page,
        segmentation,
        cache_key,
    })
}

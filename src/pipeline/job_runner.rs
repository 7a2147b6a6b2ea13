// ジョブ単位: 入力読込 -> ラスタライズ -> 並列ページ処理 -> 除外 -> レイアウト -> PDF出力

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::cache::store::CropCache;
use crate::error::BlockCropError;
use crate::layout::packer::pack;
use crate::layout::{LayoutConfig, exclusion_mask, select_crops};
use crate::pdf::writer::write_document;
use crate::pipeline::page_processor::{ProcessedPage, process_page};
use crate::pipeline::{CancelToken, PipelineParameters};
use crate::render::{RenderedPage, SourceKind, rasterize};
use crate::segment::CropRegion;

/// Configuration for a single job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// 0-based page selection; `None` processes every page.
    pub pages: Option<Vec<usize>>,
    /// 0-based indices into the job's ordered crop list.
    pub excluded_crops: Vec<usize>,
    pub preview_dir: Option<PathBuf>,
    pub dpi: u32,
    pub params: PipelineParameters,
    pub layout: LayoutConfig,
}

/// A page that produced no crops, and why.
#[derive(Debug)]
pub struct PageFailure {
    pub page_index: usize,
    pub error: BlockCropError,
}

/// Result of processing a single job.
#[derive(Debug)]
pub struct JobResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub pages_processed: usize,
    pub crops_found: usize,
    pub crops_packed: usize,
    pub output_pages: usize,
    pub failures: Vec<PageFailure>,
}

/// Segmentation of every selected page of one document.
#[derive(Debug, Default)]
pub struct DocumentSegmentation {
    /// Pages that were segmented, in page order (including pages whose
    /// region set came out empty).
    pub pages: Vec<ProcessedPage>,
    /// Per-page failures, in page order.
    pub failures: Vec<PageFailure>,
}

impl DocumentSegmentation {
    /// All crops in reading order: by page, then top to bottom.
    pub fn crops(&self) -> Vec<&CropRegion> {
        self.pages.iter().flat_map(|p| p.crops()).collect()
    }
}

/// Segment rasterized pages in parallel.
///
/// Failures stay with their page: a page that could not be rasterized, or whose
/// region set is empty, is listed in `failures` and the others proceed. The
/// token is checked before each page; once cancelled the run returns
/// `Cancelled` and no partial result escapes.
pub fn segment_document(
    rendered: Vec<RenderedPage>,
    params: &PipelineParameters,
    cache: Option<&CropCache>,
    cancel: &CancelToken,
) -> crate::error::Result<DocumentSegmentation> {
    let outcomes: Vec<(usize, crate::error::Result<ProcessedPage>)> = rendered
        .into_par_iter()
        .map(|(index, page)| {
            if cancel.is_cancelled() {
                return (index, Err(BlockCropError::Cancelled));
            }
            (index, page.and_then(|p| process_page(p, params, cache)))
        })
        .collect();

    if cancel.is_cancelled() {
        return Err(BlockCropError::Cancelled);
    }

    let mut segmentation = DocumentSegmentation::default();
    for (page_index, outcome) in outcomes {
        match outcome {
            Ok(page) => {
                if let Err(error) = page.ensure_regions() {
                    segmentation.failures.push(PageFailure { page_index, error });
                }
                segmentation.pages.push(page);
            }
            Err(error) if error.is_page_local() => {
                segmentation.failures.push(PageFailure { page_index, error });
            }
            Err(error) => return Err(error),
        }
    }

    segmentation.pages.sort_by_key(ProcessedPage::page_index);
    segmentation.failures.sort_by_key(|f| f.page_index);
    Ok(segmentation)
}

/// Drop excluded crops, pack the rest and emit the PDF bytes.
///
/// Returns the document and the number of output pages.
///
/// # Errors
/// `NothingToPack` when no crop is left after exclusion.
pub fn build_document(
    crops: &[&CropRegion],
    excluded: &[usize],
    layout: &LayoutConfig,
) -> crate::error::Result<(Vec<u8>, usize)> {
    let mask = exclusion_mask(crops.len(), excluded);
    let selected = select_crops(crops.iter().copied(), &mask);
    let pages = pack(&selected, layout)?;
    let bytes = write_document(&pages, layout)?;
    Ok((bytes, pages.len()))
}

/// Write one annotated PNG per segmented page into `dir`.
pub fn write_previews(segmentation: &DocumentSegmentation, dir: &Path) -> crate::error::Result<()> {
    std::fs::create_dir_all(dir)?;
    for page in &segmentation.pages {
        let path = dir.join(format!("page_{:03}.png", page.page_index() + 1));
        page.preview().save(&path)?;
    }
    Ok(())
}

/// Run a single job: read → rasterize → segment → exclude → pack → write.
pub fn run_job(config: &JobConfig, cancel: &CancelToken) -> crate::error::Result<JobResult> {
    let kind = SourceKind::detect(&config.input_path)?;
    let bytes = std::fs::read(&config.input_path)?;

    let rendered = rasterize(&bytes, kind, config.dpi, config.pages.as_deref())?;
    let segmentation = segment_document(rendered, &config.params, None, cancel)?;

    for failure in &segmentation.failures {
        warn!(page = failure.page_index + 1, error = %failure.error, "page contributed no crops");
    }

    if let Some(dir) = &config.preview_dir {
        write_previews(&segmentation, dir)?;
    }

    let crops = segmentation.crops();
    let crops_found = crops.len();
    let crops_packed = exclusion_mask(crops_found, &config.excluded_crops)
        .iter()
        .filter(|&&excluded| !excluded)
        .count();

    let (pdf_bytes, output_pages) = build_document(&crops, &config.excluded_crops, &config.layout)?;
    std::fs::write(&config.output_path, pdf_bytes)?;

    info!(
        input = %config.input_path.display(),
        crops = crops_packed,
        pages = output_pages,
        "job finished"
    );

    Ok(JobResult {
        input_path: config.input_path.clone(),
        output_path: config.output_path.clone(),
        pages_processed: segmentation.pages.len(),
        crops_found,
        crops_packed,
        output_pages,
        failures: segmentation.failures,
    })
}

// pdfium-render wrapper: PDF bytes -> grayscale Pages (in-memory only)

use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::BlockCropError;
use crate::segment::Page;

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
fn resolve_pdfium_lib_path() -> crate::error::Result<PathBuf> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        return Err(BlockCropError::render(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(vendor_path);
        }
    }

    Err(BlockCropError::render(
        "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/",
    ))
}

/// Creates a new Pdfium instance by dynamically loading the shared library.
fn create_pdfium() -> crate::error::Result<Pdfium> {
    let lib_path = resolve_pdfium_lib_path()?;
    let lib_path_str = lib_path.to_str().ok_or_else(|| {
        BlockCropError::render("pdfium library path contains non-UTF-8 characters")
    })?;
    let bindings =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))
            .map_err(|e| BlockCropError::render(e.to_string()))?;
    Ok(Pdfium::new(bindings))
}

/// Number of pages in an in-memory PDF.
pub fn page_count(pdf_bytes: &[u8]) -> crate::error::Result<usize> {
    let pdfium = create_pdfium()?;
    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| BlockCropError::decode(e.to_string()))?;
    Ok(document.pages().len() as usize)
}

/// Render the selected pages of an in-memory PDF to grayscale at `dpi`.
///
/// `selection` holds 0-based page indices; `None` renders every page.
/// The outer `Err` means the document itself could not be decoded. A page that
/// fails to render yields an `Err` in its own slot and does not stop the rest.
///
/// # Errors
/// Returns `DecodeError` if pdfium cannot open the document and `RenderError`
/// if the pdfium library cannot be loaded.
pub fn render_document(
    pdf_bytes: &[u8],
    dpi: u32,
    selection: Option<&[usize]>,
) -> crate::error::Result<Vec<(usize, crate::error::Result<Page>)>> {
    let pdfium = create_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| BlockCropError::decode(e.to_string()))?;

    let total = document.pages().len() as usize;
    let indices: Vec<usize> = match selection {
        Some(sel) => sel.to_vec(),
        None => (0..total).collect(),
    };

    let mut rendered = Vec::with_capacity(indices.len());
    for index in indices {
        let result = if index >= total {
            Err(BlockCropError::render(format!(
                "page {} out of range (document has {} pages)",
                index + 1,
                total
            )))
        } else {
            render_one(&document, index, dpi)
        };
        match &result {
            Ok(page) => debug!(
                page = index + 1,
                width = page.width(),
                height = page.height(),
                "rendered page"
            ),
            Err(e) => warn!(page = index + 1, error = %e, "page render failed"),
        }
        rendered.push((index, result));
    }

    Ok(rendered)
}

fn render_one(document: &PdfDocument<'_>, index: usize, dpi: u32) -> crate::error::Result<Page> {
    let page_index = u16::try_from(index)
        .map_err(|_| BlockCropError::render("page index exceeds u16 range"))?;

    let page = document.pages().get(page_index)?;

    // PDF default user unit: 1 point = 1/72 inch
    let width_px = (page.width().value * dpi as f32 / 72.0).round() as i32;
    let height_px = (page.height().value * dpi as f32 / 72.0).round() as i32;

    let config = PdfRenderConfig::new()
        .set_target_width(width_px)
        .set_target_height(height_px);

    let bitmap = page.render_with_config(&config)?;

    Ok(Page::new(index, bitmap.as_image().to_luma8()))
}

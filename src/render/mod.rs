#[cfg(feature = "pdfium")]
pub mod pdfium;

use std::path::Path;

use crate::error::BlockCropError;
use crate::segment::Page;

/// Per-page rasterization outcome, tagged with the 0-based page index.
pub type RenderedPage = (usize, crate::error::Result<Page>);

/// Input document kind, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Image,
}

impl SourceKind {
    pub fn detect(path: &Path) -> crate::error::Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" => Ok(Self::Image),
            _ => Err(BlockCropError::decode(format!(
                "unsupported input type: {}",
                path.display()
            ))),
        }
    }
}

/// Decode an encoded raster image as a single grayscale page.
pub fn decode_image_page(bytes: &[u8], index: usize) -> crate::error::Result<Page> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| BlockCropError::decode(format!("image decode error: {e}")))?;
    Ok(Page::new(index, img.to_luma8()))
}

/// Rasterize the selected pages of an in-memory document.
///
/// An image input is a one-page document. `selection` is 0-based.
pub fn rasterize(
    bytes: &[u8],
    kind: SourceKind,
    dpi: u32,
    selection: Option<&[usize]>,
) -> crate::error::Result<Vec<RenderedPage>> {
    match kind {
        SourceKind::Image => {
            let indices = selection.map(<[usize]>::to_vec).unwrap_or_else(|| vec![0]);
            let page = decode_image_page(bytes, 0)?;
            Ok(indices
                .into_iter()
                .map(|i| {
                    if i == 0 {
                        (i, Ok(page.clone()))
                    } else {
                        (
                            i,
                            Err(BlockCropError::render(format!(
                                "page {} out of range (document has 1 page)",
                                i + 1
                            ))),
                        )
                    }
                })
                .collect())
        }
        #[cfg(feature = "pdfium")]
        SourceKind::Pdf => pdfium::render_document(bytes, dpi, selection),
        #[cfg(not(feature = "pdfium"))]
        SourceKind::Pdf => {
            let _ = dpi;
            Err(BlockCropError::decode(
                "PDF input requires the `pdfium` feature",
            ))
        }
    }
}

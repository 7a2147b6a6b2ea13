use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockCropError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("No region passed the area filter on page {}", .page_index + 1)]
    EmptyRegionSet { page_index: usize },

    #[error("Nothing to pack: the selected crop list is empty")]
    NothingToPack,

    #[error("PDF write error: {0}")]
    PdfWriteError(String),

    #[error("Image encode error: {0}")]
    ImageEncodeError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Processing cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`BlockCropError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl BlockCropError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create a decode error.
    decode => DecodeError,
    /// Create a render error.
    render => RenderError,
    /// Create a PDF write error.
    pdf_write => PdfWriteError,
    /// Create an image encode error.
    image_encode => ImageEncodeError,
    /// Create a cache error.
    cache => CacheError,
}

impl BlockCropError {
    /// Whether this error only affects the page it was raised for.
    ///
    /// Page-local failures are collected into the job result; everything else
    /// aborts the job.
    pub fn is_page_local(&self) -> bool {
        matches!(
            self,
            Self::EmptyRegionSet { .. } | Self::RenderError(_) | Self::DecodeError(_)
        )
    }
}

impl From<lopdf::Error> for BlockCropError {
    fn from(e: lopdf::Error) -> Self {
        Self::PdfWriteError(e.to_string())
    }
}

impl From<serde_json::Error> for BlockCropError {
    fn from(e: serde_json::Error) -> Self {
        Self::CacheError(e.to_string())
    }
}

impl From<serde_yml::Error> for BlockCropError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

#[cfg(feature = "pdfium")]
impl From<pdfium_render::prelude::PdfiumError> for BlockCropError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::RenderError(e.to_string())
    }
}

impl From<image::ImageError> for BlockCropError {
    fn from(e: image::ImageError) -> Self {
        Self::ImageEncodeError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BlockCropError>;

// Binarization: grayscale page -> two-level mask with fused ink blobs

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::erode;

/// Luminance cutoff used when no threshold is configured.
pub const DEFAULT_THRESHOLD: u8 = 127;

/// L∞ radius of the structuring element: radius 2 is a 5x5 all-ones square.
const EROSION_RADIUS: u8 = 2;

/// Apply a binary threshold: pixels above `thresh` become 255, others 0.
///
/// Equivalent to `THRESH_BINARY` in the usual image toolkits.
#[must_use = "returns a new GrayImage; the input is not modified"]
pub fn threshold_binary(image: &GrayImage, thresh: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let Luma([v]) = *image.get_pixel(x, y);
        Luma([if v > thresh { 255 } else { 0 }])
    })
}

/// Threshold a page and erode the bright background `erosion_iterations` times.
///
/// Erosion removes bright pixels within the 5x5 neighbourhood of any dark
/// pixel, so strokes belonging to one block grow into a single dark blob.
/// With zero iterations the thresholded image is returned unchanged.
pub fn binarize(image: &GrayImage, thresh: u8, erosion_iterations: u32) -> GrayImage {
    let thresholded = threshold_binary(image, thresh);
    (0..erosion_iterations).fold(thresholded, |img, _| {
        erode(&img, Norm::LInf, EROSION_RADIUS)
    })
}

pub mod binarize;
pub mod contour;
pub mod crop;
pub mod filter;
pub mod preview;

use image::GrayImage;
use imageproc::point::Point;

/// A rasterized source page: single-channel pixels plus its 0-based index in
/// the source document.
///
/// Pages are never mutated after creation; every stage returns new images.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    index: usize,
    image: GrayImage,
}

impl Page {
    pub fn new(index: usize, image: GrayImage) -> Self {
        Self { index, image }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Page area in pixels.
    pub fn area(&self) -> f64 {
        self.width() as f64 * self.height() as f64
    }
}

/// Axis-aligned box in page pixel coordinates. `width`/`height` are inclusive
/// extents, so a single pixel is a 1x1 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Minimal box containing every point. `None` for an empty slice or
    /// points with negative coordinates.
    pub fn from_points(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if min_x < 0 || min_y < 0 {
            return None;
        }
        Some(Self {
            x: min_x as u32,
            y: min_y as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }

    /// One past the last row covered by the box.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }
}

/// A connected ink component found on a binarized page.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub bounding_box: BoundingBox,
    /// Area enclosed by the outer contour, not the bounding box area.
    pub area: f64,
    /// Outer contour reduced to its turning points.
    pub contour: Vec<Point<i32>>,
}

/// A rectangular excerpt of a source page for one accepted region.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRegion {
    pub source_page_index: usize,
    pub bounding_box: BoundingBox,
    pub pixels: GrayImage,
}

impl CropRegion {
    /// First page row covered by the crop.
    pub fn top_row(&self) -> u32 {
        self.bounding_box.y
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_from_points_is_inclusive() {
        let points = vec![
            Point::new(10, 20),
            Point::new(14, 20),
            Point::new(14, 29),
            Point::new(10, 29),
        ];
        let bbox = BoundingBox::from_points(&points).expect("non-empty");
        assert_eq!(
            bbox,
            BoundingBox {
                x: 10,
                y: 20,
                width: 5,
                height: 10
            }
        );
        assert_eq!(bbox.bottom(), 30);
        assert_eq!(bbox.right(), 15);
    }

    #[test]
    fn test_bounding_box_from_single_point() {
        let bbox = BoundingBox::from_points(&[Point::new(3, 4)]).expect("non-empty");
        assert_eq!((bbox.width, bbox.height), (1, 1));
    }

    #[test]
    fn test_bounding_box_from_empty_points() {
        assert!(BoundingBox::from_points(&[]).is_none());
    }
}

// Segmentation: binarized page -> one Region per connected ink component

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use super::{BoundingBox, Region};

/// Find every connected ink (dark) component of a binarized page.
///
/// Border following reports an outer border and any number of hole borders
/// per component; only outer borders are kept so each blob yields exactly one
/// region. The result is a flat, unordered list.
pub fn find_regions(binary: &GrayImage) -> Vec<Region> {
    // Contour tracing treats non-zero pixels as foreground; ink is 0 here.
    let mut ink = binary.clone();
    image::imageops::invert(&mut ink);

    find_contours::<i32>(&ink)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .filter_map(|c| region_from_contour(&c.points))
        .collect()
}

/// Build a region from raw border points.
pub fn region_from_contour(points: &[Point<i32>]) -> Option<Region> {
    let contour = simplify_chain_points(points);
    let bounding_box = BoundingBox::from_points(&contour)?;
    Some(Region {
        bounding_box,
        area: polygon_area(&contour),
        contour,
    })
}

/// Compress a border chain to its turning points.
///
/// Interior points of straight horizontal, vertical or diagonal runs are
/// removed; the enclosed area is unchanged.
pub fn simplify_chain_points(points: &[Point<i32>]) -> Vec<Point<i32>> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let n = points.len();
    let mut simplified = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let curr = points[i];
        let next = points[(i + 1) % n];

        let dir_prev = ((curr.x - prev.x).signum(), (curr.y - prev.y).signum());
        let dir_next = ((next.x - curr.x).signum(), (next.y - curr.y).signum());
        if dir_prev != dir_next {
            simplified.push(curr);
        }
    }

    if simplified.len() < 3 {
        points.to_vec()
    } else {
        simplified
    }
}

/// Absolute polygon area by the shoelace formula.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice.abs() as f64 / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn page_with_rects(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> GrayImage {
        let mut img = GrayImage::from_pixel(width, height, Luma([255]));
        for &(x, y, w, h) in rects {
            for yy in y..y + h {
                for xx in x..x + w {
                    img.put_pixel(xx, yy, Luma([0]));
                }
            }
        }
        img
    }

    #[test]
    fn test_polygon_area_of_square() {
        let square = [
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        assert_eq!(polygon_area(&square), 100.0);
    }

    #[test]
    fn test_polygon_area_ignores_orientation() {
        let ccw = [Point::new(0, 0), Point::new(0, 4), Point::new(3, 4), Point::new(3, 0)];
        assert_eq!(polygon_area(&ccw), 12.0);
    }

    #[test]
    fn test_simplify_removes_collinear_points() {
        let chain: Vec<Point<i32>> = (0..5)
            .map(|x| Point::new(x, 0))
            .chain((1..5).map(|y| Point::new(4, y)))
            .chain((0..4).rev().map(|x| Point::new(x, 4)))
            .chain((1..4).rev().map(|y| Point::new(0, y)))
            .collect();
        let simplified = simplify_chain_points(&chain);
        assert_eq!(
            simplified,
            vec![
                Point::new(0, 0),
                Point::new(4, 0),
                Point::new(4, 4),
                Point::new(0, 4)
            ]
        );
        assert_eq!(polygon_area(&simplified), polygon_area(&chain));
    }

    #[test]
    fn test_find_regions_one_per_blob() {
        let img = page_with_rects(200, 200, &[(10, 10, 50, 20), (10, 100, 80, 40)]);
        let mut regions = find_regions(&img);
        regions.sort_by_key(|r| r.bounding_box.y);

        assert_eq!(regions.len(), 2);
        assert_eq!(
            regions[0].bounding_box,
            BoundingBox {
                x: 10,
                y: 10,
                width: 50,
                height: 20
            }
        );
        assert_eq!(regions[1].bounding_box.y, 100);
        assert_eq!(regions[1].bounding_box.height, 40);
    }

    #[test]
    fn test_region_area_is_enclosed_not_bbox() {
        // An L-shaped blob: bounding box 40x40, enclosed area far smaller.
        let img = page_with_rects(100, 100, &[(10, 10, 10, 40), (10, 40, 40, 10)]);
        let regions = find_regions(&img);
        assert_eq!(regions.len(), 1);

        let region = &regions[0];
        let bbox_area = (region.bounding_box.width * region.bounding_box.height) as f64;
        assert_eq!(bbox_area, 1600.0);
        assert!(
            region.area < 800.0 && region.area > 500.0,
            "L-shape area should track the blob, got {}",
            region.area
        );
    }

    #[test]
    fn test_hollow_box_is_single_region() {
        // A framed box: the frame is one component; its hole is not a region.
        let img = page_with_rects(
            120,
            120,
            &[(10, 10, 100, 3), (10, 107, 100, 3), (10, 10, 3, 100), (107, 10, 3, 100)],
        );
        let regions = find_regions(&img);
        assert_eq!(regions.len(), 1);
        assert!(regions[0].area > 9000.0, "area covers the enclosed box");
    }

    #[test]
    fn test_blank_page_has_no_regions() {
        let img = GrayImage::from_pixel(50, 50, Luma([255]));
        assert!(find_regions(&img).is_empty());
    }
}

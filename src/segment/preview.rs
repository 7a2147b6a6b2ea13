// Preview annotation: page + regions -> RGB image for visual verification

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use super::{Page, Region};

const CONTOUR_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const CROP_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CROP_THICKNESS: i32 = 3;

/// Render the page in colour with every candidate contour outlined and the
/// crop band of each accepted region framed.
///
/// The frame spans the full page width because that is what the crop covers.
pub fn annotate(page: &Page, candidates: &[Region], accepted: &[Region]) -> RgbImage {
    let mut canvas = DynamicImage::ImageLuma8(page.image().clone()).to_rgb8();

    for region in candidates {
        draw_contour(&mut canvas, region);
    }

    let width = page.width();
    for region in accepted {
        let bbox = region.bounding_box;
        for t in 0..CROP_THICKNESS {
            let w = width.saturating_sub(2 * t as u32);
            let h = bbox.height.saturating_sub(2 * t as u32);
            if w == 0 || h == 0 {
                break;
            }
            let rect = Rect::at(t, bbox.y as i32 + t).of_size(w, h);
            draw_hollow_rect_mut(&mut canvas, rect, CROP_COLOR);
        }
    }

    canvas
}

fn draw_contour(canvas: &mut RgbImage, region: &Region) {
    let points = &region.contour;
    match points.len() {
        0 => {}
        1 => {
            let p = points[0];
            if let (Ok(x), Ok(y)) = (u32::try_from(p.x), u32::try_from(p.y))
                && x < canvas.width()
                && y < canvas.height()
            {
                canvas.put_pixel(x, y, CONTOUR_COLOR);
            }
        }
        _ => {
            for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
                draw_line_segment_mut(
                    canvas,
                    (a.x as f32, a.y as f32),
                    (b.x as f32, b.y as f32),
                    CONTOUR_COLOR,
                );
            }
        }
    }
}

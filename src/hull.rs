//! Filled convex hull of an image's foreground pixels.
//!
//! The hull vertices come from [`imageproc::geometry::convex_hull`]; the fill
//! is a per-pixel half-plane test against the hull polygon, so every
//! foreground pixel of the input is guaranteed to be foreground in the output.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::{geometry::convex_hull, point::Point};

use crate::binary::{BACKGROUND, FOREGROUND, foreground_mask};

/// Binary raster of the filled convex hull of the input's foreground pixels.
///
/// The input is thresholded at `> 0` (any channel nonzero) to obtain the
/// foreground mask; see [`crate::binary::foreground_mask`]. The output is
/// pixel-wise ≥ that mask. Degenerate foregrounds — empty, a single pixel, or
/// a collinear point set — have no 2D hull interior and yield the foreground
/// mask unchanged.
pub fn convex_hull_mask(image: &DynamicImage) -> GrayImage {
    hull_of_mask(&foreground_mask(image))
}

/// Same as [`convex_hull_mask`], starting from an existing 0/255 mask.
pub fn hull_of_mask(mask: &GrayImage) -> GrayImage {
    let points: Vec<Point<i32>> = mask
        .enumerate_pixels()
        .filter(|(_, _, pixel)| pixel.0[0] > 0)
        .map(|(x, y, _)| Point::new(x as i32, y as i32))
        .collect();

    if points.len() < 3 {
        return mask.clone();
    }

    let hull = convex_hull(&points[..]);
    if hull.len() < 3 {
        // All foreground pixels are collinear.
        return mask.clone();
    }

    fill_convex_polygon(mask.width(), mask.height(), &hull)
}

/// Rasterizes a convex polygon by testing each pixel center against every
/// edge. Boundary pixels count as inside, so hull vertices themselves are
/// always set.
fn fill_convex_polygon(width: u32, height: u32, hull: &[Point<i32>]) -> GrayImage {
    // Shoelace sum fixes the winding so the per-edge sign test is orientation
    // independent.
    let mut doubled_area = 0i64;
    for (i, a) in hull.iter().enumerate() {
        let b = hull[(i + 1) % hull.len()];
        doubled_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    let winding = if doubled_area >= 0 { 1i64 } else { -1i64 };

    let mut filled = GrayImage::from_pixel(width, height, Luma([BACKGROUND]));
    for y in 0..height {
        for x in 0..width {
            let inside = hull.iter().enumerate().all(|(i, a)| {
                let b = hull[(i + 1) % hull.len()];
                let cross = (b.x - a.x) as i64 * (y as i64 - a.y as i64)
                    - (b.y - a.y) as i64 * (x as i64 - a.x as i64);
                cross * winding >= 0
            });
            if inside {
                filled.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
    }
    filled
}

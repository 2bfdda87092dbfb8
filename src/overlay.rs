//! Rendering helpers that turn operation outputs into displayable images.

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::{drawing::draw_line_segment_mut, point::Point};
use num::Num;
use num_traits::AsPrimitive;

/// A binary mask as a displayable black/white image.
pub fn mask_to_display(mask: &GrayImage) -> DynamicImage {
    DynamicImage::ImageLuma8(mask.clone())
}

/// Draws a closed polyline through `points`, connecting the last point back to
/// the first. Points with fewer than two entries draw nothing.
pub fn draw_closed_polyline_mut<T>(canvas: &mut RgbImage, points: &[Point<T>], color: Rgb<u8>)
where
    T: Num + Copy + AsPrimitive<f32>,
{
    if points.len() < 2 {
        return;
    }
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        draw_line_segment_mut(canvas, (a.x.as_(), a.y.as_()), (b.x.as_(), b.y.as_()), color);
    }
}

/// Renders the snake over the source image: the evolved contour in the first
/// contrasting color, the initial contour in the second.
///
/// Contour points are (row, column); drawing coordinates are (x, y).
pub fn snake_overlay(
    image: &DynamicImage,
    initial: &[[f64; 2]],
    snake: &[[f64; 2]],
) -> RgbImage {
    let mut canvas = image.to_rgb8();
    let colors = crate::colors::contrasting_colors(2);

    let to_points = |curve: &[[f64; 2]]| -> Vec<Point<f64>> {
        curve.iter().map(|p| Point::new(p[1], p[0])).collect()
    };
    draw_closed_polyline_mut(&mut canvas, &to_points(initial), colors[1]);
    draw_closed_polyline_mut(&mut canvas, &to_points(snake), colors[0]);
    canvas
}

/// Distinct accent colors for `n` rendered result sections.
pub fn section_colors(n: usize) -> Vec<Rgb<u8>> {
    crate::colors::contrasting_colors(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn mask_display_preserves_values() {
        let mut mask = GrayImage::from_pixel(4, 4, Luma([0]));
        mask.put_pixel(2, 1, Luma([255]));
        let display = mask_to_display(&mask).to_luma8();
        assert_eq!(display.get_pixel(2, 1).0[0], 255);
        assert_eq!(display.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn polyline_draws_all_segments_of_a_square() {
        let mut canvas = RgbImage::from_pixel(12, 12, Rgb([0, 0, 0]));
        let square = [
            Point::new(2i32, 2i32),
            Point::new(9, 2),
            Point::new(9, 9),
            Point::new(2, 9),
        ];
        let white = Rgb([255, 255, 255]);
        draw_closed_polyline_mut(&mut canvas, &square, white);
        // One pixel from each of the four edges, including the closing one.
        assert_eq!(*canvas.get_pixel(5, 2), white);
        assert_eq!(*canvas.get_pixel(9, 5), white);
        assert_eq!(*canvas.get_pixel(5, 9), white);
        assert_eq!(*canvas.get_pixel(2, 5), white);
    }

    #[test]
    fn degenerate_polylines_draw_nothing() {
        let blank = RgbImage::from_pixel(6, 6, Rgb([0, 0, 0]));
        let mut canvas = blank.clone();
        draw_closed_polyline_mut::<i32>(&mut canvas, &[], Rgb([255, 0, 0]));
        draw_closed_polyline_mut(&mut canvas, &[Point::new(3i32, 3i32)], Rgb([255, 0, 0]));
        assert_eq!(canvas, blank);
    }

    #[test]
    fn snake_overlay_burns_both_curves_in() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 40, Luma([0])));
        let initial: Vec<[f64; 2]> = (0..16)
            .map(|i| {
                let s = i as f64 * std::f64::consts::TAU / 16.0;
                [20.0 + 15.0 * s.sin(), 20.0 + 15.0 * s.cos()]
            })
            .collect();
        let snake: Vec<[f64; 2]> = initial
            .iter()
            .map(|p| [20.0 + (p[0] - 20.0) * 0.5, 20.0 + (p[1] - 20.0) * 0.5])
            .collect();

        let canvas = snake_overlay(&image, &initial, &snake);
        assert_eq!(canvas.dimensions(), (40, 40));
        let touched = canvas
            .pixels()
            .filter(|p| p.0 != [0, 0, 0])
            .count();
        assert!(touched > 0, "overlay must draw onto the canvas");
        // Rightmost point of the evolved curve (row 20, col 27.5) → x≈27, y=20.
        let evolved = crate::colors::contrasting_colors(2)[0];
        assert_eq!(*canvas.get_pixel(27, 20), evolved);
    }

    #[test]
    fn section_colors_are_distinct() {
        let colors = section_colors(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }
}

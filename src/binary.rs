//! Foreground thresholding shared by the mask-producing operations.
//!
//! Both the convex hull and the skeleton operate on a `> 0` foreground mask of
//! the input, matching the behavior of the interactive demo this crate backs.

use image::{DynamicImage, GrayImage, Luma};

/// Mask value for foreground pixels.
pub const FOREGROUND: u8 = 255;
/// Mask value for background pixels.
pub const BACKGROUND: u8 = 0;

/// Thresholds an image at `> 0`: a pixel is foreground when any of its color
/// channels is nonzero. The alpha channel, if present, is ignored.
///
/// Returns a 0/255 [`GrayImage`] with the same dimensions as the input.
pub fn foreground_mask(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    let mut mask = GrayImage::from_pixel(rgb.width(), rgb.height(), Luma([BACKGROUND]));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        if pixel.0.iter().any(|&channel| channel > 0) {
            mask.put_pixel(x, y, Luma([FOREGROUND]));
        }
    }
    mask
}

/// Converts the image to grayscale first, then thresholds the luma at `> 0`.
///
/// For an input that is already grayscale the conversion is a no-op, so the
/// 2D path and the multi-channel path produce masks of identical shape.
pub fn grayscale_foreground_mask(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let mut mask = GrayImage::from_pixel(gray.width(), gray.height(), Luma([BACKGROUND]));
    for (x, y, pixel) in gray.enumerate_pixels() {
        if pixel.0[0] > 0 {
            mask.put_pixel(x, y, Luma([FOREGROUND]));
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn nonzero_channels_are_foreground() {
        let mut img = RgbImage::from_pixel(4, 3, Rgb([0, 0, 0]));
        img.put_pixel(1, 1, Rgb([0, 0, 7]));
        img.put_pixel(3, 2, Rgb([200, 0, 0]));

        let mask = foreground_mask(&DynamicImage::ImageRgb8(img));
        assert_eq!(mask.get_pixel(1, 1).0[0], FOREGROUND);
        assert_eq!(mask.get_pixel(3, 2).0[0], FOREGROUND);
        assert_eq!(mask.get_pixel(0, 0).0[0], BACKGROUND);
        assert_eq!(
            mask.pixels().filter(|p| p.0[0] == FOREGROUND).count(),
            2,
            "only the two touched pixels should be foreground"
        );
    }

    #[test]
    fn alpha_alone_is_not_foreground() {
        // Fully opaque but black everywhere: no foreground.
        let img = RgbaImage::from_pixel(5, 5, Rgba([0, 0, 0, 255]));
        let mask = foreground_mask(&DynamicImage::ImageRgba8(img));
        assert!(mask.pixels().all(|p| p.0[0] == BACKGROUND));
    }

    #[test]
    fn grayscale_input_skips_conversion_branch() {
        let mut gray = GrayImage::from_pixel(4, 4, Luma([0]));
        gray.put_pixel(2, 2, Luma([1]));

        let mask = grayscale_foreground_mask(&DynamicImage::ImageLuma8(gray));
        assert_eq!(mask.get_pixel(2, 2).0[0], FOREGROUND);
        assert_eq!(
            mask.pixels().filter(|p| p.0[0] == FOREGROUND).count(),
            1,
            "a single faint pixel still counts as foreground under > 0"
        );
    }
}

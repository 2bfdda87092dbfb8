use image::Rgb;
use palette::{FromColor, Hsl, Srgb};

/// Generates `n` visually distinct, contrasting RGB colors for overlays.
pub(crate) fn contrasting_colors(n: usize) -> Vec<Rgb<u8>> {
    let mut colors = Vec::with_capacity(n);

    for i in 0..n {
        let hue = (i as f32 * 360.0) / n as f32;

        let saturation = 0.9;
        let lightness = 0.5;

        let hsl_color = Hsl::new(hue, saturation, lightness);
        let srgb_linear = Srgb::from_color(hsl_color);
        let srgb_u8: Srgb<u8> = srgb_linear.into_format();

        colors.push(Rgb([srgb_u8.red, srgb_u8.green, srgb_u8.blue]));
    }

    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contrasting_colors_works() {
        assert!(contrasting_colors(0).is_empty());
        assert_eq!(contrasting_colors(1), vec![Rgb([242, 13, 13])]);
        assert_eq!(
            contrasting_colors(2),
            vec![Rgb([242, 13, 13]), Rgb([13, 242, 242])]
        );
        assert_eq!(
            contrasting_colors(3),
            vec![
                Rgb([242, 13, 13]),
                Rgb([13, 242, 13]),
                Rgb([13, 13, 242])
            ]
        );
    }
}

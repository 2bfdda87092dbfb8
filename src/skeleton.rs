//! Morphological skeletonization (Zhang-Suen thinning).
//!
//! Thins the `> 0` foreground mask down to one-pixel-wide curves that preserve
//! the topology of the original shapes. Deletion passes repeat until no pixel
//! changes, so the operation is a fixed point of itself: skeletonizing a
//! skeleton returns it unchanged.

use image::{DynamicImage, GrayImage, Luma};
use log::debug;

use crate::binary::{BACKGROUND, FOREGROUND, grayscale_foreground_mask};

/// Skeletonizes an image.
///
/// Multi-channel input is converted to grayscale first, then thresholded at
/// `> 0`; see [`crate::binary::grayscale_foreground_mask`]. Returns a 0/255
/// binary raster of the morphological skeleton.
pub fn skeletonize(image: &DynamicImage) -> GrayImage {
    skeletonize_mask(&grayscale_foreground_mask(image))
}

/// Skeletonizes an existing 0/255 mask.
pub fn skeletonize_mask(mask: &GrayImage) -> GrayImage {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    let mut grid: Vec<bool> = mask.pixels().map(|p| p.0[0] > 0).collect();

    let mut passes = 0usize;
    loop {
        let removed =
            thin_pass(&mut grid, width, height, Subiteration::First)
                + thin_pass(&mut grid, width, height, Subiteration::Second);
        passes += 1;
        if removed == 0 {
            break;
        }
    }
    debug!("skeletonization reached a fixed point after {passes} passes");

    let mut out = GrayImage::from_pixel(mask.width(), mask.height(), Luma([BACKGROUND]));
    for (i, &on) in grid.iter().enumerate() {
        if on {
            let x = (i % width) as u32;
            let y = (i / width) as u32;
            out.put_pixel(x, y, Luma([FOREGROUND]));
        }
    }
    out
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Subiteration {
    First,
    Second,
}

/// One Zhang-Suen subiteration. Marks deletable pixels against the current
/// grid, then clears them all at once; returns how many were cleared.
fn thin_pass(grid: &mut [bool], width: usize, height: usize, sub: Subiteration) -> usize {
    let mut to_clear = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if !grid[idx] {
                continue;
            }

            // Neighborhood P2..P9, clockwise from north. Out-of-bounds pixels
            // count as background.
            let n = neighborhood(grid, width, height, x, y);
            let count = n.iter().filter(|&&p| p).count();
            if !(2..=6).contains(&count) {
                continue;
            }
            if transitions(&n) != 1 {
                continue;
            }

            let [p2, _, p4, _, p6, _, p8, _] = n;
            let deletable = match sub {
                Subiteration::First => !(p2 && p4 && p6) && !(p4 && p6 && p8),
                Subiteration::Second => !(p2 && p4 && p8) && !(p2 && p6 && p8),
            };
            if deletable {
                to_clear.push(idx);
            }
        }
    }

    for &idx in &to_clear {
        grid[idx] = false;
    }
    to_clear.len()
}

fn neighborhood(grid: &[bool], width: usize, height: usize, x: usize, y: usize) -> [bool; 8] {
    let at = |dx: isize, dy: isize| -> bool {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
            return false;
        }
        grid[ny as usize * width + nx as usize]
    };
    [
        at(0, -1),  // P2 north
        at(1, -1),  // P3
        at(1, 0),   // P4 east
        at(1, 1),   // P5
        at(0, 1),   // P6 south
        at(-1, 1),  // P7
        at(-1, 0),  // P8 west
        at(-1, -1), // P9
    ]
}

/// Number of false→true transitions in the circular P2..P9 sequence.
fn transitions(n: &[bool; 8]) -> usize {
    (0..8).filter(|&i| !n[i] && n[(i + 1) % 8]).count()
}

//! Active-contour ("snake") segmentation.
//!
//! Evolves a closed curve against the Sobel edge energy of the image using the
//! classic semi-implicit scheme: the internal (smoothness + stiffness) energy
//! forms a periodic pentadiagonal system that is inverted once, and every
//! iteration applies the inverse to the external image force plus the current
//! curve. Points are stored in (row, column) convention.

use image::DynamicImage;
use log::debug;
use nalgebra::{DMatrix, DVector};

/// Number of points on the contour produced by [`active_contour`].
pub const CONTOUR_POINTS: usize = 400;

const INIT_RADIUS: f64 = 100.0;
const INIT_CENTER_ROW: f64 = 100.0;
const INIT_CENTER_COL: f64 = 220.0;
const CONVERGENCE_WINDOW: usize = 10;

/// Parameters of the evolution. [`Default`] matches the fixed values used by
/// the interactive demo: alpha 0.015, beta 10, gamma 0.001, pure edge energy.
#[derive(Debug, Clone, Copy)]
pub struct SnakeParams {
    /// Smoothing (contour-length) weight.
    pub alpha: f64,
    /// Stiffness (curvature) weight.
    pub beta: f64,
    /// Explicit time-step weight.
    pub gamma: f64,
    /// Weight of the raw intensity in the image energy.
    pub w_line: f64,
    /// Weight of the Sobel edge magnitude in the image energy.
    pub w_edge: f64,
    /// Per-axis, per-iteration displacement clamp in pixels.
    pub max_px_move: f64,
    /// Iteration cap; reaching it is not an error.
    pub max_iterations: usize,
    /// Convergence threshold on the L1 displacement against recent snapshots.
    pub convergence: f64,
}

impl Default for SnakeParams {
    fn default() -> Self {
        Self {
            alpha: 0.015,
            beta: 10.0,
            gamma: 0.001,
            w_line: 0.0,
            w_edge: 1.0,
            max_px_move: 1.0,
            max_iterations: 2500,
            convergence: 0.1,
        }
    }
}

/// The fixed circular initial contour: [`CONTOUR_POINTS`] points parametrized
/// by sine/cosine over [0, 2π] (endpoint included), radius 100, centered at
/// (row 100, column 220).
pub fn initial_contour() -> Vec<[f64; 2]> {
    (0..CONTOUR_POINTS)
        .map(|i| {
            let s = i as f64 * std::f64::consts::TAU / (CONTOUR_POINTS - 1) as f64;
            [
                INIT_CENTER_ROW + INIT_RADIUS * s.sin(),
                INIT_CENTER_COL + INIT_RADIUS * s.cos(),
            ]
        })
        .collect()
}

/// Evolves the fixed initial contour against the image with default
/// parameters. Multi-channel input is converted to grayscale first.
///
/// Always returns exactly [`CONTOUR_POINTS`] ordered (row, column) points,
/// whatever the input size; non-convergence just returns the curve at the
/// iteration cap.
pub fn active_contour(image: &DynamicImage) -> Vec<[f64; 2]> {
    evolve_contour(image, initial_contour(), &SnakeParams::default())
}

/// Evolves an arbitrary closed contour against the image.
///
/// The returned curve has exactly as many points as `init`.
///
/// # Panics
///
/// Panics if the internal-energy system is not invertible, which cannot happen
/// for `gamma > 0`.
pub fn evolve_contour(
    image: &DynamicImage,
    init: Vec<[f64; 2]>,
    params: &SnakeParams,
) -> Vec<[f64; 2]> {
    let n = init.len();
    if n == 0 {
        return init;
    }
    let energy = image_energy(image, params);
    if energy.width == 0 || energy.height == 0 {
        return init;
    }
    let (force_row, force_col) = gradient_fields(&energy);

    let inverse = internal_energy_matrix(n, params)
        .try_inverse()
        .expect("periodic internal-energy matrix is invertible for gamma > 0");

    let mut rows = DVector::from_iterator(n, init.iter().map(|p| p[0]));
    let mut cols = DVector::from_iterator(n, init.iter().map(|p| p[1]));

    // Snapshot ring used by the convergence test: every window-plus-one
    // iterations the current curve is compared against the saved window.
    let mut snapshots: Vec<(DVector<f64>, DVector<f64>)> =
        vec![(rows.clone(), cols.clone()); CONVERGENCE_WINDOW];

    for iteration in 0..params.max_iterations {
        let f_row = DVector::from_fn(n, |i, _| force_row.bilinear(rows[i], cols[i]));
        let f_col = DVector::from_fn(n, |i, _| force_col.bilinear(rows[i], cols[i]));

        let next_rows = &inverse * (&rows * params.gamma + f_row);
        let next_cols = &inverse * (&cols * params.gamma + f_col);

        for i in 0..n {
            rows[i] += params.max_px_move * (next_rows[i] - rows[i]).tanh();
            cols[i] += params.max_px_move * (next_cols[i] - cols[i]).tanh();
        }

        let slot = iteration % (CONVERGENCE_WINDOW + 1);
        if slot < CONVERGENCE_WINDOW {
            snapshots[slot] = (rows.clone(), cols.clone());
        } else {
            let displacement = snapshots
                .iter()
                .map(|(sr, sc)| {
                    (0..n)
                        .map(|i| (sr[i] - rows[i]).abs() + (sc[i] - cols[i]).abs())
                        .fold(0.0, f64::max)
                })
                .fold(f64::INFINITY, f64::min);
            if displacement < params.convergence {
                debug!("active contour converged after {} iterations", iteration + 1);
                return collect_points(&rows, &cols);
            }
        }
    }

    debug!(
        "active contour stopped at the {}-iteration cap",
        params.max_iterations
    );
    collect_points(&rows, &cols)
}

fn collect_points(rows: &DVector<f64>, cols: &DVector<f64>) -> Vec<[f64; 2]> {
    rows.iter()
        .zip(cols.iter())
        .map(|(&r, &c)| [r, c])
        .collect()
}

/// Dense scalar field over the image grid, row-major.
struct ScalarField {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl ScalarField {
    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.width + col]
    }

    /// Bilinear sample with coordinates clamped to the grid.
    fn bilinear(&self, row: f64, col: f64) -> f64 {
        let r = row.clamp(0.0, (self.height - 1) as f64);
        let c = col.clamp(0.0, (self.width - 1) as f64);
        let r0 = r.floor() as usize;
        let c0 = c.floor() as usize;
        let r1 = (r0 + 1).min(self.height - 1);
        let c1 = (c0 + 1).min(self.width - 1);
        let fr = r - r0 as f64;
        let fc = c - c0 as f64;
        let top = self.get(r0, c0) * (1.0 - fc) + self.get(r0, c1) * fc;
        let bottom = self.get(r1, c0) * (1.0 - fc) + self.get(r1, c1) * fc;
        top * (1.0 - fr) + bottom * fr
    }
}

/// Image energy the snake climbs: `w_line * intensity + w_edge * |∇I|`,
/// with the Sobel magnitude as the edge term.
fn image_energy(image: &DynamicImage, params: &SnakeParams) -> ScalarField {
    let gray = image.to_luma32f();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    let intensity = ScalarField {
        width,
        height,
        data: gray.pixels().map(|p| p.0[0] as f64).collect(),
    };
    if width == 0 || height == 0 {
        return intensity;
    }

    let mut data = vec![0.0; width * height];
    if params.w_edge != 0.0 {
        let edge = sobel_magnitude(&intensity);
        for i in 0..data.len() {
            data[i] = params.w_line * intensity.data[i] + params.w_edge * edge.data[i];
        }
    } else {
        for i in 0..data.len() {
            data[i] = params.w_line * intensity.data[i];
        }
    }
    ScalarField {
        width,
        height,
        data,
    }
}

/// Sobel gradient magnitude with replicated borders.
fn sobel_magnitude(intensity: &ScalarField) -> ScalarField {
    let width = intensity.width;
    let height = intensity.height;
    let mut data = vec![0.0; width * height];
    for row in 0..height {
        for col in 0..width {
            let s = |dr: isize, dc: isize| -> f64 {
                let r = (row as isize + dr).clamp(0, height as isize - 1) as usize;
                let c = (col as isize + dc).clamp(0, width as isize - 1) as usize;
                intensity.get(r, c)
            };
            let g_row = (s(1, -1) + 2.0 * s(1, 0) + s(1, 1)
                - s(-1, -1)
                - 2.0 * s(-1, 0)
                - s(-1, 1))
                / 4.0;
            let g_col = (s(-1, 1) + 2.0 * s(0, 1) + s(1, 1)
                - s(-1, -1)
                - 2.0 * s(0, -1)
                - s(1, -1))
                / 4.0;
            data[row * width + col] = g_row.hypot(g_col);
        }
    }
    ScalarField {
        width,
        height,
        data,
    }
}

/// Central-difference gradients of the energy field (one-sided at borders),
/// returned as (d/d_row, d/d_col).
fn gradient_fields(energy: &ScalarField) -> (ScalarField, ScalarField) {
    let width = energy.width;
    let height = energy.height;
    let mut d_row = vec![0.0; width * height];
    let mut d_col = vec![0.0; width * height];
    for row in 0..height {
        for col in 0..width {
            let idx = row * width + col;
            d_row[idx] = if height == 1 {
                0.0
            } else if row == 0 {
                energy.get(1, col) - energy.get(0, col)
            } else if row == height - 1 {
                energy.get(row, col) - energy.get(row - 1, col)
            } else {
                (energy.get(row + 1, col) - energy.get(row - 1, col)) / 2.0
            };
            d_col[idx] = if width == 1 {
                0.0
            } else if col == 0 {
                energy.get(row, 1) - energy.get(row, 0)
            } else if col == width - 1 {
                energy.get(row, col) - energy.get(row, col - 1)
            } else {
                (energy.get(row, col + 1) - energy.get(row, col - 1)) / 2.0
            };
        }
    }
    (
        ScalarField {
            width,
            height,
            data: d_row,
        },
        ScalarField {
            width,
            height,
            data: d_col,
        },
    )
}

/// `gamma I - alpha D2 + beta D4` with periodic second/fourth difference
/// operators. Entries accumulate: on tiny contours the wrapped offsets
/// collide and their coefficients must sum.
fn internal_energy_matrix(n: usize, params: &SnakeParams) -> DMatrix<f64> {
    let mut m = DMatrix::zeros(n, n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        let prev2 = (i + n - 2) % n;
        let next2 = (i + 2) % n;
        m[(i, i)] += params.gamma + 2.0 * params.alpha + 6.0 * params.beta;
        m[(i, prev)] += -params.alpha - 4.0 * params.beta;
        m[(i, next)] += -params.alpha - 4.0 * params.beta;
        m[(i, prev2)] += params.beta;
        m[(i, next2)] += params.beta;
    }
    m
}

//! Operation identifiers and the dispatcher that maps them to handlers.
//!
//! Every handler reads the original image only, so selected operations are
//! independent of each other: adding one to the selection can never change
//! another's result.

use image::{DynamicImage, GrayImage};

use crate::{hull, skeleton, snake};

/// The operations offered by the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ConvexHull,
    Skeletonize,
    ActiveContour,
}

impl Operation {
    /// All operations, in the fixed order results are rendered in.
    pub const ALL: [Operation; 3] = [
        Operation::ConvexHull,
        Operation::Skeletonize,
        Operation::ActiveContour,
    ];

    /// Human-readable name used for section headings.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::ConvexHull => "Convex Hull",
            Operation::Skeletonize => "Skeletonization",
            Operation::ActiveContour => "Active Contour",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of a single operation: a binary raster or a closed curve of
/// (row, column) points.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    Mask(GrayImage),
    Contour(Vec<[f64; 2]>),
}

/// Runs one operation against the image.
pub fn run(op: Operation, image: &DynamicImage) -> OperationOutput {
    match op {
        Operation::ConvexHull => OperationOutput::Mask(hull::convex_hull_mask(image)),
        Operation::Skeletonize => OperationOutput::Mask(skeleton::skeletonize(image)),
        Operation::ActiveContour => OperationOutput::Contour(snake::active_contour(image)),
    }
}

/// Runs every selected operation against the original image, in
/// [`Operation::ALL`] order. An empty selection yields an empty result list.
pub fn run_selected(
    selected: &[Operation],
    image: &DynamicImage,
) -> Vec<(Operation, OperationOutput)> {
    Operation::ALL
        .into_iter()
        .filter(|op| selected.contains(op))
        .map(|op| (op, run(op, image)))
        .collect()
}

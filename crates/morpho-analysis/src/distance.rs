// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Path and Euclidean Distances
// ─────────────────────────────────────────────────────────────────────

use nalgebra::Point3;

use morpho_core::{traversal, SectionArena, SectionId};

use crate::geometry::section_length;

/// Longest path from the arbor root's first sample to any section end,
/// measured along the tree.
pub fn maximum_path_distance(arena: &SectionArena, root: SectionId) -> f64 {
    let mut maximum = 0.0f64;
    traversal::descend(arena, root, 0.0f64, |section, upstream| {
        let reach = upstream + section_length(section);
        maximum = maximum.max(reach);
        reach
    });
    maximum
}

/// Farthest straight-line distance of any sample from `origin`.
pub fn maximum_euclidean_distance(
    arena: &SectionArena,
    root: SectionId,
    origin: &Point3<f64>,
) -> f64 {
    let mut maximum = 0.0f64;
    traversal::apply(arena, root, |section| {
        for sample in section.samples() {
            maximum = maximum.max(nalgebra::distance(&sample.point, origin));
        }
    });
    maximum
}

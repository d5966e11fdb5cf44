// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Analysis
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Geometric kernels, per-arbor statistics and the morphology-level
//! Aggregation Engine.
//!
//! # Analysis Invariants
//!
//! 1. **Degenerate is not an error**: a section with fewer than two
//!    samples contributes a zero measure and no segments.
//!
//! 2. **Empty pools fail**: combining no values, or only zeros under the
//!    ignore-zero average, returns an error rather than a silent zero.
//!
//! 3. **Analysis is read-only**: kernels borrow the morphology shared;
//!    only `compute_stats` and `MorphologyAnalyzer::record` write, and
//!    only into the stats record.

pub mod aggregate;
pub mod analyzer;
pub mod angle;
pub mod distance;
pub mod geometry;
pub mod short;
pub mod statistic;
pub mod stats;
pub mod topology;

pub use aggregate::{aggregate, combine, per_arbor, reduce_or_zero, Aggregation};
pub use analyzer::MorphologyAnalyzer;
pub use angle::{bifurcation_angle, AngleKind};
pub use geometry::{
    section_length, section_measure, section_surface_area, section_volume, segment_length,
    segment_surface_area, segment_volume, Measure,
};
pub use short::{minimal_length, short_section, short_sections};
pub use statistic::{Count, Statistic};
pub use stats::compute_stats;
pub use topology::{arbor_topology, ArborTopology};

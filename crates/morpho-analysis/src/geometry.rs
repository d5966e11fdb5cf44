// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Tapered-Cylinder Geometry
// ─────────────────────────────────────────────────────────────────────
//! Closed-form per-segment and per-section measures.
//!
//! A segment is the frustum between two consecutive samples with radii
//! r0, r1 separated by length L:
//!
//! - length  = L
//! - area    = π (r0 + r1) √((r0 − r1)² + L²) + π (r0² + r1²)
//! - volume  = (π / 3) L (r0² + r0 r1 + r1²)
//!
//! The area caps both ends of every segment, so caps shared by
//! consecutive segments of one section are counted twice. Published
//! figures were produced with this formula and it is kept as is.
//!
//! A section with fewer than two samples has no segments and measures 0.

use std::f64::consts::PI;

use morpho_core::{Sample, Section};

/// Quantity measured by a geometric kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    Length,
    SurfaceArea,
    Volume,
}

#[inline]
pub fn segment_length(a: &Sample, b: &Sample) -> f64 {
    a.distance_to(b)
}

#[inline]
pub fn segment_surface_area(a: &Sample, b: &Sample) -> f64 {
    let (r0, r1) = (a.radius, b.radius);
    let l = segment_length(a, b);
    PI * (r0 + r1) * ((r0 - r1).powi(2) + l * l).sqrt() + PI * (r0 * r0 + r1 * r1)
}

#[inline]
pub fn segment_volume(a: &Sample, b: &Sample) -> f64 {
    let (r0, r1) = (a.radius, b.radius);
    PI / 3.0 * segment_length(a, b) * (r0 * r0 + r0 * r1 + r1 * r1)
}

#[inline]
pub fn segment_measure(a: &Sample, b: &Sample, measure: Measure) -> f64 {
    match measure {
        Measure::Length => segment_length(a, b),
        Measure::SurfaceArea => segment_surface_area(a, b),
        Measure::Volume => segment_volume(a, b),
    }
}

/// Sum of the segment measure along the section.
pub fn section_measure(section: &Section, measure: Measure) -> f64 {
    section
        .segments()
        .map(|(a, b)| segment_measure(a, b, measure))
        .sum()
}

/// Integrated from the section's first sample. For a root section this
/// includes any pre-soma samples the reader did not strip.
pub fn section_length(section: &Section) -> f64 {
    section_measure(section, Measure::Length)
}

pub fn section_surface_area(section: &Section) -> f64 {
    section_measure(section, Measure::SurfaceArea)
}

pub fn section_volume(section: &Section) -> f64 {
    section_measure(section, Measure::Volume)
}

/// One value per segment, in sample order.
pub fn segment_measures(section: &Section, measure: Measure) -> impl Iterator<Item = f64> + '_ {
    section
        .segments()
        .map(move |(a, b)| segment_measure(a, b, measure))
}

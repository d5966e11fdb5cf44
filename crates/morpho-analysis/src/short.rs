// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Short-Section Detection
// ─────────────────────────────────────────────────────────────────────
//! A section with more than one sample is short when its length is
//! below 2 × (first radius + last radius). Detection only reports;
//! compression lives in the repair crate.

use morpho_core::{traversal, Section, SectionArena, SectionId};
use morpho_types::ShortSection;

use crate::geometry::section_length;

/// Minimal admissible length from the section's own end radii.
pub fn minimal_length(section: &Section) -> Option<f64> {
    if section.samples().len() < 2 {
        return None;
    }
    let first = section.first_sample()?;
    let last = section.last_sample()?;
    Some(2.0 * (first.radius + last.radius))
}

/// Report entry when `section` is short.
pub fn short_section(section: &Section) -> Option<ShortSection> {
    let minimal = minimal_length(section)?;
    let length = section_length(section);
    (length < minimal).then(|| ShortSection {
        section_id: section.id().index(),
        length,
        minimal_length: minimal,
    })
}

/// Short sections of one arbor, in pre-order.
pub fn short_sections(arena: &SectionArena, root: SectionId) -> Vec<ShortSection> {
    let mut out = Vec::new();
    traversal::apply(arena, root, |s| out.extend(short_section(s)));
    out
}

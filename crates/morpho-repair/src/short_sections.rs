// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Short-Section Radius Compression
// ─────────────────────────────────────────────────────────────────────
//! A section shorter than 2 × (parent last radius + own last radius),
//! optionally scaled by √2, has every radius set to length / 4. The new
//! radius is also written to the parent's last sample and to the first
//! sample of every sibling so the branch point stays consistent.
//!
//! Root sections use their own first radius in place of the parent's
//! and propagate nothing. Samples are never removed.

use morpho_analysis::section_length;
use morpho_core::{traversal, SectionArena, SectionId};
use morpho_types::MorphoResult;

/// Compress `id` if it is short. Returns whether any radius changed.
pub fn compress_short_section(
    arena: &mut SectionArena,
    id: SectionId,
    factor: f64,
) -> MorphoResult<bool> {
    let section = arena.get(id)?;
    if section.is_degenerate() {
        return Ok(false);
    }
    let parent = section.parent();
    let anchor = match parent {
        Some(p) => arena[p].last_sample().map(|s| s.radius),
        None => section.first_sample().map(|s| s.radius),
    };
    let (Some(anchor), Some(last)) = (anchor, section.last_sample().map(|s| s.radius)) else {
        return Ok(false);
    };

    let length = section_length(section);
    let threshold = 2.0 * (anchor + last) * factor;
    if length >= threshold {
        return Ok(false);
    }
    if length == 0.0 {
        log::warn!("section {id} has zero length, radius compression skipped");
        return Ok(false);
    }

    let radius = length / 4.0;
    let mut changed = false;
    for sample in arena[id].samples_mut().iter_mut() {
        changed |= sample.radius != radius;
        sample.radius = radius;
    }
    if let Some(p) = parent {
        if let Some(end) = arena[p].samples_mut().last_mut() {
            changed |= end.radius != radius;
            end.radius = radius;
        }
        for sibling in arena.siblings(id) {
            if let Some(start) = arena[sibling].samples_mut().first_mut() {
                changed |= start.radius != radius;
                start.radius = radius;
            }
        }
    }
    if changed {
        log::debug!(
            "compressed short section {id}: length {length:.4} < {threshold:.4}, radius {radius:.4}"
        );
    }
    Ok(changed)
}

/// Compress every short section of an arbor. Returns the count changed.
pub fn compress_short_sections(
    arena: &mut SectionArena,
    root: SectionId,
    factor: f64,
) -> MorphoResult<usize> {
    let mut compressed = 0usize;
    traversal::apply_mut(arena, root, |arena, id| {
        if compress_short_section(arena, id, factor)? {
            compressed += 1;
        }
        Ok(())
    })?;
    Ok(compressed)
}

#[cfg(test)]
mod tests {
    use morpho_core::{Sample, SectionType};

    use super::*;

    fn branch_point() -> (SectionArena, SectionId, SectionId, SectionId) {
        let mut arena = SectionArena::new();
        let parent = arena.insert(
            SectionType::BasalDendrite,
            vec![Sample::at(0.0, 0.0, 0.0, 0.1), Sample::at(5.0, 0.0, 0.0, 0.1)],
        );
        let short = arena
            .insert_child(
                parent,
                SectionType::BasalDendrite,
                vec![Sample::at(5.0, 0.0, 0.0, 0.1), Sample::at(5.05, 0.0, 0.0, 0.1)],
            )
            .unwrap();
        let sibling = arena
            .insert_child(
                parent,
                SectionType::BasalDendrite,
                vec![Sample::at(5.0, 0.0, 0.0, 0.1), Sample::at(5.0, 3.0, 0.0, 0.1)],
            )
            .unwrap();
        (arena, parent, short, sibling)
    }

    #[test]
    fn test_compression_propagates_to_branch_point() {
        let (mut arena, parent, short, sibling) = branch_point();
        assert!(compress_short_section(&mut arena, short, 1.0).unwrap());
        for s in arena[short].samples() {
            assert!((s.radius - 0.0125).abs() < 1e-12);
        }
        assert!((arena[parent].last_sample().unwrap().radius - 0.0125).abs() < 1e-12);
        assert!((arena[sibling].first_sample().unwrap().radius - 0.0125).abs() < 1e-12);
        // Untouched away from the branch point.
        assert_eq!(arena[parent].first_sample().unwrap().radius, 0.1);
        assert_eq!(arena[sibling].last_sample().unwrap().radius, 0.1);
    }

    #[test]
    fn test_compression_is_stable() {
        let (mut arena, parent, _, _) = branch_point();
        assert_eq!(compress_short_sections(&mut arena, parent, 1.0).unwrap(), 1);
        let after = arena.clone();
        assert_eq!(compress_short_sections(&mut arena, parent, 1.0).unwrap(), 0);
        assert_eq!(arena, after);
    }

    #[test]
    fn test_subdivision_factor_widens_threshold() {
        let mut arena = SectionArena::new();
        // length 0.5, threshold 0.4 without and ≈0.566 with the √2 factor.
        let root = arena.insert(
            SectionType::Axon,
            vec![Sample::at(0.0, 0.0, 0.0, 0.1), Sample::at(0.5, 0.0, 0.0, 0.1)],
        );
        assert!(!compress_short_section(&mut arena, root, 1.0).unwrap());
        assert!(compress_short_section(&mut arena, root, std::f64::consts::SQRT_2).unwrap());
        assert!((arena[root].first_sample().unwrap().radius - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_section_untouched() {
        let mut arena = SectionArena::new();
        let id = arena.insert(SectionType::Axon, vec![Sample::at(0.0, 0.0, 0.0, 1.0)]);
        assert!(!compress_short_section(&mut arena, id, 1.0).unwrap());
        assert_eq!(arena[id].samples()[0].radius, 1.0);
    }
}

// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Bifurcation Angles
// ─────────────────────────────────────────────────────────────────────
//! Angle between the two children of a bifurcation, in degrees.
//!
//! - **Local**: initial tangent of each child (first → second sample,
//!   falling back to first → third when the leading samples coincide).
//! - **Global**: overall child direction (first → last sample).
//!
//! Sections with 0, 1 or more than 2 children, and children whose
//! direction is degenerate, produce no angle.

use nalgebra::Vector3;

use morpho_core::{Section, SectionArena};

/// Which child direction the angle is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AngleKind {
    Local,
    Global,
}

/// Unit initial tangent of a section, or `None` when degenerate.
pub fn initial_direction(section: &Section, epsilon: f64) -> Option<Vector3<f64>> {
    let samples = section.samples();
    let first = samples.first()?;
    samples
        .iter()
        .skip(1)
        .take(2)
        .map(|s| s.point - first.point)
        .find(|v| v.norm() >= epsilon)
        .map(|v| v.normalize())
}

/// Unit first → last direction of a section, or `None` when degenerate.
pub fn end_to_end_direction(section: &Section, epsilon: f64) -> Option<Vector3<f64>> {
    let first = section.first_sample()?;
    let last = section.last_sample()?;
    let v = last.point - first.point;
    if section.samples().len() < 2 || v.norm() < epsilon {
        return None;
    }
    Some(v.normalize())
}

/// Unit terminal tangent of a section (second-to-last → last sample).
pub fn terminal_direction(section: &Section, epsilon: f64) -> Option<Vector3<f64>> {
    let samples = section.samples();
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let v = samples[n - 1].point - samples[n - 2].point;
    if v.norm() < epsilon {
        return None;
    }
    Some(v.normalize())
}

/// Angle between two unit vectors in degrees, in [0, 180].
#[inline]
pub fn angle_between_degrees(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Bifurcation angle at `section`, if it is a well-formed bifurcation.
pub fn bifurcation_angle(
    arena: &SectionArena,
    section: &Section,
    kind: AngleKind,
    epsilon: f64,
) -> Option<f64> {
    if !section.is_bifurcation() {
        return None;
    }
    let direction = |child: &Section| match kind {
        AngleKind::Local => initial_direction(child, epsilon),
        AngleKind::Global => end_to_end_direction(child, epsilon),
    };
    let first = &arena[section.children()[0]];
    let second = &arena[section.children()[1]];
    match (direction(first), direction(second)) {
        (Some(a), Some(b)) => Some(angle_between_degrees(&a, &b)),
        _ => {
            log::warn!(
                "bifurcation at section {} has a degenerate child direction, angle skipped",
                section.id()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use morpho_core::{Sample, SectionId, SectionType};

    use super::*;

    const EPS: f64 = 1e-6;

    fn fork(left: Vec<Sample>, right: Vec<Sample>) -> (SectionArena, SectionId) {
        let mut arena = SectionArena::new();
        let root = arena.insert(
            SectionType::BasalDendrite,
            vec![Sample::at(-1.0, 0.0, 0.0, 1.0), Sample::at(0.0, 0.0, 0.0, 1.0)],
        );
        arena.insert_child(root, SectionType::BasalDendrite, left).unwrap();
        arena.insert_child(root, SectionType::BasalDendrite, right).unwrap();
        (arena, root)
    }

    #[test]
    fn test_identical_directions_zero() {
        let (arena, root) = fork(
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(1.0, 0.0, 0.0, 1.0)],
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(2.0, 0.0, 0.0, 1.0)],
        );
        let angle = bifurcation_angle(&arena, &arena[root], AngleKind::Local, EPS).unwrap();
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn test_opposite_directions_180() {
        let (arena, root) = fork(
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(1.0, 0.0, 0.0, 1.0)],
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(-1.0, 0.0, 0.0, 1.0)],
        );
        let angle = bifurcation_angle(&arena, &arena[root], AngleKind::Local, EPS).unwrap();
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_angle() {
        let (arena, root) = fork(
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(1.0, 0.0, 0.0, 1.0)],
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(0.0, 5.0, 0.0, 1.0)],
        );
        let angle = bifurcation_angle(&arena, &arena[root], AngleKind::Global, EPS).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_leading_sample_falls_back() {
        let (arena, root) = fork(
            vec![
                Sample::at(0.0, 0.0, 0.0, 1.0),
                Sample::at(0.0, 0.0, 0.0, 1.0),
                Sample::at(0.0, 1.0, 0.0, 1.0),
            ],
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(1.0, 0.0, 0.0, 1.0)],
        );
        let angle = bifurcation_angle(&arena, &arena[root], AngleKind::Local, EPS).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_fully_degenerate_child_skipped() {
        let (arena, root) = fork(
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(0.0, 0.0, 0.0, 1.0)],
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(1.0, 0.0, 0.0, 1.0)],
        );
        assert!(bifurcation_angle(&arena, &arena[root], AngleKind::Local, EPS).is_none());
        assert!(bifurcation_angle(&arena, &arena[root], AngleKind::Global, EPS).is_none());
    }

    #[test]
    fn test_local_vs_global_differ() {
        // Left child starts along +x then bends to +y.
        let (arena, root) = fork(
            vec![
                Sample::at(0.0, 0.0, 0.0, 1.0),
                Sample::at(1.0, 0.0, 0.0, 1.0),
                Sample::at(1.0, 10.0, 0.0, 1.0),
            ],
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(1.0, 0.0, 0.0, 1.0)],
        );
        let local = bifurcation_angle(&arena, &arena[root], AngleKind::Local, EPS).unwrap();
        let global = bifurcation_angle(&arena, &arena[root], AngleKind::Global, EPS).unwrap();
        assert!(local.abs() < 1e-9);
        assert!(global > 80.0);
    }

    #[test]
    fn test_non_bifurcation_has_no_angle() {
        let mut arena = SectionArena::new();
        let root = arena.insert(
            SectionType::Axon,
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(1.0, 0.0, 0.0, 1.0)],
        );
        assert!(bifurcation_angle(&arena, &arena[root], AngleKind::Local, EPS).is_none());
        arena
            .insert_child(
                root,
                SectionType::Axon,
                vec![Sample::at(1.0, 0.0, 0.0, 1.0), Sample::at(2.0, 0.0, 0.0, 1.0)],
            )
            .unwrap();
        assert!(bifurcation_angle(&arena, &arena[root], AngleKind::Local, EPS).is_none());
    }

    #[test]
    fn test_terminal_direction() {
        let mut arena = SectionArena::new();
        let id = arena.insert(
            SectionType::Axon,
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(0.0, 0.0, 2.0, 1.0)],
        );
        let d = terminal_direction(&arena[id], EPS).unwrap();
        assert!((d.z - 1.0).abs() < 1e-12);
    }
}

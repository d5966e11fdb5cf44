// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Topological Counts
// ─────────────────────────────────────────────────────────────────────

use morpho_core::{traversal, SectionArena, SectionId};

/// Counts over one arbor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArborTopology {
    pub sections: usize,
    pub samples: usize,
    pub segments: usize,
    /// Sections with exactly two children.
    pub bifurcations: usize,
    /// Sections with more than two children.
    pub multifurcations: usize,
    /// Sections without children.
    pub terminals: usize,
    /// Root has order 1.
    pub maximum_branch_order: usize,
    pub zero_radius_samples: usize,
}

pub fn arbor_topology(arena: &SectionArena, root: SectionId) -> ArborTopology {
    let mut t = ArborTopology::default();
    traversal::descend(arena, root, 0usize, |section, parent_order| {
        let order = parent_order + 1;
        t.sections += 1;
        t.samples += section.samples().len();
        t.segments += section.segment_count();
        match section.children().len() {
            0 => t.terminals += 1,
            1 => {}
            2 => t.bifurcations += 1,
            _ => t.multifurcations += 1,
        }
        t.maximum_branch_order = t.maximum_branch_order.max(order);
        t.zero_radius_samples += section.samples().iter().filter(|s| s.radius == 0.0).count();
        order
    });
    t
}

#[cfg(test)]
mod tests {
    use morpho_core::{Sample, SectionType};

    use super::*;

    fn samples(n: usize) -> Vec<Sample> {
        (0..n).map(|i| Sample::at(i as f64, 0.0, 0.0, 1.0)).collect()
    }

    #[test]
    fn test_counts() {
        let mut arena = SectionArena::new();
        let root = arena.insert(SectionType::Axon, samples(3));
        let a = arena.insert_child(root, SectionType::Axon, samples(2)).unwrap();
        arena.insert_child(root, SectionType::Axon, samples(1)).unwrap();
        for _ in 0..3 {
            arena.insert_child(a, SectionType::Axon, samples(2)).unwrap();
        }
        let t = arbor_topology(&arena, root);
        assert_eq!(t.sections, 6);
        assert_eq!(t.samples, 3 + 2 + 1 + 6);
        assert_eq!(t.segments, 2 + 1 + 0 + 3);
        assert_eq!(t.bifurcations, 1);
        assert_eq!(t.multifurcations, 1);
        assert_eq!(t.terminals, 4);
        assert_eq!(t.maximum_branch_order, 3);
        assert_eq!(t.zero_radius_samples, 0);
    }

    #[test]
    fn test_zero_radius_counted() {
        let mut arena = SectionArena::new();
        let root = arena.insert(
            SectionType::Axon,
            vec![Sample::at(0.0, 0.0, 0.0, 0.0), Sample::at(1.0, 0.0, 0.0, 0.0)],
        );
        assert_eq!(arbor_topology(&arena, root).zero_radius_samples, 2);
    }
}

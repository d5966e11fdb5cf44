// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Morphology Aggregate
// ─────────────────────────────────────────────────────────────────────
//! One soma, the section arena, and the arbor roots grouped by role.

use morpho_types::{MorphoError, MorphoResult, MorphologyStats};

use crate::section::{SectionArena, SectionId, SectionType};
use crate::soma::Soma;

/// Semantic role of an arbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArborRole {
    ApicalDendrite,
    BasalDendrite,
    Axon,
}

impl ArborRole {
    pub const ALL: [ArborRole; 3] = [Self::ApicalDendrite, Self::BasalDendrite, Self::Axon];

    /// Role implied by a root section's structure type.
    pub fn from_section_type(section_type: SectionType) -> Option<Self> {
        match section_type {
            SectionType::ApicalDendrite => Some(Self::ApicalDendrite),
            SectionType::BasalDendrite => Some(Self::BasalDendrite),
            SectionType::Axon => Some(Self::Axon),
            SectionType::Soma | SectionType::Undefined => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ApicalDendrite => "apical dendrite",
            Self::BasalDendrite => "basal dendrite",
            Self::Axon => "axon",
        }
    }
}

/// A root section plus its role tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arbor {
    pub role: ArborRole,
    pub root: SectionId,
}

/// Whole-cell skeleton.
#[derive(Debug, Clone)]
pub struct Morphology {
    label: String,
    soma: Soma,
    arena: SectionArena,
    apical_dendrites: Vec<SectionId>,
    basal_dendrites: Vec<SectionId>,
    axons: Vec<SectionId>,
    /// Populated lazily by the analysis kernels.
    pub stats: MorphologyStats,
}

impl Morphology {
    /// Assemble a morphology and validate its trees.
    ///
    /// Besides the per-arbor checks of `validate`, every section in the
    /// arena must be reachable from exactly one arbor root.
    pub fn new(
        label: impl Into<String>,
        soma: Soma,
        arena: SectionArena,
        apical_dendrites: Vec<SectionId>,
        basal_dendrites: Vec<SectionId>,
        axons: Vec<SectionId>,
    ) -> MorphoResult<Self> {
        let morphology = Self {
            label: label.into(),
            soma,
            arena,
            apical_dendrites,
            basal_dendrites,
            axons,
            stats: MorphologyStats::default(),
        };
        let reached = morphology.check_trees()?;
        if reached != morphology.arena.len() {
            return Err(MorphoError::MalformedTree(format!(
                "{} of {} sections are not reachable from any arbor root",
                morphology.arena.len() - reached,
                morphology.arena.len()
            )));
        }
        Ok(morphology)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn soma(&self) -> &Soma {
        &self.soma
    }

    pub fn arena(&self) -> &SectionArena {
        &self.arena
    }

    /// Mutable arena access for repair passes.
    pub fn arena_mut(&mut self) -> &mut SectionArena {
        &mut self.arena
    }

    /// Roots of one role, in input order.
    pub fn roots(&self, role: ArborRole) -> &[SectionId] {
        match role {
            ArborRole::ApicalDendrite => &self.apical_dendrites,
            ArborRole::BasalDendrite => &self.basal_dendrites,
            ArborRole::Axon => &self.axons,
        }
    }

    /// The first apical dendrite, if any.
    pub fn apical_dendrite(&self) -> Option<SectionId> {
        self.apical_dendrites.first().copied()
    }

    pub fn basal_dendrites(&self) -> &[SectionId] {
        &self.basal_dendrites
    }

    pub fn axons(&self) -> &[SectionId] {
        &self.axons
    }

    /// All arbors: apical, then basal, then axons, each in input order.
    pub fn arbors(&self) -> Vec<Arbor> {
        ArborRole::ALL
            .iter()
            .flat_map(|&role| {
                self.roots(role)
                    .iter()
                    .map(move |&root| Arbor { role, root })
            })
            .collect()
    }

    pub fn arbor_count(&self) -> usize {
        self.apical_dendrites.len() + self.basal_dendrites.len() + self.axons.len()
    }

    pub fn has_arbors(&self) -> bool {
        self.arbor_count() > 0
    }

    /// Check every arbor is a well-formed tree.
    ///
    /// Each root has no parent, every reached child names its parent as
    /// back-reference, and no section is reached twice (no cycles, no
    /// section shared by two parents or two arbors). Detached sections
    /// left in the arena by repair are not inspected.
    pub fn validate(&self) -> MorphoResult<()> {
        self.check_trees().map(|_| ())
    }

    /// Returns the number of reachable sections.
    fn check_trees(&self) -> MorphoResult<usize> {
        let mut seen = vec![false; self.arena.len()];
        let mut reached = 0usize;

        for arbor in self.arbors() {
            let root = self.arena.get(arbor.root)?;
            if let Some(parent) = root.parent() {
                return Err(MorphoError::MalformedTree(format!(
                    "{} root {} has parent {parent}",
                    arbor.role.name(),
                    arbor.root
                )));
            }

            let mut stack = vec![arbor.root];
            while let Some(id) = stack.pop() {
                if seen[id.index()] {
                    return Err(MorphoError::MalformedTree(format!(
                        "section {id} is reached more than once"
                    )));
                }
                seen[id.index()] = true;
                reached += 1;

                for &child in self.arena[id].children() {
                    let c = self.arena.get(child)?;
                    if c.parent() != Some(id) {
                        return Err(MorphoError::MalformedTree(format!(
                            "section {child} is a child of {id} but names {:?} as parent",
                            c.parent()
                        )));
                    }
                    stack.push(child);
                }
            }
        }
        Ok(reached)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Morphology Builder
// ─────────────────────────────────────────────────────────────────────
//! Turns the output of an external morphology reader into a validated
//! `Morphology`. No files are read here.

use nalgebra::Point3;

use morpho_types::{MorphoError, MorphoResult};

use crate::morphology::{ArborRole, Morphology};
use crate::sample::Sample;
use crate::section::{SectionArena, SectionId, SectionType};
use crate::soma::Soma;

/// One section as produced by a reader.
#[derive(Debug, Clone)]
pub struct ParsedSection {
    pub section_type: SectionType,
    pub samples: Vec<Sample>,
    /// Index of the parent in the reader's section list, `None` for roots.
    pub parent: Option<usize>,
}

/// Soma record as produced by a reader.
#[derive(Debug, Clone)]
pub struct ParsedSoma {
    pub centroid: Point3<f64>,
    pub mean_radius: f64,
    pub profile_points: Vec<Point3<f64>>,
}

/// Incremental morphology construction.
///
/// Section handles equal the reader's section indices. Children are
/// linked in reader order, which is also the order every traversal and
/// per-arbor result list follows.
#[derive(Debug, Clone, Default)]
pub struct MorphologyBuilder {
    label: String,
    soma: Option<ParsedSoma>,
    sections: Vec<ParsedSection>,
    derive_arbors_profile: bool,
}

impl MorphologyBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn soma(mut self, soma: ParsedSoma) -> Self {
        self.soma = Some(soma);
        self
    }

    /// Add the first sample of every arbor root to the soma's
    /// arbor-profile points.
    pub fn derive_arbors_profile(mut self, enabled: bool) -> Self {
        self.derive_arbors_profile = enabled;
        self
    }

    /// Append a section; returns its future handle.
    pub fn section(&mut self, section: ParsedSection) -> usize {
        self.sections.push(section);
        self.sections.len() - 1
    }

    /// Shorthand for `section` with explicit fields.
    pub fn add(
        &mut self,
        section_type: SectionType,
        parent: Option<usize>,
        samples: Vec<Sample>,
    ) -> usize {
        self.section(ParsedSection {
            section_type,
            samples,
            parent,
        })
    }

    pub fn build(self) -> MorphoResult<Morphology> {
        let parsed_soma = self.soma.ok_or(MorphoError::EmptySoma)?;

        let mut arena = SectionArena::new();
        let mut parents = Vec::with_capacity(self.sections.len());
        for (index, section) in self.sections.into_iter().enumerate() {
            for sample in &section.samples {
                sample.check_finite()?;
            }
            if let Some(p) = section.parent {
                if p == index {
                    return Err(MorphoError::MalformedTree(format!(
                        "section {index} names itself as parent"
                    )));
                }
            }
            parents.push(section.parent);
            arena.insert(section.section_type, section.samples);
        }

        let mut apical = Vec::new();
        let mut basal = Vec::new();
        let mut axons = Vec::new();
        for (index, parent) in parents.iter().enumerate() {
            let id = SectionId(index);
            match parent {
                Some(p) => {
                    if *p >= arena.len() {
                        return Err(MorphoError::MalformedTree(format!(
                            "section {index} names unknown parent {p}"
                        )));
                    }
                    arena.link(SectionId(*p), id)?;
                }
                None => match ArborRole::from_section_type(arena[id].section_type) {
                    Some(ArborRole::ApicalDendrite) => apical.push(id),
                    Some(ArborRole::BasalDendrite) => basal.push(id),
                    Some(ArborRole::Axon) => axons.push(id),
                    None => {
                        return Err(MorphoError::MalformedTree(format!(
                            "root section {index} has type {:?}, which is not an arbor role",
                            arena[id].section_type
                        )));
                    }
                },
            }
        }

        let arbors_profile: Vec<Point3<f64>> = if self.derive_arbors_profile {
            apical
                .iter()
                .chain(&basal)
                .chain(&axons)
                .filter_map(|id| arena[*id].first_sample().map(|s| s.point))
                .collect()
        } else {
            Vec::new()
        };
        let soma = Soma::new(
            parsed_soma.centroid,
            parsed_soma.mean_radius,
            parsed_soma.profile_points,
            arbors_profile,
        )?;

        let morphology = Morphology::new(self.label, soma, arena, apical, basal, axons)?;
        log::debug!(
            "built morphology '{}': {} sections, {} arbors",
            morphology.label(),
            morphology.arena().len(),
            morphology.arbor_count()
        );
        Ok(morphology)
    }
}

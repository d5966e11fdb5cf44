// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Sections and the Section Arena
// ─────────────────────────────────────────────────────────────────────
//! Sections are stored in a single arena and addressed by `SectionId`.
//! Parent and children links are handles into that arena, so a section
//! can be read (to copy its samples) while it is being unlinked from its
//! parent without any aliasing between the two.
//!
//! Sections are never removed from the arena. Repair operations detach a
//! section by dropping it from its parent's children list; the slot stays
//! allocated and its parent link is cleared.

use std::ops::{Index, IndexMut};

use morpho_types::{MorphoError, MorphoResult};

use crate::sample::Sample;

/// Stable handle of a section inside its morphology's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub usize);

impl SectionId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structure type recorded by the source format. Provenance only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionType {
    Soma,
    Axon,
    BasalDendrite,
    ApicalDendrite,
    Undefined,
}

impl SectionType {
    /// Map the conventional SWC structure identifier.
    pub fn from_swc(tag: i32) -> Self {
        match tag {
            1 => Self::Soma,
            2 => Self::Axon,
            3 => Self::BasalDendrite,
            4 => Self::ApicalDendrite,
            _ => Self::Undefined,
        }
    }
}

/// A maximal unbranched run of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    id: SectionId,
    pub section_type: SectionType,
    samples: Vec<Sample>,
    parent: Option<SectionId>,
    children: Vec<SectionId>,
}

impl Section {
    #[inline]
    pub fn id(&self) -> SectionId {
        self.id
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Mutable access to the samples. Radii and points may be edited
    /// freely; call `reindex_samples` after inserting or removing.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut Vec<Sample> {
        &mut self.samples
    }

    #[inline]
    pub fn parent(&self) -> Option<SectionId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[SectionId] {
        &self.children
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    /// Exactly two children.
    #[inline]
    pub fn is_bifurcation(&self) -> bool {
        self.children.len() == 2
    }

    /// Fewer than two samples, hence no segments.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.samples.len() < 2
    }

    #[inline]
    pub fn first_sample(&self) -> Option<&Sample> {
        self.samples.first()
    }

    #[inline]
    pub fn last_sample(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Number of consecutive sample pairs.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }

    /// Consecutive sample pairs in order.
    pub fn segments(&self) -> impl Iterator<Item = (&Sample, &Sample)> {
        self.samples.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Restore `local_index == position` for every sample.
    pub fn reindex_samples(&mut self) {
        for (i, sample) in self.samples.iter_mut().enumerate() {
            sample.local_index = i;
        }
    }
}

/// Owning storage for every section of a morphology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionArena {
    sections: Vec<Section>,
}

impl SectionArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn contains(&self, id: SectionId) -> bool {
        id.0 < self.sections.len()
    }

    /// Allocate an unlinked section and return its handle.
    pub fn insert(&mut self, section_type: SectionType, samples: Vec<Sample>) -> SectionId {
        let id = SectionId(self.sections.len());
        let mut section = Section {
            id,
            section_type,
            samples,
            parent: None,
            children: Vec::new(),
        };
        section.reindex_samples();
        self.sections.push(section);
        id
    }

    /// Allocate a section and append it to `parent`'s children.
    pub fn insert_child(
        &mut self,
        parent: SectionId,
        section_type: SectionType,
        samples: Vec<Sample>,
    ) -> MorphoResult<SectionId> {
        if !self.contains(parent) {
            return Err(MorphoError::UnknownSection(parent.0));
        }
        let id = self.insert(section_type, samples);
        self.link(parent, id)?;
        Ok(id)
    }

    /// Append `child` to `parent`'s children and set its back-reference.
    ///
    /// `child` must currently be unlinked.
    pub fn link(&mut self, parent: SectionId, child: SectionId) -> MorphoResult<()> {
        if !self.contains(parent) {
            return Err(MorphoError::UnknownSection(parent.0));
        }
        if !self.contains(child) {
            return Err(MorphoError::UnknownSection(child.0));
        }
        if parent == child {
            return Err(MorphoError::MalformedTree(format!(
                "section {child} cannot be its own parent"
            )));
        }
        if let Some(existing) = self.sections[child.0].parent {
            return Err(MorphoError::MalformedTree(format!(
                "section {child} already has parent {existing}"
            )));
        }
        self.sections[child.0].parent = Some(parent);
        self.sections[parent.0].children.push(child);
        Ok(())
    }

    /// Replace `id`'s children list.
    ///
    /// Every new child gets `id` as parent. Former children that are not
    /// in the new list are detached (parent cleared) and returned in their
    /// former list order.
    pub fn replace_children(
        &mut self,
        id: SectionId,
        children: Vec<SectionId>,
    ) -> MorphoResult<Vec<SectionId>> {
        if !self.contains(id) {
            return Err(MorphoError::UnknownSection(id.0));
        }
        if let Some(bad) = children.iter().find(|c| !self.contains(**c)) {
            return Err(MorphoError::UnknownSection(bad.0));
        }
        if children.contains(&id) {
            return Err(MorphoError::MalformedTree(format!(
                "section {id} cannot be its own child"
            )));
        }

        let old = std::mem::take(&mut self.sections[id.0].children);
        let detached: Vec<SectionId> = old
            .into_iter()
            .filter(|c| !children.contains(c))
            .collect();
        for c in &detached {
            self.sections[c.0].parent = None;
        }
        // Adopted sections leave their previous parent's list.
        for c in &children {
            if let Some(previous) = self.sections[c.0].parent {
                if previous != id {
                    self.sections[previous.0].children.retain(|x| x != c);
                }
            }
            self.sections[c.0].parent = Some(id);
        }
        self.sections[id.0].children = children;
        Ok(detached)
    }

    pub fn get(&self, id: SectionId) -> MorphoResult<&Section> {
        self.sections
            .get(id.0)
            .ok_or(MorphoError::UnknownSection(id.0))
    }

    pub fn get_mut(&mut self, id: SectionId) -> MorphoResult<&mut Section> {
        self.sections
            .get_mut(id.0)
            .ok_or(MorphoError::UnknownSection(id.0))
    }

    /// Sections with the same parent as `id`, excluding `id`.
    pub fn siblings(&self, id: SectionId) -> Vec<SectionId> {
        match self.get(id).ok().and_then(Section::parent) {
            Some(p) => self.sections[p.0]
                .children
                .iter()
                .copied()
                .filter(|c| *c != id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every allocated section, attached or not, in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }
}

impl Index<SectionId> for SectionArena {
    type Output = Section;

    fn index(&self, id: SectionId) -> &Section {
        &self.sections[id.0]
    }
}

impl IndexMut<SectionId> for SectionArena {
    fn index_mut(&mut self, id: SectionId) -> &mut Section {
        &mut self.sections[id.0]
    }
}

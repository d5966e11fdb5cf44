// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Continuation Child Selection and Splicing
// ─────────────────────────────────────────────────────────────────────
//! Merging a section with one of its children ("continuation").
//!
//! The favoured child's samples, all but its last, are appended to the
//! section, and the section's children list is replaced by the child's
//! own children. One tree level collapses. Former siblings of the chosen
//! child are detached from the tree.

use morpho_analysis::angle::{angle_between_degrees, initial_direction, terminal_direction};
use morpho_core::{traversal, Sample, SectionArena, SectionId};
use morpho_types::{MorphoError, MorphoResult};

/// Geometry around one branch point, detached from the arena.
///
/// `parent_tail` holds the section's last samples in order; each child
/// entry holds that child's leading samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationView {
    pub section: SectionId,
    pub parent_tail: Vec<Sample>,
    pub children: Vec<(SectionId, Vec<Sample>)>,
}

impl ContinuationView {
    /// Up to `depth` samples on each side of the branch point of `section`.
    pub fn of(arena: &SectionArena, section: SectionId, depth: usize) -> MorphoResult<Self> {
        let s = arena.get(section)?;
        let samples = s.samples();
        let parent_tail = samples[samples.len().saturating_sub(depth)..].to_vec();
        let children = s
            .children()
            .iter()
            .map(|&c| {
                let lead = arena[c].samples().iter().take(depth).cloned().collect();
                (c, lead)
            })
            .collect();
        Ok(Self {
            section,
            parent_tail,
            children,
        })
    }
}

/// Chooses which child continues a section.
pub trait ContinuationSelector: Send + Sync {
    /// The favoured child of `section`, or `None` to leave it alone.
    fn select(&self, arena: &SectionArena, section: SectionId) -> Option<SectionId>;
}

/// Child whose initial direction deviates least from the section's
/// terminal direction. Ties go to the earlier child.
#[derive(Debug, Clone, Copy)]
pub struct LeastAngleSelector {
    pub epsilon: f64,
}

impl Default for LeastAngleSelector {
    fn default() -> Self {
        Self { epsilon: 1e-6 }
    }
}

impl ContinuationSelector for LeastAngleSelector {
    fn select(&self, arena: &SectionArena, section: SectionId) -> Option<SectionId> {
        let parent = arena.get(section).ok()?;
        let heading = terminal_direction(parent, self.epsilon)?;
        let mut best: Option<(SectionId, f64)> = None;
        for &child in parent.children() {
            let Some(direction) = initial_direction(&arena[child], self.epsilon) else {
                continue;
            };
            let deviation = angle_between_degrees(&heading, &direction);
            if best.map_or(true, |(_, b)| deviation < b) {
                best = Some((child, deviation));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Selector backed by a caller-supplied closure.
pub struct ExternalSelector<F>
where
    F: Fn(&SectionArena, SectionId) -> Option<SectionId> + Send + Sync,
{
    choose: F,
}

impl<F> ExternalSelector<F>
where
    F: Fn(&SectionArena, SectionId) -> Option<SectionId> + Send + Sync,
{
    pub fn new(choose: F) -> Self {
        Self { choose }
    }
}

impl<F> ContinuationSelector for ExternalSelector<F>
where
    F: Fn(&SectionArena, SectionId) -> Option<SectionId> + Send + Sync,
{
    fn select(&self, arena: &SectionArena, section: SectionId) -> Option<SectionId> {
        (self.choose)(arena, section)
    }
}

/// Splice `child` into `section`.
///
/// Returns the former siblings of `child` that the splice detached.
pub fn connect_to_child(
    arena: &mut SectionArena,
    section: SectionId,
    child: SectionId,
) -> MorphoResult<Vec<SectionId>> {
    if !arena.get(section)?.children().contains(&child) {
        return Err(MorphoError::MalformedTree(format!(
            "section {child} is not a child of {section}"
        )));
    }

    let (appended, grandchildren): (Vec<Sample>, Vec<SectionId>) = {
        let c = &arena[child];
        let keep = c.samples().len().saturating_sub(1);
        (c.samples()[..keep].to_vec(), c.children().to_vec())
    };

    let target = &mut arena[section];
    target.samples_mut().extend(appended);
    target.reindex_samples();

    let mut detached = arena.replace_children(section, grandchildren)?;
    detached.retain(|d| *d != child);
    if !detached.is_empty() {
        log::warn!(
            "continuation of {section} through {child} detached {} sibling(s)",
            detached.len()
        );
    }
    log::debug!("merged section {child} into {section}");
    Ok(detached)
}

/// Merge every branching section of an arbor with its selected child.
///
/// Returns the number of splices.
pub fn connect_continuations(
    arena: &mut SectionArena,
    root: SectionId,
    selector: &dyn ContinuationSelector,
) -> MorphoResult<usize> {
    let mut merged = 0usize;
    traversal::apply_mut(arena, root, |arena, id| {
        if arena.get(id)?.is_terminal() {
            return Ok(());
        }
        if let Some(child) = selector.select(arena, id) {
            connect_to_child(arena, id, child)?;
            merged += 1;
        }
        Ok(())
    })?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use morpho_core::SectionType;

    use super::*;

    /// root heading +x, children bending by 10° (+y side) and 60°.
    fn branching() -> (SectionArena, SectionId, SectionId, SectionId) {
        let mut arena = SectionArena::new();
        let root = arena.insert(
            SectionType::BasalDendrite,
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(4.0, 0.0, 0.0, 1.0)],
        );
        let (s10, c10) = 10f64.to_radians().sin_cos();
        let (s60, c60) = 60f64.to_radians().sin_cos();
        let steep = arena
            .insert_child(
                root,
                SectionType::BasalDendrite,
                vec![
                    Sample::at(4.0, 0.0, 0.0, 0.5),
                    Sample::at(4.0 + c60, s60, 0.0, 0.5),
                ],
            )
            .unwrap();
        let straight = arena
            .insert_child(
                root,
                SectionType::BasalDendrite,
                vec![
                    Sample::at(4.0, 0.0, 0.0, 0.5),
                    Sample::at(4.0 + c10, s10, 0.0, 0.5),
                    Sample::at(4.0 + 2.0 * c10, 2.0 * s10, 0.0, 0.5),
                ],
            )
            .unwrap();
        (arena, root, steep, straight)
    }

    #[test]
    fn test_view_holds_branch_point_geometry() {
        let (arena, root, steep, straight) = branching();
        let view = ContinuationView::of(&arena, root, 2).unwrap();
        assert_eq!(view.section, root);
        assert_eq!(view.parent_tail, arena[root].samples().to_vec());
        assert_eq!(view.children.len(), 2);
        assert_eq!(view.children[0].0, steep);
        assert_eq!(view.children[1].0, straight);
        assert_eq!(view.children[1].1, arena[straight].samples()[..2].to_vec());

        let shallow = ContinuationView::of(&arena, root, 1).unwrap();
        assert_eq!(shallow.parent_tail.len(), 1);
        assert_eq!(shallow.parent_tail[0].point, arena[root].last_sample().unwrap().point);
        assert!(ContinuationView::of(&arena, SectionId(99), 2).is_err());
    }

    #[test]
    fn test_least_angle_picks_straightest() {
        let (arena, root, _, straight) = branching();
        assert_eq!(LeastAngleSelector::default().select(&arena, root), Some(straight));
    }

    #[test]
    fn test_least_angle_tie_goes_to_first() {
        let mut arena = SectionArena::new();
        let root = arena.insert(
            SectionType::Axon,
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(1.0, 0.0, 0.0, 1.0)],
        );
        let up = arena
            .insert_child(
                root,
                SectionType::Axon,
                vec![Sample::at(1.0, 0.0, 0.0, 1.0), Sample::at(2.0, 1.0, 0.0, 1.0)],
            )
            .unwrap();
        arena
            .insert_child(
                root,
                SectionType::Axon,
                vec![Sample::at(1.0, 0.0, 0.0, 1.0), Sample::at(2.0, -1.0, 0.0, 1.0)],
            )
            .unwrap();
        assert_eq!(LeastAngleSelector::default().select(&arena, root), Some(up));
    }

    #[test]
    fn test_connect_to_child_splices() {
        let (mut arena, root, steep, straight) = branching();
        let tip = arena
            .insert_child(
                straight,
                SectionType::BasalDendrite,
                vec![Sample::at(5.9, 0.3, 0.0, 0.2), Sample::at(7.0, 0.3, 0.0, 0.2)],
            )
            .unwrap();

        let detached = connect_to_child(&mut arena, root, straight).unwrap();
        assert_eq!(detached, vec![steep]);
        assert_eq!(arena[root].children(), &[tip]);
        assert_eq!(arena[tip].parent(), Some(root));
        assert_eq!(arena[straight].parent(), None);
        assert!(arena[straight].children().is_empty());
        assert_eq!(arena[steep].parent(), None);
        // 2 own samples + 2 of the child's 3.
        assert_eq!(arena[root].samples().len(), 4);
        let idx: Vec<usize> = arena[root].samples().iter().map(|s| s.local_index).collect();
        assert_eq!(idx, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_connect_to_non_child_rejected() {
        let (mut arena, _, steep, straight) = branching();
        assert!(matches!(
            connect_to_child(&mut arena, steep, straight),
            Err(MorphoError::MalformedTree(_))
        ));
    }

    #[test]
    fn test_external_selector_drives_continuations() {
        let (mut arena, root, steep, _) = branching();
        let pick_first = ExternalSelector::new(|arena: &SectionArena, id: SectionId| {
            arena[id].children().first().copied()
        });
        let merged = connect_continuations(&mut arena, root, &pick_first).unwrap();
        assert_eq!(merged, 1);
        assert!(arena[root].is_terminal());
        assert_eq!(arena[steep].parent(), None);
        assert_eq!(arena[root].samples().len(), 3);
    }
}

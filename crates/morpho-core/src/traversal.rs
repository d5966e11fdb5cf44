// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Traversal Engine
// ─────────────────────────────────────────────────────────────────────
//! Pre-order, depth-first visits over one arbor.
//!
//! Every visit runs on an explicit stack, so arbor depth is bounded by
//! heap memory rather than the call stack. Visitation order equals the
//! recursive definition: visit the section, then each child in list
//! order. A root handle outside the arena makes the call a no-op.

use morpho_types::MorphoResult;

use crate::section::{Section, SectionArena, SectionId};

/// Visit every section reachable from `root`.
pub fn apply<F>(arena: &SectionArena, root: SectionId, mut operation: F)
where
    F: FnMut(&Section),
{
    if !arena.contains(root) {
        log::warn!("traversal root {root} is not in the arena, nothing visited");
        return;
    }
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let section = &arena[id];
        operation(section);
        stack.extend(section.children().iter().rev());
    }
}

/// Visit every section with mutable access to the whole arena.
///
/// The children of a section are read after `operation` returns, so an
/// operation that splices the visited section's children list has the
/// new children visited next. The first error aborts the walk.
pub fn apply_mut<F>(arena: &mut SectionArena, root: SectionId, mut operation: F) -> MorphoResult<()>
where
    F: FnMut(&mut SectionArena, SectionId) -> MorphoResult<()>,
{
    if !arena.contains(root) {
        log::warn!("traversal root {root} is not in the arena, nothing visited");
        return Ok(());
    }
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        operation(arena, id)?;
        stack.extend(arena[id].children().iter().rev());
    }
    Ok(())
}

/// Visit every section with a value handed down from its parent.
///
/// `operation` receives the parent's value (or `initial` at the root) and
/// returns the value its own children receive.
pub fn descend<T, F>(arena: &SectionArena, root: SectionId, initial: T, mut operation: F)
where
    T: Clone,
    F: FnMut(&Section, &T) -> T,
{
    if !arena.contains(root) {
        return;
    }
    let mut stack = vec![(root, initial)];
    while let Some((id, inherited)) = stack.pop() {
        let section = &arena[id];
        let value = operation(section, &inherited);
        for child in section.children().iter().rev() {
            stack.push((*child, value.clone()));
        }
    }
}

/// Handles of every section reachable from `root`, in pre-order.
pub fn collect_sections(arena: &SectionArena, root: SectionId) -> Vec<SectionId> {
    let mut out = Vec::new();
    apply(arena, root, |s| out.push(s.id()));
    out
}

/// Collect one value per section, in pre-order.
pub fn map_sections<T, F>(arena: &SectionArena, root: SectionId, mut f: F) -> Vec<T>
where
    F: FnMut(&Section) -> T,
{
    let mut out = Vec::new();
    apply(arena, root, |s| out.push(f(s)));
    out
}

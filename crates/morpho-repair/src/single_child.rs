// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Single-Child Merge
// ─────────────────────────────────────────────────────────────────────
//! A section with exactly one child is not a real branch point; the
//! child is spliced into it. Chains flatten completely because the
//! merge repeats while the section still has exactly one child.

use morpho_core::{traversal, SectionArena, SectionId};
use morpho_types::MorphoResult;

use crate::continuation::connect_to_child;

/// Merge every single-child chain of an arbor. Returns the splice count.
pub fn merge_single_children(arena: &mut SectionArena, root: SectionId) -> MorphoResult<usize> {
    let mut merged = 0usize;
    traversal::apply_mut(arena, root, |arena, id| {
        loop {
            let only = match arena.get(id)?.children() {
                [only] => *only,
                _ => break,
            };
            connect_to_child(arena, id, only)?;
            merged += 1;
        }
        Ok(())
    })?;
    Ok(merged)
}

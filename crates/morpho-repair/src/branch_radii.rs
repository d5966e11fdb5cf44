// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Branch-Point Radius Repair
// ─────────────────────────────────────────────────────────────────────
//! A parent's last radius is raised to the widest first radius among its
//! children. Radii are never lowered and monotonic tapering is not
//! enforced elsewhere.

use morpho_core::{traversal, SectionArena, SectionId};
use morpho_types::MorphoResult;

/// Raise `id`'s last radius if a child starts wider. Returns whether it changed.
pub fn raise_branch_radius(arena: &mut SectionArena, id: SectionId) -> MorphoResult<bool> {
    let widest = arena
        .get(id)?
        .children()
        .iter()
        .filter_map(|c| arena[*c].first_sample().map(|s| s.radius))
        .reduce(f64::max);
    let Some(widest) = widest else {
        return Ok(false);
    };
    match arena[id].samples_mut().last_mut() {
        Some(end) if end.radius < widest => {
            log::debug!("raised last radius of {id} from {} to {widest}", end.radius);
            end.radius = widest;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Apply `raise_branch_radius` over an arbor. Returns the count raised.
pub fn raise_branch_radii(arena: &mut SectionArena, root: SectionId) -> MorphoResult<usize> {
    let mut raised = 0usize;
    traversal::apply_mut(arena, root, |arena, id| {
        if raise_branch_radius(arena, id)? {
            raised += 1;
        }
        Ok(())
    })?;
    Ok(raised)
}

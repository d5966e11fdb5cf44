// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Radius Policy
// ─────────────────────────────────────────────────────────────────────

use morpho_core::{traversal, SectionArena, SectionId};
use morpho_types::RadiusPolicy;

/// New radius for one sample under `policy`.
#[inline]
pub fn policy_radius(policy: RadiusPolicy, radius: f64) -> f64 {
    match policy {
        RadiusPolicy::AsSpecified => radius,
        RadiusPolicy::Fixed { radius: fixed } => fixed,
        RadiusPolicy::Scaled { factor } => radius * factor,
        RadiusPolicy::Minimum { radius: floor } => radius.max(floor),
    }
}

/// Rewrite every sample radius of an arbor. Returns the count changed.
pub fn apply_radius_policy(arena: &mut SectionArena, root: SectionId, policy: RadiusPolicy) -> usize {
    if policy == RadiusPolicy::AsSpecified {
        return 0;
    }
    let mut rewritten = 0usize;
    for id in traversal::collect_sections(arena, root) {
        for sample in arena[id].samples_mut().iter_mut() {
            let radius = policy_radius(policy, sample.radius);
            if radius != sample.radius {
                sample.radius = radius;
                rewritten += 1;
            }
        }
    }
    rewritten
}

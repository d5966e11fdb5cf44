// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Repair Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! In-place structural repair of morphology skeletons.
//!
//! # Repair Invariants
//!
//! 1. **Fixed order**: short-section compression, then single-child
//!    merge, then branch-point radius repair. No pass feeds back into an
//!    earlier one within a sweep.
//!
//! 2. **Idempotent**: every rule re-derives its trigger from the current
//!    samples, never from a flag, so repeating a run is a no-op.
//!
//! 3. **Trees stay trees**: splices only move handles between children
//!    lists; detached sections stay in the arena unreachable. The
//!    pipeline re-validates before returning.

pub mod branch_radii;
pub mod continuation;
pub mod pipeline;
pub mod radius;
pub mod short_sections;
pub mod single_child;

pub use branch_radii::{raise_branch_radii, raise_branch_radius};
pub use continuation::{
    connect_continuations, connect_to_child, ContinuationSelector, ContinuationView,
    ExternalSelector, LeastAngleSelector,
};
pub use pipeline::RepairPipeline;
pub use radius::{apply_radius_policy, policy_radius};
pub use short_sections::{compress_short_section, compress_short_sections};
pub use single_child::merge_single_children;

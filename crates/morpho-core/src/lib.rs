// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Skeleton Model
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Skeleton data model for neuronal morphologies and the traversal
//! engine every analysis and repair pass is built on.
//!
//! # Tree Invariants
//!
//! 1. **Arena ownership**: all sections live in one `SectionArena` and
//!    refer to each other by `SectionId`. Sections are never freed
//!    individually; detaching removes them from their parent's list.
//!
//! 2. **Well-formed arbors**: every arbor root has no parent, every
//!    reachable non-root section appears exactly once in its parent's
//!    children list, and no section is reachable twice. Checked once in
//!    `Morphology::new` and on demand via `Morphology::validate`.
//!
//! 3. **Stable order**: children keep reader order; traversals visit in
//!    pre-order, so per-arbor result lists line up with input order.

pub mod builder;
pub mod morphology;
pub mod sample;
pub mod section;
pub mod shared;
pub mod soma;
pub mod traversal;

pub use builder::{MorphologyBuilder, ParsedSection, ParsedSoma};
pub use morphology::{Arbor, ArborRole, Morphology};
pub use sample::{Sample, SYNTHETIC_INDEX};
pub use section::{Section, SectionArena, SectionId, SectionType};
pub use shared::SharedMorphology;
pub use soma::Soma;

pub use nalgebra::{Point3, Vector3};

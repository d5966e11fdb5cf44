// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Error hierarchy, configuration, and serialisable analysis/repair
//! records shared by every Morpho Kernel crate.

pub mod config;
pub mod error;
pub mod stats;

pub use config::{MorphoConfig, RadiusPolicy};
pub use error::{MorphoError, MorphoResult};
pub use stats::{AnalysisResult, MorphologyStats, RepairReport, ShortSection};

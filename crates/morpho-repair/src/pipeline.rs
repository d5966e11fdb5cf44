// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Repair Pipeline
// ─────────────────────────────────────────────────────────────────────
//! Fixed pass order: short-section compression, single-child merge,
//! branch-point radius repair. The three passes are swept over every
//! arbor until a sweep leaves the arena unchanged, then the radius
//! policy is applied once.
//!
//! Each pass re-derives its trigger from current data, so a second
//! `run` on an already repaired morphology changes nothing (radius
//! policy `Scaled` excepted).

use morpho_core::{Morphology, SharedMorphology};
use morpho_types::{MorphoConfig, MorphoResult, MorphologyStats, RepairReport};

use crate::branch_radii::raise_branch_radii;
use crate::continuation::{connect_continuations, ContinuationSelector};
use crate::radius::apply_radius_policy;
use crate::short_sections::compress_short_sections;
use crate::single_child::merge_single_children;

/// Configured repair pipeline.
#[derive(Debug, Clone)]
pub struct RepairPipeline {
    config: MorphoConfig,
    max_sweeps: usize,
}

impl RepairPipeline {
    pub const DEFAULT_MAX_SWEEPS: usize = 16;

    pub fn new(config: MorphoConfig) -> MorphoResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            max_sweeps: Self::DEFAULT_MAX_SWEEPS,
        })
    }

    /// Upper bound on structural sweeps per `run` (at least 1).
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps.max(1);
        self
    }

    pub fn config(&self) -> &MorphoConfig {
        &self.config
    }

    /// One pass of each enabled structural rule over every arbor.
    pub fn sweep(&self, morphology: &mut Morphology) -> MorphoResult<RepairReport> {
        let mut report = RepairReport::default();
        let arbors = morphology.arbors();
        let factor = self.config.short_section_factor();
        let arena = morphology.arena_mut();

        if self.config.repair_short_sections {
            for arbor in &arbors {
                report.sections_compressed += compress_short_sections(arena, arbor.root, factor)?;
            }
        }
        if self.config.merge_single_children {
            for arbor in &arbors {
                report.children_merged += merge_single_children(arena, arbor.root)?;
            }
        }
        if self.config.repair_branch_radii {
            for arbor in &arbors {
                report.radii_raised += raise_branch_radii(arena, arbor.root)?;
            }
        }
        Ok(report)
    }

    /// Repair in place and report what changed.
    ///
    /// The stats record is cleared when anything changed, and the tree
    /// invariants are re-checked before returning.
    pub fn run(&self, morphology: &mut Morphology) -> MorphoResult<RepairReport> {
        let mut report = RepairReport::default();
        let mut converged = false;
        for sweep in 0..self.max_sweeps {
            let before = morphology.arena().clone();
            let pass = self.sweep(morphology)?;
            if *morphology.arena() == before {
                converged = true;
                break;
            }
            log::info!(
                "repair sweep {} on '{}': {} compressed, {} merged, {} raised",
                sweep + 1,
                morphology.label(),
                pass.sections_compressed,
                pass.children_merged,
                pass.radii_raised
            );
            report.merge(pass);
        }
        if !converged {
            log::warn!(
                "repair of '{}' did not settle within {} sweeps",
                morphology.label(),
                self.max_sweeps
            );
        }

        let policy = self.config.radius_policy;
        let arbors = morphology.arbors();
        for arbor in &arbors {
            report.radii_rewritten += apply_radius_policy(morphology.arena_mut(), arbor.root, policy);
        }
        if report.radii_rewritten > 0 {
            log::info!(
                "radius policy {policy:?} rewrote {} samples on '{}'",
                report.radii_rewritten,
                morphology.label()
            );
        }

        if !report.is_noop() {
            morphology.stats = MorphologyStats::default();
        }
        morphology.validate()?;
        Ok(report)
    }

    /// `run` under the handle's exclusive lock.
    pub fn run_shared(&self, shared: &SharedMorphology) -> MorphoResult<RepairReport> {
        shared.write(|m| self.run(m))
    }

    /// Merge every branching section with its selected continuation child.
    ///
    /// Outside the fixed pipeline; counts go to `children_merged`.
    pub fn connect_continuations(
        &self,
        morphology: &mut Morphology,
        selector: &dyn ContinuationSelector,
    ) -> MorphoResult<RepairReport> {
        let mut report = RepairReport::default();
        let arbors = morphology.arbors();
        for arbor in &arbors {
            report.children_merged +=
                connect_continuations(morphology.arena_mut(), arbor.root, selector)?;
        }
        if !report.is_noop() {
            morphology.stats = MorphologyStats::default();
        }
        morphology.validate()?;
        Ok(report)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{MorphoError, MorphoResult};

/// How sample radii are rewritten after the structural repair passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RadiusPolicy {
    /// Keep radii as reconstructed.
    #[default]
    AsSpecified,
    /// Every sample gets the same radius.
    Fixed { radius: f64 },
    /// Multiply every radius by `factor`.
    Scaled { factor: f64 },
    /// Raise any radius below `radius` to `radius`.
    Minimum { radius: f64 },
}

/// Runtime configuration for analysis and repair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphoConfig {
    /// Length below which a child direction vector counts as degenerate
    /// for the bifurcation-angle kernels.
    /// Default: 1e-6 µm.
    pub direction_epsilon: f64,

    /// Scale the short-section repair threshold by √2 so that a later
    /// subdivision of the section does not make it short again.
    /// Default: false.
    pub subdivision_safety: bool,

    /// Run the short-section radius compression pass.
    pub repair_short_sections: bool,

    /// Run the single-child merge pass.
    pub merge_single_children: bool,

    /// Run the parent-radius-vs-children pass.
    pub repair_branch_radii: bool,

    /// Final radius rewrite applied after the structural passes.
    pub radius_policy: RadiusPolicy,
}

impl Default for MorphoConfig {
    fn default() -> Self {
        Self {
            direction_epsilon: 1e-6,
            subdivision_safety: false,
            repair_short_sections: true,
            merge_single_children: true,
            repair_branch_radii: true,
            radius_policy: RadiusPolicy::AsSpecified,
        }
    }
}

impl MorphoConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> MorphoResult<()> {
        if !self.direction_epsilon.is_finite() || self.direction_epsilon <= 0.0 {
            return Err(MorphoError::Config(format!(
                "direction_epsilon must be finite and > 0, got {}",
                self.direction_epsilon
            )));
        }
        match self.radius_policy {
            RadiusPolicy::AsSpecified => {}
            RadiusPolicy::Fixed { radius } | RadiusPolicy::Minimum { radius } => {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(MorphoError::Config(format!(
                        "radius_policy radius must be finite and > 0, got {radius}"
                    )));
                }
            }
            RadiusPolicy::Scaled { factor } => {
                if !factor.is_finite() || factor <= 0.0 {
                    return Err(MorphoError::Config(format!(
                        "radius_policy factor must be finite and > 0, got {factor}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Threshold multiplier for short-section repair.
    pub fn short_section_factor(&self) -> f64 {
        if self.subdivision_safety {
            std::f64::consts::SQRT_2
        } else {
            1.0
        }
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> MorphoResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MorphoError::Config(format!("JSON parse error: {e}")))
    }
}

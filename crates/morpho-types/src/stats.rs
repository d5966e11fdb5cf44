// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Analysis and Repair Records
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Lazily populated morphology statistics.
///
/// Every field starts absent. A field is only written by the kernel that
/// measures it, so an absent field means "not computed", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MorphologyStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_section_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_section_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_section_length: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_segment_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_segment_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_segment_length: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_section_surface_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_section_surface_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_section_surface_area: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_segment_surface_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_segment_surface_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_segment_surface_area: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_section_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_section_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_section_volume: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_segment_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_segment_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_segment_volume: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_surface_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_path_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_euclidean_distance: Option<f64>,
}

impl MorphologyStats {
    /// True when no kernel has written anything yet.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Result of one statistic over a morphology.
///
/// `apical`, `basal` and `axons` hold one entry per arbor instance, in the
/// morphology's input order. `morphology` is the combined scalar, absent
/// when only the per-role lists were requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub apical: Vec<f64>,
    pub basal: Vec<f64>,
    pub axons: Vec<f64>,
    pub morphology: Option<f64>,
}

impl AnalysisResult {
    /// Apical, then basal, then axon results, in that order.
    pub fn pooled(&self) -> Vec<f64> {
        self.apical
            .iter()
            .chain(&self.basal)
            .chain(&self.axons)
            .copied()
            .collect()
    }

    pub fn arbor_count(&self) -> usize {
        self.apical.len() + self.basal.len() + self.axons.len()
    }
}

/// A section whose length is below its minimal admissible length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortSection {
    pub section_id: usize,
    pub length: f64,
    pub minimal_length: f64,
}

/// Per-pass counters returned by the repair pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairReport {
    /// Sections whose radii were collapsed by the short-section pass.
    pub sections_compressed: usize,
    /// Single children spliced into their parent.
    pub children_merged: usize,
    /// Parent terminal radii raised to the widest child.
    pub radii_raised: usize,
    /// Samples rewritten by the radius policy.
    pub radii_rewritten: usize,
}

impl RepairReport {
    /// True when the pipeline changed nothing.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }

    pub fn merge(&mut self, other: RepairReport) {
        self.sections_compressed += other.sections_compressed;
        self.children_merged += other.children_merged;
        self.radii_raised += other.radii_raised;
        self.radii_rewritten += other.radii_rewritten;
    }
}

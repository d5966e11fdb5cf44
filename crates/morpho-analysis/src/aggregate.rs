// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Aggregation Engine
// ─────────────────────────────────────────────────────────────────────
//! Folds per-arbor results into one per-morphology result.
//!
//! A per-arbor kernel runs once for every present arbor (apical, each
//! basal, each axon, in input order). The pooled results are combined
//! with one of a closed set of policies. An empty pool is an error for
//! every policy: zero is a valid measurement and must not stand in for
//! "no data".

use morpho_core::{Arbor, ArborRole, Morphology, SectionArena};
use morpho_types::{AnalysisResult, MorphoError, MorphoResult};

/// Combination policy for pooled values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    Total,
    Minimum,
    Maximum,
    Average,
    /// Average after dropping exact zeros.
    AverageIgnoreZero,
}

impl std::str::FromStr for Aggregation {
    type Err = MorphoError;

    fn from_str(s: &str) -> MorphoResult<Self> {
        match s {
            "total" => Ok(Self::Total),
            "minimum" | "min" => Ok(Self::Minimum),
            "maximum" | "max" => Ok(Self::Maximum),
            "average" | "mean" => Ok(Self::Average),
            "average_ignore_zero" => Ok(Self::AverageIgnoreZero),
            other => Err(MorphoError::Config(format!("unknown aggregation '{other}'"))),
        }
    }
}

/// Combine pooled values. Fails on an empty pool.
pub fn combine(values: &[f64], aggregation: Aggregation) -> MorphoResult<f64> {
    if values.is_empty() {
        return Err(MorphoError::EmptyAggregate(format!(
            "{aggregation:?} over no values"
        )));
    }
    let value = match aggregation {
        Aggregation::Total => values.iter().sum(),
        Aggregation::Minimum => values.iter().copied().fold(f64::INFINITY, f64::min),
        Aggregation::Maximum => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Aggregation::Average => values.iter().sum::<f64>() / values.len() as f64,
        Aggregation::AverageIgnoreZero => {
            let kept: Vec<f64> = values.iter().copied().filter(|v| *v != 0.0).collect();
            if kept.is_empty() {
                return Err(MorphoError::AllEntriesFiltered {
                    count: values.len(),
                });
            }
            kept.iter().sum::<f64>() / kept.len() as f64
        }
    };
    Ok(value)
}

/// Combine within one arbor, where an empty list is a neutral 0.
///
/// Used for section/segment lists inside an arbor: an arbor made only of
/// degenerate sections contributes a zero measure instead of failing.
pub fn reduce_or_zero(values: &[f64], aggregation: Aggregation) -> f64 {
    match combine(values, aggregation) {
        Ok(v) => v,
        Err(_) => 0.0,
    }
}

/// Run `kernel` once per present arbor and keep the per-role lists.
pub fn per_arbor<F>(morphology: &Morphology, mut kernel: F) -> MorphoResult<AnalysisResult>
where
    F: FnMut(&SectionArena, Arbor) -> MorphoResult<f64>,
{
    let mut result = AnalysisResult::default();
    for arbor in morphology.arbors() {
        let value = kernel(morphology.arena(), arbor)?;
        match arbor.role {
            ArborRole::ApicalDendrite => result.apical.push(value),
            ArborRole::BasalDendrite => result.basal.push(value),
            ArborRole::Axon => result.axons.push(value),
        }
    }
    Ok(result)
}

/// Per-role lists plus the combined morphology scalar.
pub fn aggregate<F>(
    morphology: &Morphology,
    kernel: F,
    aggregation: Aggregation,
) -> MorphoResult<AnalysisResult>
where
    F: FnMut(&SectionArena, Arbor) -> MorphoResult<f64>,
{
    let mut result = per_arbor(morphology, kernel)?;
    if result.arbor_count() == 0 {
        return Err(MorphoError::EmptyAggregate(format!(
            "morphology '{}' has no apical, basal or axon arbor",
            morphology.label()
        )));
    }
    result.morphology = Some(combine(&result.pooled(), aggregation)?);
    Ok(result)
}

// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Stats Record Population
// ─────────────────────────────────────────────────────────────────────
//! Fills the morphology's `MorphologyStats` record.
//!
//! Minimum, maximum and average are taken over every section (or
//! segment) of every arbor pooled together, not over per-arbor results.
//! A field whose pool is empty stays absent.

use morpho_core::{traversal, Morphology};
use morpho_types::{MorphoError, MorphoResult, MorphologyStats};

use crate::aggregate::Aggregation;
use crate::distance::{maximum_euclidean_distance, maximum_path_distance};
use crate::geometry::{section_measure, segment_measures, Measure};
use crate::statistic::Statistic;

#[derive(Debug, Default)]
struct Pool {
    sections: Vec<f64>,
    segments: Vec<f64>,
}

impl Pool {
    fn summary(values: &[f64]) -> Option<(f64, f64, f64)> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        Some((min, max, avg))
    }
}

fn pool(morphology: &Morphology, measure: Measure) -> Pool {
    let mut pool = Pool::default();
    for arbor in morphology.arbors() {
        traversal::apply(morphology.arena(), arbor.root, |s| {
            pool.sections.push(section_measure(s, measure));
            pool.segments.extend(segment_measures(s, measure));
        });
    }
    pool
}

/// Compute every stats field and store the record on the morphology.
///
/// Fails with `EmptyAggregate` when the morphology has no arbor, leaving
/// the existing record untouched.
pub fn compute_stats(morphology: &mut Morphology) -> MorphoResult<MorphologyStats> {
    if !morphology.has_arbors() {
        return Err(MorphoError::EmptyAggregate(format!(
            "cannot compute stats of '{}' without arbors",
            morphology.label()
        )));
    }

    let mut stats = MorphologyStats::default();
    for measure in [Measure::Length, Measure::SurfaceArea, Measure::Volume] {
        let p = pool(morphology, measure);
        let total = p.sections.iter().sum::<f64>();
        let section = Pool::summary(&p.sections);
        let segment = Pool::summary(&p.segments);
        let fields = fields_mut(&mut stats, measure);
        *fields.total = Some(total);
        if let Some((min, max, avg)) = section {
            *fields.section_min = Some(min);
            *fields.section_max = Some(max);
            *fields.section_avg = Some(avg);
        }
        if let Some((min, max, avg)) = segment {
            *fields.segment_min = Some(min);
            *fields.segment_max = Some(max);
            *fields.segment_avg = Some(avg);
        }
    }

    let centroid = morphology.soma().centroid();
    let arena = morphology.arena();
    let arbors = morphology.arbors();
    stats.maximum_path_distance = arbors
        .iter()
        .map(|a| maximum_path_distance(arena, a.root))
        .reduce(f64::max);
    stats.maximum_euclidean_distance = arbors
        .iter()
        .map(|a| maximum_euclidean_distance(arena, a.root, &centroid))
        .reduce(f64::max);

    log::debug!(
        "stats for '{}': total length {:?}",
        morphology.label(),
        stats.total_length
    );
    morphology.stats = stats.clone();
    Ok(stats)
}

struct MeasureFields<'a> {
    total: &'a mut Option<f64>,
    section_min: &'a mut Option<f64>,
    section_max: &'a mut Option<f64>,
    section_avg: &'a mut Option<f64>,
    segment_min: &'a mut Option<f64>,
    segment_max: &'a mut Option<f64>,
    segment_avg: &'a mut Option<f64>,
}

fn fields_mut(stats: &mut MorphologyStats, measure: Measure) -> MeasureFields<'_> {
    match measure {
        Measure::Length => MeasureFields {
            total: &mut stats.total_length,
            section_min: &mut stats.minimum_section_length,
            section_max: &mut stats.maximum_section_length,
            section_avg: &mut stats.average_section_length,
            segment_min: &mut stats.minimum_segment_length,
            segment_max: &mut stats.maximum_segment_length,
            segment_avg: &mut stats.average_segment_length,
        },
        Measure::SurfaceArea => MeasureFields {
            total: &mut stats.total_surface_area,
            section_min: &mut stats.minimum_section_surface_area,
            section_max: &mut stats.maximum_section_surface_area,
            section_avg: &mut stats.average_section_surface_area,
            segment_min: &mut stats.minimum_segment_surface_area,
            segment_max: &mut stats.maximum_segment_surface_area,
            segment_avg: &mut stats.average_segment_surface_area,
        },
        Measure::Volume => MeasureFields {
            total: &mut stats.total_volume,
            section_min: &mut stats.minimum_section_volume,
            section_max: &mut stats.maximum_section_volume,
            section_avg: &mut stats.average_section_volume,
            segment_min: &mut stats.minimum_segment_volume,
            segment_max: &mut stats.maximum_segment_volume,
            segment_avg: &mut stats.average_segment_volume,
        },
    }
}

/// The stats field a morphology-level result may be written into.
///
/// Only combinations whose value equals the pooled definition used by
/// `compute_stats` map to a field; averages of per-arbor averages do not.
pub fn stats_field(
    stats: &mut MorphologyStats,
    statistic: Statistic,
    aggregation: Aggregation,
) -> Option<&mut Option<f64>> {
    use Aggregation::{Maximum, Minimum, Total};
    match (statistic, aggregation) {
        (Statistic::Sections { measure, reduction: Total }, Total) => {
            Some(fields_mut(stats, measure).total)
        }
        (Statistic::Sections { measure, reduction: Minimum }, Minimum) => {
            Some(fields_mut(stats, measure).section_min)
        }
        (Statistic::Sections { measure, reduction: Maximum }, Maximum) => {
            Some(fields_mut(stats, measure).section_max)
        }
        (Statistic::Segments { measure, reduction: Minimum }, Minimum) => {
            Some(fields_mut(stats, measure).segment_min)
        }
        (Statistic::Segments { measure, reduction: Maximum }, Maximum) => {
            Some(fields_mut(stats, measure).segment_max)
        }
        (Statistic::MaximumPathDistance, Maximum) => Some(&mut stats.maximum_path_distance),
        (Statistic::MaximumEuclideanDistance, Maximum) => {
            Some(&mut stats.maximum_euclidean_distance)
        }
        _ => None,
    }
}

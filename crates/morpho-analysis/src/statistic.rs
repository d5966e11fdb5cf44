// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Per-Arbor Statistics
// ─────────────────────────────────────────────────────────────────────
//! Closed set of per-arbor kernels. Each variant reduces one arbor to a
//! scalar; the Aggregation Engine then combines arbors.

use nalgebra::Point3;

use morpho_core::{traversal, SectionArena, SectionId};
use morpho_types::{MorphoError, MorphoResult};

use crate::aggregate::{reduce_or_zero, Aggregation};
use crate::angle::{bifurcation_angle, AngleKind};
use crate::distance::{maximum_euclidean_distance, maximum_path_distance};
use crate::geometry::{section_measure, segment_measures, Measure};
use crate::short::short_sections;
use crate::topology::arbor_topology;

/// Topological quantity counted over an arbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Count {
    Sections,
    Samples,
    Segments,
    Bifurcations,
    Multifurcations,
    Terminals,
    MaximumBranchOrder,
    ShortSections,
    ZeroRadiusSamples,
}

/// A per-arbor kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    /// One value per section, reduced within the arbor.
    Sections { measure: Measure, reduction: Aggregation },
    /// One value per segment, reduced within the arbor.
    Segments { measure: Measure, reduction: Aggregation },
    /// Average bifurcation angle in degrees, 0 when the arbor has none.
    BifurcationAngle(AngleKind),
    /// Sample radii, reduced within the arbor.
    SampleRadius(Aggregation),
    Count(Count),
    MaximumPathDistance,
    /// Measured from the soma centroid.
    MaximumEuclideanDistance,
}

impl Statistic {
    pub const TOTAL_LENGTH: Statistic = Statistic::Sections {
        measure: Measure::Length,
        reduction: Aggregation::Total,
    };
    pub const TOTAL_SURFACE_AREA: Statistic = Statistic::Sections {
        measure: Measure::SurfaceArea,
        reduction: Aggregation::Total,
    };
    pub const TOTAL_VOLUME: Statistic = Statistic::Sections {
        measure: Measure::Volume,
        reduction: Aggregation::Total,
    };

    /// Reduce one arbor to a scalar.
    ///
    /// `centroid` is the soma centroid, `epsilon` the degenerate-direction
    /// threshold of the angle kernels.
    pub fn evaluate(
        &self,
        arena: &SectionArena,
        root: SectionId,
        centroid: &Point3<f64>,
        epsilon: f64,
    ) -> f64 {
        match *self {
            Statistic::Sections { measure, reduction } => {
                let values = traversal::map_sections(arena, root, |s| section_measure(s, measure));
                reduce_or_zero(&values, reduction)
            }
            Statistic::Segments { measure, reduction } => {
                let mut values = Vec::new();
                traversal::apply(arena, root, |s| values.extend(segment_measures(s, measure)));
                reduce_or_zero(&values, reduction)
            }
            Statistic::BifurcationAngle(kind) => {
                let mut angles = Vec::new();
                traversal::apply(arena, root, |s| {
                    angles.extend(bifurcation_angle(arena, s, kind, epsilon));
                });
                reduce_or_zero(&angles, Aggregation::Average)
            }
            Statistic::SampleRadius(reduction) => {
                let mut radii = Vec::new();
                traversal::apply(arena, root, |s| {
                    radii.extend(s.samples().iter().map(|sample| sample.radius));
                });
                reduce_or_zero(&radii, reduction)
            }
            Statistic::Count(count) => count_of(arena, root, count) as f64,
            Statistic::MaximumPathDistance => maximum_path_distance(arena, root),
            Statistic::MaximumEuclideanDistance => {
                maximum_euclidean_distance(arena, root, centroid)
            }
        }
    }

    /// Aggregation conventionally used to combine this statistic over
    /// a morphology.
    pub fn default_aggregation(&self) -> Aggregation {
        match *self {
            Statistic::Sections { reduction, .. }
            | Statistic::Segments { reduction, .. }
            | Statistic::SampleRadius(reduction) => match reduction {
                Aggregation::AverageIgnoreZero => Aggregation::Average,
                other => other,
            },
            Statistic::BifurcationAngle(_) => Aggregation::AverageIgnoreZero,
            Statistic::Count(Count::MaximumBranchOrder) => Aggregation::Maximum,
            Statistic::Count(_) => Aggregation::Total,
            Statistic::MaximumPathDistance | Statistic::MaximumEuclideanDistance => {
                Aggregation::Maximum
            }
        }
    }
}

impl std::str::FromStr for Statistic {
    type Err = MorphoError;

    /// Snake-case names such as `total_length`, `minimum_section_volume`,
    /// `average_segment_surface_area`, `local_bifurcation_angle`,
    /// `maximum_radius`, `terminal_count` or `maximum_path_distance`.
    fn from_str(s: &str) -> MorphoResult<Self> {
        let unknown = || MorphoError::Config(format!("unknown statistic '{s}'"));
        let fixed = match s {
            "total_length" => Some(Self::TOTAL_LENGTH),
            "total_surface_area" => Some(Self::TOTAL_SURFACE_AREA),
            "total_volume" => Some(Self::TOTAL_VOLUME),
            "local_bifurcation_angle" => Some(Self::BifurcationAngle(AngleKind::Local)),
            "global_bifurcation_angle" => Some(Self::BifurcationAngle(AngleKind::Global)),
            "maximum_path_distance" => Some(Self::MaximumPathDistance),
            "maximum_euclidean_distance" => Some(Self::MaximumEuclideanDistance),
            "section_count" => Some(Self::Count(Count::Sections)),
            "sample_count" => Some(Self::Count(Count::Samples)),
            "segment_count" => Some(Self::Count(Count::Segments)),
            "bifurcation_count" => Some(Self::Count(Count::Bifurcations)),
            "multifurcation_count" => Some(Self::Count(Count::Multifurcations)),
            "terminal_count" => Some(Self::Count(Count::Terminals)),
            "maximum_branch_order" => Some(Self::Count(Count::MaximumBranchOrder)),
            "short_section_count" => Some(Self::Count(Count::ShortSections)),
            "zero_radius_sample_count" => Some(Self::Count(Count::ZeroRadiusSamples)),
            _ => None,
        };
        if let Some(stat) = fixed {
            return Ok(stat);
        }

        let (reduction, rest) = s.split_once('_').ok_or_else(unknown)?;
        let reduction = match reduction {
            "minimum" => Aggregation::Minimum,
            "maximum" => Aggregation::Maximum,
            "average" => Aggregation::Average,
            "total" => Aggregation::Total,
            _ => return Err(unknown()),
        };
        if rest == "radius" {
            return Ok(Self::SampleRadius(reduction));
        }
        let (scope, measure) = rest.split_once('_').ok_or_else(unknown)?;
        let measure = match measure {
            "length" => Measure::Length,
            "surface_area" => Measure::SurfaceArea,
            "volume" => Measure::Volume,
            _ => return Err(unknown()),
        };
        match scope {
            "section" => Ok(Self::Sections { measure, reduction }),
            "segment" => Ok(Self::Segments { measure, reduction }),
            _ => Err(unknown()),
        }
    }
}

fn count_of(arena: &SectionArena, root: SectionId, count: Count) -> usize {
    let topology = || arbor_topology(arena, root);
    match count {
        Count::Sections => topology().sections,
        Count::Samples => topology().samples,
        Count::Segments => topology().segments,
        Count::Bifurcations => topology().bifurcations,
        Count::Multifurcations => topology().multifurcations,
        Count::Terminals => topology().terminals,
        Count::MaximumBranchOrder => topology().maximum_branch_order,
        Count::ZeroRadiusSamples => topology().zero_radius_samples,
        Count::ShortSections => short_sections(arena, root).len(),
    }
}

#[cfg(test)]
mod tests {
    use morpho_core::{Sample, SectionType};

    use super::*;

    /// root (length 2) ─┬─ left  (+y, length 1, 2 segments)
    ///                  └─ right (−y, length 3)
    fn fork() -> (SectionArena, SectionId) {
        let mut arena = SectionArena::new();
        let root = arena.insert(
            SectionType::BasalDendrite,
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(2.0, 0.0, 0.0, 1.0)],
        );
        arena
            .insert_child(
                root,
                SectionType::BasalDendrite,
                vec![
                    Sample::at(2.0, 0.0, 0.0, 0.5),
                    Sample::at(2.0, 0.5, 0.0, 0.5),
                    Sample::at(2.0, 1.0, 0.0, 0.5),
                ],
            )
            .unwrap();
        arena
            .insert_child(
                root,
                SectionType::BasalDendrite,
                vec![Sample::at(2.0, 0.0, 0.0, 0.5), Sample::at(2.0, -3.0, 0.0, 0.5)],
            )
            .unwrap();
        (arena, root)
    }

    fn eval(stat: Statistic) -> f64 {
        let (arena, root) = fork();
        stat.evaluate(&arena, root, &Point3::origin(), 1e-6)
    }

    #[test]
    fn test_section_reductions() {
        assert!((eval(Statistic::TOTAL_LENGTH) - 6.0).abs() < 1e-12);
        let min = Statistic::Sections {
            measure: Measure::Length,
            reduction: Aggregation::Minimum,
        };
        assert!((eval(min) - 1.0).abs() < 1e-12);
        let avg = Statistic::Sections {
            measure: Measure::Length,
            reduction: Aggregation::Average,
        };
        assert!((eval(avg) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_reductions() {
        let min = Statistic::Segments {
            measure: Measure::Length,
            reduction: Aggregation::Minimum,
        };
        let max = Statistic::Segments {
            measure: Measure::Length,
            reduction: Aggregation::Maximum,
        };
        assert!((eval(min) - 0.5).abs() < 1e-12);
        assert!((eval(max) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_and_counts() {
        assert!((eval(Statistic::BifurcationAngle(AngleKind::Local)) - 180.0).abs() < 1e-9);
        assert_eq!(eval(Statistic::Count(Count::Sections)), 3.0);
        assert_eq!(eval(Statistic::Count(Count::Segments)), 4.0);
        assert_eq!(eval(Statistic::Count(Count::Terminals)), 2.0);
        assert_eq!(eval(Statistic::Count(Count::MaximumBranchOrder)), 2.0);
        // Root (2 < 4) and left (1 < 2) are short, right (3 < 2) is not.
        assert_eq!(eval(Statistic::Count(Count::ShortSections)), 2.0);
    }

    #[test]
    fn test_distances() {
        assert!((eval(Statistic::MaximumPathDistance) - 5.0).abs() < 1e-12);
        assert!((eval(Statistic::MaximumEuclideanDistance) - 13f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_radius_reduction() {
        assert_eq!(eval(Statistic::SampleRadius(Aggregation::Maximum)), 1.0);
        assert_eq!(eval(Statistic::SampleRadius(Aggregation::Minimum)), 0.5);
    }

    #[test]
    fn test_arbor_without_bifurcation_angle_is_zero() {
        let mut arena = SectionArena::new();
        let root = arena.insert(
            SectionType::Axon,
            vec![Sample::at(0.0, 0.0, 0.0, 1.0), Sample::at(1.0, 0.0, 0.0, 1.0)],
        );
        let v = Statistic::BifurcationAngle(AngleKind::Global).evaluate(
            &arena,
            root,
            &Point3::origin(),
            1e-6,
        );
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("total_length".parse::<Statistic>().unwrap(), Statistic::TOTAL_LENGTH);
        assert_eq!(
            "minimum_segment_surface_area".parse::<Statistic>().unwrap(),
            Statistic::Segments {
                measure: Measure::SurfaceArea,
                reduction: Aggregation::Minimum
            }
        );
        assert_eq!(
            "average_radius".parse::<Statistic>().unwrap(),
            Statistic::SampleRadius(Aggregation::Average)
        );
        assert_eq!(
            "terminal_count".parse::<Statistic>().unwrap(),
            Statistic::Count(Count::Terminals)
        );
        assert!("median_section_length".parse::<Statistic>().is_err());
        assert!("maximum_section_width".parse::<Statistic>().is_err());
        assert!("length".parse::<Statistic>().is_err());
    }

    #[test]
    fn test_default_aggregations() {
        assert_eq!(
            Statistic::BifurcationAngle(AngleKind::Local).default_aggregation(),
            Aggregation::AverageIgnoreZero
        );
        assert_eq!(Statistic::TOTAL_VOLUME.default_aggregation(), Aggregation::Total);
        assert_eq!(
            Statistic::MaximumPathDistance.default_aggregation(),
            Aggregation::Maximum
        );
    }
}

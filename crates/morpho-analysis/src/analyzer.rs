// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Morphology Analyzer
// ─────────────────────────────────────────────────────────────────────
//! Configured entry point tying per-arbor statistics to the
//! Aggregation Engine.

use morpho_core::{Morphology, SectionArena};
use morpho_types::{AnalysisResult, MorphoConfig, MorphoResult, ShortSection};

use crate::aggregate::{aggregate, per_arbor, Aggregation};
use crate::short::short_sections;
use crate::stats::{compute_stats, stats_field};
use crate::statistic::Statistic;

/// Runs statistics over morphologies with one configuration.
#[derive(Debug, Clone, Default)]
pub struct MorphologyAnalyzer {
    config: MorphoConfig,
}

impl MorphologyAnalyzer {
    pub fn new(config: MorphoConfig) -> MorphoResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MorphoConfig {
        &self.config
    }

    /// One result per arbor instance, no morphology scalar.
    pub fn per_role(
        &self,
        morphology: &Morphology,
        statistic: Statistic,
    ) -> MorphoResult<AnalysisResult> {
        let centroid = morphology.soma().centroid();
        let epsilon = self.config.direction_epsilon;
        per_arbor(morphology, |arena: &SectionArena, arbor| {
            Ok(statistic.evaluate(arena, arbor.root, &centroid, epsilon))
        })
    }

    /// Per-role lists plus the morphology scalar under `aggregation`.
    pub fn analyze(
        &self,
        morphology: &Morphology,
        statistic: Statistic,
        aggregation: Aggregation,
    ) -> MorphoResult<AnalysisResult> {
        let centroid = morphology.soma().centroid();
        let epsilon = self.config.direction_epsilon;
        aggregate(
            morphology,
            |arena: &SectionArena, arbor| Ok(statistic.evaluate(arena, arbor.root, &centroid, epsilon)),
            aggregation,
        )
    }

    /// `analyze` with the statistic's conventional aggregation.
    pub fn analyze_default(
        &self,
        morphology: &Morphology,
        statistic: Statistic,
    ) -> MorphoResult<AnalysisResult> {
        self.analyze(morphology, statistic, statistic.default_aggregation())
    }

    /// Like `analyze`, and also writes the scalar into the morphology's
    /// stats record when a matching field exists.
    pub fn record(
        &self,
        morphology: &mut Morphology,
        statistic: Statistic,
        aggregation: Aggregation,
    ) -> MorphoResult<f64> {
        let result = self.analyze(morphology, statistic, aggregation)?;
        let value = result.morphology.unwrap_or_default();
        if let Some(field) = stats_field(&mut morphology.stats, statistic, aggregation) {
            *field = Some(value);
        }
        Ok(value)
    }

    /// Short sections of every arbor, pooled in arbor order.
    pub fn short_sections(&self, morphology: &Morphology) -> Vec<ShortSection> {
        morphology
            .arbors()
            .into_iter()
            .flat_map(|a| short_sections(morphology.arena(), a.root))
            .collect()
    }

    pub fn compute_stats(&self, morphology: &mut Morphology) -> MorphoResult<()> {
        compute_stats(morphology).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use morpho_core::{MorphologyBuilder, ParsedSoma, Point3, Sample, SectionType};
    use morpho_types::MorphoError;

    use super::*;
    use crate::angle::AngleKind;
    use crate::geometry::Measure;

    fn soma() -> ParsedSoma {
        ParsedSoma {
            centroid: Point3::origin(),
            mean_radius: 1.0,
            profile_points: vec![Point3::new(1.0, 0.0, 0.0)],
        }
    }

    /// Basal fork with a right angle plus a straight unbranched axon.
    fn neuron() -> Morphology {
        let mut b = MorphologyBuilder::new("neuron").soma(soma());
        let root = b.add(
            SectionType::BasalDendrite,
            None,
            vec![Sample::at(0.0, 0.0, 0.0, 0.2), Sample::at(10.0, 0.0, 0.0, 0.2)],
        );
        b.add(
            SectionType::BasalDendrite,
            Some(root),
            vec![Sample::at(10.0, 0.0, 0.0, 0.1), Sample::at(10.0, 5.0, 0.0, 0.1)],
        );
        b.add(
            SectionType::BasalDendrite,
            Some(root),
            vec![Sample::at(10.0, 0.0, 0.0, 0.1), Sample::at(15.0, 0.0, 0.0, 0.1)],
        );
        b.add(
            SectionType::Axon,
            None,
            vec![Sample::at(0.0, 0.0, 0.0, 0.3), Sample::at(-20.0, 0.0, 0.0, 0.3)],
        );
        b.build().unwrap()
    }

    #[test]
    fn test_total_length() {
        let a = MorphologyAnalyzer::default();
        let r = a.analyze(&neuron(), Statistic::TOTAL_LENGTH, Aggregation::Total).unwrap();
        assert_eq!(r.basal, vec![20.0]);
        assert_eq!(r.axons, vec![20.0]);
        assert_eq!(r.morphology, Some(40.0));
    }

    #[test]
    fn test_angle_ignores_arbors_without_bifurcation() {
        let a = MorphologyAnalyzer::default();
        let r = a
            .analyze_default(&neuron(), Statistic::BifurcationAngle(AngleKind::Local))
            .unwrap();
        assert_eq!(r.axons, vec![0.0]);
        assert!((r.morphology.unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_without_any_bifurcation_is_filtered() {
        let mut b = MorphologyBuilder::new("straight").soma(soma());
        b.add(
            SectionType::Axon,
            None,
            vec![Sample::at(0.0, 0.0, 0.0, 0.3), Sample::at(5.0, 0.0, 0.0, 0.3)],
        );
        let m = b.build().unwrap();
        let err = MorphologyAnalyzer::default()
            .analyze_default(&m, Statistic::BifurcationAngle(AngleKind::Global))
            .unwrap_err();
        assert_eq!(err, MorphoError::AllEntriesFiltered { count: 1 });
    }

    #[test]
    fn test_record_writes_side_channel() {
        let a = MorphologyAnalyzer::default();
        let mut m = neuron();
        let stat = Statistic::Sections {
            measure: Measure::Length,
            reduction: Aggregation::Maximum,
        };
        let v = a.record(&mut m, stat, Aggregation::Maximum).unwrap();
        assert_eq!(v, 20.0);
        assert_eq!(m.stats.maximum_section_length, Some(20.0));
        assert_eq!(m.stats.minimum_section_length, None);
    }

    #[test]
    fn test_short_sections_pooled() {
        let a = MorphologyAnalyzer::default();
        // Every section here is long relative to its radii.
        assert!(a.short_sections(&neuron()).is_empty());
        let mut m = neuron();
        a.compute_stats(&mut m).unwrap();
        assert_eq!(m.stats.total_length, Some(40.0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MorphoConfig {
            direction_epsilon: 0.0,
            ..MorphoConfig::default()
        };
        assert!(MorphologyAnalyzer::new(config).is_err());
    }
}

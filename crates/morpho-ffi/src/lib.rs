// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied: PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the Morpho Kernel.
//!
//! Exposes `MorphoConfig` and `Morphology` to the Python host, which
//! parses files and renders; this crate only models, analyses and
//! repairs.
//!
//! # FFI Safety
//!
//! - GIL acquired via `Python::with_gil` before every Python callback.
//! - Python exceptions in a continuation callback mean "no choice".
//! - Every `MorphoError` surfaces as `ValueError`.
//! - All config validated before storage (`MorphoConfig::validate()`).
//!
//! Usage from Python:
//! ```python
//! from morpho_kernel import Morphology
//!
//! m = Morphology(
//!     "cell", (0.0, 0.0, 0.0), 5.0, [(5.0, 0.0, 0.0)],
//!     [(3, None, [(0, 0, 0, 1.0), (10, 0, 0, 0.8)])],
//! )
//! m.analyze("total_length", "total")["morphology"]
//! m.repair()
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use morpho_analysis::{Aggregation, MorphologyAnalyzer, Statistic};
use morpho_core::{
    ArborRole, MorphologyBuilder, ParsedSection, ParsedSoma, Point3, Sample, SectionArena,
    SectionId, SectionType, SharedMorphology,
};
use morpho_repair::{ContinuationView, ExternalSelector, LeastAngleSelector, RepairPipeline};
use morpho_types::{AnalysisResult, MorphoConfig, MorphoError, RadiusPolicy, RepairReport};

fn to_py_err(e: MorphoError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// `(x, y, z, radius)` as seen from Python.
type SampleTuple = (f64, f64, f64, f64);

/// Samples passed to a selector on each side of the branch point.
const SELECTOR_CONTEXT: usize = 3;

fn sample_tuples(samples: &[Sample]) -> Vec<SampleTuple> {
    samples
        .iter()
        .map(|x| (x.point.x, x.point.y, x.point.z, x.radius))
        .collect()
}

fn parse_policy(kind: &str, value: f64) -> PyResult<RadiusPolicy> {
    match kind {
        "as_specified" => Ok(RadiusPolicy::AsSpecified),
        "fixed" => Ok(RadiusPolicy::Fixed { radius: value }),
        "scaled" => Ok(RadiusPolicy::Scaled { factor: value }),
        "minimum" => Ok(RadiusPolicy::Minimum { radius: value }),
        other => Err(PyValueError::new_err(format!(
            "unknown radius policy '{other}'"
        ))),
    }
}

fn report_dict(py: Python<'_>, report: &RepairReport) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    dict.set_item("sections_compressed", report.sections_compressed)?;
    dict.set_item("children_merged", report.children_merged)?;
    dict.set_item("radii_raised", report.radii_raised)?;
    dict.set_item("radii_rewritten", report.radii_rewritten)?;
    Ok(dict.into())
}

fn result_dict(py: Python<'_>, result: &AnalysisResult) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    dict.set_item("apical", result.apical.clone())?;
    dict.set_item("basal", result.basal.clone())?;
    dict.set_item("axons", result.axons.clone())?;
    dict.set_item("morphology", result.morphology)?;
    Ok(dict.into())
}

// ─── PyMorphoConfig ─────────────────────────────────────────────────

/// Python-visible configuration for analysis and repair.
#[pyclass(name = "MorphoConfig")]
#[derive(Clone)]
struct PyMorphoConfig {
    inner: MorphoConfig,
}

#[pymethods]
impl PyMorphoConfig {
    #[new]
    #[pyo3(signature = (
        direction_epsilon = 1e-6,
        subdivision_safety = false,
        repair_short_sections = true,
        merge_single_children = true,
        repair_branch_radii = true,
        radius_policy = "as_specified",
        radius_value = 1.0,
    ))]
    fn new(
        direction_epsilon: f64,
        subdivision_safety: bool,
        repair_short_sections: bool,
        merge_single_children: bool,
        repair_branch_radii: bool,
        radius_policy: &str,
        radius_value: f64,
    ) -> PyResult<Self> {
        let config = MorphoConfig {
            direction_epsilon,
            subdivision_safety,
            repair_short_sections,
            merge_single_children,
            repair_branch_radii,
            radius_policy: parse_policy(radius_policy, radius_value)?,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = MorphoConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "MorphoConfig(direction_epsilon={}, subdivision_safety={}, radius_policy={:?})",
            self.inner.direction_epsilon, self.inner.subdivision_safety, self.inner.radius_policy
        )
    }
}

// ─── PyMorphology ───────────────────────────────────────────────────

type PySection = (i32, Option<usize>, Vec<(f64, f64, f64, f64)>);

/// Python-visible morphology.
///
/// Sections are `(swc_type, parent_index, [(x, y, z, radius), ...])`
/// where `parent_index` points into the same list, or `None` for an
/// arbor root. Section ids returned by queries are arena handles.
#[pyclass(name = "Morphology")]
struct PyMorphology {
    inner: SharedMorphology,
    analyzer: MorphologyAnalyzer,
}

impl PyMorphology {
    fn statistic(name: &str) -> PyResult<Statistic> {
        name.parse::<Statistic>().map_err(to_py_err)
    }
}

#[pymethods]
impl PyMorphology {
    #[new]
    #[pyo3(signature = (
        label,
        soma_centroid,
        soma_mean_radius,
        soma_points,
        sections,
        config = None,
        derive_arbors_profile = true,
    ))]
    fn new(
        label: String,
        soma_centroid: (f64, f64, f64),
        soma_mean_radius: f64,
        soma_points: Vec<(f64, f64, f64)>,
        sections: Vec<PySection>,
        config: Option<PyMorphoConfig>,
        derive_arbors_profile: bool,
    ) -> PyResult<Self> {
        let (cx, cy, cz) = soma_centroid;
        let mut builder = MorphologyBuilder::new(label)
            .soma(ParsedSoma {
                centroid: Point3::new(cx, cy, cz),
                mean_radius: soma_mean_radius,
                profile_points: soma_points
                    .into_iter()
                    .map(|(x, y, z)| Point3::new(x, y, z))
                    .collect(),
            })
            .derive_arbors_profile(derive_arbors_profile);
        for (tag, parent, samples) in sections {
            builder.section(ParsedSection {
                section_type: SectionType::from_swc(tag),
                samples: samples
                    .into_iter()
                    .map(|(x, y, z, r)| Sample::at(x, y, z, r))
                    .collect(),
                parent,
            });
        }
        let morphology = builder.build().map_err(to_py_err)?;
        let analyzer = MorphologyAnalyzer::new(config.map(|c| c.inner).unwrap_or_default())
            .map_err(to_py_err)?;
        Ok(Self {
            inner: SharedMorphology::new(morphology),
            analyzer,
        })
    }

    #[getter]
    fn label(&self) -> String {
        self.inner.read(|m| m.label().to_string())
    }

    fn arbor_count(&self) -> usize {
        self.inner.read(|m| m.arbor_count())
    }

    /// Sections allocated in the arena, detached ones included.
    fn section_count(&self) -> usize {
        self.inner.read(|m| m.arena().len())
    }

    fn roots(&self) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
        self.inner.read(|m| {
            let ids = |v: &[SectionId]| v.iter().map(|s| s.index()).collect::<Vec<_>>();
            (
                ids(m.roots(ArborRole::ApicalDendrite)),
                ids(m.basal_dendrites()),
                ids(m.axons()),
            )
        })
    }

    fn children(&self, section: usize) -> PyResult<Vec<usize>> {
        self.inner.read(|m| {
            let s = m.arena().get(SectionId(section)).map_err(to_py_err)?;
            Ok(s.children().iter().map(|c| c.index()).collect())
        })
    }

    fn samples(&self, section: usize) -> PyResult<Vec<SampleTuple>> {
        self.inner.read(|m| {
            let s = m.arena().get(SectionId(section)).map_err(to_py_err)?;
            Ok(sample_tuples(s.samples()))
        })
    }

    fn validate(&self) -> PyResult<()> {
        self.inner.read(|m| m.validate()).map_err(to_py_err)
    }

    /// Per-role lists plus the morphology scalar.
    ///
    /// `aggregation` defaults to the statistic's conventional policy.
    #[pyo3(signature = (statistic, aggregation = None))]
    fn analyze(
        &self,
        py: Python<'_>,
        statistic: &str,
        aggregation: Option<&str>,
    ) -> PyResult<PyObject> {
        let stat = Self::statistic(statistic)?;
        let agg = match aggregation {
            Some(a) => a.parse::<Aggregation>().map_err(to_py_err)?,
            None => stat.default_aggregation(),
        };
        let result = self
            .inner
            .read(|m| self.analyzer.analyze(m, stat, agg))
            .map_err(to_py_err)?;
        result_dict(py, &result)
    }

    /// One value per arbor instance, no morphology scalar.
    fn per_role(&self, py: Python<'_>, statistic: &str) -> PyResult<PyObject> {
        let stat = Self::statistic(statistic)?;
        let result = self
            .inner
            .read(|m| self.analyzer.per_role(m, stat))
            .map_err(to_py_err)?;
        result_dict(py, &result)
    }

    fn short_sections(&self, py: Python<'_>) -> PyResult<Vec<PyObject>> {
        let found = self.inner.read(|m| self.analyzer.short_sections(m));
        found
            .iter()
            .map(|s| {
                let dict = PyDict::new(py);
                dict.set_item("section_id", s.section_id)?;
                dict.set_item("length", s.length)?;
                dict.set_item("minimal_length", s.minimal_length)?;
                Ok(dict.into())
            })
            .collect()
    }

    /// Fill the stats record and return it. Absent fields are omitted.
    fn compute_stats(&self, py: Python<'_>) -> PyResult<PyObject> {
        let stats = self
            .inner
            .write(morpho_analysis::compute_stats)
            .map_err(to_py_err)?;
        let value = serde_json::to_value(&stats).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let dict = PyDict::new(py);
        if let serde_json::Value::Object(fields) = value {
            for (name, v) in fields {
                dict.set_item(name, v.as_f64())?;
            }
        }
        Ok(dict.into())
    }

    /// Run the fixed repair pipeline in place.
    #[pyo3(signature = (config = None))]
    fn repair(&self, py: Python<'_>, config: Option<PyMorphoConfig>) -> PyResult<PyObject> {
        let config = config
            .map(|c| c.inner)
            .unwrap_or_else(|| self.analyzer.config().clone());
        let pipeline = RepairPipeline::new(config).map_err(to_py_err)?;
        let report = pipeline.run_shared(&self.inner).map_err(to_py_err)?;
        report_dict(py, &report)
    }

    /// Merge every branching section with a continuation child.
    ///
    /// `selector(section_id, parent_tail, children)` returns the chosen
    /// child id or `None`. `parent_tail` is the section's last samples and
    /// `children` is a list of `(child_id, leading_samples)`, samples as
    /// `(x, y, z, radius)`. The pass runs on a working copy, so the
    /// selector may read this morphology; the result replaces it once the
    /// pass ends. Without a selector the least-angle rule is used.
    #[pyo3(signature = (selector = None))]
    fn connect_continuations(
        &self,
        py: Python<'_>,
        selector: Option<PyObject>,
    ) -> PyResult<PyObject> {
        let pipeline = RepairPipeline::new(self.analyzer.config().clone()).map_err(to_py_err)?;
        let report = match selector {
            Some(cb) => {
                let external = ExternalSelector::new(move |arena: &SectionArena, id: SectionId| {
                    let view = ContinuationView::of(arena, id, SELECTOR_CONTEXT).ok()?;
                    let children: Vec<(usize, Vec<SampleTuple>)> = view
                        .children
                        .iter()
                        .map(|(c, lead)| (c.index(), sample_tuples(lead)))
                        .collect();
                    let args = (id.index(), sample_tuples(&view.parent_tail), children);
                    Python::with_gil(|py| match cb.call1(py, args) {
                        Ok(result) => result
                            .extract::<Option<usize>>(py)
                            .unwrap_or(None)
                            .map(SectionId),
                        Err(_) => None,
                    })
                });
                self.inner
                    .edit_detached(|m| pipeline.connect_continuations(m, &external))
            }
            None => {
                let least_angle = LeastAngleSelector {
                    epsilon: self.analyzer.config().direction_epsilon,
                };
                self.inner
                    .write(|m| pipeline.connect_continuations(m, &least_angle))
            }
        }
        .map_err(to_py_err)?;
        report_dict(py, &report)
    }

    fn __repr__(&self) -> String {
        self.inner.read(|m| {
            format!(
                "Morphology(label='{}', arbors={}, sections={})",
                m.label(),
                m.arbor_count(),
                m.arena().len()
            )
        })
    }
}

// ─── Module ─────────────────────────────────────────────────────────

#[pymodule]
fn morpho_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMorphoConfig>()?;
    m.add_class::<PyMorphology>()?;
    Ok(())
}

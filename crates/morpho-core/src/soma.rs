// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Soma
// ─────────────────────────────────────────────────────────────────────
//! The cell body, modelled apart from the arbor trees.

use nalgebra::Point3;

use morpho_types::{MorphoError, MorphoResult};

/// Soma record with its derived radius candidates.
#[derive(Debug, Clone)]
pub struct Soma {
    centroid: Point3<f64>,
    mean_radius: f64,
    profile_points: Vec<Point3<f64>>,
    arbors_profile_points: Vec<Point3<f64>>,
    possible_radii: Vec<f64>,
}

impl Soma {
    /// Build a soma and derive its sorted radius candidates.
    ///
    /// Candidates are the lengths of every profile and arbor-profile
    /// point, expressed in the soma's local frame. Fails with
    /// `EmptySoma` when both point sets are empty.
    pub fn new(
        centroid: Point3<f64>,
        mean_radius: f64,
        profile_points: Vec<Point3<f64>>,
        arbors_profile_points: Vec<Point3<f64>>,
    ) -> MorphoResult<Self> {
        let points_ok = profile_points
            .iter()
            .chain(&arbors_profile_points)
            .chain(std::iter::once(&centroid))
            .all(|p| p.iter().all(|c| c.is_finite()));
        if !points_ok || !mean_radius.is_finite() {
            return Err(MorphoError::Numerical(
                "soma geometry contains NaN or Inf".to_string(),
            ));
        }

        let mut possible_radii: Vec<f64> = profile_points
            .iter()
            .chain(&arbors_profile_points)
            .map(|p| p.coords.norm())
            .collect();
        if possible_radii.is_empty() {
            return Err(MorphoError::EmptySoma);
        }
        possible_radii.sort_by(f64::total_cmp);

        Ok(Self {
            centroid,
            mean_radius,
            profile_points,
            arbors_profile_points,
            possible_radii,
        })
    }

    pub fn centroid(&self) -> Point3<f64> {
        self.centroid
    }

    /// Radius as reported by the source file.
    pub fn mean_radius(&self) -> f64 {
        self.mean_radius
    }

    pub fn profile_points(&self) -> &[Point3<f64>] {
        &self.profile_points
    }

    pub fn arbors_profile_points(&self) -> &[Point3<f64>] {
        &self.arbors_profile_points
    }

    /// Sorted ascending, never empty.
    pub fn possible_radii(&self) -> &[f64] {
        &self.possible_radii
    }

    pub fn smallest_radius(&self) -> f64 {
        self.possible_radii[0]
    }

    pub fn largest_radius(&self) -> f64 {
        self.possible_radii[self.possible_radii.len() - 1]
    }

    /// Replace the arbor-profile points and re-derive the radii.
    pub fn with_arbors_profile(self, arbors_profile_points: Vec<Point3<f64>>) -> MorphoResult<Self> {
        Self::new(
            self.centroid,
            self.mean_radius,
            self.profile_points,
            arbors_profile_points,
        )
    }
}

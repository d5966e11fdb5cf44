// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Skeleton Sample
// ─────────────────────────────────────────────────────────────────────
//! The atomic skeleton unit: a 3D point with a radius.

use nalgebra::Point3;

use morpho_types::{MorphoError, MorphoResult};

/// Provenance index used for samples that did not come from a file.
pub const SYNTHETIC_INDEX: i64 = -1;

/// One point+radius measurement along a section.
///
/// Owned exclusively by its section; `local_index` is kept equal to the
/// sample's position in the owning section's sample list.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Position in microns.
    pub point: Point3<f64>,
    /// Radius in microns, ≥ 0.
    pub radius: f64,
    /// Position within the owning section (0..N-1).
    pub local_index: usize,
    /// Index in the source file, `SYNTHETIC_INDEX` if generated.
    pub file_index: i64,
    /// Provenance-level parent link, kept for reconstruction only.
    pub parent_index: i64,
}

impl Sample {
    /// Synthetic sample with no file provenance.
    pub fn new(point: Point3<f64>, radius: f64) -> Self {
        Self {
            point,
            radius,
            local_index: 0,
            file_index: SYNTHETIC_INDEX,
            parent_index: SYNTHETIC_INDEX,
        }
    }

    /// Convenience constructor from raw coordinates.
    pub fn at(x: f64, y: f64, z: f64, radius: f64) -> Self {
        Self::new(Point3::new(x, y, z), radius)
    }

    /// Sample carrying its source-file provenance.
    pub fn from_file(point: Point3<f64>, radius: f64, file_index: i64, parent_index: i64) -> Self {
        Self {
            point,
            radius,
            local_index: 0,
            file_index,
            parent_index,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.file_index == SYNTHETIC_INDEX
    }

    /// Reject NaN/Inf coordinates and negative or non-finite radii.
    pub fn check_finite(&self) -> MorphoResult<()> {
        if !self.point.iter().all(|c| c.is_finite()) {
            return Err(MorphoError::Numerical(format!(
                "sample {} has a non-finite coordinate",
                self.file_index
            )));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(MorphoError::Numerical(format!(
                "sample {} has invalid radius {}",
                self.file_index, self.radius
            )));
        }
        Ok(())
    }

    /// Euclidean distance to another sample.
    #[inline]
    pub fn distance_to(&self, other: &Sample) -> f64 {
        nalgebra::distance(&self.point, &other.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_sample() {
        let s = Sample::at(1.0, 2.0, 3.0, 0.5);
        assert!(s.is_synthetic());
        assert_eq!(s.parent_index, SYNTHETIC_INDEX);
        assert_eq!(s.local_index, 0);
    }

    #[test]
    fn test_distance() {
        let a = Sample::at(0.0, 0.0, 0.0, 1.0);
        let b = Sample::at(3.0, 4.0, 0.0, 1.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_check_finite() {
        assert!(Sample::at(0.0, 0.0, 0.0, 0.0).check_finite().is_ok());
        assert!(Sample::at(f64::NAN, 0.0, 0.0, 1.0).check_finite().is_err());
        assert!(Sample::at(0.0, 0.0, 0.0, -0.1).check_finite().is_err());
        assert!(Sample::at(0.0, 0.0, 0.0, f64::INFINITY).check_finite().is_err());
    }

    #[test]
    fn test_from_file_keeps_provenance() {
        let s = Sample::from_file(Point3::origin(), 1.0, 7, 6);
        assert!(!s.is_synthetic());
        assert_eq!(s.file_index, 7);
        assert_eq!(s.parent_index, 6);
    }
}

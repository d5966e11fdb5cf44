// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Morpho Kernel failures.
///
/// Degenerate geometry (single-sample sections, zero-length directions,
/// one-child forks) is never reported through this type; kernels return a
/// neutral contribution for those instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MorphoError {
    /// A scalar was requested over a morphology with no arbor of any role,
    /// or over an empty list of pooled values.
    #[error("empty aggregate: {0}")]
    EmptyAggregate(String),

    /// The ignore-zero average filtered out every pooled entry.
    #[error("all {count} pooled entries are zero, nothing left to average")]
    AllEntriesFiltered { count: usize },

    /// Soma constructed without any profile or arbor-profile point.
    #[error("soma has no profile points, radius is undefined")]
    EmptySoma,

    /// Tree failed construction-time well-formedness checks.
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// Section handle does not refer to an arena slot.
    #[error("unknown section handle {0}")]
    UnknownSection(usize),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in input geometry).
    #[error("numerical error: {0}")]
    Numerical(String),
}

pub type MorphoResult<T> = Result<T, MorphoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = MorphoError::AllEntriesFiltered { count: 3 };
        assert!(e.to_string().contains("3 pooled entries"));
        let e = MorphoError::UnknownSection(42);
        assert_eq!(e.to_string(), "unknown section handle 42");
    }
}

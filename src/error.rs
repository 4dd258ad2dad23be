//! Error types.

use thiserror::Error;

/// Errors a caller can get back from `Selector::filter`.
///
/// Only bad configuration is reported this way.  Awkward data is handled by
/// falling back to the exact algorithm, see [`Degeneracy`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("percentage filter must be in (0, 100], got {0}")]
    InvalidPercentage(f64),

    #[error("progress interval must be at least 1")]
    ZeroProgressInterval,
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, FilterError>;

/// Why the histogram path gave up and the full sort ran instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Degeneracy {
    #[error("input contains a NaN or infinite value")]
    NonFiniteValue,

    #[error("no bucket reaches the keep count")]
    ThresholdNotFound,

    /// Guards against bucket edges that compare equal.  Edges built as
    /// `i * bin_size` with a width of at least 1 never do, so this is only
    /// reachable through a corrupted histogram.
    #[error("threshold bucket collapsed to zero width")]
    ZeroWidthBucket,

    #[error("threshold bucket is empty")]
    EmptyBucket,

    #[error("bucket classification disagrees with histogram counts")]
    InconsistentCounts,
}

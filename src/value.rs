//! The numeric type that abundance values are stored as.

use num_traits::Float;
use std::cmp::Ordering;
use std::fmt::Debug;

/// A floating-point abundance value.  Implemented for `f32` and `f64`.
///
/// Everything beyond `Float` is a lossless or saturating conversion that the
/// histogram and intensity passes need and that `num_traits` only offers
/// as fallible (`Option`-returning) casts.
pub trait Abundance: Float + Debug + Send + Sync + 'static {
    /// IEEE 754 total order, used by every sort so that NaN and -0.0
    /// have a fixed place.
    fn total_order(&self, other: &Self) -> Ordering;

    /// Converts a bucket number into a value.
    fn from_usize(n: usize) -> Self;

    /// Truncates toward zero; negative values and NaN give 0, huge values saturate.
    fn saturating_to_usize(self) -> usize;

    /// Widens to f64 for intensity sums.
    fn to_f64_lossy(self) -> f64;
}

impl Abundance for f32 {
    #[inline]
    fn total_order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    #[inline]
    fn from_usize(n: usize) -> Self {
        n as f32
    }

    #[inline]
    fn saturating_to_usize(self) -> usize {
        self as usize
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
}

impl Abundance for f64 {
    #[inline]
    fn total_order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    #[inline]
    fn from_usize(n: usize) -> Self {
        n as f64
    }

    #[inline]
    fn saturating_to_usize(self) -> usize {
        self as usize
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }
}

//! A fixed-width histogram of abundance values.
//!
//! The value range `[0, ceil(max)]` is cut into [`BUCKETS`] slices of equal
//! width (never narrower than 1), and every point is counted into exactly one
//! of them.  Bucket 0 also takes every value at or below zero.  One pass over
//! the points finds the maximum and a second does the counting.
//!
//! Bucket boundaries are computed as `i * bin_size`, never by repeated
//! addition, so they are strictly increasing for every finite maximum.
//! Dividing by `bin_size` can still land a value one bucket low when the value
//! sits right on a boundary; the classifier nudges those up.

use crate::error::Degeneracy;
use crate::point::Point;
use crate::progress::ProgressTracker;
use crate::value::Abundance;
use tracing::{trace, warn};

/// Number of slices the value range is divided into.
pub(crate) const BUCKETS: usize = 5000;

#[derive(Clone, Debug)]
pub(crate) struct Histogram<T> {
    // Width of each bucket; at least 1.
    bin_size: T,
    // Largest value seen, before rounding.
    max_value: T,
    counts: Vec<usize>,
}

impl<T: Abundance> Histogram<T> {
    /// Counts `points` into buckets.  Fails only when a value is NaN or
    /// infinite, since then there is no finite range to slice.
    pub(crate) fn build(
        points: &[Point<T>],
        progress: &mut ProgressTracker<'_>,
    ) -> Result<Self, Degeneracy> {
        let mut max_value = T::neg_infinity();
        for point in points {
            if !point.value.is_finite() {
                return Err(Degeneracy::NonFiniteValue);
            }
            max_value = max_value.max(point.value);
        }
        let mut histogram = Self::with_max(max_value);
        for point in points {
            let bin = histogram.bin_of(point.value);
            histogram.counts[bin] += 1;
            progress.tick();
        }
        trace!(
            bins = histogram.counts.len(),
            bin_size = ?histogram.bin_size,
            max_value = ?histogram.max_value,
            "histogram built"
        );
        Ok(histogram)
    }

    // Empty buckets sized for values up to `max_value`.
    fn with_max(max_value: T) -> Self {
        let ceiling = max_value.ceil();
        let bin_size = (ceiling / T::from_usize(BUCKETS)).max(T::one());
        // An all-negative input gives a non-positive ceiling; one bucket holds it.
        let bin_count = (ceiling / bin_size).floor().saturating_to_usize().saturating_add(1);
        Self {
            bin_size,
            max_value,
            counts: vec![0; bin_count.max(1)],
        }
    }

    /// A histogram with hand-picked bucket width and counts.
    #[cfg(test)]
    pub(crate) fn from_parts(bin_size: T, max_value: T, counts: Vec<usize>) -> Self {
        Self {
            bin_size,
            max_value,
            counts,
        }
    }

    #[inline]
    pub(crate) fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Inclusive lower edge of a bucket.
    #[inline]
    pub(crate) fn start(&self, bin: usize) -> T {
        T::from_usize(bin) * self.bin_size
    }

    /// The half-open value range `[lower, upper)` that bucket `bin` covers.
    /// Bucket 0 reaches down to minus infinity and the last bucket up to
    /// plus infinity, matching how `bin_of` classifies.
    pub(crate) fn bounds(&self, bin: usize) -> (T, T) {
        let lower = if bin == 0 {
            T::neg_infinity()
        } else {
            self.start(bin)
        };
        let upper = if bin + 1 < self.counts.len() {
            self.start(bin + 1)
        } else {
            T::infinity()
        };
        (lower, upper)
    }

    /// The bucket a value is counted in.
    pub(crate) fn bin_of(&self, value: T) -> usize {
        if value <= T::zero() {
            return 0;
        }
        let last = self.counts.len() - 1;
        let mut bin = (value / self.bin_size).floor().saturating_to_usize().min(last);
        // Division rounding can leave a value that sits on the next bucket's
        // start one bucket too low, or a hair under this one's start.
        if bin < last && value >= self.start(bin + 1) {
            bin += 1;
        } else if bin > 0 && value < self.start(bin) {
            bin -= 1;
        }
        let slack = self.bin_size / T::from_usize(1000);
        if value < self.start(bin) - slack {
            warn!(
                value = ?value,
                bin,
                start = ?self.start(bin),
                "value classified into a bucket that starts above it"
            );
        }
        bin
    }
}

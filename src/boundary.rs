//! Resolves the threshold bucket exactly.
//!
//! Everything below the threshold bucket is skipped outright and everything
//! above it is kept without being looked at again.  Only the points inside
//! the bucket (the boundary set) get sorted.  For spread-out data that is
//! about n / 5000 points; for data piled into one bucket it degrades toward
//! a full sort but stays correct.

use crate::error::Degeneracy;
use crate::exact::{Candidate, merge, sort_and_mark};
use crate::histogram::Histogram;
use crate::point::{Mark, PointStore};
use crate::progress::ProgressTracker;
use crate::threshold::Threshold;
use crate::value::Abundance;
use tracing::debug;

/// Marks the store so that exactly `keep` points stay retained, using the
/// located threshold bucket.  Returns the size of the boundary set.
///
/// Expects every mark in `store` to start out `Retained`.  On `Err` the
/// marks are partially written; the caller must redo them all.
pub(crate) fn resolve<T: Abundance>(
    store: &mut PointStore<T>,
    histogram: &Histogram<T>,
    threshold: Threshold,
    keep: usize,
    progress: &mut ProgressTracker<'_>,
) -> Result<usize, Degeneracy> {
    let (lower, upper) = histogram.bounds(threshold.bucket);
    if lower >= upper {
        return Err(Degeneracy::ZeroWidthBucket);
    }
    if threshold.within == 0 {
        return Err(Degeneracy::EmptyBucket);
    }

    let mut boundary: Vec<Candidate<T>> = Vec::with_capacity(threshold.within);
    let mut implicitly_retained = 0usize;
    for (position, (point, mark)) in store.entries_mut().enumerate() {
        progress.tick();
        if point.value < lower {
            *mark = Mark::Skipped;
        } else if point.value < upper {
            boundary.push(Candidate {
                value: point.value,
                index: point.index,
                position,
                mark: Mark::Retained,
            });
        } else {
            implicitly_retained += 1;
        }
    }

    // The histogram said how many points sit above the bucket; a different
    // count here means classification drifted and the target is unreliable.
    if implicitly_retained != threshold.above || implicitly_retained > keep {
        return Err(Degeneracy::InconsistentCounts);
    }
    let target = keep - implicitly_retained;
    if target > boundary.len() {
        return Err(Degeneracy::InconsistentCounts);
    }
    debug!(
        boundary = boundary.len(),
        implicitly_retained,
        target,
        "boundary set collected"
    );

    if target < boundary.len() {
        sort_and_mark(&mut boundary, target);
        merge(store, &boundary);
    }
    Ok(boundary.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::locate;
    use pretty_assertions::assert_eq;

    fn store(values: &[f64]) -> PointStore<f64> {
        let mut store = PointStore::new();
        for (i, &v) in values.iter().enumerate() {
            store.push(v, i as i64);
        }
        store
    }

    fn run(values: &[f64], keep: usize) -> (PointStore<f64>, Result<usize, Degeneracy>) {
        let mut store = store(values);
        let mut progress = ProgressTracker::silent();
        let histogram = Histogram::build(store.points(), &mut progress).unwrap();
        let threshold = locate(&histogram, keep).unwrap();
        let result = resolve(&mut store, &histogram, threshold, keep, &mut progress);
        (store, result)
    }

    fn retained(store: &PointStore<f64>) -> Vec<usize> {
        (0..store.len())
            .filter(|&p| store.mark(p) == Some(Mark::Retained))
            .collect()
    }

    #[test]
    fn one_per_bucket() {
        let (store, result) = run(&[5.0, 1.0, 9.0, 3.0, 7.0, 2.0, 8.0, 4.0, 6.0, 0.0], 3);
        assert_eq!(result, Ok(1));
        assert_eq!(retained(&store), vec![2, 4, 6]);
    }

    #[test]
    fn crowded_bucket_is_sorted() {
        // 0.1 .. 0.9 all share bucket 0 with the zero.
        let values = [0.3, 0.9, 0.1, 5.0, 0.7, 0.0, 0.5];
        let (store, result) = run(&values, 3);
        assert_eq!(result, Ok(6));
        assert_eq!(retained(&store), vec![1, 3, 4]);
    }

    #[test]
    fn exact_fit_needs_no_sort() {
        let values = [1.2, 1.4, 3.0, 3.5, 0.2];
        let (store, result) = run(&values, 2);
        // Bucket 3 holds exactly the two largest.
        assert_eq!(result, Ok(2));
        assert_eq!(retained(&store), vec![2, 3]);
    }

    #[test]
    fn negative_values_in_bucket_zero_are_candidates() {
        let values = [-5.0, -1.0, 0.5, -3.0, 0.0];
        let (store, result) = run(&values, 2);
        assert_eq!(result, Ok(5));
        assert_eq!(retained(&store), vec![2, 4]);
    }

    #[test]
    fn empty_bucket_is_degenerate() {
        let mut store = store(&[1.0, 2.0, 3.0]);
        let mut progress = ProgressTracker::silent();
        let histogram = Histogram::build(store.points(), &mut progress).unwrap();
        let bogus = Threshold {
            bucket: 0,
            above: 3,
            within: 0,
        };
        assert_eq!(
            resolve(&mut store, &histogram, bogus, 2, &mut progress),
            Err(Degeneracy::EmptyBucket)
        );
    }

    #[test]
    fn zero_width_bucket_is_degenerate() {
        let mut store = store(&[0.0, 0.0, 0.0]);
        // A width of 0 puts every edge after bucket 0 at 0.0.
        let histogram = Histogram::from_parts(0.0, 0.0, vec![0, 3, 0]);
        assert_eq!(histogram.bounds(1), (0.0, 0.0));
        let threshold = Threshold {
            bucket: 1,
            above: 0,
            within: 3,
        };
        let result = resolve(&mut store, &histogram, threshold, 2, &mut ProgressTracker::silent());
        assert_eq!(result, Err(Degeneracy::ZeroWidthBucket));
        // Rejected before any mark was written.
        assert_eq!(retained(&store), vec![0, 1, 2]);
    }

    #[test]
    fn disagreeing_counts_are_degenerate() {
        let mut store = store(&[1.0, 2.0, 3.0, 3.2]);
        let mut progress = ProgressTracker::silent();
        let histogram = Histogram::build(store.points(), &mut progress).unwrap();
        // Claims bucket 1 is the threshold for keep = 1, but three points sit at or above its upper edge.
        let wrong = Threshold {
            bucket: 1,
            above: 0,
            within: 1,
        };
        assert_eq!(
            resolve(&mut store, &histogram, wrong, 1, &mut progress),
            Err(Degeneracy::InconsistentCounts)
        );
    }
}

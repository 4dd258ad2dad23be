//! Exact selection by sorting, and the merge that writes decisions back.
//!
//! Sorting is stable and starts from position order, so among equal values
//! the earliest positions are dropped first.  The histogram path sorts its
//! boundary set the same way, which is what makes the two paths agree on
//! which of several tied points survive.

use crate::point::{Mark, PointStore};
use crate::progress::ProgressTracker;
use crate::value::Abundance;
use tracing::debug;

/// A point taken out of the store for exact ranking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Candidate<T> {
    pub(crate) value: T,
    pub(crate) index: i64,
    // Where it lives in the store; unique, unlike `index`.
    pub(crate) position: usize,
    pub(crate) mark: Mark,
}

/// Marks all but the `keep` largest candidates as skipped, then puts the
/// candidates back in position order.
pub(crate) fn sort_and_mark<T: Abundance>(candidates: &mut [Candidate<T>], keep: usize) {
    candidates.sort_by(|a, b| a.value.total_order(&b.value));
    let drop = candidates.len().saturating_sub(keep);
    let (dropped, kept) = candidates.split_at_mut(drop);
    for c in dropped {
        c.mark = Mark::Skipped;
    }
    for c in kept {
        c.mark = Mark::Retained;
    }
    candidates.sort_unstable_by_key(|c| c.position);
}

/// Copies candidate marks into the store with one forward scan.
///
/// # Panics
///
/// If `candidates` is not in ascending position order, or a candidate's
/// index doesn't match the point at its position.  Either means the
/// candidate list was corrupted after it was collected.
pub(crate) fn merge<T: Abundance>(store: &mut PointStore<T>, candidates: &[Candidate<T>]) {
    let mut cursor = candidates.iter().peekable();
    for (position, (point, mark)) in store.entries_mut().enumerate() {
        let Some(next) = cursor.peek() else {
            break; // Nothing left to apply.
        };
        if next.position != position {
            continue;
        }
        assert!(
            next.index == point.index,
            "boundary merge out of step at position {position}: candidate index {} vs stored index {}",
            next.index,
            point.index
        );
        *mark = next.mark;
        cursor.next();
    }
    if let Some(stray) = cursor.next() {
        panic!(
            "boundary merge left candidate at position {} (index {}) unapplied",
            stray.position, stray.index
        );
    }
}

/// Exact top-`keep` over the whole store.  Returns how many points were examined.
pub(crate) fn full_sort<T: Abundance>(
    store: &mut PointStore<T>,
    keep: usize,
    progress: &mut ProgressTracker<'_>,
) -> usize {
    let mut candidates: Vec<Candidate<T>> = store
        .points()
        .iter()
        .enumerate()
        .map(|(position, point)| {
            progress.tick();
            Candidate {
                value: point.value,
                index: point.index,
                position,
                mark: Mark::Retained,
            }
        })
        .collect();
    sort_and_mark(&mut candidates, keep);
    merge(store, &candidates);
    debug!(points = candidates.len(), keep, "full sort applied");
    candidates.len()
}

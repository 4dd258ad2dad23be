//! Finds the bucket that holds the K-th largest value.

use crate::histogram::Histogram;
use crate::value::Abundance;
use tracing::debug;

/// The bucket where the retain/skip boundary falls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Threshold {
    pub(crate) bucket: usize,
    /// Points in buckets above `bucket`; all of them are kept.
    pub(crate) above: usize,
    /// Points in `bucket` itself.
    pub(crate) within: usize,
}

/// Walks the buckets from the top down until `keep` points have been
/// accumulated.  Returns `None` if that never happens (fewer than `keep`
/// points in total) or if `keep` is 0, where there is no boundary to find.
pub(crate) fn locate<T: Abundance>(histogram: &Histogram<T>, keep: usize) -> Option<Threshold> {
    if keep == 0 {
        return None;
    }
    let mut running = 0usize;
    for (bucket, &count) in histogram.counts().iter().enumerate().rev() {
        let above = running;
        running += count;
        if running >= keep {
            debug!(bucket, above, within = count, "threshold bucket located");
            return Some(Threshold {
                bucket,
                above,
                within: count,
            });
        }
    }
    None
}

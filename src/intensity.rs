//! Percentage-of-intensity cut applied after the top-K pass.
//!
//! Walking the survivors from the largest value down, it keeps points until
//! their summed value reaches the requested share of the survivors' total
//! and skips the rest.  Only positive values count toward the sums.

use crate::point::{Mark, PointStore};
use crate::value::Abundance;
use tracing::debug;

#[inline]
fn intensity<T: Abundance>(value: T) -> f64 {
    value.to_f64_lossy().max(0.0)
}

/// Skips retained points beyond the `percent` share of total intensity.
/// Returns how many points it skipped.
pub(crate) fn apply<T: Abundance>(store: &mut PointStore<T>, percent: f64) -> usize {
    let mut survivors: Vec<(T, usize)> = store
        .points()
        .iter()
        .zip(store.marks())
        .enumerate()
        .filter(|(_, (_, mark))| **mark == Mark::Retained)
        .map(|(position, (point, _))| (point.value, position))
        .collect();

    // Ascending and stable, so walking it backwards visits ties latest first.
    // The total is summed in that same descending order as the running sum,
    // so at 100% the last positive survivor lands exactly on the target.
    survivors.sort_by(|a, b| a.0.total_order(&b.0));
    let total: f64 = survivors.iter().rev().map(|&(v, _)| intensity(v)).sum();
    if total <= 0.0 {
        return 0;
    }
    let target = total * (percent / 100.0);

    let mut running = 0.0;
    let mut kept = survivors.len();
    for (taken, &(value, _)) in survivors.iter().rev().enumerate() {
        running += intensity(value);
        if running >= target {
            kept = taken + 1;
            break;
        }
    }

    let dropped = survivors.len() - kept;
    for &(_, position) in &survivors[..dropped] {
        store.set_mark(position, Mark::Skipped);
    }
    debug!(percent, total, kept, dropped, "intensity cut applied");
    dropped
}

//! The public entry point: collect points, filter once, read the results.

use crate::boundary;
use crate::config::{Config, Strategy};
use crate::error::{Degeneracy, Result};
use crate::exact;
use crate::histogram::Histogram;
use crate::intensity;
use crate::point::{Mark, Point, PointState, PointStore};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::threshold;
use crate::value::Abundance;
use std::fmt::Debug;
use tracing::{debug, warn};

/// What one call to [`Selector::filter`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// The algorithm that produced the final marks, or `None` when no
    /// ranking was needed (at most K points, or K = 0).
    pub strategy: Option<Strategy>,
    /// Set when the histogram path was tried and abandoned.
    pub fallback: Option<Degeneracy>,
    /// Points that had to be ranked exactly.
    pub boundary_len: usize,
    pub retained: usize,
    pub skipped: usize,
    /// Of `skipped`, how many the percentage filter removed.
    pub dropped_by_percentage: usize,
}

/// Keeps the K largest of a set of (value, index) points.
///
/// Points are appended with [`push`](Self::push), then [`filter`](Self::filter)
/// decides which survive.  Positions and values are never changed; each point
/// is marked retained or skipped.  Results can be read as tagged
/// [`PointState`]s or, for consumers that expect it, as plain values with the
/// skip flag written over the skipped ones.
pub struct Selector<T: Abundance> {
    store: PointStore<T>,
    config: Config<T>,
    sink: Option<Box<dyn ProgressSink>>,
}

impl<T: Abundance> Default for Selector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Abundance> Selector<T> {
    /// A selector with the default configuration (K = 400,000, skip flag -1).
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config<T>) -> Self {
        Self {
            store: PointStore::new(),
            config,
            sink: None,
        }
    }

    /// Appends a point.  Values are not validated.
    #[inline]
    pub fn push(&mut self, value: T, index: i64) {
        self.store.push(value, index);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Decides which points are retained.
    ///
    /// With at most K points nothing is skipped.  Otherwise exactly K points
    /// remain retained (fewer if a percentage filter is set): the K largest,
    /// with ties at the cut resolved by dropping the earliest positions
    /// first.  Marks are recomputed from scratch on every call, so calling
    /// it again without new points changes nothing.
    ///
    /// # Errors
    ///
    /// Only when the configuration is invalid; see [`Config::validate`].
    ///
    /// # Panics
    ///
    /// If internal bookkeeping is found corrupted while merging boundary
    /// decisions back into the store.
    pub fn filter(&mut self) -> Result<FilterReport> {
        self.config.validate()?;
        let Self {
            store,
            config,
            sink,
        } = self;
        store.mark_all(Mark::Retained);

        let n = store.len();
        let keep = config.max_count_to_keep;
        let mut report = FilterReport::default();
        let passes = match config.strategy {
            Strategy::Adaptive => 2,
            Strategy::FullSort => 1,
        };
        let sink = sink.as_mut().map(|s| &mut **s as &mut dyn ProgressSink);
        let mut progress = ProgressTracker::new(sink, config.progress_interval, passes * n);

        if n <= keep {
            debug!(n, keep, "nothing to drop");
        } else if keep == 0 {
            store.mark_all(Mark::Skipped);
            progress.finish();
        } else {
            match config.strategy {
                Strategy::FullSort => {
                    report.boundary_len = exact::full_sort(store, keep, &mut progress);
                    report.strategy = Some(Strategy::FullSort);
                }
                Strategy::Adaptive => match select_by_histogram(store, keep, &mut progress) {
                    Ok(boundary_len) => {
                        report.boundary_len = boundary_len;
                        report.strategy = Some(Strategy::Adaptive);
                    }
                    Err(degeneracy) => {
                        warn!(%degeneracy, n, keep, "histogram selection degenerate, sorting everything");
                        report.boundary_len = exact::full_sort(store, keep, &mut progress);
                        report.strategy = Some(Strategy::FullSort);
                        report.fallback = Some(degeneracy);
                    }
                },
            }
            progress.finish();
        }

        if let Some(percent) = config.percentage_filter {
            report.dropped_by_percentage = intensity::apply(store, percent);
        }
        report.retained = store.retained_count();
        report.skipped = n - report.retained;
        debug!(?report, "filter finished");
        Ok(report)
    }

    /// Tagged result at a storage position (not a lookup by `index`).
    #[inline]
    pub fn state_at(&self, position: usize) -> Option<PointState<T>> {
        self.store.state_at(position)
    }

    /// The value at a storage position if that point is retained.
    #[inline]
    pub fn value_at_position(&self, position: usize) -> Option<T> {
        self.store.state_at(position).and_then(PointState::retained)
    }

    /// The value at a storage position in the skip-flag convention: the skip
    /// flag for skipped points, and -1 past the end.  A retained value equal
    /// to the skip flag is indistinguishable here; use
    /// [`state_at`](Self::state_at) when that matters.
    pub fn flagged_value_at(&self, position: usize) -> T {
        match self.store.state_at(position) {
            Some(PointState::Retained(v)) => v,
            Some(PointState::Skipped) => self.config.skip_flag_value,
            None => -T::one(),
        }
    }

    /// All values in position order, skip flag in place of skipped ones.
    pub fn flagged_values(&self) -> impl Iterator<Item = T> + '_ {
        let flag = self.config.skip_flag_value;
        self.store
            .points()
            .iter()
            .zip(self.store.marks())
            .map(move |(point, mark)| match mark {
                Mark::Retained => point.value,
                Mark::Skipped => flag,
            })
    }

    /// Storage positions whose point carries the caller's `index`.
    pub fn positions_of_index(&self, index: i64) -> Vec<usize> {
        self.store.positions_of_index(index)
    }

    /// The `index` of every retained point, in position order.
    pub fn retained_indices(&self) -> Vec<i64> {
        self.store
            .points()
            .iter()
            .zip(self.store.marks())
            .filter(|(_, mark)| **mark == Mark::Retained)
            .map(|(point, _)| point.index)
            .collect()
    }

    pub fn retained_count(&self) -> usize {
        self.store.retained_count()
    }

    #[inline]
    pub fn points(&self) -> &[Point<T>] {
        self.store.points()
    }

    #[inline]
    pub fn store(&self) -> &PointStore<T> {
        &self.store
    }

    /// Drops every point and restores the default configuration.  A
    /// registered progress sink stays registered.
    pub fn clear(&mut self) {
        self.store.clear();
        self.config = Config::default();
    }

    #[inline]
    pub fn config(&self) -> &Config<T> {
        &self.config
    }

    pub fn set_config(&mut self, config: Config<T>) {
        self.config = config;
    }

    #[inline]
    pub fn max_count_to_keep(&self) -> usize {
        self.config.max_count_to_keep
    }

    pub fn set_max_count_to_keep(&mut self, k: usize) {
        self.config.max_count_to_keep = k;
    }

    #[inline]
    pub fn skip_flag_value(&self) -> T {
        self.config.skip_flag_value
    }

    pub fn set_skip_flag_value(&mut self, flag: T) {
        self.config.skip_flag_value = flag;
    }

    #[inline]
    pub fn percentage_filter_enabled(&self) -> bool {
        self.config.percentage_filter.is_some()
    }

    #[inline]
    pub fn percentage_filter(&self) -> Option<f64> {
        self.config.percentage_filter
    }

    /// `None` disables the percentage filter.  Checked when `filter` runs.
    pub fn set_percentage_filter(&mut self, percent: Option<f64>) {
        self.config.percentage_filter = percent;
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.config.strategy = strategy;
    }

    /// Registers the observer that `filter` reports progress to, replacing
    /// any previous one.
    pub fn set_progress_sink(&mut self, sink: impl ProgressSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn clear_progress_sink(&mut self) {
        self.sink = None;
    }
}

// Histogram, threshold bucket, boundary resolution.  Any degeneracy is
// handed back so the caller can fall back to the full sort.
fn select_by_histogram<T: Abundance>(
    store: &mut PointStore<T>,
    keep: usize,
    progress: &mut ProgressTracker<'_>,
) -> std::result::Result<usize, Degeneracy> {
    let histogram = Histogram::build(store.points(), progress)?;
    let threshold = threshold::locate(&histogram, keep).ok_or(Degeneracy::ThresholdNotFound)?;
    boundary::resolve(store, &histogram, threshold, keep, progress)
}

impl<T: Abundance> Extend<(T, i64)> for Selector<T> {
    fn extend<I: IntoIterator<Item = (T, i64)>>(&mut self, iter: I) {
        for (value, index) in iter {
            self.push(value, index);
        }
    }
}

impl<T: Abundance> FromIterator<(T, i64)> for Selector<T> {
    fn from_iter<I: IntoIterator<Item = (T, i64)>>(iter: I) -> Self {
        let mut selector = Self::new();
        selector.extend(iter);
        selector
    }
}

// The progress sink has no Debug; show whether one is registered.
impl<T: Abundance> Debug for Selector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Selector {{ points: {}, retained: {}, config: {:?}, progress_sink: {} }}",
            self.store.len(),
            self.store.retained_count(),
            self.config,
            self.sink.is_some()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn selector(values: &[f64], keep: usize) -> Selector<f64> {
        let mut s: Selector<f64> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i as i64))
            .collect();
        s.set_max_count_to_keep(keep);
        s
    }

    #[test]
    fn keeps_three_largest() {
        let mut s = selector(&[5.0, 1.0, 9.0, 3.0, 7.0, 2.0, 8.0, 4.0, 6.0, 0.0], 3);
        let report = s.filter().unwrap();
        assert_eq!(report.strategy, Some(Strategy::Adaptive));
        assert_eq!(report.fallback, None);
        assert_eq!(report.retained, 3);
        assert_eq!(report.skipped, 7);
        let flagged: Vec<f64> = s.flagged_values().collect();
        assert_eq!(
            flagged,
            vec![-1.0, -1.0, 9.0, -1.0, 7.0, -1.0, 8.0, -1.0, -1.0, -1.0]
        );
        assert_eq!(s.retained_indices(), vec![2, 4, 6]);
    }

    #[test]
    fn under_capacity_is_untouched() {
        let mut s = selector(&[3.0, 1.0, 2.0], 3);
        let report = s.filter().unwrap();
        assert_eq!(report.strategy, None);
        assert_eq!(report.retained, 3);
        assert_eq!(s.flagged_values().collect::<Vec<_>>(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn zero_keep_skips_everything() {
        let mut s = selector(&[3.0, 1.0, 2.0], 0);
        let report = s.filter().unwrap();
        assert_eq!(report.retained, 0);
        assert!((0..3).all(|p| s.state_at(p) == Some(PointState::Skipped)));
    }

    #[test]
    fn nan_falls_back_to_full_sort() {
        let mut s = selector(&[1.0, f64::NAN, 3.0, 2.0], 2);
        let report = s.filter().unwrap();
        assert_eq!(report.fallback, Some(Degeneracy::NonFiniteValue));
        assert_eq!(report.strategy, Some(Strategy::FullSort));
        // Positive NaN sorts above every number in the total order.
        assert_eq!(s.retained_indices(), vec![1, 2]);
    }

    #[test]
    fn sentinel_collision_is_visible_in_states() {
        let mut s = selector(&[-1.0, 5.0, -1.0, 4.0], 3);
        s.filter().unwrap();
        assert_eq!(s.state_at(0), Some(PointState::Skipped));
        assert_eq!(s.state_at(2), Some(PointState::Retained(-1.0)));
        assert_eq!(s.value_at_position(2), Some(-1.0));
        assert_eq!(s.value_at_position(0), None);
    }

    #[test]
    fn positional_accessors() {
        let mut s = Selector::<f64>::new();
        s.push(10.0, 42);
        s.push(20.0, 7);
        s.set_max_count_to_keep(1);
        s.set_skip_flag_value(-99.0);
        s.filter().unwrap();
        assert_eq!(s.flagged_value_at(0), -99.0);
        assert_eq!(s.flagged_value_at(1), 20.0);
        assert_eq!(s.flagged_value_at(2), -1.0);
        assert_eq!(s.positions_of_index(7), vec![1]);
        assert_eq!(s.value_at_position(5), None);
    }

    #[test]
    fn percentage_filter_trims_survivors() {
        let mut s = selector(&[30.0, 50.0, 20.0, 5.0], 3);
        s.set_percentage_filter(Some(80.0));
        assert!(s.percentage_filter_enabled());
        let report = s.filter().unwrap();
        assert_eq!(report.dropped_by_percentage, 1);
        assert_eq!(report.retained, 2);
        assert_eq!(s.retained_indices(), vec![0, 1]);
    }

    #[test]
    fn invalid_config_is_reported() {
        let mut s = selector(&[1.0, 2.0], 1);
        s.set_percentage_filter(Some(150.0));
        assert_eq!(s.filter(), Err(FilterError::InvalidPercentage(150.0)));
    }

    #[test]
    fn clear_restores_defaults() {
        let mut s = selector(&[1.0, 2.0], 1);
        s.set_skip_flag_value(-7.0);
        s.set_strategy(Strategy::FullSort);
        s.set_percentage_filter(Some(10.0));
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.max_count_to_keep(), 400_000);
        assert_eq!(s.skip_flag_value(), -1.0);
        assert_eq!(s.strategy(), Strategy::Adaptive);
        assert!(!s.percentage_filter_enabled());
        assert_eq!(s.filter().map(|r| r.retained), Ok(0));
    }

    #[test]
    fn progress_sink_sees_completion() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let values: Vec<f64> = (0..50_000).map(|i| (i % 997) as f64).collect();
        let mut s = selector(&values, 100);
        let log = Arc::clone(&seen);
        s.set_progress_sink(move |p: f64| log.lock().unwrap().push(p));
        s.filter().unwrap();

        let seen = seen.lock().unwrap();
        // Two passes of 50,000 ticks, reported every 10,000, then the final 100.
        assert_eq!(seen.len(), 11);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&100.0));
    }

    #[test]
    fn debug_shows_summary() {
        let s = selector(&[1.0], 5);
        let text = format!("{s:?}");
        assert!(text.starts_with("Selector { points: 1, retained: 1"));
        assert!(text.ends_with("progress_sink: false }"));
    }
}

//! Progress reporting for long filter passes.

/// Receives progress updates while `filter` runs.  Called synchronously on
/// the filtering thread; it only observes.
pub trait ProgressSink: Send {
    fn on_progress(&mut self, percent_complete: f64);
}

impl<F> ProgressSink for F
where
    F: FnMut(f64) + Send,
{
    #[inline]
    fn on_progress(&mut self, percent_complete: f64) {
        self(percent_complete)
    }
}

/// Turns per-point ticks into percentages for one filter run.
pub(crate) struct ProgressTracker<'a> {
    sink: Option<&'a mut dyn ProgressSink>,
    // Report every this many ticks.
    interval: usize,
    // Ticks that make up 100%.
    total: usize,
    done: usize,
    since_report: usize,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(sink: Option<&'a mut dyn ProgressSink>, interval: usize, total: usize) -> Self {
        Self {
            sink,
            interval: interval.max(1),
            total: total.max(1),
            done: 0,
            since_report: 0,
        }
    }

    /// A tracker that never reports.
    #[cfg(test)]
    pub(crate) fn silent() -> ProgressTracker<'static> {
        ProgressTracker::new(None, usize::MAX, 1)
    }

    /// Counts one processed point.
    #[inline]
    pub(crate) fn tick(&mut self) {
        // The bookkeeping is skipped entirely when nobody listens.
        if self.sink.is_none() {
            return;
        }
        self.done += 1;
        self.since_report += 1;
        if self.since_report >= self.interval {
            self.since_report = 0;
            let percent = (self.done as f64 * 100.0 / self.total as f64).min(100.0);
            self.report(percent);
        }
    }

    pub(crate) fn finish(&mut self) {
        self.report(100.0);
    }

    fn report(&mut self, percent: f64) {
        if let Some(sink) = self.sink.as_mut() {
            sink.on_progress(percent);
        }
    }
}

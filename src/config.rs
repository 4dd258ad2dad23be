//! Filter configuration.

use crate::error::{FilterError, Result};
use crate::value::Abundance;

/// How many points are kept when nothing else is said.
pub const DEFAULT_MAX_COUNT_TO_KEEP: usize = 400_000;

/// Points processed between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

/// Which selection algorithm `filter` runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Histogram bucketing, falling back to a full sort when the buckets
    /// turn out to be degenerate for the data at hand.
    #[default]
    Adaptive,
    /// Always sort everything.
    FullSort,
}

/// Settings for one selector.  `Default` gives K = 400,000 and a skip flag of -1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config<T> {
    /// K: at most this many points survive.
    pub max_count_to_keep: usize,
    /// Written in place of skipped values by the flagged-value views.
    pub skip_flag_value: T,
    /// When set, the survivors are cut further to those holding this
    /// percentage of the total intensity.
    pub percentage_filter: Option<f64>,
    pub strategy: Strategy,
    pub progress_interval: usize,
}

impl<T: Abundance> Default for Config<T> {
    fn default() -> Self {
        Self {
            max_count_to_keep: DEFAULT_MAX_COUNT_TO_KEEP,
            skip_flag_value: -T::one(),
            percentage_filter: None,
            strategy: Strategy::Adaptive,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl<T: Abundance> Config<T> {
    #[must_use]
    pub fn with_max_count_to_keep(mut self, k: usize) -> Self {
        self.max_count_to_keep = k;
        self
    }

    #[must_use]
    pub fn with_skip_flag_value(mut self, flag: T) -> Self {
        self.skip_flag_value = flag;
        self
    }

    #[must_use]
    pub fn with_percentage_filter(mut self, percent: Option<f64>) -> Self {
        self.percentage_filter = percent;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Checks the settings that have no sensible interpretation.
    pub fn validate(&self) -> Result<()> {
        if let Some(p) = self.percentage_filter
            && !(p > 0.0 && p <= 100.0)
        {
            return Err(FilterError::InvalidPercentage(p));
        }
        if self.progress_interval == 0 {
            return Err(FilterError::ZeroProgressInterval);
        }
        Ok(())
    }
}

//! top_abundance keeps the K largest values out of a large set of points
//! without sorting the whole set.  It is meant for the tens of millions of
//! (abundance, index) pairs a spectrum or peak list can produce, when only the
//! strongest few hundred thousand are worth rendering or reporting.
//!
//! Each point is a value plus an opaque index chosen by the caller, usually
//! the order in which it was appended.  You push all the points into a
//! [`Selector`], call [`Selector::filter`] once, and then read back which
//! points were retained.  Nothing is reordered: the point at position 17 is
//! still at position 17 afterwards, and its value is unchanged.  Filtering
//! only marks points as retained or skipped.
//!
//! The selection works in three steps.  First a histogram with 5000 equally
//! wide buckets is built over the value range in a single pass.  Then the
//! buckets are walked from the top down until K points have been counted;
//! the bucket where that happens is the threshold bucket.  Every point below
//! it is skipped and every point above it is kept, so only the points inside
//! the threshold bucket need an exact ranking.  For data that is spread out
//! that is roughly n / 5000 points, and the sort is cheap.
//!
//! When the buckets are of no use (a NaN or infinite value, a bucket that
//! collapsed to zero width, counts that don't add up) the selector falls back
//! to sorting everything.  That is slower but gives the same answer, and the
//! [`FilterReport`] says which path ran and why.  You can also ask for the
//! full sort directly with [`Strategy::FullSort`].
//!
//! Both paths break ties the same way: among equal values at the cut, the
//! earliest positions are dropped first.  So for a given input they retain
//! exactly the same points.
//!
//! Results are available two ways.  [`Selector::state_at`] returns a
//! [`PointState`], which can't be confused with data.  For consumers that
//! expect the older convention, [`Selector::flagged_values`] writes the skip
//! flag (default -1) over skipped values.  If real data can equal the skip
//! flag, only the tagged view tells them apart.
//!
//! ```
//! use top_abundance::Selector;
//!
//! let mut selector = Selector::<f64>::new();
//! for (i, v) in [5.0, 1.0, 9.0, 3.0, 7.0, 2.0, 8.0, 4.0, 6.0, 0.0].into_iter().enumerate() {
//!     selector.push(v, i as i64);
//! }
//! selector.set_max_count_to_keep(3);
//! selector.filter().unwrap();
//!
//! assert_eq!(selector.retained_indices(), vec![2, 4, 6]);
//! assert_eq!(selector.flagged_value_at(0), -1.0);
//! assert_eq!(selector.flagged_value_at(2), 9.0);
//! ```

// TODO:
// - Parallel counting pass for stores in the tens of millions.
// - select_nth_unstable_by for the boundary set once tie order can be relaxed.

mod boundary;
pub mod config;
pub mod error;
mod exact;
mod histogram;
mod intensity;
pub mod point;
pub mod progress;
pub mod selector;
mod threshold;
pub mod value;

pub use config::{Config, DEFAULT_MAX_COUNT_TO_KEEP, Strategy};
pub use error::{Degeneracy, FilterError, Result};
pub use point::{Mark, Point, PointState, PointStore};
pub use progress::ProgressSink;
pub use selector::{FilterReport, Selector};
pub use value::Abundance;

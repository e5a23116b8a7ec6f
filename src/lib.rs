//! Engagement analytics core.
//!
//! Turns per-type lists of daily action counts into a flat [`Dataset`],
//! indexes it by day or by type, and derives two chart-ready shapes:
//! spike-padded time series per type, and zero-filled category totals.
//!
//! ```no_run
//! use engagement::{AggregateMode, Index, RawInput, aggregate, build, derive_series};
//!
//! # fn main() -> Result<(), engagement::EngagementError> {
//! let raw = RawInput::new();
//! let dataset = build(&raw)?;
//! let series = derive_series(&Index::by_day(&dataset), "votes");
//! let totals = aggregate(&Index::by_type(&dataset), &["views", "votes"], AggregateMode::Count);
//! # let _ = (series, totals);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod input;
pub mod range;
pub mod report;
pub mod series;
pub mod types;
pub mod utils;

pub use aggregate::{aggregate, aggregate_by, grand_total};
pub use dataset::{Dataset, build, parse_day};
pub use error::EngagementError;
pub use index::{Grouping, Index, ReducedGroup};
pub use range::{DateRange, DateWindow, DefaultStart};
pub use series::{derive_composite, derive_series};
pub use types::{
    AggregateMode, CategoryTotal, DayKey, RawInput, RawRecord, Record, Series, TimeSeriesPoint,
};

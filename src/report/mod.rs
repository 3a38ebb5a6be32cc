//! Aggregation engine.
//!
//! Every report is a pure function of a filtered [`View`](crate::data::filter::View)
//! and never touches the table directly, so all reports share one filter
//! semantics. Payloads pass through [`sanitize::Sanitize`] before they are
//! returned.

pub mod builtin;
pub mod group;
pub mod page;
pub mod payload;
pub mod sanitize;

pub use builtin::{ReportKind, Sampling};
pub use group::CategoryField;
pub use page::{GuestBehaviorPage, OverviewPage};
pub use payload::{Distribution, GroupMetrics, Kpis, PairedSample, Report, Series, StatusBreakdown};

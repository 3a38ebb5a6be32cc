//! Filter-and-aggregate engine behind the hotel booking dashboards.
//!
//! A [`BookingTable`] is loaded once, filtered per request into a [`View`]
//! by hotel, arrival year and arrival month, and summarized by one of the
//! fixed [`ReportKind`] reports or a full dashboard page.

pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use data::filter::{FilterOptions, FilterParams, FilterSpec, View, apply};
pub use data::loader::load_file;
pub use data::model::{Booking, BookingTable, Month};
pub use error::{DashboardError, Result};
pub use report::{Report, ReportKind, Sampling};
pub use state::AppState;

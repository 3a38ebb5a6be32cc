use std::io::Write;
use std::sync::Arc;

use crate::config::Config;
use crate::data::export;
use crate::data::filter::{FilterOptions, FilterParams, FilterSpec, View, apply};
use crate::data::loader::load_file;
use crate::data::model::BookingTable;
use crate::error::Result;
use crate::report::{GuestBehaviorPage, OverviewPage, Report, ReportKind, Sampling};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Process-wide handle on the loaded table.
///
/// Cloning is cheap and every clone reads the same immutable table, so one
/// handle can be given to each request handler or worker thread. Every call
/// does its own filter + aggregate pass with no shared intermediate state.
#[derive(Debug, Clone)]
pub struct AppState {
    table: Arc<BookingTable>,
    sampling: Sampling,
}

impl AppState {
    pub fn new(table: BookingTable, sampling: Sampling) -> Self {
        Self {
            table: Arc::new(table),
            sampling,
        }
    }

    /// Load the configured dataset. Failure here is fatal: the caller must
    /// not serve requests without a table.
    pub fn load(config: &Config) -> Result<Self> {
        let table = load_file(&config.data_path)?;
        Ok(Self::new(table, config.sampling))
    }

    pub fn table(&self) -> &BookingTable {
        &self.table
    }

    pub fn sampling(&self) -> &Sampling {
        &self.sampling
    }

    /// Selector choices for the filter bar.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_table(&self.table)
    }

    /// Filter the table with raw request parameters.
    pub fn view(&self, params: &FilterParams) -> View<'_> {
        apply(&self.table, &FilterSpec::from(params))
    }

    /// One report over the bookings matching `params`.
    pub fn report(&self, kind: ReportKind, params: &FilterParams) -> Report {
        let mut spec = FilterSpec::from(params);
        if !kind.honors_month_filter() {
            spec = spec.without_month();
        }
        let view = apply(&self.table, &spec);
        kind.compute(&view, &self.sampling)
    }

    /// Like [`AppState::report`], resolving the report by endpoint name.
    pub fn report_by_name(&self, name: &str, params: &FilterParams) -> Result<Report> {
        let kind: ReportKind = name.parse()?;
        Ok(self.report(kind, params))
    }

    pub fn overview(&self, params: &FilterParams) -> OverviewPage {
        let spec = FilterSpec::from(params);
        let view = apply(&self.table, &spec);
        let trend = apply(&self.table, &spec.without_month());
        OverviewPage::build(&view, &trend)
    }

    pub fn guest_behavior(&self, params: &FilterParams) -> GuestBehaviorPage {
        GuestBehaviorPage::build(&self.view(params), &self.sampling)
    }

    /// Write the filtered bookings as CSV.
    pub fn export_csv<W: Write>(&self, params: &FilterParams, writer: W) -> anyhow::Result<usize> {
        export::write_csv(&self.view(params), writer)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::data::model::Month;
    use crate::error::DashboardError;
    use crate::report::Series;
    use crate::test_support::priced;

    fn state() -> AppState {
        let table = BookingTable::from_rows(vec![
            priced("City Hotel", 2016, Month::March, 100.0, 1, 1, false),
            priced("City Hotel", 2016, Month::July, 50.0, 0, 2, true),
            priced("Resort Hotel", 2016, Month::July, 80.0, 2, 2, false),
        ]);
        AppState::new(table, Sampling::default())
    }

    fn params(hotel: Option<&str>, year: Option<&str>, month: Option<&str>) -> FilterParams {
        FilterParams {
            hotel: hotel.map(str::to_string),
            year: year.map(str::to_string),
            month: month.map(str::to_string),
        }
    }

    #[test]
    fn state_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppState>();

        let state = state();
        let all = FilterParams::default();
        let expected = state.report(ReportKind::Kpis, &all);
        thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let state = state.clone();
                    let all = all.clone();
                    s.spawn(move || state.report(ReportKind::Kpis, &all))
                })
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn monthly_revenue_ignores_the_month_filter() {
        let state = state();
        let report = state.report(
            ReportKind::MonthlyRevenue,
            &params(Some("City Hotel"), None, Some("July")),
        );
        let Report::Series(Series { values, .. }) = report else {
            panic!("monthly revenue should be a series");
        };
        assert_eq!(values[2], 200.0);
        assert_eq!(values[6], 100.0);
    }

    #[test]
    fn unknown_report_name_is_an_error() {
        let err = state()
            .report_by_name("occupancy_forecast", &FilterParams::default())
            .unwrap_err();
        assert!(matches!(err, DashboardError::UnknownReport(name) if name == "occupancy_forecast"));
    }

    #[test]
    fn malformed_year_serves_unfiltered() {
        let state = state();
        let report = state.report(ReportKind::Kpis, &params(None, Some("2016abc"), None));
        let Report::Kpis(kpis) = report else {
            panic!("expected KPI bundle");
        };
        assert_eq!(kpis.total_bookings, 3);
    }

    #[test]
    fn load_failure_is_fatal() {
        let config = Config {
            data_path: "/nonexistent/bookings.csv".into(),
            ..Config::default()
        };
        assert!(matches!(
            AppState::load(&config),
            Err(DashboardError::DataUnavailable { .. })
        ));
    }
}

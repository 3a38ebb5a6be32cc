use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Booking, BookingTable, Month};
use crate::error::DashboardError;

/// Selector value meaning "no hotel constraint".
pub const ALL_HOTELS: &str = "All Hotels";
/// Selector value meaning "no year constraint".
pub const ALL_YEARS: &str = "All Years";
/// Selector value meaning "no month constraint".
pub const ALL_MONTHS: &str = "All Months";

// ---------------------------------------------------------------------------
// Raw request parameters
// ---------------------------------------------------------------------------

/// Filter parameters exactly as they arrive from a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    pub hotel: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

// ---------------------------------------------------------------------------
// Filter predicate: optional exact-match constraints
// ---------------------------------------------------------------------------

/// Conjunctive exact-match constraints on hotel, arrival year and month.
/// `None` means "no constraint" for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub hotel: Option<String>,
    pub year: Option<i32>,
    /// Compared against the month name, case-sensitively.
    pub month: Option<String>,
}

/// Blank strings and the selector sentinel both mean "no constraint".
fn constraint<'a>(raw: Option<&'a str>, sentinel: &str) -> Option<&'a str> {
    raw.filter(|v| !v.trim().is_empty() && *v != sentinel)
}

impl FilterSpec {
    /// Build a spec from raw query parameters.
    ///
    /// A year that is not an integer is logged and dropped: the request is
    /// served unfiltered on that field instead of failing.
    pub fn from_params(hotel: Option<&str>, year: Option<&str>, month: Option<&str>) -> Self {
        let year = match constraint(year, ALL_YEARS).map(parse_year).transpose() {
            Ok(year) => year,
            Err(e) => {
                log::warn!("{e}; ignoring year filter");
                None
            }
        };
        FilterSpec {
            hotel: constraint(hotel, ALL_HOTELS).map(str::to_string),
            year,
            month: constraint(month, ALL_MONTHS).map(str::to_string),
        }
    }

    pub fn hotel(mut self, hotel: impl Into<String>) -> Self {
        self.hotel = Some(hotel.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: Month) -> Self {
        self.month = Some(month.name().to_string());
        self
    }

    /// The same spec with the month constraint lifted.
    pub fn without_month(&self) -> Self {
        FilterSpec {
            month: None,
            ..self.clone()
        }
    }

    /// Whether the spec constrains nothing.
    pub fn is_unconstrained(&self) -> bool {
        self.hotel.is_none() && self.year.is_none() && self.month.is_none()
    }

    /// A booking passes when every present constraint matches exactly.
    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(hotel) = &self.hotel {
            if booking.hotel != *hotel {
                return false;
            }
        }
        if let Some(year) = self.year {
            if booking.arrival_year != year {
                return false;
            }
        }
        if let Some(month) = &self.month {
            if booking.arrival_month.name() != month {
                return false;
            }
        }
        true
    }
}

impl From<&FilterParams> for FilterSpec {
    fn from(params: &FilterParams) -> Self {
        FilterSpec::from_params(
            params.hotel.as_deref(),
            params.year.as_deref(),
            params.month.as_deref(),
        )
    }
}

fn parse_year(raw: &str) -> Result<i32, DashboardError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| DashboardError::InvalidFilterValue {
            field: "year",
            value: raw.to_string(),
        })
}

// ---------------------------------------------------------------------------
// View – the filtered subset of a table
// ---------------------------------------------------------------------------

/// Rows of a [`BookingTable`] that passed a filter, in table order.
/// Borrows the table; the table itself is never modified.
#[derive(Debug, Clone)]
pub struct View<'a> {
    table: &'a BookingTable,
    indices: Vec<usize>,
}

/// Return the view of bookings that pass all constraints of `spec`.
pub fn apply<'a>(table: &'a BookingTable, spec: &FilterSpec) -> View<'a> {
    let indices = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, b)| spec.matches(b))
        .map(|(i, _)| i)
        .collect();
    View { table, indices }
}

impl<'a> View<'a> {
    /// Every row of the table.
    pub fn all(table: &'a BookingTable) -> Self {
        View {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    /// Narrow this view further.
    pub fn refine(&self, spec: &FilterSpec) -> View<'a> {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| spec.matches(&self.table.rows()[i]))
            .collect();
        View {
            table: self.table,
            indices,
        }
    }

    /// Table positions of the rows in this view.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Booking> + '_ {
        let rows = self.table.rows();
        self.indices.iter().map(move |&i| &rows[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Selector options
// ---------------------------------------------------------------------------

/// Choices for the dashboard filter selectors, sentinel first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub hotels: Vec<String>,
    pub years: Vec<String>,
    pub months: Vec<String>,
}

impl FilterOptions {
    /// Sorted distinct hotels and years of the table; months in calendar order.
    pub fn from_table(table: &BookingTable) -> Self {
        let hotels: BTreeSet<&str> = table.rows().iter().map(|b| b.hotel.as_str()).collect();
        let years: BTreeSet<i32> = table.rows().iter().map(|b| b.arrival_year).collect();

        FilterOptions {
            hotels: std::iter::once(ALL_HOTELS.to_string())
                .chain(hotels.into_iter().map(str::to_string))
                .collect(),
            years: std::iter::once(ALL_YEARS.to_string())
                .chain(years.into_iter().map(|y| y.to_string()))
                .collect(),
            months: std::iter::once(ALL_MONTHS.to_string())
                .chain(Month::ALL.iter().map(|m| m.name().to_string()))
                .collect(),
        }
    }
}

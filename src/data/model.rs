use std::fmt;

use anyhow::{Context, Result, bail};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

/// Column names as they appear in the public hotel-booking dataset.
pub mod columns {
    pub const HOTEL: &str = "hotel";
    pub const IS_CANCELED: &str = "is_canceled";
    pub const LEAD_TIME: &str = "lead_time";
    pub const ARRIVAL_YEAR: &str = "arrival_date_year";
    pub const ARRIVAL_MONTH: &str = "arrival_date_month";
    pub const WEEKEND_NIGHTS: &str = "stays_in_weekend_nights";
    pub const WEEK_NIGHTS: &str = "stays_in_week_nights";
    pub const MARKET_SEGMENT: &str = "market_segment";
    pub const DISTRIBUTION_CHANNEL: &str = "distribution_channel";
    pub const CUSTOMER_TYPE: &str = "customer_type";
    pub const COUNTRY: &str = "country";
    pub const IS_REPEATED_GUEST: &str = "is_repeated_guest";
    pub const ADR: &str = "adr";
    pub const SPECIAL_REQUESTS: &str = "total_of_special_requests";

    /// Every column the loader requires, in export order.
    pub const REQUIRED: [&str; 14] = [
        HOTEL,
        IS_CANCELED,
        LEAD_TIME,
        ARRIVAL_YEAR,
        ARRIVAL_MONTH,
        WEEKEND_NIGHTS,
        WEEK_NIGHTS,
        MARKET_SEGMENT,
        DISTRIBUTION_CHANNEL,
        CUSTOMER_TYPE,
        COUNTRY,
        IS_REPEATED_GUEST,
        ADR,
        SPECIAL_REQUESTS,
    ];
}

// ---------------------------------------------------------------------------
// CellValue – a single raw cell before normalization
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the CSV, JSON or Arrow readers.
/// Normalized into the typed [`Booking`] fields by [`Booking::from_cells`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

/// Text markers that pandas-style exports use for a missing value.
fn is_missing_marker(s: &str) -> bool {
    matches!(s, "" | "NA" | "N/A" | "NaN" | "nan" | "NULL" | "null" | "None")
}

impl CellValue {
    /// Categorical reading: missing markers and NaN become `None`.
    pub fn category(&self) -> Option<String> {
        match self {
            CellValue::String(s) => {
                let s = s.trim();
                (!is_missing_marker(s)).then(|| s.to_string())
            }
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(v) if v.is_nan() => None,
            CellValue::Float(v) => Some(v.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Null => None,
        }
    }

    /// Integer reading. Integral floats (`2.0`) are accepted.
    pub fn integer(&self) -> Result<i64> {
        match self {
            CellValue::Integer(i) => Ok(*i),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => Ok(*v as i64),
            CellValue::Bool(b) => Ok(i64::from(*b)),
            CellValue::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Ok(i);
                }
                match s.parse::<f64>() {
                    Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
                    _ => bail!("'{s}' is not an integer"),
                }
            }
            other => bail!("{other} is not an integer"),
        }
    }

    /// Non-negative count reading.
    pub fn count(&self) -> Result<u32> {
        let i = self.integer()?;
        u32::try_from(i).with_context(|| format!("{i} is not a non-negative count"))
    }

    /// 0/1 flag reading; `true`/`false` is accepted as well.
    pub fn flag(&self) -> Result<bool> {
        match self {
            CellValue::Bool(b) => Ok(*b),
            CellValue::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
            CellValue::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
            other => match other.integer()? {
                0 => Ok(false),
                1 => Ok(true),
                i => bail!("{i} is not a 0/1 flag"),
            },
        }
    }

    /// Floating-point reading. Missing values become NaN.
    pub fn number(&self) -> Result<f64> {
        match self {
            CellValue::Float(v) => Ok(*v),
            CellValue::Integer(i) => Ok(*i as f64),
            CellValue::Null => Ok(f64::NAN),
            CellValue::String(s) if is_missing_marker(s.trim()) => Ok(f64::NAN),
            CellValue::String(s) => s
                .trim()
                .parse::<f64>()
                .with_context(|| format!("'{s}' is not a number")),
            CellValue::Bool(b) => bail!("{b} is not a number"),
        }
    }
}

// ---------------------------------------------------------------------------
// Month – calendar-ordered arrival month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// The twelve months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Exact, case-sensitive lookup by English month name.
    pub fn from_name(name: &str) -> Option<Month> {
        Month::ALL.into_iter().find(|m| m.name() == name)
    }

    /// 1-based calendar number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

fn serialize_flag<S: Serializer>(
    flag: &bool,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

// ---------------------------------------------------------------------------
// Booking – one row of the source table
// ---------------------------------------------------------------------------

/// A single booking record with typed columns.
///
/// Serializes with the source column names so an exported view loads back
/// through the same loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub hotel: String,
    #[serde(serialize_with = "serialize_flag")]
    pub is_canceled: bool,
    pub lead_time: u32,
    #[serde(rename = "arrival_date_year")]
    pub arrival_year: i32,
    #[serde(rename = "arrival_date_month")]
    pub arrival_month: Month,
    #[serde(rename = "stays_in_weekend_nights")]
    pub stays_weekend_nights: u32,
    #[serde(rename = "stays_in_week_nights")]
    pub stays_week_nights: u32,
    pub market_segment: Option<String>,
    pub distribution_channel: Option<String>,
    pub customer_type: Option<String>,
    pub country: Option<String>,
    #[serde(serialize_with = "serialize_flag")]
    pub is_repeated_guest: bool,
    /// Average daily rate. May be NaN when the source cell was missing.
    pub adr: f64,
    pub total_of_special_requests: u32,
}

impl Booking {
    /// Build a booking from raw cells looked up by column name.
    ///
    /// Error messages name the offending column; the caller adds the row.
    pub fn from_cells<F>(mut cell: F) -> Result<Self>
    where
        F: FnMut(&str) -> CellValue,
    {
        use columns::*;

        fn read<T>(
            cell: &mut impl FnMut(&str) -> CellValue,
            col: &str,
            f: impl FnOnce(&CellValue) -> Result<T>,
        ) -> Result<T> {
            f(&cell(col)).with_context(|| format!("column '{col}'"))
        }

        let hotel = read(&mut cell, HOTEL, |c| {
            c.category().context("hotel name is missing")
        })?;
        let month = read(&mut cell, ARRIVAL_MONTH, |c| {
            let raw = c.to_string();
            Month::from_name(raw.trim()).with_context(|| format!("'{raw}' is not a month name"))
        })?;
        let year = read(&mut cell, ARRIVAL_YEAR, |c| {
            let y = c.integer()?;
            i32::try_from(y).with_context(|| format!("{y} is not a valid year"))
        })?;

        Ok(Booking {
            hotel,
            is_canceled: read(&mut cell, IS_CANCELED, CellValue::flag)?,
            lead_time: read(&mut cell, LEAD_TIME, CellValue::count)?,
            arrival_year: year,
            arrival_month: month,
            stays_weekend_nights: read(&mut cell, WEEKEND_NIGHTS, CellValue::count)?,
            stays_week_nights: read(&mut cell, WEEK_NIGHTS, CellValue::count)?,
            market_segment: cell(MARKET_SEGMENT).category(),
            distribution_channel: cell(DISTRIBUTION_CHANNEL).category(),
            customer_type: cell(CUSTOMER_TYPE).category(),
            country: cell(COUNTRY).category(),
            is_repeated_guest: read(&mut cell, IS_REPEATED_GUEST, CellValue::flag)?,
            adr: read(&mut cell, ADR, CellValue::number)?,
            total_of_special_requests: read(&mut cell, SPECIAL_REQUESTS, CellValue::count)?,
        })
    }

    /// Weekend plus week nights. Widened so two `u32` counts cannot overflow.
    pub fn nights(&self) -> u64 {
        u64::from(self.stays_weekend_nights) + u64::from(self.stays_week_nights)
    }

    /// ADR with NaN (missing) read as zero.
    pub fn adr_or_zero(&self) -> f64 {
        if self.adr.is_nan() { 0.0 } else { self.adr }
    }

    /// The single revenue definition: `adr × (weekend_nights + week_nights)`.
    pub fn revenue(&self) -> f64 {
        self.adr_or_zero() * self.nights() as f64
    }
}

// ---------------------------------------------------------------------------
// BookingTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The immutable, fully parsed booking table.
#[derive(Debug, Clone, Default)]
pub struct BookingTable {
    rows: Vec<Booking>,
}

impl BookingTable {
    pub fn from_rows(rows: Vec<Booking>) -> Self {
        BookingTable { rows }
    }

    pub fn rows(&self) -> &[Booking] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Booking> {
        self.rows.get(index)
    }

    /// Number of bookings.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

//! Row builders shared by the unit tests.

use crate::data::model::{Booking, Month};

/// A one-night, uncanceled booking with every categorical column missing.
pub fn booking(hotel: &str, year: i32, month: Month) -> Booking {
    Booking {
        hotel: hotel.to_string(),
        is_canceled: false,
        lead_time: 0,
        arrival_year: year,
        arrival_month: month,
        stays_weekend_nights: 0,
        stays_week_nights: 1,
        market_segment: None,
        distribution_channel: None,
        customer_type: None,
        country: None,
        is_repeated_guest: false,
        adr: 0.0,
        total_of_special_requests: 0,
    }
}

/// A booking with explicit rate, stay length and cancellation flag.
pub fn priced(
    hotel: &str,
    year: i32,
    month: Month,
    adr: f64,
    weekend_nights: u32,
    week_nights: u32,
    canceled: bool,
) -> Booking {
    Booking {
        adr,
        stays_weekend_nights: weekend_nights,
        stays_week_nights: week_nights,
        is_canceled: canceled,
        ..booking(hotel, year, month)
    }
}

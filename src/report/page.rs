use serde::Serialize;

use super::builtin::{
    Sampling, bookings_by_hotel, cancellation_status, cancellations_by_segment,
    customer_type_distribution, kpis, lead_time_vs_adr, monthly_adr, monthly_revenue,
    repeat_guest_status, revenue_by_channel, special_requests_by_customer_type, top_countries,
};
use super::payload::{Distribution, Kpis, Series};
use crate::data::filter::View;

// ---------------------------------------------------------------------------
// Booking trends overview
// ---------------------------------------------------------------------------

/// Everything the overview page renders, computed from one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewPage {
    pub kpis: Kpis,
    pub bookings_by_hotel: Distribution,
    pub cancellations: Distribution,
    pub monthly_revenue: Series,
    pub monthly_adr: Series,
    pub customer_types: Distribution,
    pub top_countries: Distribution,
}

impl OverviewPage {
    /// `trend` feeds the monthly revenue chart; pass the same view with the
    /// month constraint lifted.
    pub fn build(view: &View<'_>, trend: &View<'_>) -> Self {
        OverviewPage {
            kpis: kpis(view),
            bookings_by_hotel: bookings_by_hotel(view),
            cancellations: cancellation_status(view),
            monthly_revenue: monthly_revenue(trend),
            monthly_adr: monthly_adr(view),
            customer_types: customer_type_distribution(view),
            top_countries: top_countries(view),
        }
    }
}

// ---------------------------------------------------------------------------
// Revenue & guest behavior
// ---------------------------------------------------------------------------

/// The guest-behavior page, with every chart as an array of tuples the
/// template iterates directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestBehaviorPage {
    /// `(segment, canceled, not_canceled)`
    pub cancel_by_segment: Vec<(String, u64, u64)>,
    /// `(lead_time, adr)`
    pub lead_vs_adr: Vec<(u32, f64)>,
    /// `(channel, revenue)`
    pub revenue_by_channel: Vec<(String, f64)>,
    /// `(customer_type, mean special requests)`
    pub special_requests: Vec<(String, f64)>,
    /// `(is_repeated_guest, count)`
    pub repeat_guests: Vec<(u8, u64)>,
}

fn series_rows(series: Series) -> Vec<(String, f64)> {
    series.labels.into_iter().zip(series.values).collect()
}

impl GuestBehaviorPage {
    pub fn build(view: &View<'_>, sampling: &Sampling) -> Self {
        let segments = cancellations_by_segment(view);
        let cancel_by_segment = segments
            .labels
            .into_iter()
            .zip(segments.canceled)
            .zip(segments.not_canceled)
            .map(|((label, canceled), kept)| (label, canceled, kept))
            .collect();

        // payloads arrive sanitized, so the tuples carry no NaN
        GuestBehaviorPage {
            cancel_by_segment,
            lead_vs_adr: lead_time_vs_adr(view, sampling).pairs,
            revenue_by_channel: series_rows(revenue_by_channel(view)),
            special_requests: series_rows(special_requests_by_customer_type(view)),
            repeat_guests: repeat_guest_status(view)
                .counts
                .into_iter()
                .enumerate()
                .map(|(flag, count)| (flag as u8, count))
                .collect(),
        }
    }
}

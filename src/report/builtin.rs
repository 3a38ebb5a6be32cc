use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

use super::group::{
    CategoryField, Mean, binary_distribution, category_distribution, group_by, grouped_mean,
    grouped_sum, reindex, top_k,
};
use super::payload::{
    Distribution, GroupMetrics, Kpis, PairedSample, Report, Series, StatusBreakdown,
};
use super::sanitize::{Sanitize, round2};
use crate::data::filter::View;
use crate::data::model::{Booking, Month};
use crate::error::DashboardError;

/// Labels of the cancellation buckets, `[is_canceled = 0, is_canceled = 1]`.
pub const CANCELLATION_LABELS: [&str; 2] = ["Not Canceled", "Canceled"];
/// Labels of the returning-guest buckets, `[is_repeated_guest = 0, = 1]`.
pub const REPEAT_GUEST_LABELS: [&str; 2] = ["New Guest", "Repeated Guest"];
/// How many countries the top-countries report ranks.
pub const TOP_COUNTRIES: usize = 5;

/// Reference week length for the occupancy heuristic.
const WEEK_NIGHTS: f64 = 7.0;

// ---------------------------------------------------------------------------
// Sampling parameters
// ---------------------------------------------------------------------------

/// Cap and seed for the lead-time / ADR scatter sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    pub cap: usize,
    pub seed: u64,
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling { cap: 200, seed: 1 }
    }
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

pub fn bookings_by_hotel(view: &View<'_>) -> Distribution {
    category_distribution(view, |b| CategoryField::Hotel.value(b))
}

pub fn customer_type_distribution(view: &View<'_>) -> Distribution {
    category_distribution(view, |b| CategoryField::CustomerType.value(b))
}

pub fn cancellation_status(view: &View<'_>) -> Distribution {
    binary_distribution(view, |b| b.is_canceled, CANCELLATION_LABELS)
}

pub fn repeat_guest_status(view: &View<'_>) -> Distribution {
    binary_distribution(view, |b| b.is_repeated_guest, REPEAT_GUEST_LABELS)
}

/// The five most frequent guest countries.
pub fn top_countries(view: &View<'_>) -> Distribution {
    top_k(view, |b| CategoryField::Country.value(b), TOP_COUNTRIES)
}

// ---------------------------------------------------------------------------
// KPI bundle
// ---------------------------------------------------------------------------

/// Headline KPIs. NaN ADR counts as 0 and stays in the ADR denominator.
pub fn kpis(view: &View<'_>) -> Kpis {
    if view.is_empty() {
        return Kpis::default();
    }

    let mut revenue = 0.0;
    let mut adr = Mean::default();
    let mut nights = Mean::default();
    for b in view.iter() {
        revenue += b.revenue();
        adr.push(b.adr_or_zero());
        nights.push(b.nights() as f64);
    }

    Kpis {
        total_bookings: view.len() as u64,
        total_revenue: round2(revenue),
        average_adr: round2(adr.value()),
        occupancy_rate: round2(100.0 * nights.value() / WEEK_NIGHTS),
    }
    .sanitize()
}

// ---------------------------------------------------------------------------
// Grouped sums and means
// ---------------------------------------------------------------------------

/// Revenue per arrival month, always all twelve months in calendar order.
pub fn monthly_revenue(view: &View<'_>) -> Series {
    let by_month = grouped_sum(view, |b| Some(b.arrival_month), Booking::revenue);
    let aligned = reindex(&by_month, Month::ALL, 0.0);
    Series::from_pairs(aligned.into_iter().map(|(m, v)| (m.name(), v))).sanitize()
}

/// Revenue per distribution channel, first-seen order.
pub fn revenue_by_channel(view: &View<'_>) -> Series {
    let by_channel = grouped_sum(
        view,
        |b| CategoryField::DistributionChannel.value(b),
        Booking::revenue,
    );
    Series::from_pairs(by_channel).sanitize()
}

/// Mean ADR for the months present in the view, calendar order.
pub fn monthly_adr(view: &View<'_>) -> Series {
    let mut by_month: Vec<(Month, f64)> =
        grouped_mean(view, |b| Some(b.arrival_month), Booking::adr_or_zero)
            .into_iter()
            .collect();
    by_month.sort_by_key(|(m, _)| *m);
    Series::from_pairs(by_month.into_iter().map(|(m, v)| (m.name(), round2(v)))).sanitize()
}

/// Mean number of special requests per customer type.
pub fn special_requests_by_customer_type(view: &View<'_>) -> Series {
    let by_type = grouped_mean(
        view,
        |b| CategoryField::CustomerType.value(b),
        |b| f64::from(b.total_of_special_requests),
    );
    Series::from_pairs(by_type.into_iter().map(|(t, v)| (t, round2(v)))).sanitize()
}

// ---------------------------------------------------------------------------
// Paired sample
// ---------------------------------------------------------------------------

/// `(lead_time, adr)` pairs where both are positive, at most `sampling.cap`.
///
/// Larger candidate sets are subsampled with a fixed seed; the chosen pairs
/// keep their table order.
pub fn lead_time_vs_adr(view: &View<'_>, sampling: &Sampling) -> PairedSample {
    let candidates: Vec<(u32, f64)> = view
        .iter()
        .filter(|b| b.lead_time > 0 && b.adr > 0.0)
        .map(|b| (b.lead_time, b.adr))
        .collect();

    if candidates.len() <= sampling.cap {
        return PairedSample { pairs: candidates }.sanitize();
    }

    let mut rng = StdRng::seed_from_u64(sampling.seed);
    let mut picked = index::sample(&mut rng, candidates.len(), sampling.cap).into_vec();
    picked.sort_unstable();
    log::debug!(
        "sampled {} of {} lead time / ADR pairs",
        picked.len(),
        candidates.len()
    );

    PairedSample {
        pairs: picked.into_iter().map(|i| candidates[i]).collect(),
    }
    .sanitize()
}

// ---------------------------------------------------------------------------
// Per-group breakdowns
// ---------------------------------------------------------------------------

/// Canceled / not-canceled counts per market segment.
pub fn cancellations_by_segment(view: &View<'_>) -> StatusBreakdown {
    let groups = group_by(
        view,
        |b| CategoryField::MarketSegment.value(b),
        || (0u64, 0u64),
        |tally: &mut (u64, u64), b| {
            if b.is_canceled {
                tally.0 += 1;
            } else {
                tally.1 += 1;
            }
        },
    );

    let mut out = StatusBreakdown::default();
    for (segment, (canceled, kept)) in groups {
        out.labels.push(segment.to_string());
        out.canceled.push(canceled);
        out.not_canceled.push(kept);
    }
    out
}

#[derive(Default)]
struct MetricsAcc {
    bookings: u64,
    canceled: Mean,
    adr: Mean,
    requests: Mean,
    lead_time: Mean,
}

/// Count, cancellation rate and means per group of `field`.
pub fn group_metrics(view: &View<'_>, field: CategoryField, with_lead_time: bool) -> GroupMetrics {
    let groups = group_by(
        view,
        |b| field.value(b),
        MetricsAcc::default,
        |acc: &mut MetricsAcc, b| {
            acc.bookings += 1;
            acc.canceled.push(if b.is_canceled { 1.0 } else { 0.0 });
            acc.adr.push(b.adr_or_zero());
            acc.requests.push(f64::from(b.total_of_special_requests));
            acc.lead_time.push(f64::from(b.lead_time));
        },
    );

    let mut out = GroupMetrics {
        avg_lead_time: with_lead_time.then(Vec::new),
        ..GroupMetrics::default()
    };
    for (label, acc) in groups {
        out.labels.push(label.to_string());
        out.bookings.push(acc.bookings);
        out.cancel_rate.push(round2(acc.canceled.value()));
        out.avg_adr.push(round2(acc.adr.value()));
        out.avg_special_requests.push(round2(acc.requests.value()));
        if let Some(lead) = out.avg_lead_time.as_mut() {
            lead.push(round2(acc.lead_time.value()));
        }
    }
    out.sanitize()
}

pub fn segment_metrics(view: &View<'_>) -> GroupMetrics {
    group_metrics(view, CategoryField::MarketSegment, true)
}

pub fn customer_type_metrics(view: &View<'_>) -> GroupMetrics {
    group_metrics(view, CategoryField::CustomerType, false)
}

// ---------------------------------------------------------------------------
// Report menu
// ---------------------------------------------------------------------------

/// Every report the engine serves, named after its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    BookingsByHotel,
    CancellationStatus,
    Kpis,
    MonthlyRevenue,
    TopCountries,
    RepeatGuests,
    CustomerTypes,
    MonthlyAdr,
    RevenueByChannel,
    SpecialRequests,
    LeadTimeVsAdr,
    SegmentCancellations,
    SegmentMetrics,
    CustomerMetrics,
}

impl ReportKind {
    pub const ALL: [ReportKind; 14] = [
        ReportKind::BookingsByHotel,
        ReportKind::CancellationStatus,
        ReportKind::Kpis,
        ReportKind::MonthlyRevenue,
        ReportKind::TopCountries,
        ReportKind::RepeatGuests,
        ReportKind::CustomerTypes,
        ReportKind::MonthlyAdr,
        ReportKind::RevenueByChannel,
        ReportKind::SpecialRequests,
        ReportKind::LeadTimeVsAdr,
        ReportKind::SegmentCancellations,
        ReportKind::SegmentMetrics,
        ReportKind::CustomerMetrics,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReportKind::BookingsByHotel => "hotel_data",
            ReportKind::CancellationStatus => "cancellation_data",
            ReportKind::Kpis => "kpi_data",
            ReportKind::MonthlyRevenue => "revenue_data",
            ReportKind::TopCountries => "top_countries_data",
            ReportKind::RepeatGuests => "repeat_guest_data",
            ReportKind::CustomerTypes => "customer_type_data",
            ReportKind::MonthlyAdr => "adr_trend_data",
            ReportKind::RevenueByChannel => "channel_revenue_data",
            ReportKind::SpecialRequests => "special_requests_data",
            ReportKind::LeadTimeVsAdr => "lead_time_adr_data",
            ReportKind::SegmentCancellations => "segment_cancellation_data",
            ReportKind::SegmentMetrics => "segment_metrics_data",
            ReportKind::CustomerMetrics => "customer_metrics_data",
        }
    }

    /// The monthly revenue trend spans the whole year whatever month is
    /// selected.
    pub fn honors_month_filter(self) -> bool {
        !matches!(self, ReportKind::MonthlyRevenue)
    }

    /// Compute this report over an already filtered view.
    pub fn compute(self, view: &View<'_>, sampling: &Sampling) -> Report {
        log::debug!("computing {} over {} bookings", self.name(), view.len());
        let report = match self {
            ReportKind::BookingsByHotel => Report::Distribution(bookings_by_hotel(view)),
            ReportKind::CancellationStatus => Report::Distribution(cancellation_status(view)),
            ReportKind::Kpis => Report::Kpis(kpis(view)),
            ReportKind::MonthlyRevenue => Report::Series(monthly_revenue(view)),
            ReportKind::TopCountries => Report::Distribution(top_countries(view)),
            ReportKind::RepeatGuests => Report::Distribution(repeat_guest_status(view)),
            ReportKind::CustomerTypes => Report::Distribution(customer_type_distribution(view)),
            ReportKind::MonthlyAdr => Report::Series(monthly_adr(view)),
            ReportKind::RevenueByChannel => Report::Series(revenue_by_channel(view)),
            ReportKind::SpecialRequests => Report::Series(special_requests_by_customer_type(view)),
            ReportKind::LeadTimeVsAdr => Report::PairedSample(lead_time_vs_adr(view, sampling)),
            ReportKind::SegmentCancellations => {
                Report::StatusBreakdown(cancellations_by_segment(view))
            }
            ReportKind::SegmentMetrics => Report::GroupMetrics(segment_metrics(view)),
            ReportKind::CustomerMetrics => Report::GroupMetrics(customer_type_metrics(view)),
        };
        report.sanitize()
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| DashboardError::UnknownReport(s.to_string()))
    }
}

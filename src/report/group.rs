use std::hash::Hash;

use indexmap::IndexMap;

use super::payload::Distribution;
use crate::data::filter::View;
use crate::data::model::Booking;

/// Label used when a top-K report has nothing to rank.
pub const NO_DATA: &str = "No Data";

// ---------------------------------------------------------------------------
// Categorical key extractors
// ---------------------------------------------------------------------------

/// Categorical columns a report can group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Hotel,
    ArrivalMonth,
    MarketSegment,
    DistributionChannel,
    CustomerType,
    Country,
}

impl CategoryField {
    /// The booking's value for this column, `None` when missing.
    pub fn value(self, booking: &Booking) -> Option<&str> {
        match self {
            CategoryField::Hotel => Some(booking.hotel.as_str()),
            CategoryField::ArrivalMonth => Some(booking.arrival_month.name()),
            CategoryField::MarketSegment => booking.market_segment.as_deref(),
            CategoryField::DistributionChannel => booking.distribution_channel.as_deref(),
            CategoryField::CustomerType => booking.customer_type.as_deref(),
            CategoryField::Country => booking.country.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Accumulators
// ---------------------------------------------------------------------------

/// Running arithmetic mean. The mean of nothing is NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    pub fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn value(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

// ---------------------------------------------------------------------------
// Generic grouping
// ---------------------------------------------------------------------------

/// Fold the rows of `view` into one accumulator per key.
///
/// Keys keep first-seen order. Rows whose key is `None` are skipped.
pub fn group_by<'a, K, A, F, I, G>(view: &View<'a>, key: F, init: I, fold: G) -> IndexMap<K, A>
where
    K: Hash + Eq,
    F: Fn(&'a Booking) -> Option<K>,
    I: Fn() -> A,
    G: Fn(&mut A, &'a Booking),
{
    let mut groups: IndexMap<K, A> = IndexMap::new();
    for booking in view.iter() {
        let Some(k) = key(booking) else {
            continue;
        };
        fold(groups.entry(k).or_insert_with(&init), booking);
    }
    groups
}

/// Row count per key, first-seen order.
pub fn counts<'a, K, F>(view: &View<'a>, key: F) -> IndexMap<K, u64>
where
    K: Hash + Eq,
    F: Fn(&'a Booking) -> Option<K>,
{
    group_by(view, key, || 0u64, |n: &mut u64, _| *n += 1)
}

/// Sum of `value` per key, first-seen order.
pub fn grouped_sum<'a, K, F, V>(view: &View<'a>, key: F, value: V) -> IndexMap<K, f64>
where
    K: Hash + Eq,
    F: Fn(&'a Booking) -> Option<K>,
    V: Fn(&Booking) -> f64,
{
    group_by(view, key, || 0.0, |sum: &mut f64, b| *sum += value(b))
}

/// Mean of `value` per key, first-seen order.
pub fn grouped_mean<'a, K, F, V>(view: &View<'a>, key: F, value: V) -> IndexMap<K, f64>
where
    K: Hash + Eq,
    F: Fn(&'a Booking) -> Option<K>,
    V: Fn(&Booking) -> f64,
{
    group_by(view, key, Mean::default, |mean: &mut Mean, b| mean.push(value(b)))
        .into_iter()
        .map(|(k, m)| (k, m.value()))
        .collect()
}

/// Align `groups` to `reference`: every reference key appears once, in
/// reference order, with absent groups filled by `fill`. Keys outside the
/// reference are dropped.
pub fn reindex<K, V>(
    groups: &IndexMap<K, V>,
    reference: impl IntoIterator<Item = K>,
    fill: V,
) -> Vec<(K, V)>
where
    K: Hash + Eq,
    V: Clone,
{
    reference
        .into_iter()
        .map(|k| {
            let v = groups.get(&k).cloned().unwrap_or_else(|| fill.clone());
            (k, v)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Distribution shapes
// ---------------------------------------------------------------------------

/// Row count per distinct value, labels in first-seen order.
pub fn category_distribution<'a, F>(view: &View<'a>, key: F) -> Distribution
where
    F: Fn(&'a Booking) -> Option<&'a str>,
{
    Distribution::from_pairs(counts(view, key))
}

/// Exactly two buckets, `[false, true]`, even when one of them is empty.
pub fn binary_distribution<F>(view: &View<'_>, flag: F, labels: [&str; 2]) -> Distribution
where
    F: Fn(&Booking) -> bool,
{
    let set = view.iter().filter(|b| flag(*b)).count() as u64;
    let unset = view.len() as u64 - set;
    Distribution::from_pairs([(labels[0], unset), (labels[1], set)])
}

/// The `k` most frequent values, descending by count; ties keep first-seen
/// order. With nothing to rank the result is the [`NO_DATA`] placeholder.
pub fn top_k<'a, F>(view: &View<'a>, key: F, k: usize) -> Distribution
where
    F: Fn(&'a Booking) -> Option<&'a str>,
{
    let mut ranked: Vec<(&str, u64)> = counts(view, key).into_iter().collect();
    // stable: equal counts stay in encounter order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(k);

    if ranked.is_empty() {
        return Distribution::from_pairs([(NO_DATA, 1)]);
    }
    Distribution::from_pairs(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{BookingTable, Month};
    use crate::test_support::booking;

    fn with_countries(countries: &[Option<&str>]) -> BookingTable {
        BookingTable::from_rows(
            countries
                .iter()
                .map(|c| {
                    let mut b = booking("City Hotel", 2016, Month::May);
                    b.country = c.map(str::to_string);
                    b
                })
                .collect(),
        )
    }

    #[test]
    fn group_keys_keep_first_seen_order() {
        let table = with_countries(&[Some("PRT"), Some("GBR"), None, Some("PRT"), Some("FRA")]);
        let view = View::all(&table);
        let groups = counts(&view, |b| CategoryField::Country.value(b));
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["PRT", "GBR", "FRA"]);
        assert_eq!(groups["PRT"], 2);
    }

    #[test]
    fn top_k_breaks_ties_by_first_seen() {
        let table = with_countries(&[
            Some("ESP"),
            Some("PRT"),
            Some("GBR"),
            Some("PRT"),
            Some("DEU"),
            Some("FRA"),
            Some("ITA"),
            Some("GBR"),
        ]);
        let view = View::all(&table);
        let top = top_k(&view, |b| CategoryField::Country.value(b), 5);
        assert_eq!(top.labels, vec!["PRT", "GBR", "ESP", "DEU", "FRA"]);
        assert_eq!(top.counts, vec![2, 2, 1, 1, 1]);
    }

    #[test]
    fn top_k_with_nothing_to_rank_is_placeholder() {
        let table = with_countries(&[None, None]);
        let view = View::all(&table);
        let top = top_k(&view, |b| CategoryField::Country.value(b), 5);
        assert_eq!(top, Distribution::from_pairs([(NO_DATA, 1)]));
    }

    #[test]
    fn reindex_fills_and_orders() {
        let mut groups = IndexMap::new();
        groups.insert("July", 10.0);
        groups.insert("March", 5.0);
        let aligned = reindex(&groups, ["January", "March", "July"], 0.0);
        assert_eq!(aligned, vec![("January", 0.0), ("March", 5.0), ("July", 10.0)]);
    }

    #[test]
    fn empty_mean_is_nan() {
        assert!(Mean::default().value().is_nan());
        let mut m = Mean::default();
        m.push(1.0);
        m.push(2.0);
        assert_eq!(m.value(), 1.5);
        assert_eq!(m.count(), 2);
    }
}

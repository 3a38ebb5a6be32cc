use serde::Serialize;

use super::sanitize::Sanitize;

// ---------------------------------------------------------------------------
// Report payloads
// ---------------------------------------------------------------------------

/// Parallel label / count sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

impl Distribution {
    pub fn from_pairs<L: Into<String>>(pairs: impl IntoIterator<Item = (L, u64)>) -> Self {
        let (labels, counts) = pairs.into_iter().map(|(l, c)| (l.into(), c)).unzip();
        Distribution { labels, counts }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(label, count)` pairs in report order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.labels.iter().map(String::as_str).zip(self.counts.iter().copied())
    }
}

/// Headline metrics for the KPI cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total_bookings: u64,
    pub total_revenue: f64,
    pub average_adr: f64,
    pub occupancy_rate: f64,
}

/// Parallel label / value sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn from_pairs<L: Into<String>>(pairs: impl IntoIterator<Item = (L, f64)>) -> Self {
        let (labels, values) = pairs.into_iter().map(|(l, v)| (l.into(), v)).unzip();
        Series { labels, values }
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// `(lead_time, adr)` points for the scatter chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PairedSample {
    pub pairs: Vec<(u32, f64)>,
}

/// Canceled and not-canceled counts per group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusBreakdown {
    pub labels: Vec<String>,
    pub canceled: Vec<u64>,
    pub not_canceled: Vec<u64>,
}

/// Several metrics per group, one parallel sequence each.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupMetrics {
    pub labels: Vec<String>,
    pub bookings: Vec<u64>,
    pub cancel_rate: Vec<f64>,
    pub avg_adr: Vec<f64>,
    pub avg_special_requests: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_lead_time: Option<Vec<f64>>,
}

/// Any report payload. Serializes as the bare payload object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Distribution(Distribution),
    Kpis(Kpis),
    Series(Series),
    PairedSample(PairedSample),
    StatusBreakdown(StatusBreakdown),
    GroupMetrics(GroupMetrics),
}

// ---------------------------------------------------------------------------
// Sanitization
// ---------------------------------------------------------------------------

impl Sanitize for Distribution {
    fn sanitize(self) -> Self {
        self
    }
}

impl Sanitize for StatusBreakdown {
    fn sanitize(self) -> Self {
        self
    }
}

impl Sanitize for Kpis {
    fn sanitize(self) -> Self {
        Kpis {
            total_bookings: self.total_bookings,
            total_revenue: self.total_revenue.sanitize(),
            average_adr: self.average_adr.sanitize(),
            occupancy_rate: self.occupancy_rate.sanitize(),
        }
    }
}

impl Sanitize for Series {
    fn sanitize(self) -> Self {
        Series {
            labels: self.labels,
            values: self.values.sanitize(),
        }
    }
}

impl Sanitize for PairedSample {
    fn sanitize(self) -> Self {
        PairedSample {
            pairs: self
                .pairs
                .into_iter()
                .map(|(lead, adr)| (lead, adr.sanitize()))
                .collect(),
        }
    }
}

impl Sanitize for GroupMetrics {
    fn sanitize(self) -> Self {
        GroupMetrics {
            labels: self.labels,
            bookings: self.bookings,
            cancel_rate: self.cancel_rate.sanitize(),
            avg_adr: self.avg_adr.sanitize(),
            avg_special_requests: self.avg_special_requests.sanitize(),
            avg_lead_time: self.avg_lead_time.sanitize(),
        }
    }
}

impl Sanitize for Report {
    fn sanitize(self) -> Self {
        match self {
            Report::Distribution(d) => Report::Distribution(d.sanitize()),
            Report::Kpis(k) => Report::Kpis(k.sanitize()),
            Report::Series(s) => Report::Series(s.sanitize()),
            Report::PairedSample(p) => Report::PairedSample(p.sanitize()),
            Report::StatusBreakdown(b) => Report::StatusBreakdown(b.sanitize()),
            Report::GroupMetrics(m) => Report::GroupMetrics(m.sanitize()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reports_serialize_as_bare_payloads() {
        let report = Report::Distribution(Distribution::from_pairs([
            ("City Hotel", 3),
            ("Resort Hotel", 1),
        ]));
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"labels": ["City Hotel", "Resort Hotel"], "counts": [3, 1]})
        );
    }

    #[test]
    fn lead_time_is_omitted_when_absent() {
        let metrics = GroupMetrics {
            labels: vec!["Direct".into()],
            bookings: vec![2],
            cancel_rate: vec![0.5],
            avg_adr: vec![f64::NAN],
            avg_special_requests: vec![1.0],
            avg_lead_time: None,
        }
        .sanitize();
        let value = serde_json::to_value(&metrics).unwrap();
        assert!(value.get("avg_lead_time").is_none());
        assert_eq!(value["avg_adr"], json!([0.0]));
    }
}

mod common;

use hotel_insights::data::filter::{ALL_HOTELS, ALL_MONTHS, ALL_YEARS};
use hotel_insights::report::builtin::{
    cancellation_status, kpis, lead_time_vs_adr, monthly_revenue, revenue_by_channel,
    top_countries,
};
use hotel_insights::report::sanitize::round2;
use hotel_insights::report::{Distribution, Kpis};
use hotel_insights::{
    AppState, BookingTable, FilterParams, FilterSpec, Month, Report, ReportKind, Sampling, apply,
    load_file,
};

use common::{line, sample_lines, write_csv};

fn sample_table() -> BookingTable {
    let tmp = write_csv(&sample_lines());
    load_file(tmp.path()).expect("load sample csv")
}

#[test]
fn filters_commute_on_disjoint_fields() {
    let table = sample_table();
    let hotel = FilterSpec::default().hotel("City Hotel");
    let year = FilterSpec::default().year(2016);
    let month = FilterSpec::default().month(Month::July);

    let a = apply(&table, &hotel).refine(&year).refine(&month);
    let b = apply(&table, &month).refine(&hotel).refine(&year);
    let c = apply(&table, &year).refine(&month).refine(&hotel);
    assert_eq!(a.indices(), b.indices());
    assert_eq!(b.indices(), c.indices());
    assert_eq!(a.indices(), &[1, 5]);
}

#[test]
fn sentinel_filters_are_a_no_op() {
    let table = sample_table();
    let spec = FilterSpec::from_params(Some(ALL_HOTELS), Some(ALL_YEARS), Some(ALL_MONTHS));
    let view = apply(&table, &spec);
    assert_eq!(view.len(), table.len());
    let every_row: Vec<usize> = (0..table.len()).collect();
    assert_eq!(view.indices(), every_row.as_slice());
}

#[test]
fn kpis_of_unknown_hotel_are_zero() {
    let table = sample_table();
    let view = apply(&table, &FilterSpec::default().hotel("Grand Budapest"));
    assert_eq!(
        kpis(&view),
        Kpis {
            total_bookings: 0,
            total_revenue: 0.0,
            average_adr: 0.0,
            occupancy_rate: 0.0,
        }
    );
}

#[test]
fn cancellation_buckets_survive_uniform_views() {
    let table = sample_table();
    // every Resort Hotel booking in 2015 is canceled
    let spec = FilterSpec::default().hotel("Resort Hotel").year(2015);
    let dist = cancellation_status(&apply(&table, &spec));
    assert_eq!(dist.labels, vec!["Not Canceled", "Canceled"]);
    assert_eq!(dist.counts, vec![0, 1]);
}

#[test]
#[rustfmt::skip]
fn monthly_revenue_fills_missing_months() {
    let lines = vec![
        line("City Hotel", 0, 5, 2016, "March", 1, 1, "Direct", "Direct", "Transient", "PRT", 0, "50", 0),
        line("City Hotel", 0, 5, 2016, "July", 0, 4, "Direct", "Direct", "Transient", "PRT", 0, "25", 0),
    ];
    let tmp = write_csv(&lines);
    let table = load_file(tmp.path()).unwrap();
    let series = monthly_revenue(&apply(&table, &FilterSpec::default()));

    let expected_labels: Vec<&str> = Month::ALL.iter().map(|m| m.name()).collect();
    assert_eq!(series.labels, expected_labels);
    let expected = [0.0, 0.0, 100.0, 0.0, 0.0, 0.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    assert_eq!(series.values, expected);
}

#[test]
fn top_countries_of_empty_view_is_placeholder() {
    let table = sample_table();
    let view = apply(&table, &FilterSpec::default().year(1999));
    assert_eq!(
        top_countries(&view),
        Distribution {
            labels: vec!["No Data".to_string()],
            counts: vec![1],
        }
    );
}

#[test]
fn top_countries_skips_missing_values() {
    let table = sample_table();
    let top = top_countries(&apply(&table, &FilterSpec::default()));
    assert_eq!(top.labels, vec!["PRT", "GBR", "ESP", "FRA"]);
    assert_eq!(top.counts, vec![2, 1, 1, 1]);
}

#[rustfmt::skip]
fn qualifying_rows(n: u32) -> BookingTable {
    let lines: Vec<String> = (1..=n)
        .map(|i| {
            line("City Hotel", 0, i, 2016, "May", 1, 1, "Direct", "Direct", "Transient", "PRT", 0, "75.25", 0)
        })
        .collect();
    let tmp = write_csv(&lines);
    load_file(tmp.path()).unwrap()
}

#[test]
fn paired_sample_is_capped_at_200() {
    let sampling = Sampling::default();

    let big = qualifying_rows(5_000);
    let sample = lead_time_vs_adr(&apply(&big, &FilterSpec::default()), &sampling);
    assert_eq!(sample.pairs.len(), 200);

    let small = qualifying_rows(50);
    let sample = lead_time_vs_adr(&apply(&small, &FilterSpec::default()), &sampling);
    assert_eq!(sample.pairs.len(), 50);
}

#[test]
fn revenue_agrees_across_reports() {
    let table = sample_table();
    let view = apply(&table, &FilterSpec::default());

    let by_row: f64 = view.iter().map(|b| b.revenue()).sum();
    let by_month: f64 = monthly_revenue(&view).values.iter().sum();
    let by_channel: f64 = revenue_by_channel(&view).values.iter().sum();

    assert_eq!(by_row, 1446.5);
    assert_eq!(by_month, by_row);
    assert_eq!(by_channel, by_row);
    assert_eq!(kpis(&view).total_revenue, round2(by_row));
}

#[test]
#[rustfmt::skip]
fn total_revenue_is_rounded_to_cents() {
    let lines = vec![
        line("City Hotel", 0, 5, 2016, "May", 1, 2, "Direct", "Direct", "Transient", "PRT", 0, "33.333", 0),
        line("City Hotel", 0, 5, 2016, "May", 0, 1, "Direct", "Direct", "Transient", "PRT", 0, "0.004", 0),
    ];
    let tmp = write_csv(&lines);
    let table = load_file(tmp.path()).unwrap();
    let view = apply(&table, &FilterSpec::default());

    let by_row: f64 = view.iter().map(|b| b.revenue()).sum();
    assert!((by_row - 100.003).abs() < 1e-9);
    assert_eq!(kpis(&view).total_revenue, 100.0);
}

#[test]
fn nan_adr_contributes_zero() {
    let table = sample_table();
    let view = apply(&table, &FilterSpec::default().hotel("Resort Hotel").year(2015));
    let k = kpis(&view);
    assert_eq!(k.total_bookings, 1);
    assert_eq!(k.total_revenue, 0.0);
    assert_eq!(k.average_adr, 0.0);

    let json = serde_json::to_string(&monthly_revenue(&view)).unwrap();
    assert!(!json.contains("null"), "{json}");
}

#[test]
fn end_to_end_kpi_example() {
    let lines = vec![
        line("City", 0, 1, 2016, "July", 1, 2, "Direct", "Direct", "Transient", "PRT", 0, "100", 0),
        line("City", 1, 1, 2016, "July", 0, 1, "Direct", "Direct", "Transient", "PRT", 0, "NaN", 0),
    ];
    let tmp = write_csv(&lines);
    let table = load_file(tmp.path()).unwrap();
    let state = AppState::new(table, Sampling::default());

    let params = FilterParams {
        hotel: Some("City".into()),
        year: Some("2016".into()),
        month: Some("July".into()),
    };
    let report = state.report(ReportKind::Kpis, &params);
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        serde_json::json!({
            "total_bookings": 2,
            "total_revenue": 300.0,
            "average_adr": 50.0,
            "occupancy_rate": 28.57,
        })
    );
    assert!(matches!(report, Report::Kpis(_)));
}

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use hotel_insights::data::export::write_csv;
use hotel_insights::data::model::columns;
use hotel_insights::{Booking, BookingTable, Month, View};

const HOTELS: [&str; 2] = ["City Hotel", "Resort Hotel"];
const SEGMENTS: [&str; 5] = ["Online TA", "Offline TA/TO", "Groups", "Direct", "Corporate"];
const CHANNELS: [&str; 4] = ["TA/TO", "Direct", "Corporate", "GDS"];
const CUSTOMER_TYPES: [&str; 4] = ["Transient", "Transient-Party", "Contract", "Group"];
const COUNTRIES: [&str; 8] = ["PRT", "GBR", "FRA", "ESP", "DEU", "ITA", "IRL", "BEL"];

/// Seasonal rate multiplier, peaking in August.
fn season(month: Month) -> f64 {
    let distance = (month.number() as f64 - 8.0).abs();
    1.6 - distance * 0.1
}

fn pick(rng: &mut StdRng, values: &[&str]) -> String {
    values.choose(rng).copied().unwrap_or_default().to_string()
}

fn generate_booking(rng: &mut StdRng) -> Booking {
    let hotel = pick(rng, &HOTELS);
    let month = Month::ALL[rng.gen_range(0..12)];
    let base_rate = if hotel == "City Hotel" { 95.0 } else { 80.0 };

    // ~1% of rates missing, ~2% complimentary stays
    let adr = match rng.gen_range(0..100) {
        0 => f64::NAN,
        1 | 2 => 0.0,
        _ => (base_rate * season(month) + rng.gen_range(-25.0..25.0_f64)).max(1.0),
    };

    Booking {
        hotel,
        is_canceled: rng.gen_bool(0.37),
        lead_time: rng.gen_range(0..400),
        arrival_year: rng.gen_range(2015..=2017),
        arrival_month: month,
        stays_weekend_nights: rng.gen_range(0..=2),
        stays_week_nights: rng.gen_range(0..=5),
        market_segment: Some(pick(rng, &SEGMENTS)),
        distribution_channel: Some(pick(rng, &CHANNELS)),
        customer_type: Some(pick(rng, &CUSTOMER_TYPES)),
        country: rng.gen_bool(0.98).then(|| pick(rng, &COUNTRIES)),
        is_repeated_guest: rng.gen_bool(0.03),
        adr,
        total_of_special_requests: rng.gen_range(0..=3),
    }
}

fn text_column(rows: &[Booking], f: impl Fn(&Booking) -> Option<&str>) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
}

fn int_column(rows: &[Booking], f: impl Fn(&Booking) -> i64) -> ArrayRef {
    Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
}

fn write_parquet(rows: &[Booking], path: &Path) -> Result<()> {
    use columns::*;

    let text = |name: &str| Field::new(name, DataType::Utf8, true);
    let int = |name: &str| Field::new(name, DataType::Int64, false);
    let schema = Arc::new(Schema::new(vec![
        text(HOTEL),
        int(IS_CANCELED),
        int(LEAD_TIME),
        int(ARRIVAL_YEAR),
        text(ARRIVAL_MONTH),
        int(WEEKEND_NIGHTS),
        int(WEEK_NIGHTS),
        text(MARKET_SEGMENT),
        text(DISTRIBUTION_CHANNEL),
        text(CUSTOMER_TYPE),
        text(COUNTRY),
        int(IS_REPEATED_GUEST),
        Field::new(ADR, DataType::Float64, true),
        int(SPECIAL_REQUESTS),
    ]));

    let adr: Float64Array = rows
        .iter()
        .map(|b| (!b.adr.is_nan()).then_some(b.adr))
        .collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text_column(rows, |b| Some(b.hotel.as_str())),
            int_column(rows, |b| i64::from(b.is_canceled)),
            int_column(rows, |b| i64::from(b.lead_time)),
            int_column(rows, |b| i64::from(b.arrival_year)),
            text_column(rows, |b| Some(b.arrival_month.name())),
            int_column(rows, |b| i64::from(b.stays_weekend_nights)),
            int_column(rows, |b| i64::from(b.stays_week_nights)),
            text_column(rows, |b| b.market_segment.as_deref()),
            text_column(rows, |b| b.distribution_channel.as_deref()),
            text_column(rows, |b| b.customer_type.as_deref()),
            text_column(rows, |b| b.country.as_deref()),
            int_column(rows, |b| i64::from(b.is_repeated_guest)),
            Arc::new(adr),
            int_column(rows, |b| i64::from(b.total_of_special_requests)),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "sample_bookings.parquet".to_string());
    let count: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("'{n}' is not a row count"))?,
        None => 5_000,
    };

    let mut rng = StdRng::seed_from_u64(42);
    let rows: Vec<Booking> = (0..count).map(|_| generate_booking(&mut rng)).collect();

    let path = Path::new(&output);
    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("pq") => write_parquet(&rows, path)?,
        Some("csv") => {
            let table = BookingTable::from_rows(rows);
            let file = File::create(path).context("creating output file")?;
            write_csv(&View::all(&table), BufWriter::new(file))?;
        }
        _ => bail!("output must end in .parquet, .pq or .csv"),
    }

    println!("Wrote {count} bookings to {output}");
    Ok(())
}

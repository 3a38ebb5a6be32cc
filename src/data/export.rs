use std::io::Write;

use anyhow::{Context, Result};

use super::filter::View;
use super::model::columns;

/// Write the rows of `view` as CSV with the source column names.
///
/// The header is written even for an empty view, so the output always loads
/// back through [`load_file`](super::loader::load_file). Returns the number
/// of data rows written.
pub fn write_csv<W: Write>(view: &View<'_>, writer: W) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(columns::REQUIRED)
        .context("writing CSV header")?;
    for (n, booking) in view.iter().enumerate() {
        wtr.serialize(booking)
            .with_context(|| format!("writing CSV row {n}"))?;
    }
    wtr.flush().context("flushing CSV output")?;
    Ok(view.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterSpec, apply};
    use crate::data::loader::load_file;
    use crate::data::model::{BookingTable, Month};
    use crate::test_support::priced;

    #[test]
    fn exported_view_loads_back() {
        let mut canceled = priced("Resort Hotel", 2017, Month::August, f64::NAN, 2, 5, true);
        canceled.country = Some("GBR".into());
        canceled.market_segment = Some("Online TA".into());
        let table = BookingTable::from_rows(vec![
            priced("City Hotel", 2017, Month::August, 99.5, 1, 1, false),
            canceled,
        ]);
        let view = apply(&table, &FilterSpec::default().hotel("Resort Hotel"));

        let tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let written = write_csv(&view, tmp.as_file()).unwrap();
        assert_eq!(written, 1);

        let reloaded = load_file(tmp.path()).unwrap();
        assert_eq!(reloaded.len(), 1);
        let row = reloaded.get(0).unwrap();
        assert_eq!(row.hotel, "Resort Hotel");
        assert!(row.is_canceled);
        assert!(row.adr.is_nan());
        assert_eq!(row.country.as_deref(), Some("GBR"));
        assert_eq!(row.distribution_channel, None);
        assert_eq!(row.nights(), 7);
    }

    #[test]
    fn empty_view_still_has_a_header() {
        let table = BookingTable::default();
        let mut out = Vec::new();
        assert_eq!(write_csv(&View::all(&table), &mut out).unwrap(), 0);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim_end(), columns::REQUIRED.join(","));
    }
}

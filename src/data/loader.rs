use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::kernels::cast::{CastOptions, cast_with_options};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Booking, BookingTable, CellValue, columns};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the booking table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the hotel-booking column names (recommended)
/// * `.json`    – `[{ "hotel": "...", "adr": 75.0, ... }, ...]`
/// * `.parquet` – flat columns with the same names
///
/// Any failure is reported as [`DashboardError::DataUnavailable`]; a partially
/// read table is never returned.
pub fn load_file(path: &Path) -> crate::error::Result<BookingTable> {
    let started = Instant::now();
    let table = read_file(path).map_err(|e| DashboardError::unavailable(path, &e))?;
    log::info!(
        "Loaded {} bookings from {} in {:.1?}",
        table.len(),
        path.display(),
        started.elapsed()
    );
    Ok(table)
}

fn read_file(path: &Path) -> Result<BookingTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. Only the columns listed in
/// [`columns::REQUIRED`] are read; the rest of the dataset is ignored.
fn load_csv(path: &Path) -> Result<BookingTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let positions = locate_columns(|name| headers.iter().position(|h| h == name))
        .context("CSV header")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let booking = Booking::from_cells(|col| {
            positions
                .iter()
                .find(|(name, _)| *name == col)
                .and_then(|(_, idx)| record.get(*idx))
                .map(guess_cell_type)
                .unwrap_or(CellValue::Null)
        })
        .with_context(|| format!("CSV row {row_no}"))?;
        rows.push(booking);
    }

    Ok(BookingTable::from_rows(rows))
}

/// Resolve every required column to a position, failing on the first missing one.
fn locate_columns(
    mut find: impl FnMut(&str) -> Option<usize>,
) -> Result<Vec<(&'static str, usize)>> {
    columns::REQUIRED
        .iter()
        .map(|&name| {
            find(name)
                .map(|idx| (name, idx))
                .with_context(|| format!("missing '{name}' column"))
        })
        .collect()
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "hotel": "City Hotel", "arrival_date_year": 2016, "adr": 98.5, ... },
///   ...
/// ]
/// ```
///
/// A key absent from an object reads as null.
fn load_json(path: &Path) -> Result<BookingTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let booking = Booking::from_cells(|col| {
            obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null)
        })
        .with_context(|| format!("JSON row {i}"))?;
        rows.push(booking);
    }

    Ok(BookingTable::from_rows(rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per booking field.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// and the bundled `generate_sample` tool.
fn load_parquet(path: &Path) -> Result<BookingTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let positions = locate_columns(|name| schema.index_of(name).ok())
            .context("Parquet schema")?;
        let typed = positions
            .iter()
            .map(|&(name, idx)| {
                let cells = ColumnCells::from_array(batch.column(idx))
                    .with_context(|| format!("Parquet column '{name}'"))?;
                Ok((name, cells))
            })
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let booking = Booking::from_cells(|col| {
                typed
                    .iter()
                    .find(|(name, _)| *name == col)
                    .map(|(_, cells)| cells.cell(row))
                    .unwrap_or(CellValue::Null)
            })
            .with_context(|| format!("Parquet row {}", rows.len()))?;
            rows.push(booking);
        }
    }

    Ok(BookingTable::from_rows(rows))
}

/// An Arrow column widened to one of the four cell kinds.
///
/// Dictionary-encoded strings (pandas `category`) are decoded, every integer
/// width becomes `Int64` and floats become `Float64`. Other types are rejected.
enum ColumnCells {
    Text(StringArray),
    Integer(Int64Array),
    Float(Float64Array),
    Bool(BooleanArray),
}

impl ColumnCells {
    fn from_array(array: &ArrayRef) -> Result<Self> {
        let widen = |to: DataType| -> Result<ArrayRef> {
            let options = CastOptions {
                safe: false,
                ..Default::default()
            };
            cast_with_options(array, &to, &options)
                .with_context(|| format!("converting {} to {to}", array.data_type()))
        };

        let cells = match array.data_type() {
            DataType::Utf8 => ColumnCells::Text(array.as_string::<i32>().clone()),
            DataType::LargeUtf8 | DataType::Utf8View => {
                ColumnCells::Text(widen(DataType::Utf8)?.as_string::<i32>().clone())
            }
            DataType::Dictionary(_, values)
                if matches!(
                    values.as_ref(),
                    DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
                ) =>
            {
                ColumnCells::Text(widen(DataType::Utf8)?.as_string::<i32>().clone())
            }
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => {
                ColumnCells::Integer(widen(DataType::Int64)?.as_primitive::<Int64Type>().clone())
            }
            DataType::Float16 | DataType::Float32 | DataType::Float64 => {
                ColumnCells::Float(widen(DataType::Float64)?.as_primitive::<Float64Type>().clone())
            }
            DataType::Boolean => ColumnCells::Bool(array.as_boolean().clone()),
            other => bail!("unsupported column type {other}"),
        };
        Ok(cells)
    }

    fn cell(&self, row: usize) -> CellValue {
        match self {
            ColumnCells::Text(a) if a.is_valid(row) => CellValue::String(a.value(row).to_string()),
            ColumnCells::Integer(a) if a.is_valid(row) => CellValue::Integer(a.value(row)),
            ColumnCells::Float(a) if a.is_valid(row) => CellValue::Float(a.value(row)),
            ColumnCells::Bool(a) if a.is_valid(row) => CellValue::Bool(a.value(row)),
            _ => CellValue::Null,
        }
    }
}

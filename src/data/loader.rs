use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, RideTable, Trip};
use crate::error::{DataSourceError, DataSourceResult};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a ride dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the required column names (recommended)
/// * `.parquet` – one column per field; `Date` may be Utf8, Date32 or Timestamp
/// * `.json`    – `[{ "Date": "...", "Booking_Status": "...", ... }, ...]`
///
/// Extra columns are ignored in every format.
pub fn load_file(path: &Path) -> DataSourceResult<RideTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => Err(DataSourceError::UnsupportedFormat(format!(".{other}"))),
    }?;

    log::info!("Loaded {} trips from {}", table.len(), path.display());
    Ok(table)
}

fn io_error(path: &Path, source: std::io::Error) -> DataSourceError {
    DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Position of every required column inside a header, or the first missing one.
fn resolve_columns<'a, I>(headers: I) -> DataSourceResult<BTreeMap<Column, usize>>
where
    I: IntoIterator<Item = &'a str>,
{
    let headers: Vec<&str> = headers.into_iter().collect();
    Column::ALL
        .iter()
        .map(|&col| {
            headers
                .iter()
                .position(|h| h.trim() == col.header())
                .map(|idx| (col, idx))
                .ok_or_else(|| DataSourceError::MissingColumn(col.header().to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one trip per record.
/// Every cell goes through [`CellValue::from_text`] before typing.
fn load_csv(path: &Path) -> DataSourceResult<RideTable> {
    let file = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
    read_csv(file)
}

/// Read trips from any CSV source.
pub fn read_csv<R: std::io::Read>(source: R) -> DataSourceResult<RideTable> {
    let mut reader = csv::Reader::from_reader(source);
    let columns = resolve_columns(reader.headers()?.iter())?;

    let mut trips = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let trip = Trip::from_cells(row_no, |col| {
            CellValue::from_text(record.get(columns[&col]).unwrap_or(""))
        })?;
        trips.push(trip);
    }

    Ok(RideTable::from_trips(trips))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Date": "2024-07-01", "Booking_Status": "Success", "Booking_Value": 250, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> DataSourceResult<RideTable> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    read_json(&text)
}

/// Read trips from a JSON array of records.
pub fn read_json(text: &str) -> DataSourceResult<RideTable> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root.as_array().ok_or_else(|| {
        DataSourceError::UnsupportedFormat("expected a top-level JSON array".into())
    })?;

    // The columns of a records array are the union of every record's keys;
    // a record that lacks one of them reads it as null. An empty array has no
    // columns at all, so it is reported like a file with an empty header.
    let keys: BTreeSet<&str> = records
        .iter()
        .filter_map(JsonValue::as_object)
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect();
    resolve_columns(keys)?;

    let mut trips = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataSourceError::InvalidValue {
            row: i,
            column: "<record>",
            value: rec.to_string(),
        })?;
        let trip = Trip::from_cells(i, |col| {
            obj.get(col.header()).map(json_to_cell).unwrap_or(CellValue::Null)
        })?;
        trips.push(trip);
    }

    Ok(RideTable::from_trips(trips))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::from_text(s),
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

/// Load a Parquet file containing trip data.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), as well as by the `generate_sample` binary.
fn load_parquet(path: &Path) -> DataSourceResult<RideTable> {
    let file = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema().clone();
    let columns = resolve_columns(schema.fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build()?;

    let mut trips = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let offset = trips.len();
        for row in 0..batch.num_rows() {
            let trip = Trip::from_cells(offset + row, |col| {
                extract_cell(batch.column(columns[&col]), row)
            })?;
            trips.push(trip);
        }
    }

    Ok(RideTable::from_trips(trips))
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::from_text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => CellValue::from_text(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map(CellValue::Date)
            .unwrap_or(CellValue::Null),
        DataType::Timestamp(unit, _) => {
            let instant = match unit {
                TimeUnit::Second => DateTime::from_timestamp(
                    col.as_primitive::<TimestampSecondType>().value(row),
                    0,
                ),
                TimeUnit::Millisecond => DateTime::from_timestamp_millis(
                    col.as_primitive::<TimestampMillisecondType>().value(row),
                ),
                TimeUnit::Microsecond => DateTime::from_timestamp_micros(
                    col.as_primitive::<TimestampMicrosecondType>().value(row),
                ),
                TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(
                    col.as_primitive::<TimestampNanosecondType>().value(row),
                )),
            };
            instant
                .map(|dt| CellValue::Date(dt.date_naive()))
                .unwrap_or(CellValue::Null)
        }
        other => CellValue::String(format!("{other:?}")),
    }
}

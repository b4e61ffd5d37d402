use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Float64Array, StringArray, TimestampMicrosecondArray,
    TimestampNanosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::ArrowWriter;

use ride_dashboard::data::loader::load_file;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// Write a three-row ride file whose `Date` column is `dates`.
fn write_rides(dir: &Path, name: &str, date_type: DataType, dates: ArrayRef) -> PathBuf {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", date_type, false),
        Field::new("Booking_Status", DataType::Utf8, false),
        Field::new("Customer_ID", DataType::Utf8, false),
        Field::new("Vehicle_Type", DataType::Utf8, false),
        Field::new("Ride_Distance", DataType::Float64, false),
        Field::new("Driver_Ratings", DataType::Float64, true),
        Field::new("Customer_Rating", DataType::Float64, true),
        Field::new("Booking_Value", DataType::Float64, false),
        Field::new("Payment_Method", DataType::Utf8, true),
        Field::new("IsCompleted", DataType::Boolean, true),
        Field::new("Cancellation_Type", DataType::Utf8, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        dates,
        Arc::new(StringArray::from(vec!["Success", "Success", "Canceled by Driver"])),
        Arc::new(StringArray::from(vec!["007", "7", "CID1"])),
        Arc::new(StringArray::from(vec!["Auto", "Bike", "Auto"])),
        Arc::new(Float64Array::from(vec![3.0, 4.0, 0.0])),
        Arc::new(Float64Array::from(vec![Some(4.5), Some(4.0), None])),
        Arc::new(Float64Array::from(vec![Some(5.0), None, None])),
        Arc::new(Float64Array::from(vec![120.0, 80.0, 60.0])),
        Arc::new(StringArray::from(vec![Some("UPI"), Some("Cash"), None])),
        Arc::new(BooleanArray::from(vec![Some(true), None, Some(false)])),
        Arc::new(StringArray::from(vec![None, None, Some("Driver")])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    path
}

fn loaded_dates(path: &Path) -> Vec<NaiveDate> {
    load_file(path).unwrap().iter().map(|t| t.date).collect()
}

#[test]
fn date32_column_reads_calendar_dates() {
    let dir = tempfile::tempdir().unwrap();
    let epoch = day(1970, 1, 1);
    let expected = vec![day(2024, 7, 1), day(2024, 7, 31), day(1969, 12, 31)];
    let days: Vec<i32> = expected
        .iter()
        .map(|d| d.signed_duration_since(epoch).num_days() as i32)
        .collect();

    let path = write_rides(
        dir.path(),
        "date32.parquet",
        DataType::Date32,
        Arc::new(Date32Array::from(days)),
    );
    assert_eq!(loaded_dates(&path), expected);
}

#[test]
fn nanosecond_timestamps_keep_their_day() {
    let dir = tempfile::tempdir().unwrap();
    let instants = [
        at(2024, 7, 1, 23, 30),
        at(2024, 7, 2, 0, 0),
        at(1969, 12, 31, 12, 0),
    ];
    let nanos: Vec<i64> = instants
        .iter()
        .map(|dt| dt.and_utc().timestamp_nanos_opt().unwrap())
        .collect();

    let path = write_rides(
        dir.path(),
        "timestamp_ns.parquet",
        DataType::Timestamp(TimeUnit::Nanosecond, None),
        Arc::new(TimestampNanosecondArray::from(nanos)),
    );
    assert_eq!(
        loaded_dates(&path),
        vec![day(2024, 7, 1), day(2024, 7, 2), day(1969, 12, 31)]
    );
}

#[test]
fn microsecond_timestamps_before_1970_floor_to_the_previous_day() {
    let dir = tempfile::tempdir().unwrap();
    let micros: Vec<i64> = [
        at(1969, 12, 31, 23, 59),
        at(1970, 1, 1, 0, 0),
        at(1965, 3, 14, 6, 45),
    ]
    .iter()
    .map(|dt| dt.and_utc().timestamp_micros())
    .collect();

    let path = write_rides(
        dir.path(),
        "timestamp_us.parquet",
        DataType::Timestamp(TimeUnit::Microsecond, None),
        Arc::new(TimestampMicrosecondArray::from(micros)),
    );
    assert_eq!(
        loaded_dates(&path),
        vec![day(1969, 12, 31), day(1970, 1, 1), day(1965, 3, 14)]
    );
}

#[test]
fn parquet_keeps_identifiers_and_unknown_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rides(
        dir.path(),
        "ids.parquet",
        DataType::Date32,
        Arc::new(Date32Array::from(vec![19905, 19905, 19906])),
    );
    let table = load_file(&path).unwrap();

    let ids: Vec<_> = table.iter().map(|t| t.customer_id.as_deref()).collect();
    assert_eq!(ids, vec![Some("007"), Some("7"), Some("CID1")]);
    let flags: Vec<_> = table.iter().map(|t| t.is_completed).collect();
    assert_eq!(flags, vec![Some(true), None, Some(false)]);
}

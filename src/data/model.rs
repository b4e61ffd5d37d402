use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{DataSourceError, DataSourceResult};

// ---------------------------------------------------------------------------
// Column – the source columns a trip is built from
// ---------------------------------------------------------------------------

/// Required source columns, named exactly as in the input file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Date,
    BookingStatus,
    VehicleType,
    PaymentMethod,
    BookingValue,
    RideDistance,
    CustomerRating,
    DriverRating,
    CustomerId,
    IsCompleted,
    CancellationType,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Date,
        Column::BookingStatus,
        Column::VehicleType,
        Column::PaymentMethod,
        Column::BookingValue,
        Column::RideDistance,
        Column::CustomerRating,
        Column::DriverRating,
        Column::CustomerId,
        Column::IsCompleted,
        Column::CancellationType,
    ];

    /// Header name in the source file.
    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::BookingStatus => "Booking_Status",
            Column::VehicleType => "Vehicle_Type",
            Column::PaymentMethod => "Payment_Method",
            Column::BookingValue => "Booking_Value",
            Column::RideDistance => "Ride_Distance",
            Column::CustomerRating => "Customer_Rating",
            Column::DriverRating => "Driver_Ratings",
            Column::CustomerId => "Customer_ID",
            Column::IsCompleted => "IsCompleted",
            Column::CancellationType => "Cancellation_Type",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// The three categorical columns a user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryColumn {
    BookingStatus,
    VehicleType,
    PaymentMethod,
}

impl CategoryColumn {
    pub const ALL: [CategoryColumn; 3] = [
        CategoryColumn::BookingStatus,
        CategoryColumn::VehicleType,
        CategoryColumn::PaymentMethod,
    ];

    /// Human readable label for selectors.
    pub fn label(self) -> &'static str {
        match self {
            CategoryColumn::BookingStatus => "Booking Status",
            CategoryColumn::VehicleType => "Vehicle Type",
            CategoryColumn::PaymentMethod => "Payment Method",
        }
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single raw cell before typing
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the CSV, JSON and Parquet readers.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

const NULL_TOKENS: [&str; 6] = ["", "nan", "NaN", "null", "None", "NA"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

impl CellValue {
    /// Wrap a text cell (CSV, JSON string, Parquet Utf8). Only the null
    /// tokens are recognised here; the text is otherwise kept verbatim so
    /// category values like `007` or `TRUE` survive unchanged. Numeric and
    /// flag columns parse the text when the trip is built.
    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        if NULL_TOKENS.contains(&s) {
            CellValue::Null
        } else {
            CellValue::String(s.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    fn invalid(&self, row: usize, column: Column) -> DataSourceError {
        DataSourceError::InvalidValue {
            row,
            column: column.header(),
            value: self.to_string(),
        }
    }

    fn into_category(self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self {
            CellValue::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    fn to_real(&self, row: usize, column: Column) -> DataSourceResult<Option<f64>> {
        if self.is_null() {
            return Ok(None);
        }
        let value = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => s.parse::<f64>().map_err(|_| self.invalid(row, column))?,
            _ => return Err(self.invalid(row, column)),
        };
        Ok((!value.is_nan()).then_some(value))
    }

    /// `None` for a null cell: the trip's outcome is unknown.
    fn to_flag(&self, row: usize, column: Column) -> DataSourceResult<Option<bool>> {
        if self.is_null() {
            return Ok(None);
        }
        match self {
            CellValue::Bool(b) => Ok(Some(*b)),
            CellValue::Integer(0) => Ok(Some(false)),
            CellValue::Integer(1) => Ok(Some(true)),
            CellValue::Float(v) if *v == 0.0 => Ok(Some(false)),
            CellValue::Float(v) if *v == 1.0 => Ok(Some(true)),
            CellValue::String(s) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            CellValue::String(s) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            CellValue::String(s) => match s.parse::<f64>() {
                Ok(v) if v == 0.0 => Ok(Some(false)),
                Ok(v) if v == 1.0 => Ok(Some(true)),
                _ => Err(self.invalid(row, column)),
            },
            _ => Err(self.invalid(row, column)),
        }
    }

    fn to_date(&self, row: usize, column: Column) -> DataSourceResult<NaiveDate> {
        match self {
            CellValue::Date(d) => Ok(*d),
            CellValue::String(s) => parse_date(s).ok_or_else(|| self.invalid(row, column)),
            _ => Err(self.invalid(row, column)),
        }
    }
}

/// Parse a calendar date, dropping any time-of-day component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

// ---------------------------------------------------------------------------
// Trip – one row of the source table
// ---------------------------------------------------------------------------

/// A single ride record.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub date: NaiveDate,
    pub booking_status: Option<String>,
    pub vehicle_type: Option<String>,
    pub payment_method: Option<String>,
    /// Fare in rupees.
    pub booking_value: Option<f64>,
    /// Distance in km.
    pub ride_distance: Option<f64>,
    pub customer_rating: Option<f64>,
    pub driver_rating: Option<f64>,
    pub customer_id: Option<String>,
    /// `None` when the source left the completion flag empty.
    pub is_completed: Option<bool>,
    pub cancellation_type: Option<String>,
}

impl Trip {
    /// Build a trip from raw cells. `cell` is asked for each required column
    /// once; `row` is only used for error reporting.
    pub fn from_cells<F>(row: usize, mut cell: F) -> DataSourceResult<Self>
    where
        F: FnMut(Column) -> CellValue,
    {
        Ok(Trip {
            date: cell(Column::Date).to_date(row, Column::Date)?,
            booking_status: cell(Column::BookingStatus).into_category(),
            vehicle_type: cell(Column::VehicleType).into_category(),
            payment_method: cell(Column::PaymentMethod).into_category(),
            booking_value: cell(Column::BookingValue).to_real(row, Column::BookingValue)?,
            ride_distance: cell(Column::RideDistance).to_real(row, Column::RideDistance)?,
            customer_rating: cell(Column::CustomerRating).to_real(row, Column::CustomerRating)?,
            driver_rating: cell(Column::DriverRating).to_real(row, Column::DriverRating)?,
            customer_id: cell(Column::CustomerId).into_category(),
            is_completed: cell(Column::IsCompleted).to_flag(row, Column::IsCompleted)?,
            cancellation_type: cell(Column::CancellationType).into_category(),
        })
    }

    /// Value of one of the filterable category fields.
    pub fn category(&self, column: CategoryColumn) -> Option<&str> {
        match column {
            CategoryColumn::BookingStatus => self.booking_status.as_deref(),
            CategoryColumn::VehicleType => self.vehicle_type.as_deref(),
            CategoryColumn::PaymentMethod => self.payment_method.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rating – an orderable group key for rating values
// ---------------------------------------------------------------------------

/// A rating used as a group-by key. Ordered by `f64::total_cmp`.
#[derive(Debug, Clone, Copy)]
pub struct Rating(pub f64);

impl PartialEq for Rating {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rating {}

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RideTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered set of trips. Never mutated once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RideTable {
    trips: Vec<Trip>,
}

impl RideTable {
    pub fn from_trips(trips: Vec<Trip>) -> Self {
        RideTable { trips }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trip> {
        self.trips.iter()
    }

    /// Number of trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// New table holding the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> RideTable {
        RideTable {
            trips: indices.iter().map(|&i| self.trips[i].clone()).collect(),
        }
    }

    /// Sorted distinct non-null values of a category column.
    pub fn distinct_values(&self, column: CategoryColumn) -> BTreeSet<String> {
        self.trips
            .iter()
            .filter_map(|t| t.category(column))
            .map(str::to_string)
            .collect()
    }
}

impl<'a> IntoIterator for &'a RideTable {
    type Item = &'a Trip;
    type IntoIter = std::slice::Iter<'a, Trip>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_text_cells() {
        assert_eq!(CellValue::from_text(""), CellValue::Null);
        assert_eq!(CellValue::from_text("NaN"), CellValue::Null);
        assert_eq!(CellValue::from_text(" 12 "), CellValue::String("12".into()));
        assert_eq!(CellValue::from_text("007"), CellValue::String("007".into()));
        assert_eq!(CellValue::from_text("TRUE"), CellValue::String("TRUE".into()));
        assert_eq!(
            CellValue::from_text("Prime Sedan"),
            CellValue::String("Prime Sedan".into())
        );
    }

    #[test]
    fn parses_supported_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 7, 26);
        assert_eq!(parse_date("2024-07-26"), expected);
        assert_eq!(parse_date("2024-07-26 14:00:00"), expected);
        assert_eq!(parse_date("2024-07-26T14:00:00"), expected);
        assert_eq!(parse_date("07/26/2024"), expected);
        assert_eq!(parse_date("07/26/2024 14:00"), expected);
        assert_eq!(parse_date("26-07-2024"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn builds_trip_from_cells() {
        let trip = Trip::from_cells(0, |col| match col {
            Column::Date => CellValue::String("2024-07-01".into()),
            Column::BookingStatus => CellValue::String("Success".into()),
            Column::VehicleType => CellValue::String("Auto".into()),
            Column::PaymentMethod => CellValue::Null,
            Column::BookingValue => CellValue::Integer(250),
            Column::RideDistance => CellValue::Float(7.5),
            Column::CustomerRating => CellValue::Float(4.2),
            Column::DriverRating => CellValue::Null,
            Column::CustomerId => CellValue::Integer(1001),
            Column::IsCompleted => CellValue::Integer(1),
            Column::CancellationType => CellValue::Null,
        })
        .unwrap();

        assert_eq!(trip.date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(trip.payment_method, None);
        assert_eq!(trip.booking_value, Some(250.0));
        assert_eq!(trip.driver_rating, None);
        assert_eq!(trip.customer_id.as_deref(), Some("1001"));
        assert_eq!(trip.is_completed, Some(true));
    }

    #[test]
    fn text_cells_keep_category_values_verbatim() {
        let trip = Trip::from_cells(0, |col| {
            CellValue::from_text(match col {
                Column::Date => "2024-07-01",
                Column::BookingStatus => "TRUE",
                Column::VehicleType => "1e3",
                Column::PaymentMethod => " UPI ",
                Column::BookingValue => "250",
                Column::RideDistance => "7.50",
                Column::CustomerRating => "nan",
                Column::DriverRating => "4.25",
                Column::CustomerId => "007",
                Column::IsCompleted => "1.0",
                Column::CancellationType => "",
            })
        })
        .unwrap();

        assert_eq!(trip.booking_status.as_deref(), Some("TRUE"));
        assert_eq!(trip.vehicle_type.as_deref(), Some("1e3"));
        assert_eq!(trip.payment_method.as_deref(), Some("UPI"));
        assert_eq!(trip.customer_id.as_deref(), Some("007"));
        assert_eq!(trip.booking_value, Some(250.0));
        assert_eq!(trip.ride_distance, Some(7.5));
        assert_eq!(trip.customer_rating, None);
        assert_eq!(trip.driver_rating, Some(4.25));
        assert_eq!(trip.is_completed, Some(true));
        assert_eq!(trip.cancellation_type, None);
    }

    #[test]
    fn text_flags_and_empty_flags() {
        let flag = |raw: &str| {
            Trip::from_cells(0, |col| match col {
                Column::Date => CellValue::String("2024-07-01".into()),
                Column::IsCompleted => CellValue::from_text(raw),
                _ => CellValue::Null,
            })
            .map(|t| t.is_completed)
        };
        assert_eq!(flag("0").unwrap(), Some(false));
        assert_eq!(flag("1").unwrap(), Some(true));
        assert_eq!(flag("False").unwrap(), Some(false));
        assert_eq!(flag("TRUE").unwrap(), Some(true));
        assert_eq!(flag("").unwrap(), None);
        assert_eq!(flag("NaN").unwrap(), None);
        assert!(flag("2").is_err());
    }

    #[test]
    fn rejects_bad_flag_and_date() {
        let err = Trip::from_cells(3, |col| match col {
            Column::Date => CellValue::String("2024-07-01".into()),
            Column::IsCompleted => CellValue::String("maybe".into()),
            _ => CellValue::Null,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            DataSourceError::InvalidValue { row: 3, column: "IsCompleted", .. }
        ));

        let err = Trip::from_cells(0, |_| CellValue::Null).unwrap_err();
        assert!(matches!(
            err,
            DataSourceError::InvalidValue { column: "Date", .. }
        ));
    }

    #[test]
    fn ratings_order_totally() {
        let mut ratings = vec![Rating(4.5), Rating(3.0), Rating(5.0)];
        ratings.sort();
        assert_eq!(ratings, vec![Rating(3.0), Rating(4.5), Rating(5.0)]);
        assert_eq!(Rating(4.0).to_string(), "4");
        assert_eq!(Rating(4.5).to_string(), "4.5");
        assert_ne!(Rating(4.25).to_string(), Rating(4.2).to_string());
    }
}

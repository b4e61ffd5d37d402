use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated ride, serialized with the dataset's column names.
#[derive(Debug, Serialize)]
struct SampleRide {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Booking_Status")]
    booking_status: &'static str,
    #[serde(rename = "Customer_ID")]
    customer_id: String,
    #[serde(rename = "Vehicle_Type")]
    vehicle_type: &'static str,
    #[serde(rename = "Ride_Distance")]
    ride_distance: f64,
    #[serde(rename = "Driver_Ratings")]
    driver_rating: Option<f64>,
    #[serde(rename = "Customer_Rating")]
    customer_rating: Option<f64>,
    #[serde(rename = "Booking_Value")]
    booking_value: f64,
    #[serde(rename = "Payment_Method")]
    payment_method: Option<&'static str>,
    #[serde(rename = "IsCompleted")]
    is_completed: u8,
    #[serde(rename = "Cancellation_Type")]
    cancellation_type: Option<&'static str>,
}

const VEHICLES: [&str; 7] = [
    "Auto", "Bike", "eBike", "Mini", "Prime Plus", "Prime Sedan", "Prime SUV",
];
const PAYMENTS: [&str; 4] = ["Cash", "Credit Card", "Debit Card", "UPI"];
const CANCELLED: [(&str, &str); 3] = [
    ("Canceled by Customer", "Customer"),
    ("Canceled by Driver", "Driver"),
    ("Driver Not Found", "No Driver"),
];

/// Rating rounded to one decimal, as in the source data.
fn rating(rng: &mut SimpleRng) -> f64 {
    (rng.range(3.0, 5.0) * 10.0).round() / 10.0
}

fn generate(rng: &mut SimpleRng, days: i64, rides_per_day: usize) -> Vec<SampleRide> {
    let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or_default();
    let mut rides = Vec::new();

    for day in 0..days {
        let date = start + Duration::days(day);
        for _ in 0..rides_per_day {
            let vehicle_type = rng.pick(&VEHICLES);
            let customer_id = format!("CID{:04}", rng.next_u64() % 400);
            let booking_value = (rng.range(50.0, 1500.0)).round();

            let ride = if rng.next_f64() < 0.8 {
                SampleRide {
                    date,
                    booking_status: "Success",
                    customer_id,
                    vehicle_type,
                    ride_distance: (rng.range(1.0, 50.0) * 10.0).round() / 10.0,
                    driver_rating: Some(rating(rng)),
                    customer_rating: Some(rating(rng)),
                    booking_value,
                    payment_method: Some(rng.pick(&PAYMENTS)),
                    is_completed: 1,
                    cancellation_type: None,
                }
            } else {
                let (status, kind) = CANCELLED[(rng.next_u64() % 3) as usize];
                SampleRide {
                    date,
                    booking_status: status,
                    customer_id,
                    vehicle_type,
                    ride_distance: 0.0,
                    driver_rating: None,
                    customer_rating: None,
                    booking_value,
                    payment_method: None,
                    is_completed: 0,
                    cancellation_type: Some(kind),
                }
            };
            rides.push(ride);
        }
    }
    rides
}

fn write_csv(path: &str, rides: &[SampleRide]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for ride in rides {
        writer.serialize(ride).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rides: &[SampleRide]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();

    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Date32, false),
        Field::new("Booking_Status", DataType::Utf8, false),
        Field::new("Customer_ID", DataType::Utf8, false),
        Field::new("Vehicle_Type", DataType::Utf8, false),
        Field::new("Ride_Distance", DataType::Float64, false),
        Field::new("Driver_Ratings", DataType::Float64, true),
        Field::new("Customer_Rating", DataType::Float64, true),
        Field::new("Booking_Value", DataType::Float64, false),
        Field::new("Payment_Method", DataType::Utf8, true),
        Field::new("IsCompleted", DataType::Boolean, false),
        Field::new("Cancellation_Type", DataType::Utf8, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from_iter_values(
            rides.iter().map(|r| (r.date - epoch).num_days() as i32),
        )),
        Arc::new(StringArray::from_iter_values(rides.iter().map(|r| r.booking_status))),
        Arc::new(StringArray::from_iter_values(rides.iter().map(|r| r.customer_id.as_str()))),
        Arc::new(StringArray::from_iter_values(rides.iter().map(|r| r.vehicle_type))),
        Arc::new(Float64Array::from_iter_values(rides.iter().map(|r| r.ride_distance))),
        Arc::new(rides.iter().map(|r| r.driver_rating).collect::<Float64Array>()),
        Arc::new(rides.iter().map(|r| r.customer_rating).collect::<Float64Array>()),
        Arc::new(Float64Array::from_iter_values(rides.iter().map(|r| r.booking_value))),
        Arc::new(rides.iter().map(|r| r.payment_method).collect::<StringArray>()),
        Arc::new(rides.iter().map(|r| Some(r.is_completed == 1)).collect::<BooleanArray>()),
        Arc::new(rides.iter().map(|r| r.cancellation_type).collect::<StringArray>()),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rides = generate(&mut rng, 31, 40);

    write_csv("sample_rides.csv", &rides)?;
    write_parquet("sample_rides.parquet", &rides)?;

    println!(
        "Wrote {} rides to sample_rides.csv and sample_rides.parquet",
        rides.len()
    );
    Ok(())
}

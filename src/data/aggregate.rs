use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::{Rating, RideTable, Trip};

/// Ranked lists show this many entries unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 5;

// ---------------------------------------------------------------------------
// Group-by primitives
// ---------------------------------------------------------------------------

/// Count rows per key. Rows whose key is `None` are dropped. Groups come
/// back in ascending key order.
pub fn count_by<'a, K, F>(trips: impl IntoIterator<Item = &'a Trip>, key: F) -> Vec<(K, usize)>
where
    K: Ord,
    F: Fn(&'a Trip) -> Option<K>,
{
    let mut groups: BTreeMap<K, usize> = BTreeMap::new();
    for trip in trips {
        if let Some(k) = key(trip) {
            *groups.entry(k).or_default() += 1;
        }
    }
    groups.into_iter().collect()
}

/// Sum a value per key, skipping null values. A group whose values are all
/// null totals `0.0`.
pub fn sum_by<'a, K, F, V>(
    trips: impl IntoIterator<Item = &'a Trip>,
    key: F,
    value: V,
) -> Vec<(K, f64)>
where
    K: Ord,
    F: Fn(&'a Trip) -> Option<K>,
    V: Fn(&'a Trip) -> Option<f64>,
{
    let mut groups: BTreeMap<K, f64> = BTreeMap::new();
    for trip in trips {
        if let Some(k) = key(trip) {
            let total = groups.entry(k).or_default();
            *total += value(trip).unwrap_or(0.0);
        }
    }
    groups.into_iter().collect()
}

/// Stable sort by total, largest first, and keep the first `n`.
pub fn top_n<K>(mut groups: Vec<(K, f64)>, n: usize) -> Vec<(K, f64)> {
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups.truncate(n);
    groups
}

/// Sum of the non-null values, `None` when there are none.
fn sum_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    values.flatten().fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

/// Mean of the non-null values, `None` when there are none.
fn mean_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Overall page
// ---------------------------------------------------------------------------

/// Headline figures for the filtered view. `None` means there is no data
/// to aggregate, which is displayed as such rather than as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyMetrics {
    pub total_rides: usize,
    pub total_revenue: Option<f64>,
    pub avg_customer_rating: Option<f64>,
    pub total_distance: Option<f64>,
}

pub fn key_metrics(table: &RideTable) -> KeyMetrics {
    KeyMetrics {
        total_rides: table.len(),
        total_revenue: sum_present(table.iter().map(|t| t.booking_value)),
        avg_customer_rating: mean_present(table.iter().map(|t| t.customer_rating)),
        total_distance: sum_present(table.iter().map(|t| t.ride_distance)),
    }
}

/// Rides per day, oldest first. Days without rides are absent.
pub fn rides_over_time(table: &RideTable) -> Vec<(NaiveDate, usize)> {
    count_by(table, |t| Some(t.date))
}

pub fn booking_status_breakdown(table: &RideTable) -> Vec<(String, usize)> {
    count_by(table, |t| t.booking_status.clone())
}

// ---------------------------------------------------------------------------
// Vehicle type page
// ---------------------------------------------------------------------------

/// Vehicle types ranked by total ride distance.
pub fn top_vehicle_types(table: &RideTable, n: usize) -> Vec<(String, f64)> {
    top_n(
        sum_by(table, |t| t.vehicle_type.clone(), |t| t.ride_distance),
        n,
    )
}

// ---------------------------------------------------------------------------
// Revenue page
// ---------------------------------------------------------------------------

pub fn revenue_by_payment_method(table: &RideTable) -> Vec<(String, f64)> {
    sum_by(table, |t| t.payment_method.clone(), |t| t.booking_value)
}

/// Customers ranked by total booking value.
pub fn top_customers(table: &RideTable, n: usize) -> Vec<(String, f64)> {
    top_n(
        sum_by(table, |t| t.customer_id.clone(), |t| t.booking_value),
        n,
    )
}

// ---------------------------------------------------------------------------
// Cancellation page
// ---------------------------------------------------------------------------

/// Cancellation types among incomplete rides. Rides with an unknown
/// completion flag are not counted.
///
/// Expects the full table: the dashboard deliberately passes the unfiltered
/// dataset here, so the active filters have no effect on this chart.
pub fn cancellation_breakdown(full: &RideTable) -> Vec<(String, usize)> {
    count_by(full.iter().filter(|t| t.is_completed == Some(false)), |t| {
        t.cancellation_type.clone()
    })
}

// ---------------------------------------------------------------------------
// Ratings page
// ---------------------------------------------------------------------------

/// Ride counts per driver rating. Rides without a rating are dropped.
pub fn driver_rating_distribution(table: &RideTable) -> Vec<(Rating, usize)> {
    count_by(table, |t| t.driver_rating.map(Rating))
}

/// Ride counts per customer rating. Rides without a rating are dropped.
pub fn customer_rating_distribution(table: &RideTable) -> Vec<(Rating, usize)> {
    count_by(table, |t| t.customer_rating.map(Rating))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn trip(day: u32, vehicle: &str, distance: f64, value: f64, customer: &str) -> Trip {
        Trip {
            date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            booking_status: Some("Success".into()),
            vehicle_type: Some(vehicle.into()),
            payment_method: Some("UPI".into()),
            booking_value: Some(value),
            ride_distance: Some(distance),
            customer_rating: Some(4.0),
            driver_rating: Some(4.5),
            customer_id: Some(customer.into()),
            is_completed: Some(true),
            cancellation_type: None,
        }
    }

    #[test]
    fn vehicle_types_ranked_by_distance() {
        let table = RideTable::from_trips(vec![
            trip(1, "Auto", 10.0, 100.0, "C1"),
            trip(1, "Bike", 5.0, 50.0, "C2"),
            trip(2, "Auto", 7.0, 70.0, "C1"),
        ]);
        assert_eq!(
            top_vehicle_types(&table, DEFAULT_TOP_N),
            vec![("Auto".to_string(), 17.0), ("Bike".to_string(), 5.0)]
        );
    }

    #[test]
    fn top_n_keeps_key_order_on_ties() {
        let groups = vec![
            ("A".to_string(), 1.0),
            ("B".to_string(), 3.0),
            ("C".to_string(), 1.0),
            ("D".to_string(), 3.0),
        ];
        assert_eq!(
            top_n(groups, 3),
            vec![
                ("B".to_string(), 3.0),
                ("D".to_string(), 3.0),
                ("A".to_string(), 1.0),
            ]
        );
    }

    #[test]
    fn top_customers_capped_and_non_increasing() {
        let trips = (0..8)
            .map(|i| trip(1, "Auto", 1.0, 10.0 * (i % 4) as f64, &format!("C{i}")))
            .collect();
        let ranked = top_customers(&RideTable::from_trips(trips), 5);
        assert_eq!(ranked.len(), 5);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_relative_eq!(ranked[0].1, 30.0);
    }

    #[test]
    fn key_metrics_over_rows() {
        let mut unrated = trip(2, "Bike", 2.5, 80.0, "C2");
        unrated.customer_rating = None;
        let table = RideTable::from_trips(vec![trip(1, "Auto", 10.0, 120.0, "C1"), unrated]);

        let m = key_metrics(&table);
        assert_eq!(m.total_rides, 2);
        assert_relative_eq!(m.total_revenue.unwrap(), 200.0);
        assert_relative_eq!(m.avg_customer_rating.unwrap(), 4.0);
        assert_relative_eq!(m.total_distance.unwrap(), 12.5);
    }

    #[test]
    fn key_metrics_over_empty_table_have_no_data() {
        let m = key_metrics(&RideTable::default());
        assert_eq!(m.total_rides, 0);
        assert_eq!(m.total_revenue, None);
        assert_eq!(m.avg_customer_rating, None);
        assert_eq!(m.total_distance, None);
    }

    #[test]
    fn rides_over_time_is_sorted_without_gaps_filled() {
        let table = RideTable::from_trips(vec![
            trip(5, "Auto", 1.0, 1.0, "C1"),
            trip(1, "Auto", 1.0, 1.0, "C1"),
            trip(5, "Auto", 1.0, 1.0, "C1"),
        ]);
        let series = rides_over_time(&table);
        assert_eq!(
            series,
            vec![
                (NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(), 1),
                (NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(), 2),
            ]
        );
    }

    #[test]
    fn cancellation_breakdown_counts_incomplete_rides() {
        let mut by_driver = trip(1, "Auto", 0.0, 0.0, "C1");
        by_driver.is_completed = Some(false);
        by_driver.cancellation_type = Some("Driver".into());
        let mut by_customer = by_driver.clone();
        by_customer.cancellation_type = Some("Customer".into());
        let mut unknown = by_driver.clone();
        unknown.is_completed = None;
        let table = RideTable::from_trips(vec![
            trip(1, "Auto", 3.0, 30.0, "C2"),
            by_driver,
            by_customer,
            unknown,
        ]);

        assert_eq!(
            cancellation_breakdown(&table),
            vec![("Customer".to_string(), 1), ("Driver".to_string(), 1)]
        );
    }

    #[test]
    fn rating_distributions_drop_nulls() {
        let mut unrated = trip(1, "Auto", 1.0, 1.0, "C1");
        unrated.driver_rating = None;
        let table = RideTable::from_trips(vec![
            trip(1, "Auto", 1.0, 1.0, "C1"),
            trip(1, "Auto", 1.0, 1.0, "C2"),
            unrated,
        ]);
        assert_eq!(driver_rating_distribution(&table), vec![(Rating(4.5), 2)]);
        assert_eq!(customer_rating_distribution(&table), vec![(Rating(4.0), 3)]);
    }

    #[test]
    fn empty_table_gives_empty_groups() {
        let empty = RideTable::default();
        assert!(rides_over_time(&empty).is_empty());
        assert!(booking_status_breakdown(&empty).is_empty());
        assert!(top_vehicle_types(&empty, 5).is_empty());
        assert!(revenue_by_payment_method(&empty).is_empty());
        assert!(top_customers(&empty, 5).is_empty());
        assert!(cancellation_breakdown(&empty).is_empty());
        assert!(driver_rating_distribution(&empty).is_empty());
    }
}

use std::fmt;
use std::str::FromStr;

use super::model::{CategoryColumn, RideTable};

/// Selector value meaning "no restriction".
pub const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Selection – the value chosen in one filter selector
// ---------------------------------------------------------------------------

/// Either no restriction or an exact category value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        if value == ALL {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }
}

impl FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Selection::from(s))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(v) => f.write_str(v),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterState – the three active selections
// ---------------------------------------------------------------------------

/// One equality predicate on a category column.
pub type Predicate<'a> = (CategoryColumn, &'a str);

/// The active selection for every filter column. Defaults to no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    pub booking_status: Selection,
    pub vehicle_type: Selection,
    pub payment_method: Selection,
}

impl FilterState {
    pub fn new(
        booking_status: impl Into<Selection>,
        vehicle_type: impl Into<Selection>,
        payment_method: impl Into<Selection>,
    ) -> Self {
        FilterState {
            booking_status: booking_status.into(),
            vehicle_type: vehicle_type.into(),
            payment_method: payment_method.into(),
        }
    }

    pub fn get(&self, column: CategoryColumn) -> &Selection {
        match column {
            CategoryColumn::BookingStatus => &self.booking_status,
            CategoryColumn::VehicleType => &self.vehicle_type,
            CategoryColumn::PaymentMethod => &self.payment_method,
        }
    }

    pub fn get_mut(&mut self, column: CategoryColumn) -> &mut Selection {
        match column {
            CategoryColumn::BookingStatus => &mut self.booking_status,
            CategoryColumn::VehicleType => &mut self.vehicle_type,
            CategoryColumn::PaymentMethod => &mut self.payment_method,
        }
    }

    /// The equality predicates that actually restrict rows.
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        CategoryColumn::ALL
            .iter()
            .filter_map(|&col| match self.get(col) {
                Selection::All => None,
                Selection::Only(v) => Some((col, v.as_str())),
            })
            .collect()
    }

    pub fn is_unrestricted(&self) -> bool {
        CategoryColumn::ALL.iter().all(|&col| self.get(col).is_all())
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of trips that pass every predicate, in table order.
/// A null field never equals a predicate value.
///
/// Predicates are applied one after another; once no row is left the
/// remaining predicates are skipped.
pub fn filtered_indices(table: &RideTable, predicates: &[Predicate<'_>]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..table.len()).collect();
    let trips = table.trips();
    for &(column, wanted) in predicates {
        if indices.is_empty() {
            break;
        }
        indices.retain(|&i| trips[i].category(column) == Some(wanted));
    }
    indices
}

/// Apply explicit predicates and return the matching trips as a new table.
pub fn apply_predicates(table: &RideTable, predicates: &[Predicate<'_>]) -> RideTable {
    table.select(&filtered_indices(table, predicates))
}

/// Apply the active filter selections and return the matching trips.
pub fn apply_filters(table: &RideTable, filters: &FilterState) -> RideTable {
    apply_predicates(table, &filters.predicates())
}

// ---------------------------------------------------------------------------
// Selector options
// ---------------------------------------------------------------------------

/// Choices for each filter selector: `"All"` then the sorted distinct
/// non-null values of the column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub booking_status: Vec<String>,
    pub vehicle_type: Vec<String>,
    pub payment_method: Vec<String>,
}

impl FilterOptions {
    pub fn get(&self, column: CategoryColumn) -> &[String] {
        match column {
            CategoryColumn::BookingStatus => &self.booking_status,
            CategoryColumn::VehicleType => &self.vehicle_type,
            CategoryColumn::PaymentMethod => &self.payment_method,
        }
    }
}

pub fn filter_options(table: &RideTable) -> FilterOptions {
    let options_for = |column: CategoryColumn| -> Vec<String> {
        std::iter::once(ALL.to_string())
            .chain(table.distinct_values(column))
            .collect()
    };
    FilterOptions {
        booking_status: options_for(CategoryColumn::BookingStatus),
        vehicle_type: options_for(CategoryColumn::VehicleType),
        payment_method: options_for(CategoryColumn::PaymentMethod),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Trip;
    use chrono::NaiveDate;

    fn trip(status: &str, vehicle: &str, payment: Option<&str>) -> Trip {
        Trip {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            booking_status: Some(status.to_string()),
            vehicle_type: Some(vehicle.to_string()),
            payment_method: payment.map(str::to_string),
            booking_value: Some(100.0),
            ride_distance: Some(5.0),
            customer_rating: None,
            driver_rating: None,
            customer_id: Some("C1".into()),
            is_completed: Some(status == "Completed"),
            cancellation_type: None,
        }
    }

    fn sample() -> RideTable {
        RideTable::from_trips(vec![
            trip("Completed", "Auto", Some("UPI")),
            trip("Cancelled", "Bike", Some("Cash")),
            trip("Completed", "Bike", None),
            trip("Completed", "Auto", Some("Cash")),
        ])
    }

    #[test]
    fn all_string_parses_to_no_restriction() {
        assert_eq!(Selection::from("All"), Selection::All);
        assert_eq!(
            "Auto".parse::<Selection>().unwrap(),
            Selection::Only("Auto".into())
        );
        assert_eq!(Selection::All.to_string(), "All");
    }

    #[test]
    fn null_never_matches_a_value() {
        let table = sample();
        let out = apply_filters(&table, &FilterState::new("All", "All", "Cash"));
        assert_eq!(out.trips(), &[table.trips()[1].clone(), table.trips()[3].clone()]);
    }

    #[test]
    fn only_active_selections_become_predicates() {
        let filters = FilterState::new("Completed", "All", "UPI");
        assert_eq!(
            filters.predicates(),
            vec![
                (CategoryColumn::BookingStatus, "Completed"),
                (CategoryColumn::PaymentMethod, "UPI"),
            ]
        );
        assert!(FilterState::default().is_unrestricted());
    }

    #[test]
    fn conjunctive_filter_keeps_order() {
        let table = sample();
        let out = apply_filters(&table, &FilterState::new("Completed", "Auto", "All"));
        assert_eq!(out.len(), 2);
        assert_eq!(out.trips()[0], table.trips()[0]);
        assert_eq!(out.trips()[1], table.trips()[3]);
    }

    #[test]
    fn unmatched_value_gives_empty_table() {
        let out = apply_filters(&sample(), &FilterState::new("Lost", "Auto", "Cash"));
        assert!(out.is_empty());
    }

    #[test]
    fn options_are_sorted_and_skip_nulls() {
        let opts = filter_options(&sample());
        assert_eq!(opts.booking_status, vec!["All", "Cancelled", "Completed"]);
        assert_eq!(opts.vehicle_type, vec!["All", "Auto", "Bike"]);
        assert_eq!(opts.payment_method, vec!["All", "Cash", "UPI"]);
    }
}

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::data::aggregate::{self, KeyMetrics};
use crate::data::cache::DatasetLoader;
use crate::data::filter::{apply_filters, filter_options, FilterOptions, FilterState};
use crate::data::model::{Rating, RideTable};
use crate::error::{DataSourceResult, EmptyResultWarning};

// ---------------------------------------------------------------------------
// Page – the five dashboard views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Overall,
    VehicleType,
    Revenue,
    Cancellation,
    Ratings,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Overall,
        Page::VehicleType,
        Page::Revenue,
        Page::Cancellation,
        Page::Ratings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Overall => "Overall",
            Page::VehicleType => "Vehicle Type",
            Page::Revenue => "Revenue",
            Page::Cancellation => "Cancellation",
            Page::Ratings => "Ratings",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| format!("unknown page '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// View model – everything a page needs to draw
// ---------------------------------------------------------------------------

/// Chart-ready outputs of one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Overall {
        metrics: KeyMetrics,
        rides_over_time: Vec<(NaiveDate, usize)>,
        status_breakdown: Vec<(String, usize)>,
    },
    VehicleType {
        top_vehicle_types: Vec<(String, f64)>,
    },
    Revenue {
        revenue_by_payment: Vec<(String, f64)>,
        top_customers: Vec<(String, f64)>,
    },
    Cancellation {
        breakdown: Vec<(String, usize)>,
        /// The breakdown is computed over the full dataset even when filters
        /// are active.
        ignores_filters: bool,
    },
    Ratings {
        driver: Vec<(Rating, usize)>,
        customer: Vec<(Rating, usize)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub page: Page,
    /// Rows left after filtering.
    pub matching_rides: usize,
    pub view: PageView,
    pub warnings: Vec<EmptyResultWarning>,
}

fn no_data_if<T>(rows: &[T], metric: &'static str, warnings: &mut Vec<EmptyResultWarning>) {
    if rows.is_empty() {
        warnings.push(EmptyResultWarning::NoData { metric });
    }
}

/// Recompute one page for the given filters.
///
/// Only the pipelines of `page` run. The cancellation page reads `full`
/// directly, the other pages read the filtered view.
pub fn render(full: &RideTable, page: Page, filters: &FilterState, top_n: usize) -> ViewModel {
    let filtered = apply_filters(full, filters);
    let mut warnings = Vec::new();
    if filtered.is_empty() {
        warnings.push(EmptyResultWarning::NoMatchingRides);
    }

    let view = match page {
        Page::Overall => {
            let metrics = aggregate::key_metrics(&filtered);
            if metrics.total_revenue.is_none() {
                warnings.push(EmptyResultWarning::NoData { metric: "total revenue" });
            }
            if metrics.avg_customer_rating.is_none() {
                warnings.push(EmptyResultWarning::NoData { metric: "average customer rating" });
            }
            if metrics.total_distance.is_none() {
                warnings.push(EmptyResultWarning::NoData { metric: "total ride distance" });
            }
            PageView::Overall {
                metrics,
                rides_over_time: aggregate::rides_over_time(&filtered),
                status_breakdown: aggregate::booking_status_breakdown(&filtered),
            }
        }
        Page::VehicleType => {
            let top_vehicle_types = aggregate::top_vehicle_types(&filtered, top_n);
            no_data_if(&top_vehicle_types, "vehicle types", &mut warnings);
            PageView::VehicleType { top_vehicle_types }
        }
        Page::Revenue => {
            let revenue_by_payment = aggregate::revenue_by_payment_method(&filtered);
            let top_customers = aggregate::top_customers(&filtered, top_n);
            no_data_if(&revenue_by_payment, "revenue by payment method", &mut warnings);
            no_data_if(&top_customers, "top customers", &mut warnings);
            PageView::Revenue {
                revenue_by_payment,
                top_customers,
            }
        }
        Page::Cancellation => {
            let breakdown = aggregate::cancellation_breakdown(full);
            no_data_if(&breakdown, "cancellations", &mut warnings);
            PageView::Cancellation {
                breakdown,
                ignores_filters: !filters.is_unrestricted(),
            }
        }
        Page::Ratings => {
            let driver = aggregate::driver_rating_distribution(&filtered);
            let customer = aggregate::customer_rating_distribution(&filtered);
            no_data_if(&driver, "driver ratings", &mut warnings);
            no_data_if(&customer, "customer ratings", &mut warnings);
            PageView::Ratings { driver, customer }
        }
    };

    log::debug!(
        "Rendered page '{page}' with {} of {} rides",
        filtered.len(),
        full.len()
    );
    for w in &warnings {
        log::warn!("{page}: {w}");
    }

    ViewModel {
        page,
        matching_rides: filtered.len(),
        view,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Dashboard – loader + selector options bundled for a session
// ---------------------------------------------------------------------------

/// A loaded dataset ready to answer `render` calls.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: Arc<RideTable>,
    options: FilterOptions,
    top_n: usize,
}

impl Dashboard {
    /// Load (or reuse) the loader's table and precompute selector options.
    pub fn open(loader: &DatasetLoader, top_n: usize) -> DataSourceResult<Self> {
        let table = loader.load()?;
        Ok(Self::from_table(table, top_n))
    }

    pub fn from_table(table: Arc<RideTable>, top_n: usize) -> Self {
        let options = filter_options(&table);
        Dashboard {
            table,
            options,
            top_n,
        }
    }

    pub fn table(&self) -> &RideTable {
        &self.table
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn render(&self, page: Page, filters: &FilterState) -> ViewModel {
        render(&self.table, page, filters, self.top_n)
    }
}

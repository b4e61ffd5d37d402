//! Ride-hailing trip analytics: load a trip dataset once, filter it by
//! booking status, vehicle type and payment method, and aggregate it into
//! the chart tables behind each dashboard page.
//!
//! ```no_run
//! use ride_dashboard::dashboard::{Dashboard, Page};
//! use ride_dashboard::data::cache::DatasetLoader;
//! use ride_dashboard::data::filter::FilterState;
//!
//! let loader = DatasetLoader::new("OLA_Ride_Cleaned_file.csv");
//! let dashboard = Dashboard::open(&loader, 5)?;
//! let view = dashboard.render(Page::Revenue, &FilterState::new("All", "Auto", "All"));
//! println!("{} matching rides", view.matching_rides);
//! # Ok::<(), ride_dashboard::error::DataSourceError>(())
//! ```

pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;

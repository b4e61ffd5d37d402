/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RideTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  DatasetLoader: read once, share Arc<RideTable>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  equality predicates → filtered RideTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group-by / sum / mean / top-n per dashboard page
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;

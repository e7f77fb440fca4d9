/// Data layer: table model, loading, filtering and writing.
///
/// Architecture:
/// ```text
///  export folder (.csv / .parquet) / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → Network
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   Network     │  collection → attribute → TimeseriesTable
///   └──────────────┘
///        │  (extract / selectors)
///        ▼
///   ┌──────────┐
///   │  filter   │  drop NaN columns, select by prefix
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  TimeseriesTable → .parquet / .csv / .json
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;

#[cfg(test)]
pub mod fixtures;

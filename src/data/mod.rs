/// Data layer: catalogue types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MethodCatalog
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ MethodCatalog │  Vec<MethodRecord>, column index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply column/property/search predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  filtered rows → CSV
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

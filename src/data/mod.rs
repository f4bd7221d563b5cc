/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  split rows → RawRow → normalize → QaDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ QaDataset  │  Vec<Record>, category counts (immutable)
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Query (categories, search, sort) → ResultView
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;

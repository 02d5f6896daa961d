/// Data layer: core types, loading, and line queries.
///
/// Architecture:
/// ```text
///  .json (exported save file)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SpectrumDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ SpectrumDataset │  axes, flux, segments, line catalog
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  lines    │  per-segment counts, line selection for marking
///   └──────────┘
/// ```

pub mod lines;
pub mod loader;
pub mod model;

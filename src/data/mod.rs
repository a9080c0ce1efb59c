/// Data layer: table model, workbook I/O, and the two cleaning stages.
///
/// Architecture:
/// ```text
///  .xls / .xlsx bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  first worksheet → raw Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  stage 1 → cleaned Table ("Fichier 1")
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  stage 2 → final Table ("Fichier final")
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  Table → xlsx bytes
///   └──────────┘
/// ```
///
/// `time` and `numeric` are shared by both stages; `schema` holds the report's
/// column names and state vocabulary.

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod numeric;
pub mod schema;
pub mod time;
pub mod writer;

// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw dump and the pairing tables.
//
// The pipeline flows in this order:
//
//   orig-q / dup-q / ans .tsv.gz
//       │
//       ▼
//   loader        → fetches and parses the three tables
//       │
//       ▼
//   preprocessor  → strips markup, lowercases
//       │
//       ▼
//   cleaner       → de-duplicates, closes references, applies
//       │           min_text / min_dupes
//       ▼
//   splitter      → stratified test/train split of the dupes
//       │
//       ▼
//   pairing       → labelled (dupe, question) candidate pairs
//
// Each module is responsible for exactly one step.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Downloads or reads the gzip TSV tables
pub mod loader;

/// Strips markup from post bodies
pub mod preprocessor;

/// Filters the raw tables into a consistent corpus
pub mod cleaner;

/// Stratified train/test split of the duplicates
pub mod splitter;

/// Builds labelled candidate pairs
pub mod pairing;

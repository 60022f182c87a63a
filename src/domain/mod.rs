// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing the dataset:
// posts (questions and duplicates), answers, candidate pairs,
// and the hooks the pipeline talks to.
//
// Rules for this layer:
//   - NO file I/O or network calls
//   - NO sampling or filtering logic
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Questions, duplicates and answers as loaded from the dump
pub mod post;

// A labelled (duplicate, question) candidate pair
pub mod pair;

// Descriptive statistics over lengths and counts
pub mod summary;

// Diagnostic events emitted by pipeline stages
pub mod events;

// Core abstractions (traits) that other layers implement
pub mod traits;

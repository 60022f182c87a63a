// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No text cleaning, filtering or sampling here (Layer 4)
//   - No printing here (that's Layer 1)
//   - No direct file or network access (Layers 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Build the dataset, or load it from the cache
pub mod build_use_case;

// Report on an existing output directory
pub mod inspect_use_case;

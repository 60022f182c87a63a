// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any one layer:
//
//   store.rs    — Dataset persistence
//                 Writes the four TSV outputs and the build
//                 config, and answers the cache lookup.
//
//   reporter.rs — Diagnostics
//                 Turns pipeline events into tracing logs,
//                 or drops them when output is disabled.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// TSV outputs, cache lookup and build config
pub mod store;

/// Reporter implementations
pub mod reporter;

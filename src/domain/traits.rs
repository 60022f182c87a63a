// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline talks to the outside world through two seams:
//
//   CorpusSource → where the three raw tables come from
//                  (HTTP download, a local directory, a test fixture)
//   Reporter     → where diagnostic events go
//                  (tracing logs, nowhere, a test recorder)
//
// The application layer only sees these traits, so the same
// BuildUseCase runs against the real dump and against fixtures.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::events::PipelineEvent;
use crate::domain::post::RawCorpus;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the raw questions, duplicates
/// and answers tables.
///
/// Implementations:
///   - HttpCorpusSource  → downloads the gzip TSVs
///   - LocalCorpusSource → reads the same files from a directory
pub trait CorpusSource {
    /// Load all three tables. Errors are fatal; there is no retry.
    fn load(&self) -> Result<RawCorpus>;
}

// ─── Reporter ─────────────────────────────────────────────────────────────────
/// Observability hook for the pipeline stages.
///
/// Implementations:
///   - TracingReporter → logs each event at info level
///   - SilentReporter  → drops every event
pub trait Reporter {
    fn report(&self, event: &PipelineEvent<'_>);
}

// ============================================================
// Layer 3 — Pipeline Events
// ============================================================
// Everything the pipeline has to say about the data flows out
// as a `PipelineEvent` handed to a `Reporter`. Stages never
// print directly, so they can be tested without capturing
// output and silenced without touching the data path.

use std::path::Path;

use crate::domain::post::PostId;
use crate::domain::summary::Summary;

/// Which point of the cleaning stage a statistic was taken at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// After referential closure, before length/count restriction
    Closure,
    /// After `min_text` and `min_dupes` were applied
    Restricted,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Closure    => "closure",
            Stage::Restricted => "restricted",
        }
    }
}

#[derive(Debug, Clone)]
pub enum PipelineEvent<'a> {
    /// Cached outputs were found and loaded instead of rebuilding
    CacheHit {
        dir:        &'a Path,
        questions:  usize,
        dupes_test: usize,
        /// The saved build config names different parameters
        stale:      bool,
    },

    /// Raw tables arrived from the corpus source
    Fetched {
        questions: usize,
        dupes:     usize,
        answers:   usize,
    },

    /// First question of the dump, with its dupes and answer
    SampleRows {
        answer_id:     PostId,
        question_text: &'a str,
        dupes:         usize,
        answer_text:   Option<&'a str>,
    },

    /// One question before and after markup stripping
    CleanedSample {
        id:         PostId,
        raw_text:   &'a str,
        clean_text: &'a str,
    },

    /// Distribution of cleaned text lengths per table
    TextStatistics {
        stage:  Stage,
        tables: Vec<(&'static str, Summary)>,
    },

    /// Distribution of duplicates per AnswerId
    DuplicationStatistics {
        stage:         Stage,
        summary:       Summary,
        largest_class: f64,
    },

    /// The length and count thresholds in force
    Restrictions {
        min_text:  usize,
        min_dupes: usize,
    },

    /// A pairing table was built
    PairsBuilt {
        name:       &'static str,
        rows:       usize,
        match_rate: f64,
    },

    /// A table was written to disk
    Written {
        path: &'a Path,
        rows: usize,
    },
}

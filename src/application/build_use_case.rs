// ============================================================
// Layer 2 — BuildUseCase
// ============================================================
// Orchestrates the dataset build in order:
//
//   Step 0: Look for a cached dataset      (Layer 6 - infra)
//   Step 1: Fetch the raw tables           (Layer 4 - data)
//   Step 2: Clean and restrict             (Layer 4 - data)
//   Step 3: Stratified train/test split    (Layer 4 - data)
//   Step 4: Build train and test pairs     (Layer 4 - data)
//   Step 5: Save config and tables         (Layer 6 - infra)
//
// Both the cache-hit and the full path return the same thing:
// the cleaned questions and the held-out test dupes.

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{cleaner::clean_corpus, pairing::build_pairs, splitter::split_dupes};
use crate::domain::events::PipelineEvent;
use crate::domain::pair::match_rate;
use crate::domain::post::RawCorpus;
use crate::domain::traits::{CorpusSource, Reporter};
use crate::infra::{
    reporter::reporter_for,
    store::{CachedDataset, DatasetStore, DatasetTables},
};

// ─── Build Configuration ─────────────────────────────────────────────────────
// All parameters of a build. Saved next to the outputs so a
// later cache hit can tell whether it was built the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub output_dir:  String,
    /// Fraction of each class held out for testing
    pub test_size:   f64,
    /// Minimum cleaned text length, in characters
    pub min_text:    usize,
    /// Minimum number of dupes per AnswerId
    pub min_dupes:   usize,
    /// Candidates per training dupe: 1 match + (match - 1) negatives
    #[serde(rename = "match")]
    pub match_count: usize,
    /// Diagnostics only; never changes the data
    pub show_output: bool,
    /// Fixed RNG seed; None seeds from entropy
    pub seed:        Option<u64>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir:  "data_folder".to_string(),
            test_size:   0.21,
            min_text:    150,
            min_dupes:   12,
            match_count: 20,
            show_output: true,
            seed:        None,
        }
    }
}

impl BuildConfig {
    /// Reject parameters the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.test_size > 0.0 && self.test_size <= 1.0,
            "test_size must be in (0, 1], got {}",
            self.test_size
        );
        ensure!(self.match_count >= 1, "match must be at least 1");
        ensure!(self.min_dupes >= 1, "min_dupes must be at least 1");
        Ok(())
    }

    /// True when both configs produce the same kind of dataset.
    /// Output location and verbosity are ignored.
    pub fn same_dataset(&self, other: &BuildConfig) -> bool {
        self.test_size == other.test_size
            && self.min_text == other.min_text
            && self.min_dupes == other.min_dupes
            && self.match_count == other.match_count
            && self.seed == other.seed
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        }
    }
}

// ─── BuildUseCase ─────────────────────────────────────────────────────────────
pub struct BuildUseCase {
    config: BuildConfig,
    source: Box<dyn CorpusSource>,
}

impl BuildUseCase {
    pub fn new(config: BuildConfig, source: Box<dyn CorpusSource>) -> Self {
        Self { config, source }
    }

    /// Build (or load) the dataset, reporting according to `show_output`.
    pub fn execute(&self) -> Result<CachedDataset> {
        let reporter = reporter_for(self.config.show_output);
        self.execute_with(reporter.as_ref())
    }

    /// Build (or load) the dataset, sending diagnostics to `reporter`.
    pub fn execute_with(&self, reporter: &dyn Reporter) -> Result<CachedDataset> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 0: Cache lookup ─────────────────────────────────────────────
        let store = DatasetStore::new(&cfg.output_dir);
        if let Some(cached) = store.lookup_cached()? {
            let saved = store.load_config()?;
            let stale = saved.as_ref().is_some_and(|saved| !saved.same_dataset(cfg));
            if stale {
                tracing::warn!(
                    "Cached dataset in '{}' was built with different parameters \
                     ({:?}); delete it to rebuild",
                    store.dir().display(),
                    saved
                );
            }
            reporter.report(&PipelineEvent::CacheHit {
                dir:        store.dir(),
                questions:  cached.questions.len(),
                dupes_test: cached.dupes_test.len(),
                stale,
            });
            return Ok(cached);
        }

        // ── Step 1: Fetch ─────────────────────────────────────────────────────
        let raw = self.source.load()?;
        report_fetched(&raw, reporter);

        // ── Step 2: Clean ─────────────────────────────────────────────────────
        let clean = clean_corpus(raw, cfg.min_text, cfg.min_dupes, reporter)?;
        tracing::info!(
            "Cleaned corpus: {} questions, {} dupes (label column '{}')",
            clean.questions.len(),
            clean.dupes.len(),
            clean.label_column
        );

        // ── Step 3: Split, every class present in test ───────────────────────
        let mut rng = cfg.rng();
        let (dupes_test, dupes_train) = split_dupes(&clean.dupes, cfg.test_size, &mut rng)?;

        // ── Step 4: Pairs ─────────────────────────────────────────────────────
        let pairs_train = build_pairs(&dupes_train, &clean.questions, cfg.match_count, &mut rng);
        reporter.report(&PipelineEvent::PairsBuilt {
            name:       "balanced_pairs_train",
            rows:       pairs_train.len(),
            match_rate: match_rate(&pairs_train),
        });

        let pairs_test =
            build_pairs(&dupes_test, &clean.questions, clean.questions.len(), &mut rng);
        reporter.report(&PipelineEvent::PairsBuilt {
            name:       "balanced_pairs_test",
            rows:       pairs_test.len(),
            match_rate: match_rate(&pairs_test),
        });

        // ── Step 5: Persist ───────────────────────────────────────────────────
        store.save_config(cfg)?;
        store.save(
            &DatasetTables {
                pairs_train: &pairs_train,
                pairs_test:  &pairs_test,
                questions:   &clean.questions,
                dupes_test:  &dupes_test,
            },
            reporter,
        )?;

        Ok(CachedDataset { questions: clean.questions, dupes_test })
    }
}

fn report_fetched(raw: &RawCorpus, reporter: &dyn Reporter) {
    reporter.report(&PipelineEvent::Fetched {
        questions: raw.questions.len(),
        dupes:     raw.dupes.len(),
        answers:   raw.answers.len(),
    });

    if let Some(first) = raw.questions.first() {
        reporter.report(&PipelineEvent::SampleRows {
            answer_id:     first.answer_id,
            question_text: &first.text0,
            dupes:         raw.dupes.iter().filter(|d| d.answer_id == first.answer_id).count(),
            answer_text:   raw
                .answers
                .iter()
                .find(|a| a.id == first.answer_id)
                .map(|a| a.text0.as_str()),
        });
    }
}

// ============================================================
// Layer 2 — Inspect Use Case
// ============================================================
// Looks at an output directory without building anything:
// whether a cached dataset is there, how big it is, and which
// parameters produced it.

use anyhow::Result;
use std::collections::HashSet;

use crate::application::build_use_case::BuildConfig;
use crate::infra::store::DatasetStore;

/// What a cached dataset contains.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub questions:  usize,
    pub dupes_test: usize,
    /// Distinct AnswerIds among the test dupes
    pub classes:    usize,
    pub config:     Option<BuildConfig>,
}

pub struct InspectUseCase {
    store: DatasetStore,
}

impl InspectUseCase {
    pub fn new(output_dir: impl Into<String>) -> Self {
        Self { store: DatasetStore::new(output_dir.into()) }
    }

    /// `None` when the directory holds no cached dataset.
    pub fn summarize(&self) -> Result<Option<DatasetSummary>> {
        let Some(cached) = self.store.lookup_cached()? else {
            return Ok(None);
        };

        let classes: HashSet<_> = cached.dupes_test.iter().map(|d| d.answer_id).collect();
        Ok(Some(DatasetSummary {
            questions:  cached.questions.len(),
            dupes_test: cached.dupes_test.len(),
            classes:    classes.len(),
            config:     self.store.load_config()?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::Post;
    use crate::infra::reporter::SilentReporter;
    use crate::infra::store::DatasetTables;

    #[test]
    fn test_empty_dir_has_no_summary() {
        let dir = tempfile::tempdir().unwrap();
        let uc = InspectUseCase::new(dir.path().display().to_string());
        assert_eq!(uc.summarize().unwrap(), None);
    }

    #[test]
    fn test_summary_counts_classes() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path());
        let questions  = vec![Post::new(1, 100, "q", "d"), Post::new(2, 200, "q", "d")];
        let dupes_test = vec![
            Post::new(5, 100, "d", "d"),
            Post::new(6, 100, "d", "d"),
            Post::new(7, 200, "d", "d"),
        ];
        store
            .save(
                &DatasetTables {
                    pairs_train: &[],
                    pairs_test:  &[],
                    questions:   &questions,
                    dupes_test:  &dupes_test,
                },
                &SilentReporter,
            )
            .unwrap();

        let summary = InspectUseCase::new(dir.path().display().to_string())
            .summarize()
            .unwrap()
            .unwrap();
        assert_eq!(summary.questions, 2);
        assert_eq!(summary.dupes_test, 3);
        assert_eq!(summary.classes, 2);
        assert!(summary.config.is_none());
    }
}

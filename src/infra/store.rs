// ============================================================
// Layer 6 — Dataset Store
// ============================================================
// Reads and writes the dataset files in the output directory.
//
// File layout:
//   data_folder/
//     balanced_pairs_train.tsv  ← training pairs
//     balanced_pairs_test.tsv   ← exhaustive test pairs
//     questions.tsv             ← cleaned questions (for scoring)
//     dupes_test.tsv            ← held-out dupes   (for scoring)
//     build_config.json         ← parameters that produced them
//
// All TSVs are tab separated with a header row and no index
// column. questions.tsv and dupes_test.tsv double as the cache:
// when both exist, `lookup_cached` returns them and the
// pipeline is skipped.
//
// Every TSV is written to `<name>.tmp` and renamed into place
// once flushed, so a final name only ever holds a complete
// file. dupes_test.tsv is renamed last: until it appears, the
// directory is not a cache.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::build_use_case::BuildConfig;
use crate::domain::events::PipelineEvent;
use crate::domain::pair::Pair;
use crate::domain::post::Post;
use crate::domain::traits::Reporter;

pub const QUESTIONS_FILE:   &str = "questions.tsv";
pub const DUPES_TEST_FILE:  &str = "dupes_test.tsv";
pub const PAIRS_TRAIN_FILE: &str = "balanced_pairs_train.tsv";
pub const PAIRS_TEST_FILE:  &str = "balanced_pairs_test.tsv";
pub const CONFIG_FILE:      &str = "build_config.json";

/// The two tables handed back to callers, cached or fresh.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedDataset {
    pub questions:  Vec<Post>,
    pub dupes_test: Vec<Post>,
}

/// Everything a pipeline run writes.
pub struct DatasetTables<'a> {
    pub pairs_train: &'a [Pair],
    pub pairs_test:  &'a [Pair],
    pub questions:   &'a [Post],
    pub dupes_test:  &'a [Post],
}

pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Return the cached questions and test dupes when both files exist.
    pub fn lookup_cached(&self) -> Result<Option<CachedDataset>> {
        let questions_path  = self.path(QUESTIONS_FILE);
        let dupes_test_path = self.path(DUPES_TEST_FILE);

        if !(questions_path.is_file() && dupes_test_path.is_file()) {
            return Ok(None);
        }

        tracing::debug!("Cache hit in '{}'", self.dir.display());
        Ok(Some(CachedDataset {
            questions:  read_tsv(&questions_path)?,
            dupes_test: read_tsv(&dupes_test_path)?,
        }))
    }

    /// Write all four tables, creating the directory if needed.
    pub fn save(&self, tables: &DatasetTables<'_>, reporter: &dyn Reporter) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        self.write(PAIRS_TRAIN_FILE, &Pair::COLUMNS, tables.pairs_train, reporter)?;
        self.write(PAIRS_TEST_FILE, &Pair::COLUMNS, tables.pairs_test, reporter)?;
        self.write(QUESTIONS_FILE, &Post::COLUMNS, tables.questions, reporter)?;
        self.write(DUPES_TEST_FILE, &Post::COLUMNS, tables.dupes_test, reporter)?;
        Ok(())
    }

    fn write<T: Serialize>(
        &self,
        file:     &str,
        columns:  &[&str],
        rows:     &[T],
        reporter: &dyn Reporter,
    ) -> Result<()> {
        let path = self.path(file);
        reporter.report(&PipelineEvent::Written { path: &path, rows: rows.len() });
        write_tsv(&path, columns, rows)
    }

    /// Save the parameters of the run next to its outputs.
    pub fn save_config(&self, cfg: &BuildConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        let path = self.path(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved build config to '{}'", path.display());
        Ok(())
    }

    /// Load the saved parameters, if a previous run left them.
    pub fn load_config(&self) -> Result<Option<BuildConfig>> {
        let path = self.path(CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let cfg = serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))?;
        Ok(Some(cfg))
    }
}

/// Write rows as TSV. The header is written even when `rows` is empty.
///
/// The rows go to a sibling `.tmp` file first, which is renamed over
/// `path` only after a successful flush.
pub fn write_tsv<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
    let tmp = tmp_path(path);
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(&tmp)
        .with_context(|| format!("Cannot create '{}'", tmp.display()))?;

    wtr.write_record(columns)?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("Cannot write row to '{}'", tmp.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("Cannot flush '{}'", tmp.display()))?;
    drop(wtr);

    fs::rename(&tmp, path)
        .with_context(|| format!("Cannot move '{}' into place", tmp.display()))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read a TSV with a header row into typed rows.
pub fn read_tsv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;

    let rows = rdr
        .deserialize()
        .enumerate()
        .map(|(row, rec)| {
            rec.with_context(|| format!("Bad row {} in '{}'", row + 1, path.display()))
        })
        .collect::<Result<Vec<T>>>()?;
    Ok(rows)
}

// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Fetches the three gzip-compressed TSV tables of the dump and
// parses them into Posts and Answers.
//
// File layout (tab separated, no header row):
//   orig-q.tsv.gz  → Id  AnswerId  Text0  CreationDate
//   dup-q.tsv.gz   → Id  AnswerId  Text0  CreationDate
//   ans.tsv.gz     → Id  Text0
//
// Two sources share the same parser:
//   HttpCorpusSource  → downloads from the public blob store
//   LocalCorpusSource → reads the same file names from a directory
//
// One row per line: quote characters are ordinary text, and a
// row with the wrong number of columns is an error naming the
// row. Bytes that are not valid UTF-8 are replaced rather than
// rejected; an Id that does not parse as an integer is an error.
//
// Reference: reqwest (blocking) and flate2 crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{anyhow, ensure, Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use flate2::read::MultiGzDecoder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::domain::post::{Answer, Post, PostId, RawCorpus};
use crate::domain::traits::CorpusSource;

/// Where the public copy of the dump lives
pub const DEFAULT_BASE_URL: &str = "https://bostondata.blob.core.windows.net/stackoverflow";

pub const QUESTIONS_FILE: &str = "orig-q.tsv.gz";
pub const DUPES_FILE:     &str = "dup-q.tsv.gz";
pub const ANSWERS_FILE:   &str = "ans.tsv.gz";

// ─── HTTP source ──────────────────────────────────────────────────────────────

/// Downloads the three tables over HTTP. One attempt per file.
pub struct HttpCorpusSource {
    base_url: String,
    client:   reqwest::blocking::Client,
}

impl HttpCorpusSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        // The dump is large; no overall request timeout.
        let client = reqwest::blocking::Client::builder()
            .timeout(Option::<Duration>::None)
            .build()
            .context("Cannot build HTTP client")?;
        Ok(Self { base_url: base_url.into(), client })
    }

    fn url_for(&self, file: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), file)
    }

    /// Open a streaming download; the body is read while it is decompressed.
    fn fetch(&self, file: &str) -> Result<reqwest::blocking::Response> {
        let url = self.url_for(file);
        tracing::info!("Downloading {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Request to '{url}' failed"))?
            .error_for_status()
            .with_context(|| format!("Server rejected '{url}'"))?;

        if let Some(len) = response.content_length() {
            tracing::debug!("Streaming {} bytes from {}", len, url);
        }
        Ok(response)
    }
}

impl CorpusSource for HttpCorpusSource {
    fn load(&self) -> Result<RawCorpus> {
        let questions = parse_posts(MultiGzDecoder::new(self.fetch(QUESTIONS_FILE)?))
            .with_context(|| format!("Cannot parse {QUESTIONS_FILE}"))?;
        let dupes = parse_posts(MultiGzDecoder::new(self.fetch(DUPES_FILE)?))
            .with_context(|| format!("Cannot parse {DUPES_FILE}"))?;
        let answers = parse_answers(MultiGzDecoder::new(self.fetch(ANSWERS_FILE)?))
            .with_context(|| format!("Cannot parse {ANSWERS_FILE}"))?;

        Ok(RawCorpus { questions, dupes, answers })
    }
}

// ─── Local source ─────────────────────────────────────────────────────────────

/// Reads previously downloaded copies of the three files.
pub struct LocalCorpusSource {
    dir: PathBuf,
}

impl LocalCorpusSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn open(&self, file: &str) -> Result<MultiGzDecoder<BufReader<File>>> {
        let path = self.dir.join(file);
        let f = File::open(&path)
            .with_context(|| format!("Cannot open '{}'", path.display()))?;
        Ok(MultiGzDecoder::new(BufReader::new(f)))
    }
}

impl CorpusSource for LocalCorpusSource {
    fn load(&self) -> Result<RawCorpus> {
        tracing::info!("Reading corpus from '{}'", self.dir.display());

        let questions = parse_posts(self.open(QUESTIONS_FILE)?)
            .with_context(|| format!("Cannot parse {}", display(&self.dir, QUESTIONS_FILE)))?;
        let dupes = parse_posts(self.open(DUPES_FILE)?)
            .with_context(|| format!("Cannot parse {}", display(&self.dir, DUPES_FILE)))?;
        let answers = parse_answers(self.open(ANSWERS_FILE)?)
            .with_context(|| format!("Cannot parse {}", display(&self.dir, ANSWERS_FILE)))?;

        Ok(RawCorpus { questions, dupes, answers })
    }
}

fn display(dir: &Path, file: &str) -> String {
    dir.join(file).display().to_string()
}

// ─── Parsing ──────────────────────────────────────────────────────────────────

const POST_COLUMNS:   usize = 4;
const ANSWER_COLUMNS: usize = 2;

// Column counts are checked per row in `expect_columns`.
fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader)
}

/// Parse decompressed question or duplicate rows.
pub fn parse_posts<R: Read>(reader: R) -> Result<Vec<Post>> {
    let mut rdr   = tsv_reader(reader);
    let mut posts = Vec::new();

    for (row, record) in rdr.byte_records().enumerate() {
        let record    = record.with_context(|| format!("Malformed row {}", row + 1))?;
        expect_columns(&record, POST_COLUMNS, row)?;
        let id        = parse_id(&record, 0, "Id", row)?;
        let answer_id = parse_id(&record, 1, "AnswerId", row)?;
        posts.push(Post::new(id, answer_id, field(&record, 2), field(&record, 3)));
    }

    Ok(posts)
}

/// Parse decompressed answer rows.
pub fn parse_answers<R: Read>(reader: R) -> Result<Vec<Answer>> {
    let mut rdr     = tsv_reader(reader);
    let mut answers = Vec::new();

    for (row, record) in rdr.byte_records().enumerate() {
        let record = record.with_context(|| format!("Malformed row {}", row + 1))?;
        expect_columns(&record, ANSWER_COLUMNS, row)?;
        let id     = parse_id(&record, 0, "Id", row)?;
        answers.push(Answer::new(id, field(&record, 1)));
    }

    Ok(answers)
}

fn expect_columns(record: &ByteRecord, expected: usize, row: usize) -> Result<()> {
    ensure!(
        record.len() == expected,
        "Row {}: expected {} columns, found {}",
        row + 1,
        expected,
        record.len()
    );
    Ok(())
}

fn field(record: &ByteRecord, index: usize) -> String {
    record
        .get(index)
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
        .unwrap_or_default()
}

fn parse_id(record: &ByteRecord, index: usize, column: &str, row: usize) -> Result<PostId> {
    let raw = record
        .get(index)
        .ok_or_else(|| anyhow!("Row {}: missing {} column", row + 1, column))?;
    let text = String::from_utf8_lossy(raw);
    text.trim()
        .parse::<PostId>()
        .with_context(|| format!("Row {}: {} '{}' is not an integer", row + 1, column, text))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    fn gzip(text: &str) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(text.as_bytes()).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn test_parse_posts_from_gzip() {
        let bytes = gzip("1\t100\t<p>What is X?</p>\t2010-01-01\n2\t200\tOther\t2011-02-02\n");
        let posts = parse_posts(MultiGzDecoder::new(&bytes[..])).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, 1);
        assert_eq!(posts[0].answer_id, 100);
        assert_eq!(posts[0].text0, "<p>What is X?</p>");
        assert_eq!(posts[1].creation_date, "2011-02-02");
    }

    #[test]
    fn test_parse_answers() {
        let answers = parse_answers("100\tUse Y.\n200\t\n".as_bytes()).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].text0, "Use Y.");
        assert_eq!(answers[1].text0, "");
    }

    #[test]
    fn test_short_row_is_an_error_naming_the_row() {
        let err = parse_posts("1\t100\tok\td\n3\t300\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Row 2: expected 4 columns, found 2"));
    }

    #[test]
    fn test_embedded_tab_is_an_error() {
        let err = parse_answers("100\tUse\tY\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Row 1: expected 2 columns, found 3"));
    }

    #[test]
    fn test_unbalanced_quote_does_not_swallow_later_rows() {
        let raw = "1\t100\t\"Why does this fail\t2010\n2\t200\tsecond body\t2011\n3\t300\tthird\t2012\n";
        let posts = parse_posts(raw.as_bytes()).unwrap();
        assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(posts[0].text0, "\"Why does this fail");
        assert_eq!(posts[0].creation_date, "2010");
        assert_eq!(posts[2].text0, "third");
    }

    #[test]
    fn test_non_numeric_id_is_an_error() {
        let err = parse_posts("abc\t100\ttext\tdate\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Id 'abc'"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut raw = b"4\t400\t".to_vec();
        raw.extend_from_slice(&[0x66, 0xff, 0x6f]);
        raw.extend_from_slice(b"\td\n");
        let posts = parse_posts(&raw[..]).unwrap();
        assert_eq!(posts[0].text0, "f\u{FFFD}o");
    }

    #[test]
    fn test_local_source_reads_three_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(QUESTIONS_FILE), gzip("1\t100\tq\td\n")).unwrap();
        std::fs::write(dir.path().join(DUPES_FILE), gzip("5\t100\tdup\td\n")).unwrap();
        std::fs::write(dir.path().join(ANSWERS_FILE), gzip("100\tans\n")).unwrap();

        let corpus = LocalCorpusSource::new(dir.path()).load().unwrap();
        assert_eq!(corpus.questions.len(), 1);
        assert_eq!(corpus.dupes[0].id, 5);
        assert_eq!(corpus.answers[0].id, 100);
    }

    #[test]
    fn test_local_source_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalCorpusSource::new(dir.path()).load().is_err());
    }

    #[test]
    fn test_url_for_joins_without_double_slash() {
        let src = HttpCorpusSource::new("https://example.org/so/").unwrap();
        assert_eq!(src.url_for(DUPES_FILE), "https://example.org/so/dup-q.tsv.gz");
    }
}

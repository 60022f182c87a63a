// ============================================================
// Layer 3 — Post and Answer Domain Types
// ============================================================
// The Stack Overflow dump ships three tables:
//
//   orig-q.tsv.gz  → canonical questions   (Id, AnswerId, Text0, CreationDate)
//   dup-q.tsv.gz   → duplicate questions   (Id, AnswerId, Text0, CreationDate)
//   ans.tsv.gz     → accepted answers      (Id, Text0)
//
// Questions and duplicates have the same shape, so both are a
// `Post`. A duplicate points at its canonical question through
// the shared AnswerId.
//
// The serde names match the TSV headers written to disk, so the
// same struct is used for questions.tsv and dupes_test.tsv.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// Identifier of a post or answer in the dump.
pub type PostId = u64;

/// Name of the column used as the class label for splitting.
pub const LABEL_COLUMN: &str = "AnswerId";

/// A question or a duplicate question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Post {
    /// Unique key of the post
    pub id: PostId,

    /// The accepted answer this post resolves to.
    /// Duplicates share it with their canonical question.
    pub answer_id: PostId,

    /// Raw HTML body as found in the dump
    pub text0: String,

    pub creation_date: String,

    /// Lowercased, markup-free version of `text0`.
    /// Empty until the cleaning stage fills it in.
    #[serde(default)]
    pub text: String,
}

impl Post {
    /// Column order of questions.tsv and dupes_test.tsv
    pub const COLUMNS: [&'static str; 5] = ["Id", "AnswerId", "Text0", "CreationDate", "Text"];

    /// Create a post with no cleaned text yet.
    pub fn new(
        id:            PostId,
        answer_id:     PostId,
        text0:         impl Into<String>,
        creation_date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            answer_id,
            text0:         text0.into(),
            creation_date: creation_date.into(),
            text:          String::new(),
        }
    }

    /// Length of the cleaned text in characters
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// An accepted answer. Only its key matters downstream, but the
/// text is cleaned too so empty answers can be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub id:    PostId,
    pub text0: String,
    pub text:  String,
}

impl Answer {
    pub fn new(id: PostId, text0: impl Into<String>) -> Self {
        Self { id, text0: text0.into(), text: String::new() }
    }

    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// The three raw tables exactly as fetched.
#[derive(Debug, Clone, Default)]
pub struct RawCorpus {
    pub questions: Vec<Post>,
    pub dupes:     Vec<Post>,
    pub answers:   Vec<Answer>,
}

/// Questions and duplicates after cleaning and restriction.
///
/// Every AnswerId among `questions` also appears among `dupes`
/// and vice versa.
#[derive(Debug, Clone)]
pub struct CleanCorpus {
    pub questions:    Vec<Post>,
    pub dupes:        Vec<Post>,
    pub label_column: &'static str,
}

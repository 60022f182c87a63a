// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Turns the raw HTML body of a post (`Text0`) into the plain,
// lowercase `Text` column used for length filtering and pairing.
//
// Stack Overflow bodies contain:
//   - <pre><code> blocks with pasted source code
//   - <a href=...> links, sometimes with the bare URL as text
//   - formatting tags (<p>, <em>, <strong>, <ul>, ...)
//
// Cleaning steps (applied in order):
//   1. Drop whole <pre><code>...</code></pre> blocks
//   2. Replace links by their text, or drop them when the
//      text is itself a URL
//   3. Remove every remaining tag
//   4. Lowercase
//
// HTML entities are left alone.
//
// Reference: regex crate documentation

use std::sync::LazyLock;

use regex::{Captures, Regex};

static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<pre><code>.*?</code></pre>").expect("code block regex")
});

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<a[^>]+>(.*?)</a>").expect("link regex"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+://").expect("url regex"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Strip markup and lowercase. Takes a &str and returns an owned String.
    pub fn clean(&self, text: &str) -> String {
        self.strip_markup(text).to_lowercase()
    }

    /// Strip markup without changing case.
    pub fn strip_markup(&self, text: &str) -> String {
        let without_code  = CODE_BLOCK_RE.replace_all(text, "");
        let without_links = LINK_RE.replace_all(&without_code, |caps: &Captures| {
            let inner = &caps[1];
            if URL_RE.is_match(inner) {
                String::new()
            } else {
                inner.to_string()
            }
        });
        TAG_RE.replace_all(&without_links, "").into_owned()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

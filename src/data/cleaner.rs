// ============================================================
// Layer 4 — Corpus Cleaner
// ============================================================
// Reduces the raw dump to a consistent set of questions and
// duplicates that is worth pairing.
//
// Steps (applied in order):
//   1. Compute cleaned `text` for every row, drop empty ones
//   2. Drop duplicates whose Id is also a question Id
//   3. Drop repeated Ids (first occurrence wins)
//   4. Referential closure:
//        questions → must have an answer and at least one dupe
//        answers   → must be referenced by a kept question
//        dupes     → must point at a kept question
//   5. Check integrity in both directions
//   6. Apply `min_text` to questions and dupes
//   7. Closure again on the AnswerIds both sides still share
//   8. Keep AnswerIds with at least `min_dupes` dupes
//   9. Check that both sides carry the same AnswerId set
//
// Every filter keys on the explicit `id` / `answer_id` fields.
// An integrity failure means the filters disagree with each
// other; it stops the run.

use anyhow::{ensure, Result};
use std::collections::HashSet;

use crate::data::preprocessor::Preprocessor;
use crate::domain::events::{PipelineEvent, Stage};
use crate::domain::post::{Answer, CleanCorpus, Post, PostId, RawCorpus, LABEL_COLUMN};
use crate::domain::summary::{largest_class_share, value_counts, Summary};
use crate::domain::traits::Reporter;

/// Clean, de-duplicate and restrict the raw tables.
///
/// # Arguments
/// * `raw`       - questions, dupes and answers as fetched
/// * `min_text`  - minimum cleaned text length, in characters, for questions and dupes
/// * `min_dupes` - minimum number of dupes an AnswerId needs to be kept
/// * `reporter`  - receives the cleaning sample and the before/after statistics
///
/// # Returns
/// Questions and dupes that share exactly the same AnswerId set, with `text`
/// filled in. Filtering everything away is not an error; an integrity
/// violation between the tables is.
///
/// # Example
/// ```
/// let clean = clean_corpus(raw, 150, 12, &TracingReporter)?;
/// assert_eq!(clean.label_column, "AnswerId");
/// ```
pub fn clean_corpus(
    raw:       RawCorpus,
    min_text:  usize,
    min_dupes: usize,
    reporter:  &dyn Reporter,
) -> Result<CleanCorpus> {
    let RawCorpus { mut questions, mut dupes, mut answers } = raw;

    // ── Step 1: Clean text, drop rows with nothing left ──────────────────────
    let prep = Preprocessor::new();
    for post in questions.iter_mut().chain(dupes.iter_mut()) {
        post.text = prep.clean(&post.text0);
    }
    for answer in answers.iter_mut() {
        answer.text = prep.clean(&answer.text0);
    }
    questions.retain(|q| !q.text.is_empty());
    dupes.retain(|d| !d.text.is_empty());
    answers.retain(|a| !a.text.is_empty());

    if let Some(first) = questions.first() {
        reporter.report(&PipelineEvent::CleanedSample {
            id:         first.id,
            raw_text:   &first.text0,
            clean_text: &first.text,
        });
    }

    // ── Step 2: A post is either a question or a dupe, not both ──────────────
    let question_ids: HashSet<PostId> = questions.iter().map(|q| q.id).collect();
    dupes.retain(|d| !question_ids.contains(&d.id));

    // ── Step 3: Unique keys ───────────────────────────────────────────────────
    dedup_by_id(&mut questions, |q| q.id);
    dedup_by_id(&mut dupes, |d| d.id);
    dedup_by_id(&mut answers, |a| a.id);

    // ── Step 4: Referential closure ───────────────────────────────────────────
    let answer_ids: HashSet<PostId> = answers.iter().map(|a| a.id).collect();
    let dupe_classes = answer_id_set(&dupes);
    questions.retain(|q| answer_ids.contains(&q.answer_id) && dupe_classes.contains(&q.answer_id));

    let question_classes = answer_id_set(&questions);
    answers.retain(|a| question_classes.contains(&a.id));
    dupes.retain(|d| question_classes.contains(&d.answer_id));

    // ── Step 5: Integrity ─────────────────────────────────────────────────────
    verify_integrity(&answers, &dupes, &questions)?;

    report_text_statistics(
        reporter,
        Stage::Closure,
        vec![
            ("questions", Summary::describe(questions.iter().map(Post::text_len))),
            ("answers", Summary::describe(answers.iter().map(Answer::text_len))),
            ("dupes", Summary::describe(dupes.iter().map(Post::text_len))),
        ],
    );
    report_duplication(reporter, Stage::Closure, &dupes);

    // ── Step 6: Minimum text length ───────────────────────────────────────────
    questions.retain(|q| q.text_len() >= min_text);
    dupes.retain(|d| d.text_len() >= min_text);

    // ── Step 7: Closure on shared classes ─────────────────────────────────────
    let dupe_classes = answer_id_set(&dupes);
    questions.retain(|q| dupe_classes.contains(&q.answer_id));
    let question_classes = answer_id_set(&questions);
    dupes.retain(|d| question_classes.contains(&d.answer_id));

    // ── Step 8: Minimum duplicates per class ─────────────────────────────────
    let kept: HashSet<PostId> = value_counts(dupes.iter().map(|d| d.answer_id))
        .into_iter()
        .filter(|(_, count)| *count >= min_dupes)
        .map(|(class, _)| class)
        .collect();
    questions.retain(|q| kept.contains(&q.answer_id));
    dupes.retain(|d| kept.contains(&d.answer_id));

    // ── Step 9: Both sides carry the same classes ────────────────────────────
    let question_classes = answer_id_set(&questions);
    let dupe_classes     = answer_id_set(&dupes);
    ensure!(
        question_classes.is_subset(&dupe_classes),
        "Integrity: {} question class(es) have no remaining dupes",
        question_classes.difference(&dupe_classes).count()
    );
    ensure!(
        dupe_classes.is_subset(&question_classes),
        "Integrity: {} dupe class(es) have no remaining question",
        dupe_classes.difference(&question_classes).count()
    );

    reporter.report(&PipelineEvent::Restrictions { min_text, min_dupes });
    report_text_statistics(
        reporter,
        Stage::Restricted,
        vec![
            ("questions", Summary::describe(questions.iter().map(Post::text_len))),
            ("dupes", Summary::describe(dupes.iter().map(Post::text_len))),
        ],
    );
    report_duplication(reporter, Stage::Restricted, &dupes);

    tracing::debug!(
        "Cleaning kept {} questions and {} dupes across {} classes",
        questions.len(),
        dupes.len(),
        question_classes.len()
    );

    Ok(CleanCorpus { questions, dupes, label_column: LABEL_COLUMN })
}

/// Check the question/answer and question/dupe links in both directions.
pub fn verify_integrity(answers: &[Answer], dupes: &[Post], questions: &[Post]) -> Result<()> {
    let answer_ids: HashSet<PostId> = answers.iter().map(|a| a.id).collect();
    let question_classes = answer_id_set(questions);
    let dupe_classes     = answer_id_set(dupes);

    ensure!(
        question_classes.is_subset(&answer_ids),
        "Integrity: a question references a missing answer"
    );
    ensure!(
        answer_ids.is_subset(&question_classes),
        "Integrity: an answer is not referenced by any question"
    );
    ensure!(
        question_classes.is_subset(&dupe_classes),
        "Integrity: a question has no dupes"
    );
    ensure!(
        dupe_classes.is_subset(&question_classes),
        "Integrity: a dupe has no matching question"
    );
    Ok(())
}

fn answer_id_set(posts: &[Post]) -> HashSet<PostId> {
    posts.iter().map(|p| p.answer_id).collect()
}

fn dedup_by_id<T>(rows: &mut Vec<T>, id: impl Fn(&T) -> PostId) {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.retain(|row| seen.insert(id(row)));
}

fn report_text_statistics(
    reporter: &dyn Reporter,
    stage:    Stage,
    tables:   Vec<(&'static str, Summary)>,
) {
    reporter.report(&PipelineEvent::TextStatistics { stage, tables });
}

fn report_duplication(reporter: &dyn Reporter, stage: Stage, dupes: &[Post]) {
    let counts = value_counts(dupes.iter().map(|d| d.answer_id));
    reporter.report(&PipelineEvent::DuplicationStatistics {
        stage,
        summary:       Summary::describe(counts.values().copied()),
        largest_class: largest_class_share(&counts),
    });
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::reporter::{RecordingReporter, SilentReporter};

    fn post(id: PostId, answer_id: PostId, text: &str) -> Post {
        Post::new(id, answer_id, text, "2015-01-01")
    }

    fn corpus(questions: Vec<Post>, dupes: Vec<Post>, answers: Vec<Answer>) -> RawCorpus {
        RawCorpus { questions, dupes, answers }
    }

    #[test]
    fn test_single_match_survives_with_no_thresholds() {
        let raw = corpus(
            vec![post(1, 100, "What is X?")],
            vec![post(5, 100, "What is X?")],
            vec![Answer::new(100, "X is Y.")],
        );
        let clean = clean_corpus(raw, 0, 1, &SilentReporter).unwrap();
        assert_eq!(clean.questions.len(), 1);
        assert_eq!(clean.dupes.len(), 1);
        assert_eq!(clean.dupes[0].text, "what is x?");
        assert_eq!(clean.label_column, "AnswerId");
    }

    #[test]
    fn test_first_cleaned_question_is_reported() {
        let raw = corpus(
            vec![post(1, 100, "<pre><code>only code</code></pre>"), post(2, 200, "<p>Real <b>Q</b></p>")],
            vec![post(6, 200, "dupe")],
            vec![Answer::new(200, "b")],
        );
        let rec = RecordingReporter::default();
        clean_corpus(raw, 0, 1, &rec).unwrap();

        assert_eq!(rec.count("CleanedSample"), 1);
        let events = rec.events.borrow();
        assert!(events[0].contains("id: 2"));
        assert!(events[0].contains("raw_text: \"<p>Real <b>Q</b></p>\""));
        assert!(events[0].contains("clean_text: \"real q\""));
    }

    #[test]
    fn test_empty_text_rows_dropped() {
        let raw = corpus(
            vec![post(1, 100, "<pre><code>only code</code></pre>"), post(2, 200, "real")],
            vec![post(5, 100, "dupe"), post(6, 200, "dupe")],
            vec![Answer::new(100, "a"), Answer::new(200, "b")],
        );
        let clean = clean_corpus(raw, 0, 1, &SilentReporter).unwrap();
        let ids: Vec<PostId> = clean.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![2]);
        // dupe 5 lost its question
        assert_eq!(clean.dupes.iter().map(|d| d.id).collect::<Vec<_>>(), vec![6]);
    }

    #[test]
    fn test_dupe_sharing_question_id_removed() {
        let raw = corpus(
            vec![post(1, 100, "question")],
            vec![post(1, 100, "same id"), post(5, 100, "dupe")],
            vec![Answer::new(100, "a")],
        );
        let clean = clean_corpus(raw, 0, 1, &SilentReporter).unwrap();
        assert_eq!(clean.dupes.len(), 1);
        assert_eq!(clean.dupes[0].id, 5);
    }

    #[test]
    fn test_repeated_ids_keep_first() {
        let raw = corpus(
            vec![post(1, 100, "first"), post(1, 100, "second")],
            vec![post(5, 100, "dupe a"), post(5, 100, "dupe b")],
            vec![Answer::new(100, "a"), Answer::new(100, "again")],
        );
        let clean = clean_corpus(raw, 0, 1, &SilentReporter).unwrap();
        assert_eq!(clean.questions.len(), 1);
        assert_eq!(clean.questions[0].text, "first");
        assert_eq!(clean.dupes.len(), 1);
        assert_eq!(clean.dupes[0].text, "dupe a");
    }

    #[test]
    fn test_question_without_answer_or_dupes_dropped() {
        let raw = corpus(
            vec![post(1, 100, "has all"), post(2, 200, "no answer"), post(3, 300, "no dupes")],
            vec![post(5, 100, "d"), post(6, 200, "d")],
            vec![Answer::new(100, "a"), Answer::new(300, "c")],
        );
        let clean = clean_corpus(raw, 0, 1, &SilentReporter).unwrap();
        assert_eq!(clean.questions.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(clean.dupes.iter().map(|d| d.id).collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_min_text_and_min_dupes() {
        let long = "x".repeat(20);
        let raw = corpus(
            vec![post(1, 100, &long), post(2, 200, &long), post(3, 300, "short")],
            vec![
                post(10, 100, &long),
                post(11, 100, &long),
                post(12, 100, "tiny"),
                post(20, 200, &long),
                post(30, 300, &long),
                post(31, 300, &long),
            ],
            vec![Answer::new(100, "a"), Answer::new(200, "b"), Answer::new(300, "c")],
        );
        let clean = clean_corpus(raw, 20, 2, &SilentReporter).unwrap();

        // class 200 has one dupe, class 300 lost its question to min_text
        assert_eq!(clean.questions.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(clean.dupes.iter().map(|d| d.id).collect::<Vec<_>>(), vec![10, 11]);
        assert!(clean.dupes.iter().all(|d| d.text_len() >= 20));
    }

    #[test]
    fn test_everything_filtered_is_not_an_error() {
        let raw = corpus(
            vec![post(1, 100, "q")],
            vec![post(5, 100, "d")],
            vec![Answer::new(100, "a")],
        );
        let clean = clean_corpus(raw, 0, 5, &SilentReporter).unwrap();
        assert!(clean.questions.is_empty());
        assert!(clean.dupes.is_empty());
    }

    #[test]
    fn test_verify_integrity_detects_orphans() {
        let questions = vec![post(1, 100, "q")];
        let dupes     = vec![post(5, 100, "d"), post(6, 999, "orphan")];
        let answers   = vec![Answer::new(100, "a")];
        let err = verify_integrity(&answers, &dupes, &questions).unwrap_err();
        assert!(err.to_string().contains("dupe has no matching question"));

        let unreferenced = vec![Answer::new(100, "a"), Answer::new(7, "b")];
        assert!(verify_integrity(&unreferenced, &dupes[..1], &questions).is_err());
        assert!(verify_integrity(&answers, &dupes[..1], &questions).is_ok());
    }
}

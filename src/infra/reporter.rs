// ============================================================
// Layer 6 — Diagnostics Reporter
// ============================================================
// Turns pipeline events into log lines.
//
//   TracingReporter → every event at info level via `tracing`
//   SilentReporter  → nothing (show_output = false / --quiet)
//
// Example output (TracingReporter, restricted stage):
//   Restrictions: min_text=150, min_dupes=12
//   Text statistics (restricted) questions: count=1201 mean=...
//   Duplication statistics (restricted): count=1201 mean=...
//   Largest class (restricted): 1.93%
//
// Reporting has no effect on the data the pipeline produces.

use crate::domain::events::PipelineEvent;
use crate::domain::traits::Reporter;

/// Logs every event through `tracing`.
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &PipelineEvent<'_>) {
        match event {
            PipelineEvent::CacheHit { dir, questions, dupes_test, stale } => {
                tracing::info!(
                    "Using cached dataset in '{}': {} questions, {} test dupes{}",
                    dir.display(),
                    questions,
                    dupes_test,
                    if *stale { " (built with other parameters)" } else { "" }
                );
            }
            PipelineEvent::Fetched { questions, dupes, answers } => {
                tracing::info!(
                    "Fetched {} questions, {} dupes, {} answers",
                    questions,
                    dupes,
                    answers
                );
            }
            PipelineEvent::SampleRows { answer_id, question_text, dupes, answer_text } => {
                tracing::info!("Sample question (AnswerId {}): {}", answer_id, question_text);
                tracing::info!("Sample question has {} dupes", dupes);
                match answer_text {
                    Some(text) => tracing::info!("Sample answer: {}", text),
                    None       => tracing::info!("Sample answer: <missing>"),
                }
            }
            PipelineEvent::CleanedSample { id, raw_text, clean_text } => {
                tracing::info!("Question {} before cleaning: {}", id, raw_text);
                tracing::info!("Question {} after cleaning: {}", id, clean_text);
            }
            PipelineEvent::TextStatistics { stage, tables } => {
                for (name, summary) in tables {
                    tracing::info!("Text statistics ({}) {}: {}", stage.as_str(), name, summary);
                }
            }
            PipelineEvent::DuplicationStatistics { stage, summary, largest_class } => {
                tracing::info!("Duplication statistics ({}): {}", stage.as_str(), summary);
                tracing::info!(
                    "Largest class ({}): {:.2}%",
                    stage.as_str(),
                    largest_class * 100.0
                );
            }
            PipelineEvent::Restrictions { min_text, min_dupes } => {
                tracing::info!("Restrictions: min_text={}, min_dupes={}", min_text, min_dupes);
            }
            PipelineEvent::PairsBuilt { name, rows, match_rate } => {
                tracing::info!(
                    "{}: {} rows with {:.2}% matches",
                    name,
                    rows,
                    match_rate * 100.0
                );
            }
            PipelineEvent::Written { path, rows } => {
                tracing::info!("Writing {} rows to {}", rows, path.display());
            }
        }
    }
}

/// Drops every event.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _event: &PipelineEvent<'_>) {}
}

/// Pick the reporter for a `show_output` flag.
pub fn reporter_for(show_output: bool) -> Box<dyn Reporter> {
    if show_output {
        Box::new(TracingReporter)
    } else {
        Box::new(SilentReporter)
    }
}

/// Keeps the Debug form of every event, for assertions in tests.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingReporter {
    pub events: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn count(&self, prefix: &str) -> usize {
        self.events.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn report(&self, event: &PipelineEvent<'_>) {
        self.events.borrow_mut().push(format!("{event:?}"));
    }
}

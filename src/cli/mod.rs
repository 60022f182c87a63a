// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `build`   — build the dataset, or load it from the cache
//   2. `inspect` — report on a cached dataset
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BuildArgs, Commands, InspectArgs};

use crate::data::loader::{HttpCorpusSource, LocalCorpusSource};
use crate::domain::traits::CorpusSource;

#[derive(Parser, Debug)]
#[command(
    name = "so-dupe-pairs",
    version,
    about = "Build balanced duplicate-question pair datasets from the Stack Overflow dump."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Build(args)   => run_build(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_build(args: BuildArgs) -> Result<()> {
    use crate::application::build_use_case::BuildUseCase;

    let source: Box<dyn CorpusSource> = match &args.source_dir {
        Some(dir) => Box::new(LocalCorpusSource::new(dir)),
        None      => Box::new(HttpCorpusSource::new(args.base_url.clone())?),
    };

    tracing::info!("Building dataset into: {}", args.output_dir);
    let dataset = BuildUseCase::new((&args).into(), source).execute()?;

    println!(
        "Dataset ready in '{}': {} questions, {} test dupes.",
        args.output_dir,
        dataset.questions.len(),
        dataset.dupes_test.len()
    );
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    match InspectUseCase::new(args.output_dir.clone()).summarize()? {
        None => println!("No cached dataset in '{}'.", args.output_dir),
        Some(summary) => {
            println!("Cached dataset in '{}':", args.output_dir);
            println!("  questions:  {}", summary.questions);
            println!("  test dupes: {} across {} classes", summary.dupes_test, summary.classes);
            if let Some(cfg) = summary.config {
                println!(
                    "  built with: test_size={} min_text={} min_dupes={} match={} seed={:?}",
                    cfg.test_size, cfg.min_text, cfg.min_dupes, cfg.match_count, cfg.seed
                );
            }
        }
    }
    Ok(())
}

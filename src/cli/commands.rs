// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `build` and `inspect`, and all
// their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::build_use_case::BuildConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the duplicate-pairs dataset (or reuse a cached one)
    Build(BuildArgs),

    /// Report on a cached dataset without building anything
    Inspect(InspectArgs),
}

/// All arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory for the TSV outputs; also checked for a cached dataset
    #[arg(long, default_value = "data_folder")]
    pub output_dir: String,

    /// Fraction of each answer class held out as test dupes
    #[arg(long, default_value_t = 0.21)]
    pub test_size: f64,

    /// Minimum cleaned text length (characters) for questions and dupes
    #[arg(long, default_value_t = 150)]
    pub min_text: usize,

    /// Minimum number of dupes an answer class needs to be kept
    #[arg(long, default_value_t = 12)]
    pub min_dupes: usize,

    /// Candidates per training dupe: its match plus `match - 1` negatives
    #[arg(long = "match", default_value_t = 20)]
    pub match_count: usize,

    /// Suppress diagnostic statistics
    #[arg(long)]
    pub quiet: bool,

    /// Seed for the split and negative sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Read orig-q/dup-q/ans .tsv.gz from this directory instead of downloading
    #[arg(long, conflicts_with = "base_url")]
    pub source_dir: Option<String>,

    /// Base URL of the three .tsv.gz files
    #[arg(long, default_value = crate::data::loader::DEFAULT_BASE_URL)]
    pub base_url: String,
}

/// Convert CLI BuildArgs into the application-layer BuildConfig.
/// The application layer never sees clap types.
impl From<&BuildArgs> for BuildConfig {
    fn from(a: &BuildArgs) -> Self {
        BuildConfig {
            output_dir:  a.output_dir.clone(),
            test_size:   a.test_size,
            min_text:    a.min_text,
            min_dupes:   a.min_dupes,
            match_count: a.match_count,
            show_output: !a.quiet,
            seed:        a.seed,
        }
    }
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[arg(long, default_value = "data_folder")]
    pub output_dir: String,
}

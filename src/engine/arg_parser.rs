use clap::Parser;
use std::path::PathBuf;

/// Command-line surface for a binary that owns a [`Pipeline`](crate::pipeline::Pipeline).
///
/// Every flag is optional so values from `.gentree.toml` apply unless overridden here.
#[derive(Clone, Debug, Parser)]
#[command(name = "gentree")]
#[command(about = "Run code generators; write the output, or use --verify to check it is up to date.")]
pub struct Cli {
    /// Directory generated paths are relative to. Default: current directory.
    #[arg(value_name = "PREFIX")]
    pub prefix: Option<PathBuf>,

    /// Compare generated output to what is on disk instead of writing it. Fails if anything differs.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verify: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Show a progress bar while writing or verifying.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub progress: Option<bool>,

    /// Max concurrent file operations (capped at 12).
    #[arg(long, short = 'j', value_parser = clap::value_parser!(usize))]
    pub concurrency: Option<usize>,

    /// Config file. Default: `.gentree.toml` in the current directory, if present.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

//! Command surface for generator binaries: argument parsing, run handler, progress.

pub mod arg_parser;
pub mod handlers;
pub mod progress;

pub use arg_parser::Cli;
pub use handlers::{RunOpts, run_cli, run_from_args, setup_opts};

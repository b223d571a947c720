//! Command handler: generate, then write (default) or verify (--verify).

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::engine::arg_parser::Cli;
use crate::pipeline::Pipeline;
use crate::sync::{CancelToken, SyncOpts};
use crate::utils::gentree_toml::{apply_file_to_opts, load_gentree_toml, load_gentree_toml_file};
use crate::utils::{Colors, PackagePaths, SyncConsts, setup_logging};

/// Resolved options for one command run: file config first, then CLI flags.
#[derive(Clone, Debug)]
pub struct RunOpts {
    pub prefix: PathBuf,
    pub verify: bool,
    pub concurrency: usize,
    pub verbose: bool,
    pub progress: bool,
}

impl Default for RunOpts {
    fn default() -> Self {
        RunOpts {
            prefix: PathBuf::from("."),
            verify: false,
            concurrency: SyncConsts::CONCURRENCY,
            verbose: false,
            progress: false,
        }
    }
}

/// Overwrite opts field from CLI when the flag was given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $cli.$field {
            $opts.$field = v;
        }
    };
}

/// Resolve options. An explicit `--config` file must load; the implicit `.gentree.toml`
/// is skipped when absent or broken.
pub fn setup_opts(cli: &Cli) -> Result<RunOpts> {
    let mut opts = RunOpts::default();
    let file = match &cli.config {
        Some(path) => Some(load_gentree_toml_file(path)?),
        None => load_gentree_toml(Path::new(".")),
    };
    if let Some(file) = file {
        apply_file_to_opts(&file, &mut opts);
    }
    if let Some(p) = &cli.prefix {
        opts.prefix = p.clone();
    }
    apply_cli_opt!(cli, opts, verify);
    apply_cli_opt!(cli, opts, verbose);
    apply_cli_opt!(cli, opts, progress);
    apply_cli_opt!(cli, opts, concurrency);
    Ok(opts)
}

/// Process-wide token cancelled by Ctrl+C. The handler is installed on first use.
fn interrupt_token() -> CancelToken {
    static TOKEN: OnceLock<CancelToken> = OnceLock::new();
    TOKEN
        .get_or_init(|| {
            let token = CancelToken::new();
            let handler_token = token.clone();
            if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
                debug!("Ctrl+C handler not installed: {}", e);
            }
            token
        })
        .clone()
}

/// Run `pipeline` over `inputs`, then write the result under the prefix, or verify it
/// when `--verify` is set.
pub fn run_cli<I>(cli: &Cli, pipeline: &Pipeline<I>, inputs: &[I]) -> Result<()> {
    let opts = setup_opts(cli)?;
    setup_logging(opts.verbose);
    debug!("{} CONFIG:{:#?}", PackagePaths::get().pkg_name().to_uppercase(), opts);

    let tree = pipeline
        .generate(inputs)
        .with_context(|| format!("{}: code generation failed", pipeline.label()))?;
    let sync_opts = SyncOpts {
        concurrency: opts.concurrency,
        cancel: Some(interrupt_token()),
        progress: opts.progress,
    };

    if opts.verify {
        let verification = tree
            .verify_with(&opts.prefix, &sync_opts)
            .context("io error while verifying tree")?;
        let checked = verification.checked;
        verification.into_result().with_context(|| {
            format!(
                "generated files under {} are out of date",
                opts.prefix.display()
            )
        })?;
        info!(
            "{}",
            Colors::colorize(Colors::CHECKED, &format!("{checked} generated files up to date"))
        );
    } else {
        tree.write_with(&opts.prefix, &sync_opts)
            .with_context(|| format!("writing generated files under {}", opts.prefix.display()))?;
        info!(
            "{}",
            Colors::colorize(Colors::WRITTEN, &format!("Wrote {} files", tree.len()))
        );
    }
    Ok(())
}

/// Parse process arguments and run; convenience for a generator binary's `main`.
pub fn run_from_args<I>(pipeline: &Pipeline<I>, inputs: &[I]) -> Result<()> {
    use clap::Parser;
    run_cli(&Cli::parse(), pipeline, inputs)
}

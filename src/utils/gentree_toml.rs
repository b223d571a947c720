//! Load `.gentree.toml` from a directory (CLI only). The library takes options directly via
//! [`SyncOpts`](crate::sync::SyncOpts).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::engine::RunOpts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GentreeToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    prefix: Option<String>,
    verify: Option<bool>,
    concurrency: Option<usize>,
    verbose: Option<bool>,
    progress: Option<bool>,
}

/// Load the config file from `dir` if present. Returns None if missing or unreadable.
pub(crate) fn load_gentree_toml(dir: &Path) -> Option<GentreeToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    if !path.is_file() {
        return None;
    }
    load_gentree_toml_file(&path)
        .map_err(|e| log::warn!("{:#}", e))
        .ok()
}

/// Load a config file at an explicit path. Missing, unreadable or malformed files are errors.
pub(crate) fn load_gentree_toml_file(path: &Path) -> Result<GentreeToml> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config file {}", path.display()))?;
    parse_gentree_toml(&s).with_context(|| format!("invalid config file {}", path.display()))
}

pub(crate) fn parse_gentree_toml(s: &str) -> std::result::Result<GentreeToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub(crate) fn apply_file_to_opts(file: &GentreeToml, opts: &mut RunOpts) {
    let sec = &file.settings;
    if let Some(ref p) = sec.prefix {
        opts.prefix = PathBuf::from(p);
    }
    apply_file_opt!(sec, opts, verify => verify);
    apply_file_opt!(sec, opts, concurrency => concurrency);
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, progress => progress);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_values_override_defaults() {
        let file = parse_gentree_toml(
            r#"
            [settings]
            prefix = "gen/out"
            verify = true
            concurrency = 4
            "#,
        )
        .unwrap();
        let mut opts = RunOpts::default();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.prefix, PathBuf::from("gen/out"));
        assert!(opts.verify);
        assert_eq!(opts.concurrency, 4);
        assert!(!opts.verbose);
    }

    #[test]
    fn test_missing_section_is_empty() {
        let file = parse_gentree_toml("").unwrap();
        let mut opts = RunOpts::default();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.prefix, PathBuf::from("."));
    }
}

use clap::Parser;
use gentree::engine::{Cli, run_cli, setup_opts};
use gentree::{File, Generator, Pipeline};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn pipeline() -> Pipeline<String> {
    let mut p = Pipeline::new("names");
    p.append(Generator::one_to_one_fn("greeting", |name: &String| {
        Ok(File::new(format!("{name}.txt"), format!("hello {name}\n")))
    }));
    p
}

#[test]
fn test_cli_flags_parse() {
    let cli = Cli::parse_from(["gen", "out", "--verify", "-j", "3"]);
    assert_eq!(cli.prefix, Some(PathBuf::from("out")));
    assert_eq!(cli.verify, Some(true));
    assert_eq!(cli.concurrency, Some(3));
    assert_eq!(cli.verbose, None);
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("gen.toml");
    fs::write(
        &config,
        "[settings]\nprefix = \"from-file\"\nverify = true\nconcurrency = 2\n",
    )
    .unwrap();
    let config_arg = config.to_string_lossy().to_string();

    let opts = setup_opts(&Cli::parse_from(["gen", "--config", config_arg.as_str()])).unwrap();
    assert_eq!(opts.prefix, PathBuf::from("from-file"));
    assert!(opts.verify);
    assert_eq!(opts.concurrency, 2);

    let opts = setup_opts(&Cli::parse_from([
        "gen",
        "cli-prefix",
        "--verify=false",
        "--config",
        config_arg.as_str(),
    ]))
    .unwrap();
    assert_eq!(opts.prefix, PathBuf::from("cli-prefix"));
    assert!(!opts.verify);
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");
    let missing_arg = missing.to_string_lossy().to_string();
    let err = setup_opts(&Cli::parse_from(["gen", "--config", missing_arg.as_str()])).unwrap_err();
    assert!(format!("{err:#}").contains("could not read config file"), "{err:#}");
}

#[test]
fn test_explicit_config_must_parse() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("gen.toml");
    fs::write(&config, "[settings]\nverify = \"yes please\"\n").unwrap();
    let config_arg = config.to_string_lossy().to_string();
    let err = setup_opts(&Cli::parse_from(["gen", "--config", config_arg.as_str()])).unwrap_err();
    assert!(format!("{err:#}").contains("invalid config file"), "{err:#}");
}

#[test]
fn test_run_cli_write_then_verify() {
    let dir = TempDir::new().unwrap();
    let prefix = dir.path().to_string_lossy().to_string();
    let inputs = vec!["ada".to_string(), "grace".to_string()];
    let p = pipeline();

    run_cli(&Cli::parse_from(["gen", prefix.as_str()]), &p, &inputs).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("ada.txt")).unwrap(),
        "hello ada\n"
    );
    run_cli(&Cli::parse_from(["gen", prefix.as_str(), "--verify"]), &p, &inputs).unwrap();

    fs::write(dir.path().join("grace.txt"), "stale\n").unwrap();
    let err = run_cli(&Cli::parse_from(["gen", prefix.as_str(), "--verify"]), &p, &inputs)
        .unwrap_err();
    assert!(format!("{err:#}").contains("would have changed"), "{err:#}");
}

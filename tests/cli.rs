//! Validates command-line argument parsing and derived run settings

use clap::Parser;
use std::path::PathBuf;
use traitstack::compositor::OverlayPolicy;
use traitstack::io::cli::Cli;
use traitstack::io::configuration::{DEFAULT_COUNT, DEFAULT_SEED};

#[test]
fn test_cli_parse_minimal_args() {
    let cli = Cli::parse_from(["traitstack"]);

    assert_eq!(cli.count, DEFAULT_COUNT);
    assert_eq!(cli.seed, DEFAULT_SEED);
    assert_eq!(cli.edition, "1");
    assert_eq!(cli.config, PathBuf::from("config.json"));
    assert_eq!(cli.assets, PathBuf::from("assets"));
    assert_eq!(cli.output, PathBuf::from("output"));
    assert!(!cli.strict);
    assert!(!cli.keep_duplicates);
    assert!(!cli.quiet);
}

#[test]
fn test_cli_parse_all_args() {
    let cli = Cli::parse_from([
        "traitstack",
        "--count",
        "500",
        "--edition",
        "genesis",
        "--seed",
        "123",
        "--config",
        "layers.json",
        "--assets",
        "art",
        "--output",
        "build",
        "--strict",
        "--keep-duplicates",
        "--quiet",
    ]);

    assert_eq!(cli.count, 500);
    assert_eq!(cli.edition, "genesis");
    assert_eq!(cli.seed, 123);
    assert_eq!(cli.config, PathBuf::from("layers.json"));
    assert_eq!(cli.assets, PathBuf::from("art"));
    assert_eq!(cli.output, PathBuf::from("build"));
    assert!(cli.strict);
    assert!(cli.keep_duplicates);
    assert!(cli.quiet);
}

#[test]
fn test_overlay_policy_follows_strict_flag() {
    let lenient = Cli::parse_from(["traitstack"]);
    assert_eq!(lenient.overlay_policy(), OverlayPolicy::Lenient);

    let strict = Cli::parse_from(["traitstack", "--strict"]);
    assert_eq!(strict.overlay_policy(), OverlayPolicy::Strict);
}

#[test]
fn test_progress_display_follows_quiet_flag() {
    let noisy = Cli::parse_from(["traitstack"]);
    assert!(noisy.should_show_progress());

    let quiet = Cli::parse_from(["traitstack", "--quiet"]);
    assert!(!quiet.should_show_progress());
}

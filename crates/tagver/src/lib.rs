//! Library interface for the `tagver` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//!
//! # Documentation Generation
//!
//! The [`command()`] function returns the clap `Command` for generating man pages
//! and shell completions via `xtask`.

pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {}
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG            Log filter (e.g., debug, tagver_core=trace)
    TAGVER_LOG_PATH     Explicit log file path
    TAGVER_LOG_DIR      Log directory
";

/// Command-line interface definition for tagver.
#[derive(Parser, Debug)]
#[command(name = "tagver")]
#[command(about = "Semantic versions derived from git tags and working tree state", long_about = None)]
#[command(version)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path inside the git repository to operate on
    #[arg(short, long, global = true, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version of the current checkout
    Describe(commands::describe::DescribeArgs),

    /// Tag the current commit with the next release version
    Bump(commands::bump::BumpArgs),

    /// Print tagver's own version
    Version(commands::version::VersionArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repo_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["tagver", "describe"]).unwrap();
        assert_eq!(cli.repo, PathBuf::from("."));
        assert!(matches!(cli.command, Commands::Describe(_)));
    }

    #[test]
    fn repo_flag_is_global() {
        let cli = Cli::try_parse_from(["tagver", "bump", "minor", "-r", "/tmp/x"]).unwrap();
        assert_eq!(cli.repo, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn describe_flags_parse() {
        let cli =
            Cli::try_parse_from(["tagver", "describe", "--no-prefix", "--add-commit-hash"]).unwrap();
        let Commands::Describe(args) = cli.command else {
            panic!("expected describe");
        };
        assert!(args.no_prefix);
        assert!(args.add_commit_hash);
    }

    #[test]
    fn bump_requires_a_level() {
        assert!(Cli::try_parse_from(["tagver", "bump"]).is_err());
        assert!(Cli::try_parse_from(["tagver", "bump", "huge"]).is_err());
    }
}

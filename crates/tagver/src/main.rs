//! tagver CLI
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::{Context, anyhow, bail};
use camino::Utf8PathBuf;
use clap::Parser;
use tagver::{Cli, Commands, commands};
use tagver_core::config::{Config, ConfigLoader};
use tagver_core::git::GitRepository;
use tracing::debug;

mod observability;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.apply();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    let obs_config = observability::ObservabilityConfig::new(config.log_dir.clone());
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        repo = %cli.repo.display(),
        "CLI initialized"
    );

    let result = match cli.command {
        Commands::Version(args) => commands::version::cmd_version(args, cli.json),
        Commands::Describe(args) => open_repository(&cli.repo, &config)
            .and_then(|repo| commands::describe::cmd_describe(args, cli.json, &config, &repo)),
        Commands::Bump(args) => open_repository(&cli.repo, &config)
            .and_then(|repo| commands::bump::cmd_bump(args, cli.json, &repo)),
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    let search_root = cli.repo.canonicalize().unwrap_or_else(|_| cli.repo.clone());
    if let Ok(search_root) = utf8(search_root, "repository path") {
        loader = loader.with_project_search(search_root);
    }
    if let Some(ref config_path) = cli.config {
        if !config_path.is_file() {
            bail!("configuration file not found: {}", config_path.display());
        }
        loader = loader.with_file(utf8(config_path.clone(), "config path")?);
    }
    loader.load().context("failed to load configuration")
}

fn open_repository(path: &std::path::Path, config: &Config) -> anyhow::Result<GitRepository> {
    let repo = GitRepository::open(path)?;
    repo.add_excludes(config.excludes())?;
    Ok(repo)
}

fn utf8(path: std::path::PathBuf, what: &str) -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path)
        .map_err(|e| anyhow!("{what} is not valid UTF-8: {}", e.into_path_buf().display()))
}

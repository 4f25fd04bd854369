//! Bump command: thin CLI layer over `tagver_core::bump`.

use clap::Args;
use owo_colors::{OwoColorize, Stream::Stdout};
use tracing::{debug, instrument};

use tagver_core::bump::{self, BumpOutcome};
use tagver_core::git::{GitRepository, RepositoryAccess};
use tagver_core::version::BumpLevel;

/// Arguments for the `bump` subcommand.
#[derive(Args, Debug)]
pub struct BumpArgs {
    /// Version component to increment
    #[arg(value_enum)]
    pub level: BumpLevel,
}

/// Tag `HEAD` with the next release and print the new tag.
#[instrument(name = "cmd_bump", skip_all, fields(level = %args.level))]
pub fn cmd_bump(args: BumpArgs, global_json: bool, repo: &GitRepository) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing bump command");

    let head = repo.head()?;
    let outcome = bump::bump(repo, head.as_ref(), args.level)?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &BumpOutcome) {
    println!(
        "created new tag: {}",
        outcome.tag.if_supports_color(Stdout, |t| t.green())
    );
}

//! Describe command: thin CLI layer over `tagver_core::describe`.

use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

use tagver_core::config::Config;
use tagver_core::describe::{self, Description};
use tagver_core::git::GitRepository;

/// Arguments for the `describe` subcommand.
#[derive(Args, Debug, Default)]
pub struct DescribeArgs {
    /// Print the version without its tag prefix
    #[arg(long)]
    pub no_prefix: bool,

    /// Append the abbreviated commit hash as build metadata
    #[arg(long)]
    pub add_commit_hash: bool,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct DescribeOutput {
    version: String,
    prefix: String,
    depth: usize,
    hash: String,
    tags: Vec<String>,
    dirty: bool,
}

impl DescribeOutput {
    fn from_description(description: &Description) -> Self {
        let resolved = &description.resolved;
        Self {
            version: resolved.version_string(),
            prefix: resolved.prefix.clone(),
            depth: resolved.guide.depth,
            hash: resolved.guide.hash.to_string(),
            tags: resolved.guide.tags.clone(),
            dirty: description.dirty.is_some(),
        }
    }
}

/// Print the floating version of the repository.
///
/// Config values under `[describe]` act as defaults; flags can only turn
/// options on.
#[instrument(name = "cmd_describe", skip_all, fields(json_output))]
pub fn cmd_describe(
    args: DescribeArgs,
    global_json: bool,
    config: &Config,
    repo: &GitRepository,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, ?args, "executing describe command");

    let mut options = config.describe_options();
    options.add_commit_hash |= args.add_commit_hash;
    let no_prefix = args.no_prefix || config.no_prefix();

    let description = describe::describe(repo, options)?;
    println!("{}", render(&description, no_prefix, global_json)?);
    Ok(())
}

fn render(description: &Description, no_prefix: bool, json: bool) -> anyhow::Result<String> {
    if json {
        let output = DescribeOutput::from_description(description);
        return Ok(serde_json::to_string_pretty(&output)?);
    }
    if no_prefix {
        Ok(description.resolved.version_string())
    } else {
        Ok(description.resolved.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagver_core::guide::Guide;
    use tagver_core::latest::ResolvedVersion;
    use tagver_core::semver::Version;

    fn description(dirty: bool) -> Description {
        Description {
            resolved: ResolvedVersion {
                guide: Guide {
                    tags: vec!["v1.2.0".into()],
                    depth: 3,
                    hash: tagver_core::git::Hash::zero(),
                },
                prefix: "v".into(),
                version: Version::parse("1.2.1-dev.3").unwrap(),
            },
            dirty: dirty.then(chrono::Utc::now),
        }
    }

    #[test]
    fn renders_with_prefix_by_default() {
        assert_eq!(render(&description(false), false, false).unwrap(), "v1.2.1-dev.3");
    }

    #[test]
    fn no_prefix_strips_prefix() {
        assert_eq!(render(&description(false), true, false).unwrap(), "1.2.1-dev.3");
    }

    #[test]
    fn json_output_fields() {
        let text = render(&description(true), false, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], "1.2.1-dev.3");
        assert_eq!(value["prefix"], "v");
        assert_eq!(value["depth"], 3);
        assert_eq!(value["tags"][0], "v1.2.0");
        assert_eq!(value["dirty"], true);
        assert_eq!(value["hash"], "0".repeat(40));
    }
}

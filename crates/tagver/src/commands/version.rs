//! Version command: print tagver's own version.

use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `version` subcommand.
#[derive(Args, Debug, Default)]
pub struct VersionArgs {}

#[derive(Serialize)]
struct PackageVersion {
    name: &'static str,
    version: &'static str,
}

impl PackageVersion {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Print the tool's build version.
#[instrument(name = "cmd_version", skip_all)]
pub fn cmd_version(_args: VersionArgs, global_json: bool) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing version command");
    println!("{}", render(global_json)?);
    Ok(())
}

fn render(json: bool) -> anyhow::Result<String> {
    let info = PackageVersion::new();
    if json {
        Ok(serde_json::to_string_pretty(&info)?)
    } else {
        Ok(format!("{} {}", info.name, info.version))
    }
}

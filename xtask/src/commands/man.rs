use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::BIN_NAME;

#[derive(Args, Debug)]
pub struct ManArgs {
    /// Output directory, relative to the workspace root
    #[arg(long = "out-dir", default_value = "dist/share/man/man1")]
    pub out_dir: PathBuf,
}

pub fn cmd_man(args: ManArgs) -> Result<(), String> {
    let out_dir = crate::output_dir(&args.out_dir)?;
    let cmd = tagver::command();

    render(cmd.clone(), BIN_NAME, &out_dir)?;

    // `tagver describe` is documented as tagver-describe(1)
    for subcommand in cmd.get_subcommands() {
        let page = format!("{BIN_NAME}-{}", subcommand.get_name());
        render(subcommand.clone(), &page, &out_dir)?;
    }

    Ok(())
}

fn render(cmd: clap::Command, title: &str, out_dir: &Path) -> Result<(), String> {
    let path = out_dir.join(format!("{title}.1"));
    let mut buffer: Vec<u8> = Vec::new();
    clap_mangen::Man::new(cmd)
        .title(title)
        .render(&mut buffer)
        .map_err(|e| format!("render {}: {e}", path.display()))?;
    fs::write(&path, buffer).map_err(|e| format!("{}: {e}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

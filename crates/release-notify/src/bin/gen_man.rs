use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_mangen::Man;

use release_notify::cli::Cli;

fn main() -> Result<()> {
    let out_path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "release-notify.1".to_string()),
    );
    let mut file = File::create(&out_path)
        .with_context(|| format!("Creating man page {}", out_path.display()))?;
    Man::new(Cli::command())
        .render(&mut file)
        .context("Rendering man page")?;
    eprintln!("Generated man page at {}", out_path.display());
    Ok(())
}

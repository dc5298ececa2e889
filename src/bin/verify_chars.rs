use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use monkey_font_editor::{bmp::IndexedBitmap, workspace};

/// Checks that every character file of a workspace decodes and re-encodes
/// to exactly the same bytes.
#[derive(Parser, Debug)]
struct Args {
    /// Folder containing char*.bmp files (defaults to the current directory)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Stop at the first file that fails
    #[arg(long)]
    fail_fast: bool,
}

fn verify(path: &std::path::Path) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let bitmap = IndexedBitmap::parse(&data)?;
    let encoded = bitmap.to_bytes();
    if encoded != data {
        let first_diff = encoded
            .iter()
            .zip(&data)
            .position(|(a, b)| a != b)
            .unwrap_or(encoded.len().min(data.len()));
        anyhow::bail!(
            "re-encoded bytes differ at offset {} ({} bytes vs {} on disk)",
            first_diff,
            encoded.len(),
            data.len()
        );
    }
    info!(
        "{}: {}x{}, {} colors, ok",
        path.display(),
        bitmap.width(),
        bitmap.height(),
        bitmap.palette().len()
    );
    Ok(())
}

pub fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let dir = match args.workspace {
        Some(d) => d,
        None => std::env::current_dir()?,
    };

    let entries = workspace::discover(&dir)?;
    let mut failures = 0;
    for entry in &entries {
        if let Err(e) = verify(&entry.path) {
            error!("{}: {:#}", entry.path.display(), e);
            failures += 1;
            if args.fail_fast {
                break;
            }
        }
    }
    info!("{} files checked, {} failed", entries.len(), failures);
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

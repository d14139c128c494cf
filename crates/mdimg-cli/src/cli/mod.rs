//! CLI for mdimg.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mdimg_core::config::{self, MdimgConfig};
use std::path::PathBuf;

use commands::{run_localize, run_scan};

/// Top-level CLI for mdimg.
#[derive(Debug, Parser)]
#[command(name = "mdimg")]
#[command(
    about = "Download images linked from Markdown files and point the links at local copies",
    long_about = None
)]
pub struct Cli {
    /// Defaults to `run` in the current directory.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download remote images and rewrite Markdown links in place.
    Run {
        /// Directory containing the Markdown files (default: current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Images directory, relative to DIR unless absolute (default from config: "images").
        #[arg(long, value_name = "PATH")]
        images_dir: Option<PathBuf>,
        /// Fail instead of creating a missing images directory.
        #[arg(long)]
        no_create_dir: bool,
        /// Show what would be downloaded without fetching or writing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// List Markdown files and the images they reference.
    Scan {
        /// Directory containing the Markdown files (default: current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Images directory used to check which images are already local.
        #[arg(long, value_name = "PATH")]
        images_dir: Option<PathBuf>,
        /// Print machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Default for CliCommand {
    fn default() -> Self {
        CliCommand::Run {
            dir: None,
            images_dir: None,
            no_create_dir: false,
            dry_run: false,
        }
    }
}

/// Applies command-line overrides on top of the loaded config.
pub(crate) fn apply_overrides(
    mut cfg: MdimgConfig,
    dir: Option<PathBuf>,
    images_dir: Option<PathBuf>,
    no_create_dir: bool,
) -> Result<MdimgConfig> {
    cfg.input_dir = match dir {
        Some(d) => d,
        None => std::env::current_dir()?,
    };
    if let Some(images) = images_dir {
        cfg.images_dir = images;
    }
    if no_create_dir {
        cfg.create_images_dir = false;
    }
    Ok(cfg)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command.unwrap_or_default() {
            CliCommand::Run {
                dir,
                images_dir,
                no_create_dir,
                dry_run,
            } => {
                let cfg = apply_overrides(cfg, dir, images_dir, no_create_dir)?;
                run_localize(&cfg, dry_run)?;
            }
            CliCommand::Scan {
                dir,
                images_dir,
                json,
            } => {
                let cfg = apply_overrides(cfg, dir, images_dir, false)?;
                run_scan(&cfg, json)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

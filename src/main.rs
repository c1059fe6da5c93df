use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use epochal_prep::bundle::write_preload_bundle;
use epochal_prep::cards::{ReduceOptions, reduce_cards, revert_cards};
use epochal_prep::config::resolve;
use epochal_prep::manifest::{CommandTranscoder, run_prepare};
use epochal_prep::{CardOutcome, PrepConfig, logging};

/// Prepare the epochal exhibit assets.
#[derive(Parser, Debug)]
#[command(name = "epochal-prep", version)]
#[command(about = "Bundle preload scripts, build the data manifest and reduce card images")]
struct Args {
    /// Directory every configured path is relative to
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to <root>/prep.config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Concatenate the preload scripts into the bundle file
    Bundle,
    /// Build the JSON manifest from the data file, transcoding narration audio
    Prepare,
    /// Write a downsampled <id>.jpeg for every card
    Reduce {
        /// Round target sizes up to a mip-map friendly grid
        #[arg(long)]
        mip_align: bool,

        /// Largest accepted width or height (overrides the configuration)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Revert every card source image through version control
    RevertCards,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();

    let config = match &args.config {
        Some(path) => PrepConfig::from_path(path)?,
        None => PrepConfig::discover(&args.root),
    };

    match args.command {
        Command::Bundle => {
            let output = resolve(&args.root, &config.bundle.output);
            write_preload_bundle(&args.root, &config.bundle.bundle_items(), &output)?;
        }
        Command::Prepare => {
            let transcoder = CommandTranscoder::new(&config.prepare.encoder);
            run_prepare(&args.root, &config.prepare, &transcoder)?;
        }
        Command::Reduce { mip_align, limit } => {
            let mut options = ReduceOptions::from(&config.reduce);
            options.mip_align |= mip_align;
            if let Some(limit) = limit {
                options.limit = limit;
            }
            let cards_dir = resolve(&args.root, &config.reduce.cards_dir);
            let outcomes = reduce_cards(&cards_dir, &options)?;
            let reduced = outcomes
                .iter()
                .filter(|outcome| matches!(outcome, CardOutcome::Reduced { .. }))
                .count();
            tracing::info!(reduced, skipped = outcomes.len() - reduced, "cards done");
        }
        Command::RevertCards => {
            let cards_dir = resolve(&args.root, &config.reduce.cards_dir);
            revert_cards(&cards_dir, &config.reduce.vcs)?;
        }
    }

    Ok(())
}

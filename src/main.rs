#![deny(clippy::all)]
use clap::Parser;
use color_eyre::eyre::{bail, Result};
use favbooru_common::{config_dir, denylist::TagDenylist};
use favbooru_core::{Archive, ArchiveConfig};
use favbooru_extractors::{auth::ConnectionConfig, FavoritesExtractor};
use log::debug;
use owo_colors::OwoColorize;
use std::sync::Arc;

use crate::cli::Cli;
use crate::sync::{FavoritesSync, RunSummary};

mod cli;
mod sync;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    env_logger::builder().format_timestamp(None).init();
    color_eyre::install()?;

    let connection = ConnectionConfig::from_url(&args.booru_url)?;

    let cfg_dir = config_dir()?;
    debug!("Config directory: {}", cfg_dir.display());
    let denylist = Arc::new(TagDenylist::load_or_create(&cfg_dir)?);

    let extractor = FavoritesExtractor::new(connection, denylist)?;

    let config = ArchiveConfig::new(&args.output).with_max_filename(args.max_filename);
    let archive = Archive::new(config, Some(extractor.client()))?;

    let summary = FavoritesSync::new(extractor, archive, args.fast_update)
        .run(args.page)
        .await;

    print_results(&summary);

    if summary.failed > 0 {
        bail!("{} posts could not be archived", summary.failed);
    }

    Ok(())
}

fn print_results(summary: &RunSummary) {
    println!(
        "{} {} {}",
        summary.downloaded.to_string().bold().blue(),
        "files".bold().blue(),
        "downloaded".bold()
    );

    println!(
        "{} {} {}",
        summary.refreshed.to_string().bold().green(),
        "archived files".bold().green(),
        "refreshed".bold()
    );

    if summary.failed > 0 {
        println!(
            "{} {}",
            summary.failed.to_string().bold().red(),
            "posts failed, see the log above.".bold().red()
        );
    }
}

//! webpify CLI: convert an image tree to WebP; use --dry-run to only scan.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use webpify::engine::arg_parser::Cli;
use webpify::engine::handle_run;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}

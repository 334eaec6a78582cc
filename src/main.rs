use anyhow::Result;
use clap::Parser;

use garbage_sorter::cli::Cli;

fn main() -> Result<()> {
    Cli::parse().run()
}

//! CLI entry point for the layered collection generator

use clap::Parser;
use traitstack::io::cli::{Cli, CollectionRunner};

fn main() -> traitstack::Result<()> {
    let cli = Cli::parse();
    let mut runner = CollectionRunner::new(cli);
    runner.run()
}

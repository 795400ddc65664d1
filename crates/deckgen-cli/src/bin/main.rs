//! deckgen CLI binary entry point.

use anyhow::Result;
use deckgen_cli::run_cli;

fn main() -> Result<()> {
    run_cli()
}

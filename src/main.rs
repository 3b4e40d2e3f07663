//! Terminal flashcard trainer.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::check_arg_count(std::env::args_os().len())?;
    cli::Cli::parse().run()
}

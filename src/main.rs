//! CLI entry point.
//!
//! A single positional argument (the number to test) plus knobs for the
//! worker count and the witness candidate range. The verdict is one
//! line on stdout; parameter info and per-candidate progress go to
//! stderr.

mod cli;

use anyhow::Result;
use clap::Parser;
use rug::Integer;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "adamant", about = "Prove or disprove primality with the AKS test")]
pub struct Cli {
    /// The number to test, in decimal (must be at least 2)
    #[arg(value_parser = parse_integer)]
    n: Integer,

    /// Worker threads for the witness search
    #[arg(short, long, default_value_t = default_jobs())]
    jobs: usize,

    /// First witness candidate to test
    #[arg(long, value_parser = parse_integer)]
    start: Option<Integer>,

    /// Candidate upper bound, exclusive (defaults to the witness bound M)
    #[arg(long, value_parser = parse_integer)]
    end: Option<Integer>,
}

fn parse_integer(s: &str) -> Result<Integer, String> {
    Integer::parse(s)
        .map(Integer::from)
        .map_err(|e| format!("not a valid integer: {e}"))
}

fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, |p| p.get())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    cli::run(&cli)
}

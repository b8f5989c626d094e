//! Execution logic for the binary, kept out of the entry point.

use anyhow::Result;

use adamant::aks::{decide, Verdict};
use adamant::witness::StderrLog;

use super::Cli;

pub fn run(cli: &Cli) -> Result<()> {
    let jobs = cli.jobs.max(1);
    let verdict = decide(
        &cli.n,
        jobs,
        cli.start.as_ref(),
        cli.end.as_ref(),
        &StderrLog,
    )?;

    match verdict {
        Verdict::Prime => println!("{} is prime", cli.n),
        Verdict::HasFactor(factor) => println!("{} has factor {factor}", cli.n),
        Verdict::HasWitness(a) => println!("{} is composite with AKS witness {a}", cli.n),
        Verdict::NoWitness { start, end } => {
            println!("{} has no AKS witnesses in [{start}, {end})", cli.n)
        }
    }
    Ok(())
}

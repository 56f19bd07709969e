use anyhow::Context;
use players::{compute::aggregate, logging, read::load, write::write_report};

/// Where the membership intervals are read from, relative to the working directory.
const PLAYERS_CSV: &str = "data/players.csv";

fn main() -> Result<(), anyhow::Error> {
    logging::init();
    let rows = load(PLAYERS_CSV).with_context(|| format!("cannot load {PLAYERS_CSV}"))?;
    let memberships = aggregate(rows)?;
    write_report(std::io::stdout().lock(), &memberships)?;
    Ok(())
}

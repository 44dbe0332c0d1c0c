// console.rs - Headless mode: print each generation to stdout

use std::io::{self, Write};
use std::thread;

use anyhow::{Context, Result};
use conway::{Seeding, Speed};
use tracing::info;

pub fn run(size: usize, seeding: Seeding, speed: Speed, generations: u64) -> Result<()> {
    let mut population = seeding.populate(size).context("failed to seed the population")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    info!(size, generations, "running headless");
    for step in 0..=generations {
        let frame = population.frame()?;
        writeln!(out, "{frame}").context("failed to write to stdout")?;
        out.flush()?;

        if step < generations {
            thread::sleep(speed.interval());
            population.advance()?;
        }
    }
    Ok(())
}

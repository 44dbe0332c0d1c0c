// main.rs - Conway's Game of Life on a 60x60 torus, in a window or a terminal

use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use conway::{Controls, DEFAULT_GRID_SIZE, PATTERNS, Seeding, Simulation, Speed, patterns};
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod console;
mod ui;

use ui::LifeApp;

#[derive(Debug, Parser)]
#[command(name = "game_of_life", about = "Conway's Game of Life on a toroidal grid")]
struct Args {
    /// Cells per side of the square grid
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    size: usize,

    /// Generations per half second
    #[arg(long, default_value_t = Speed::DEFAULT.get(),
          value_parser = clap::value_parser!(u32).range(1..=20))]
    speed: u32,

    /// Seed for a reproducible random start
    #[arg(long)]
    seed: Option<u64>,

    /// Start from a named pattern instead of a random grid
    #[arg(long, conflicts_with = "seed")]
    pattern: Option<String>,

    /// Print generations to the terminal instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Number of generations to print in headless mode
    #[arg(long, default_value_t = 10)]
    generations: u64,
}

impl Args {
    fn seeding(&self) -> Result<Seeding> {
        if let Some(name) = &self.pattern {
            let pattern = patterns::find(name).with_context(|| {
                let known: Vec<_> = PATTERNS.iter().map(|p| p.name).collect();
                format!("unknown pattern: {name} (expected one of {})", known.join(", "))
            })?;
            return Ok(Seeding::Pattern(pattern));
        }
        Ok(self.seed.map_or(Seeding::Random, Seeding::Reproducible))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    if args.size == 0 {
        bail!("--size must be positive");
    }
    let seeding = args.seeding()?;
    let speed = Speed::new(args.speed);

    if args.headless {
        return console::run(args.size, seeding, speed, args.generations);
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start the tokio runtime")?;
    let controls = Arc::new(Controls::new(speed));

    // The egui context only exists once the window is up
    let repaint: Arc<OnceLock<egui::Context>> = Arc::new(OnceLock::new());
    let on_generation = {
        let repaint = Arc::clone(&repaint);
        move || {
            if let Some(ctx) = repaint.get() {
                ctx.request_repaint();
            }
        }
    };
    let simulation = Simulation::spawn(
        runtime.handle(),
        args.size,
        seeding,
        Arc::clone(&controls),
        on_generation,
    )
    .context("failed to start the simulation")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([620.0, 495.0])
            .with_resizable(false),
        ..Default::default()
    };

    info!(size = args.size, speed = speed.get(), "opening window");
    eframe::run_native(
        "Game of Life",
        options,
        Box::new(move |cc| {
            let _ = repaint.set(cc.egui_ctx.clone());
            Box::new(LifeApp::new(runtime, simulation, controls))
        }),
    )
    .map_err(|err| anyhow!("window closed with an error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_library() {
        let args = Args::try_parse_from(["game_of_life"]).unwrap();
        assert_eq!(args.size, DEFAULT_GRID_SIZE);
        assert_eq!(args.speed, Speed::DEFAULT.get());
        assert!(!args.headless);
        assert!(matches!(args.seeding().unwrap(), Seeding::Random));
    }

    #[test]
    fn speed_outside_the_slider_range_is_rejected() {
        assert!(Args::try_parse_from(["game_of_life", "--speed", "0"]).is_err());
        assert!(Args::try_parse_from(["game_of_life", "--speed", "21"]).is_err());
    }

    #[test]
    fn pattern_and_seed_are_resolved() {
        let args = Args::try_parse_from(["game_of_life", "--pattern", "glider"]).unwrap();
        assert!(matches!(args.seeding().unwrap(), Seeding::Pattern(p) if p.name == "Glider"));

        let args = Args::try_parse_from(["game_of_life", "--seed", "12"]).unwrap();
        assert!(matches!(args.seeding().unwrap(), Seeding::Reproducible(12)));

        let args = Args::try_parse_from(["game_of_life", "--pattern", "pulsar"]).unwrap();
        assert!(args.seeding().is_err());

        assert!(Args::try_parse_from(["game_of_life", "--pattern", "block", "--seed", "1"]).is_err());
    }
}

// simulation.rs - Background task that advances a shared population on a timer

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, trace};

use crate::{Frame, Grid, LifeError, Pattern, Population};

// One generation every BASE_INTERVAL / speed
const BASE_INTERVAL: Duration = Duration::from_millis(500);
// How often a paused loop looks at the pause flag again
const PAUSE_POLL: Duration = Duration::from_millis(50);

/// Generations per half second, kept within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(u32);

impl Speed {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 20;
    pub const DEFAULT: Speed = Speed(5);

    /// Out-of-range values are clamped.
    pub fn new(value: u32) -> Self {
        Speed(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Delay between two generations.
    pub fn interval(self) -> Duration {
        BASE_INTERVAL / self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Knobs the UI turns while the simulation runs. Shared with the running
/// task and read again on every cycle, so changes never need a restart.
#[derive(Debug)]
pub struct Controls {
    paused: AtomicBool,
    speed: AtomicU32,
}

impl Controls {
    pub fn new(speed: Speed) -> Self {
        Self {
            paused: AtomicBool::new(false),
            speed: AtomicU32::new(speed.get()),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    /// Flip the pause flag and return the new value.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn speed(&self) -> Speed {
        Speed::new(self.speed.load(Ordering::Acquire))
    }

    pub fn set_speed(&self, speed: Speed) {
        self.speed.store(speed.get(), Ordering::Release);
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(Speed::DEFAULT)
    }
}

/// How a fresh population gets its first generation.
#[derive(Debug, Clone, Copy)]
pub enum Seeding {
    /// Coin flip per cell from an unseeded generator.
    Random,
    /// Coin flip per cell from a generator seeded with this value. Every reset
    /// starts from the same grid.
    Reproducible(u64),
    /// A single pattern in the middle of an otherwise dead grid.
    Pattern(&'static Pattern),
}

impl Seeding {
    pub fn populate(&self, size: usize) -> Result<Population, LifeError> {
        match *self {
            Seeding::Random => {
                let mut population = Population::new(size)?;
                population.seed();
                Ok(population)
            }
            Seeding::Reproducible(seed) => {
                let mut population = Population::new(size)?;
                population.seed_with(&mut StdRng::seed_from_u64(seed));
                Ok(population)
            }
            Seeding::Pattern(pattern) => Population::from_pattern(size, pattern),
        }
    }
}

/// A population behind a single lock.
///
/// Cells, alive count and generation only ever change together while the lock
/// is held, so readers see either the old generation or the new one.
#[derive(Clone)]
pub struct SharedPopulation {
    inner: Arc<Mutex<Population>>,
}

impl SharedPopulation {
    pub fn new(population: Population) -> Self {
        Self { inner: Arc::new(Mutex::new(population)) }
    }

    /// Run `f` with exclusive access to the population.
    pub fn with<T>(&self, f: impl FnOnce(&mut Population) -> T) -> T {
        f(&mut self.lock())
    }

    pub fn seed(&self) {
        self.lock().seed();
    }

    pub fn advance(&self) -> Result<(), LifeError> {
        self.lock().advance()
    }

    pub fn snapshot(&self) -> Result<Grid, LifeError> {
        self.lock().snapshot()
    }

    pub fn frame(&self) -> Result<Frame, LifeError> {
        self.lock().frame()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation()
    }

    pub fn alive_count(&self) -> usize {
        self.lock().alive_count()
    }

    // A panic can only happen before a new grid is committed, so the data
    // behind a poisoned lock is still one whole generation.
    fn lock(&self) -> MutexGuard<'_, Population> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

type OnGeneration = Arc<dyn Fn() + Send + Sync>;

/// A running simulation: one population and the task that advances it.
///
/// Dropping the handle asks the task to stop; [`stop`](Self::stop) also waits
/// for it.
pub struct Simulation {
    population: SharedPopulation,
    controls: Arc<Controls>,
    seeding: Seeding,
    on_generation: OnGeneration,
    runtime: Handle,
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl Simulation {
    /// Build and seed a population of `size` x `size` cells, then start
    /// advancing it on `runtime`. `on_generation` runs after every committed
    /// generation.
    pub fn spawn(
        runtime: &Handle,
        size: usize,
        seeding: Seeding,
        controls: Arc<Controls>,
        on_generation: impl Fn() + Send + Sync + 'static,
    ) -> Result<Self, LifeError> {
        Self::start(runtime.clone(), size, seeding, controls, Arc::new(on_generation))
    }

    fn start(
        runtime: Handle,
        size: usize,
        seeding: Seeding,
        controls: Arc<Controls>,
        on_generation: OnGeneration,
    ) -> Result<Self, LifeError> {
        let population = SharedPopulation::new(seeding.populate(size)?);
        let (stop, stopped) = watch::channel(false);

        info!(size, ?seeding, "simulation started");
        let task = runtime.spawn(run(
            population.clone(),
            Arc::clone(&controls),
            Arc::clone(&on_generation),
            stopped,
        ));

        Ok(Self {
            population,
            controls,
            seeding,
            on_generation,
            runtime,
            stop,
            task: Some(task),
        })
    }

    pub fn population(&self) -> &SharedPopulation {
        &self.population
    }

    pub fn controls(&self) -> &Arc<Controls> {
        &self.controls
    }

    pub fn size(&self) -> usize {
        self.population.with(|population| population.size())
    }

    pub fn frame(&self) -> Result<Frame, LifeError> {
        self.population.frame()
    }

    /// Ask the task to stop after the generation it is working on.
    pub fn cancel(&self) {
        self.stop.send_replace(true);
    }

    /// Stop the task and wait until it has exited.
    pub async fn stop(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                error!(%err, "simulation task failed");
            }
        }
    }

    /// Throw the current population away and start over at generation 0 with
    /// the same size, seeding and controls.
    pub fn reset(self) -> Result<Simulation, LifeError> {
        self.cancel();
        info!(generation = self.population.generation(), "simulation reset");
        Self::start(
            self.runtime.clone(),
            self.size(),
            self.seeding,
            Arc::clone(&self.controls),
            Arc::clone(&self.on_generation),
        )
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run(
    population: SharedPopulation,
    controls: Arc<Controls>,
    on_generation: OnGeneration,
    mut stop: watch::Receiver<bool>,
) {
    while !*stop.borrow() {
        let delay = if controls.is_paused() { PAUSE_POLL } else { controls.speed().interval() };

        tokio::select! {
            // Err means every sender is gone, which is a stop as well
            _ = stop.changed() => break,
            _ = tokio::time::sleep(delay) => {}
        }

        if controls.is_paused() {
            continue;
        }

        let advanced = population.with(|population| {
            population.advance().map(|()| (population.generation(), population.alive_count()))
        });
        match advanced {
            Ok((generation, alive)) => {
                trace!(generation, alive, "generation advanced");
                on_generation();
            }
            Err(err) => {
                error!(%err, "cannot advance population");
                break;
            }
        }
    }
    info!(generation = population.generation(), "simulation stopped");
}

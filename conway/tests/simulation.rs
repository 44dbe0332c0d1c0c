use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use conway::patterns::BLINKER;
use conway::{Controls, LifeError, Population, Seeding, Simulation, Speed};
use tokio::runtime::Handle;
use tokio::time::sleep;

fn spawn(controls: &Arc<Controls>, seeding: Seeding) -> Simulation {
    Simulation::spawn(&Handle::current(), 24, seeding, Arc::clone(controls), || {}).unwrap()
}

#[tokio::test(start_paused = true)]
async fn advances_once_per_interval() {
    let controls = Arc::new(Controls::new(Speed::new(5)));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let simulation = Simulation::spawn(
        &Handle::current(),
        24,
        Seeding::Reproducible(9),
        Arc::clone(&controls),
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    )
    .unwrap();

    assert_eq!(simulation.population().generation(), 0);
    // 100ms per generation at speed 5
    sleep(Duration::from_millis(1050)).await;

    assert_eq!(simulation.population().generation(), 10);
    assert_eq!(calls.load(Ordering::SeqCst), 10);
    simulation.stop().await;
}

#[tokio::test(start_paused = true)]
async fn frames_are_consistent() {
    let controls = Arc::new(Controls::new(Speed::new(20)));
    let simulation = spawn(&controls, Seeding::Random);

    for _ in 0..20 {
        sleep(Duration::from_millis(37)).await;
        let frame = simulation.frame().unwrap();
        assert_eq!(frame.alive, frame.cells.alive_count());
        assert_eq!(frame.cells.size(), 24);
    }
    simulation.stop().await;
}

#[tokio::test(start_paused = true)]
async fn pause_keeps_state_and_resume_continues() {
    let controls = Arc::new(Controls::new(Speed::new(5)));
    controls.set_paused(true);
    let simulation = spawn(&controls, Seeding::Reproducible(1));
    let before = simulation.population().snapshot().unwrap();

    sleep(Duration::from_millis(2010)).await;
    assert_eq!(simulation.population().generation(), 0);
    assert_eq!(simulation.population().snapshot().unwrap(), before);

    controls.set_paused(false);
    sleep(Duration::from_millis(500)).await;
    let generation = simulation.population().generation();
    assert!((1..=5).contains(&generation), "generation = {generation}");
    simulation.stop().await;
}

#[tokio::test(start_paused = true)]
async fn speed_change_applies_from_the_next_cycle() {
    let controls = Arc::new(Controls::new(Speed::new(1)));
    let simulation = spawn(&controls, Seeding::Reproducible(2));

    // 500ms per generation at speed 1
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(simulation.population().generation(), 2);

    controls.set_speed(Speed::new(20));
    // the sleep already under way still runs to 1500ms
    sleep(Duration::from_millis(300)).await;
    assert_eq!(simulation.population().generation(), 2);

    sleep(Duration::from_millis(610)).await;
    let generation = simulation.population().generation();
    assert!(generation > 15, "generation = {generation}");
    simulation.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_ends_the_task() {
    let controls = Arc::new(Controls::default());
    let simulation = spawn(&controls, Seeding::Reproducible(3));
    let population = simulation.population().clone();

    sleep(Duration::from_millis(350)).await;
    simulation.stop().await;
    let stopped_at = population.generation();
    assert!(stopped_at > 0);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(population.generation(), stopped_at);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_the_task() {
    let controls = Arc::new(Controls::default());
    let simulation = spawn(&controls, Seeding::Reproducible(4));
    let population = simulation.population().clone();

    sleep(Duration::from_millis(250)).await;
    drop(simulation);
    // let the task observe the stop signal
    sleep(Duration::from_millis(1)).await;
    let stopped_at = population.generation();

    sleep(Duration::from_secs(1)).await;
    assert_eq!(population.generation(), stopped_at);
}

#[tokio::test(start_paused = true)]
async fn reset_starts_over_from_generation_zero() {
    let controls = Arc::new(Controls::default());
    let simulation = spawn(&controls, Seeding::Reproducible(5));
    sleep(Duration::from_millis(450)).await;
    assert!(simulation.population().generation() > 0);

    let old = simulation.population().clone();
    let simulation = simulation.reset().unwrap();
    assert_eq!(simulation.population().generation(), 0);

    let fresh = Seeding::Reproducible(5).populate(24).unwrap();
    assert_eq!(simulation.population().snapshot(), fresh.snapshot());

    // the discarded population is no longer advanced
    sleep(Duration::from_millis(10)).await;
    let frozen = old.generation();
    sleep(Duration::from_millis(500)).await;
    assert_eq!(old.generation(), frozen);
    assert!(simulation.population().generation() > 0);
    simulation.stop().await;
}

#[tokio::test(start_paused = true)]
async fn pattern_seeding_runs_the_pattern() {
    let controls = Arc::new(Controls::new(Speed::new(5)));
    let simulation = spawn(&controls, Seeding::Pattern(&BLINKER));
    assert_eq!(simulation.population().alive_count(), 3);

    sleep(Duration::from_millis(1050)).await;
    let mut expected = Population::from_pattern(24, &BLINKER).unwrap();
    for _ in 0..10 {
        expected.advance().unwrap();
    }
    assert_eq!(simulation.population().snapshot(), expected.snapshot());
    simulation.stop().await;
}

#[tokio::test]
async fn zero_size_is_rejected() {
    let controls = Arc::new(Controls::default());
    let result = Simulation::spawn(&Handle::current(), 0, Seeding::Random, controls, || {});
    assert!(matches!(result, Err(LifeError::InvalidSize)));
}

//! small_fleet — a dozen planes sharing a stream of tasks.
//!
//! Planes start at random points in a square, tasks appear at random points
//! and are first owned by a random plane.  Max-sum reallocation moves them
//! to planes that are closer or less loaded.  Per-tick summaries and periodic
//! plane snapshots are written to `output/small_fleet/` from a background
//! thread.
//!
//! Set `RUST_LOG=debug` to see every rebuild, hand-off and bounce.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sf_agent::PlaneSpec;
use sf_core::{PlaneId, SimConfig, SimRng};
use sf_maxsum::{MaxSum, MaxSumConfig, WorkloadCost};
use sf_mobility::{Navigator, NavigatorConfig};
use sf_output::{CsvWriter, SimOutputObserver, ThreadedWriter};
use sf_sim::{SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const PLANE_COUNT:           u32 = 12;
const SEED:                  u64 = 42;
const AREA_SIDE:             f64 = 200.0; // metres
const COMM_RANGE:            f64 = 70.0;
const SPEED:                 f64 = 1.5;   // metres per tick
const TOTAL_TICKS:           u64 = 600;
const SNAPSHOT_INTERVAL:     u64 = 20;
const TASK_PROBABILITY:      f64 = 0.15;  // chance of a new task each tick
const TASK_TTL:              u64 = 400;
const WORKLOAD_WEIGHT:       f64 = 8.0;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== small_fleet — max-sum task reallocation ===");
    println!("Planes: {PLANE_COUNT}  |  Ticks: {TOTAL_TICKS}  |  Seed: {SEED}");
    println!();

    // 1. Scenario generation.
    let mut rng = SimRng::new(SEED);
    let mut placement = rng.child(1);
    let mut arrivals = rng.child(2);
    let specs: Vec<PlaneSpec> = (0..PLANE_COUNT)
        .map(|_| PlaneSpec::new(placement.point_in_square(AREA_SIDE), COMM_RANGE, SPEED))
        .collect();

    // 2. Protocol parameters.
    let max_sum = MaxSumConfig { cycle_ticks: 10, rounds: 5, workload_weight: WORKLOAD_WEIGHT };
    let navigation = NavigatorConfig { task_ttl: Some(TASK_TTL) };
    let costs = WorkloadCost::new(WORKLOAD_WEIGHT);

    let config = SimConfig { total_ticks: TOTAL_TICKS, seed: SEED, snapshot_interval_ticks: SNAPSHOT_INTERVAL };

    // 3. Build sim.
    let mut sim = SimBuilder::new(config)
        .planes(specs)
        .install(move |id, set| sf_maxsum::install(set, id, &max_sum, &navigation, &costs))
        .build()?;

    // 4. Set up output.
    let dir = Path::new("output/small_fleet");
    std::fs::create_dir_all(dir)?;
    let writer = ThreadedWriter::spawn(CsvWriter::new(dir)?)?;
    let mut obs = SimOutputObserver::new(writer);

    // 5. Run, injecting tasks between ticks.
    let t0 = Instant::now();
    while sim.now() < sim.config.end_tick() {
        if arrivals.gen_bool(TASK_PROBABILITY) {
            let owner = PlaneId(arrivals.gen_range(0..PLANE_COUNT));
            let at = arrivals.point_in_square(AREA_SIDE);
            sim.spawn_task(owner, at)?;
        }
        sim.run_ticks(1, &mut obs)?;
    }
    obs.on_sim_end(sim.now());
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    let ledger = sim.ledger();
    info!(?ledger, "run finished");
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  plane_snapshots.csv : {} rows", obs.snapshot_rows());
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows());
    println!();
    println!(
        "Tasks: {} spawned, {} completed, {} expired, {} handed off, {} bounced, {} open",
        ledger.spawned, ledger.completed, ledger.expired, ledger.handed_off, ledger.returned, ledger.live(),
    );
    println!();

    // 7. Per-plane table.
    println!("{:<7} {:>7} {:>10} {:>9} {:>8} {:>7}", "Plane", "Tasks", "Completed", "Received", "Sent", "Active");
    println!("{}", "-".repeat(53));
    for plane in sim.planes() {
        let done = sim.behavior::<Navigator>(plane.id).map_or(0, Navigator::completed);
        let Some(stats) = sim.behavior::<MaxSum>(plane.id).map(|m| *m.stats()) else {
            continue;
        };
        println!(
            "{:<7} {:>7} {:>10} {:>9} {:>8} {:>7}",
            plane.id.0,
            plane.task_count(),
            done,
            stats.handoffs_received,
            stats.handoffs_sent,
            format!("{}/{}", stats.active_cycles, stats.cycles),
        );
    }

    Ok(())
}

//! Barrier Nav entry point
//!
//! Headless driver: loads an optional JSON config, runs a keyboard-emulating
//! autopilot over a few seeded obstacle fields and prints the run statistics.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use barrier_nav::consts::{AUTOPILOT_CRUISE_SPEED, DEFAULT_MAX_TICKS, DEFAULT_RUNS};
use barrier_nav::metrics::{MetricsTable, RunMetrics, Trajectory};
use barrier_nav::sim::{Frontend, SimState, Snapshot, TickInput, run};
use barrier_nav::{Result, SimConfig};

/// Presses arrow keys to steer the manual velocity toward the goal
struct Autopilot {
    /// Velocity change produced by one key press
    step: f64,
    realtime: bool,
}

impl Autopilot {
    fn axis_keys(current: f64, desired: f64, step: f64) -> (bool, bool) {
        let error = desired - current;
        (error < -step / 2.0, error > step / 2.0)
    }
}

impl Frontend for Autopilot {
    fn poll_input(&mut self, snapshot: &Snapshot<'_>) -> TickInput {
        let desired =
            (snapshot.goal - snapshot.position).normalize_or_zero() * AUTOPILOT_CRUISE_SPEED;
        let current = snapshot.manual_velocity;
        let (left, right) = Self::axis_keys(current.x, desired.x, self.step);
        let (up, down) = Self::axis_keys(current.y, desired.y, self.step);
        TickInput {
            left,
            right,
            up,
            down,
            ..Default::default()
        }
    }

    fn present(&mut self, snapshot: &Snapshot<'_>) {
        if snapshot.tick.is_multiple_of(100) {
            log::debug!(
                "tick {:5} [{}] pos=({:.1}, {:.1}) vel=({:.1}, {:.1})",
                snapshot.tick,
                snapshot.mode.as_str(),
                snapshot.position.x,
                snapshot.position.y,
                snapshot.velocity.x,
                snapshot.velocity.y
            );
        }
    }

    fn pace(&mut self, interval: Duration) {
        if self.realtime {
            std::thread::sleep(interval);
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "barrier-nav",
    about = "Headless CBF navigation runs over seeded obstacle fields",
    version
)]
struct Args {
    /// JSON configuration file; defaults are used when omitted.
    config: Option<PathBuf>,

    /// Sleep out each tick interval instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Number of seeds to run, starting from the configured seed.
    #[arg(long, default_value_t = DEFAULT_RUNS)]
    runs: u64,

    /// Tick limit per run.
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    ticks: u64,
}

fn main() {
    env_logger::init();
    log::info!("Barrier Nav (headless) starting...");

    if let Err(err) = try_main(Args::parse()) {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main(args: Args) -> Result<()> {
    let base = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let mut runs: Vec<RunMetrics> = Vec::new();
    for i in 0..args.runs {
        let config = SimConfig {
            seed: base.seed.wrapping_add(i),
            ..base.clone()
        };
        let mut state = SimState::new(&config)?;
        let mut autopilot = Autopilot {
            step: config.manual_speed * config.manual_dt,
            realtime: args.realtime,
        };
        let mut trajectory = Trajectory::new(format!("seed-{}", config.seed));

        let summary = run(
            &mut state,
            &config,
            &mut autopilot,
            Some(&mut trajectory),
            Some(args.ticks),
        );
        println!(
            "seed {:>4}: {:>5} ticks, {:>4} filtered, {:>4} corrected, {} errors, goal {}",
            config.seed,
            summary.ticks,
            summary.filtered_ticks,
            summary.corrected_ticks,
            summary.errors,
            if summary.reached_goal { "reached" } else { "missed" }
        );

        if let Some(metrics) = RunMetrics::from_trajectory(&trajectory, state.goal, &state.obstacles) {
            runs.push(metrics);
        }
    }

    log::info!("Aggregating {} runs", runs.len());
    let mut groups = BTreeMap::new();
    groups.insert("autopilot".to_string(), runs);
    println!("{}", MetricsTable::aggregate(&groups).to_json()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrier_nav::Point2;
    use barrier_nav::sim::ControlMode;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["barrier-nav"]).unwrap();
        assert!(args.config.is_none());
        assert!(!args.realtime);
        assert_eq!(args.runs, DEFAULT_RUNS);
        assert_eq!(args.ticks, DEFAULT_MAX_TICKS);
    }

    #[test]
    fn test_args_full() {
        let args = Args::try_parse_from([
            "barrier-nav",
            "nav.json",
            "--realtime",
            "--runs",
            "3",
            "--ticks",
            "200",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("nav.json")));
        assert!(args.realtime);
        assert_eq!(args.runs, 3);
        assert_eq!(args.ticks, 200);
    }

    #[test]
    fn test_args_reject_bad_values() {
        assert!(Args::try_parse_from(["barrier-nav", "--runs", "abc"]).is_err());
        assert!(Args::try_parse_from(["barrier-nav", "--ticks", "-1"]).is_err());
        assert!(Args::try_parse_from(["barrier-nav", "--rnus", "3"]).is_err());
    }

    #[test]
    fn test_autopilot_steers_manual_velocity() {
        let snapshot = Snapshot {
            tick: 0,
            position: Point2::new(0.0, 0.0),
            // Applied velocity from a filtered tick must not confuse the steering
            velocity: Point2::new(150.0, 0.0),
            manual_velocity: Point2::ZERO,
            start: Point2::ZERO,
            goal: Point2::new(100.0, 0.0),
            obstacles: &[],
            mode: ControlMode::SafetyFiltered,
        };
        let mut autopilot = Autopilot {
            step: 1.0,
            realtime: false,
        };
        let input = autopilot.poll_input(&snapshot);
        assert!(input.right);
        assert!(!input.left && !input.up && !input.down);
    }
}

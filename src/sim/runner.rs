//! Control loop driver
//!
//! Owns nothing but the loop: the frontend supplies input, draws snapshots
//! and paces ticks; the recorder keeps the trajectory. A stop request is
//! honoured at the top of the next tick, before any state changes.

use std::time::Duration;

use super::state::{ControlMode, SimState, Snapshot};
use super::tick::{TickInput, tick};
use crate::metrics::Trajectory;
use crate::settings::SimConfig;

/// Renderer and input collaborator
pub trait Frontend {
    /// Input for the coming tick
    fn poll_input(&mut self, snapshot: &Snapshot<'_>) -> TickInput;

    /// Draw the state after a tick
    fn present(&mut self, snapshot: &Snapshot<'_>);

    /// Wait out the rest of the tick interval
    fn pace(&mut self, _interval: Duration) {}
}

/// Frontend that never presses a key and never stops on its own
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleFrontend;

impl Frontend for IdleFrontend {
    fn poll_input(&mut self, _snapshot: &Snapshot<'_>) -> TickInput {
        TickInput::default()
    }

    fn present(&mut self, _snapshot: &Snapshot<'_>) {}
}

/// How a run went
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub filtered_ticks: u64,
    pub corrected_ticks: u64,
    /// Ticks whose motion update was aborted
    pub errors: u64,
    pub reached_goal: bool,
    pub stopped_by_user: bool,
}

/// Drive the control loop until a stop request, `max_ticks`, or arrival at the goal
pub fn run<F: Frontend + ?Sized>(
    state: &mut SimState,
    config: &SimConfig,
    frontend: &mut F,
    mut recorder: Option<&mut Trajectory>,
    max_ticks: Option<u64>,
) -> RunSummary {
    let interval = Duration::from_millis(config.tick_interval_ms);
    let mut summary = RunSummary::default();

    log::info!(
        "Run starting at ({:.1}, {:.1}) toward ({:.1}, {:.1}) with {} obstacles",
        state.agent.position.x,
        state.agent.position.y,
        state.goal.x,
        state.goal.y,
        state.obstacles.len()
    );

    if let Some(recorder) = recorder.as_deref_mut() {
        recorder.record(state);
    }

    loop {
        if max_ticks.is_some_and(|max| summary.ticks >= max) {
            break;
        }

        let input = frontend.poll_input(&state.snapshot());
        if input.quit {
            log::info!("Stop requested at tick {}", state.time_ticks);
            summary.stopped_by_user = true;
            break;
        }

        match tick(state, &input, config) {
            Ok(report) => {
                if report.mode == ControlMode::SafetyFiltered {
                    summary.filtered_ticks += 1;
                }
                if report.corrected {
                    summary.corrected_ticks += 1;
                }
            }
            Err(err) => {
                log::warn!("Tick {} aborted, holding position: {err}", state.time_ticks);
                summary.errors += 1;
            }
        }
        summary.ticks += 1;

        if let Some(recorder) = recorder.as_deref_mut() {
            recorder.record(state);
        }
        frontend.present(&state.snapshot());

        if (state.agent.position - state.goal).length() <= config.goal_tolerance {
            log::info!("Goal reached at tick {}", state.time_ticks);
            summary.reached_goal = true;
            break;
        }

        frontend.pace(interval);
    }

    log::info!(
        "Run finished after {} ticks ({} filtered, {} corrected, {} errors)",
        summary.ticks,
        summary.filtered_ticks,
        summary.corrected_ticks,
        summary.errors
    );
    summary
}

//! Fixed timestep control tick
//!
//! One call advances the agent by one control step. The collision predicate
//! picks the mode; manual mode integrates the key-driven velocity, filtered
//! mode integrates the CBF velocity with the smaller safe step. The key-driven
//! velocity is left as it was while filtered, so manual control resumes from
//! where the user left it.

use super::collision::collision;
use super::safety::filter_velocity;
use super::state::{ControlMode, SimState};
use crate::error::Result;
use crate::settings::SimConfig;
use crate::{Point2, clamp_to_arena};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional keys held this tick (screen axes: up is -y)
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// New goal position, clamped into the arena
    pub goal: Option<Point2>,
    /// Stop request, honoured by the runner at the next tick boundary
    pub quit: bool,
}

impl TickInput {
    /// Net key direction as a vector of -1/0/+1 components
    pub fn direction(&self) -> Point2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f64;
        Point2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub mode: ControlMode,
    /// Velocity integrated this tick
    pub velocity: Point2,
    /// Whether the safety filter modified the goal-seeking velocity
    pub corrected: bool,
    /// Barrier value, when the filter ran
    pub h: Option<f64>,
}

/// Advance the simulation by one control step
///
/// On error the agent position is held, the applied velocity is zeroed, and
/// the error is returned; the tick counter still advances.
pub fn tick(state: &mut SimState, input: &TickInput, config: &SimConfig) -> Result<TickReport> {
    if let Some(goal) = input.goal {
        state.set_goal(goal);
    }

    state.time_ticks += 1;

    let colliding = collision(state.agent.position, config.agent_radius, &state.obstacles);
    let mode = ControlMode::from_collision(colliding);
    if mode != state.mode {
        log::info!(
            "Tick {}: {} -> {} at ({:.2}, {:.2})",
            state.time_ticks,
            state.mode.as_str(),
            mode.as_str(),
            state.agent.position.x,
            state.agent.position.y
        );
        state.mode = mode;
    }

    let report = match mode {
        ControlMode::Manual => {
            let step = config.manual_speed * config.manual_dt;
            state.agent.manual_velocity += input.direction() * step;
            state.agent.velocity = state.agent.manual_velocity;
            state.agent.position += state.agent.velocity * config.manual_dt;
            TickReport {
                mode,
                velocity: state.agent.velocity,
                corrected: false,
                h: None,
            }
        }
        ControlMode::SafetyFiltered => {
            let out = match filter_velocity(
                state.agent.position,
                state.goal,
                &state.obstacles,
                &config.safety,
            ) {
                Ok(out) => out,
                Err(err) => {
                    state.agent.velocity = Point2::ZERO;
                    return Err(err);
                }
            };
            if out.corrected() {
                log::debug!(
                    "Tick {}: h={:.4} phi={:.4} nominal=({:.2}, {:.2}) -> ({:.2}, {:.2})",
                    state.time_ticks,
                    out.h,
                    out.phi.unwrap_or_default(),
                    out.nominal.x,
                    out.nominal.y,
                    out.velocity.x,
                    out.velocity.y
                );
            }
            state.agent.velocity = out.velocity;
            state.agent.position += out.velocity * config.safe_dt;
            TickReport {
                mode,
                velocity: out.velocity,
                corrected: out.corrected(),
                h: Some(out.h),
            }
        }
    };

    state.agent.position = clamp_to_arena(state.agent.position, state.arena);
    Ok(report)
}

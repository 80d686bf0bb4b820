//! Simulation state and core types
//!
//! The control loop owns exactly one `SimState`; every other component reads
//! from it by reference.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::generate_obstacles;
use crate::error::Result;
use crate::settings::SimConfig;
use crate::{Point2, clamp_to_arena};

/// A circular obstacle, immutable for the lifetime of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Point2,
    pub radius: f64,
}

impl Obstacle {
    pub const fn new(position: Point2, radius: f64) -> Self {
        Self { position, radius }
    }

    /// Signed distance from `p` to the obstacle surface (negative inside)
    #[inline]
    pub fn clearance(&self, p: Point2) -> f64 {
        (p - self.position).length() - self.radius
    }

    /// Whether two obstacle discs intersect or touch
    #[inline]
    pub fn overlaps(&self, other: &Obstacle) -> bool {
        (self.position - other.position).length() <= self.radius + other.radius
    }
}

/// Single-integrator agent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentState {
    pub position: Point2,
    /// Velocity integrated by the most recent tick
    pub velocity: Point2,
    /// Key-driven velocity; persists across filtered ticks untouched
    pub manual_velocity: Point2,
}

impl AgentState {
    pub fn at(position: Point2) -> Self {
        Self {
            position,
            velocity: Point2::ZERO,
            manual_velocity: Point2::ZERO,
        }
    }
}

/// Which controller drives the agent this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Velocity follows directional input
    #[default]
    Manual,
    /// Velocity comes from the CBF-filtered goal-seeking controller
    SafetyFiltered,
}

impl ControlMode {
    /// The collision predicate is the only transition guard, in both directions
    pub fn from_collision(colliding: bool) -> Self {
        if colliding {
            ControlMode::SafetyFiltered
        } else {
            ControlMode::Manual
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Manual => "manual",
            ControlMode::SafetyFiltered => "safety-filtered",
        }
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Read-only view handed to the renderer each tick
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub tick: u64,
    pub position: Point2,
    pub velocity: Point2,
    pub manual_velocity: Point2,
    pub start: Point2,
    pub goal: Point2,
    pub obstacles: &'a [Obstacle],
    pub mode: ControlMode,
}

/// Complete simulation state (deterministic for a given seed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Seed the obstacle field was drawn from
    pub rng_state: RngState,
    pub agent: AgentState,
    pub start: Point2,
    /// Current target; always inside the arena
    pub goal: Point2,
    pub arena: Point2,
    pub obstacles: Vec<Obstacle>,
    pub mode: ControlMode,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SimState {
    /// Validate the configuration and draw a fresh obstacle field from its seed
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let rng_state = RngState::new(config.seed);
        let mut rng = rng_state.to_rng();
        let obstacles = generate_obstacles(
            config.num_obstacles,
            config.start,
            config.goal,
            config.arena,
            config.obstacle_radius,
            config.max_placement_attempts,
            &mut rng,
        )?;
        log::info!(
            "Generated {} obstacles (seed {}) in {}x{} arena",
            obstacles.len(),
            config.seed,
            config.arena.x,
            config.arena.y
        );
        Ok(Self::assemble(config, rng_state, obstacles))
    }

    /// Build a state around a fixed obstacle set (replays, tests)
    pub fn with_obstacles(config: &SimConfig, obstacles: Vec<Obstacle>) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, RngState::new(config.seed), obstacles))
    }

    fn assemble(config: &SimConfig, rng_state: RngState, obstacles: Vec<Obstacle>) -> Self {
        Self {
            rng_state,
            agent: AgentState::at(config.start),
            start: config.start,
            goal: config.goal,
            arena: config.arena,
            obstacles,
            mode: ControlMode::Manual,
            time_ticks: 0,
        }
    }

    /// Move the goal, clamped into the arena
    pub fn set_goal(&mut self, goal: Point2) {
        self.goal = clamp_to_arena(goal, self.arena);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tick: self.time_ticks,
            position: self.agent.position,
            velocity: self.agent.velocity,
            manual_velocity: self.agent.manual_velocity,
            start: self.start,
            goal: self.goal,
            obstacles: &self.obstacles,
            mode: self.mode,
        }
    }
}

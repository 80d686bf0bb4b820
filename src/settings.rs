//! Simulation configuration
//!
//! Constants only; loaded once from JSON (or defaults) and validated before
//! any simulation state is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{NavError, Result};
use crate::Point2;

/// Gains and margins shared read-only by the potential field, the barrier
/// function and the safety filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyParams {
    /// Attractive gain
    pub k_att: f64,
    /// Repulsive gain
    pub k_rep: f64,
    /// Repulsive influence radius, measured from the obstacle surface
    pub rho_0: f64,
    /// Barrier margin, in (0, 1)
    pub delta: f64,
    /// Class-K barrier gain
    pub alpha: f64,
}

impl Default for SafetyParams {
    fn default() -> Self {
        Self {
            k_att: K_ATT,
            k_rep: K_REP,
            rho_0: RHO_0,
            delta: DELTA,
            alpha: ALPHA,
        }
    }
}

impl SafetyParams {
    /// Reject gains and margins the barrier cannot work with
    pub fn validate(&self) -> Result<()> {
        require_positive("k_att", self.k_att)?;
        require_positive("k_rep", self.k_rep)?;
        require_positive("rho_0", self.rho_0)?;
        require_positive("alpha", self.alpha)?;
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(NavError::invalid_config(format!(
                "delta must lie in (0, 1), got {}",
                self.delta
            )));
        }
        Ok(())
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Arena extent; positions live in [0, arena.x] x [0, arena.y]
    pub arena: Point2,
    pub start: Point2,
    pub goal: Point2,

    // === Obstacle field ===
    pub num_obstacles: usize,
    pub obstacle_radius: f64,
    /// Rejection-sampling attempts allowed per obstacle
    pub max_placement_attempts: u32,

    // === Agent ===
    pub agent_radius: f64,

    // === Timing ===
    /// Pacing delay between ticks (ms)
    pub tick_interval_ms: u64,
    /// Integration step while in manual mode
    pub manual_dt: f64,
    /// Integration step while safety-filtered
    pub safe_dt: f64,
    /// Velocity change per key press is `manual_speed * manual_dt`
    pub manual_speed: f64,
    /// Distance to the goal at which a run counts as arrived
    pub goal_tolerance: f64,

    pub safety: SafetyParams,

    /// Obstacle field seed
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena: Point2::new(ARENA_WIDTH, ARENA_HEIGHT),
            start: START,
            goal: GOAL,

            num_obstacles: NUM_OBSTACLES,
            obstacle_radius: OBSTACLE_RADIUS,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,

            agent_radius: AGENT_RADIUS,

            tick_interval_ms: TICK_INTERVAL_MS,
            manual_dt: MANUAL_DT,
            safe_dt: SAFE_DT,
            manual_speed: MANUAL_SPEED,
            goal_tolerance: GOAL_TOLERANCE,

            safety: SafetyParams::default(),

            seed: DEFAULT_SEED,
        }
    }
}

impl SimConfig {
    /// Check every value that later code assumes to be in range
    pub fn validate(&self) -> Result<()> {
        self.safety.validate()?;

        require_positive("arena.x", self.arena.x)?;
        require_positive("arena.y", self.arena.y)?;
        require_positive("obstacle_radius", self.obstacle_radius)?;
        require_positive("agent_radius", self.agent_radius)?;
        require_positive("manual_dt", self.manual_dt)?;
        require_positive("safe_dt", self.safe_dt)?;
        require_finite("manual_speed", self.manual_speed)?;
        require_positive("goal_tolerance", self.goal_tolerance)?;

        if self.max_placement_attempts == 0 && self.num_obstacles > 0 {
            return Err(NavError::invalid_config(
                "max_placement_attempts must be at least 1",
            ));
        }
        if !self.contains(self.start) {
            return Err(NavError::invalid_config(format!(
                "start {} lies outside the arena",
                self.start
            )));
        }
        if !self.contains(self.goal) {
            return Err(NavError::invalid_config(format!(
                "goal {} lies outside the arena",
                self.goal
            )));
        }

        if self.safe_dt > self.manual_dt {
            log::warn!(
                "safe_dt ({}) exceeds manual_dt ({}); filtered motion will be coarser than manual",
                self.safe_dt,
                self.manual_dt
            );
        }
        Ok(())
    }

    /// Whether a point lies inside the arena (bounds inclusive)
    pub fn contains(&self, p: Point2) -> bool {
        p.is_finite() && p.x >= 0.0 && p.y >= 0.0 && p.x <= self.arena.x && p.y <= self.arena.y
    }

    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the configuration as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(NavError::invalid_config(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(NavError::invalid_config(format!("{name} must be finite, got {value}")))
    }
}

//! Barrier Nav - safe point-agent navigation among circular obstacles
//!
//! Core modules:
//! - `sim`: Deterministic simulation (potential field, barrier function, safety filter, control loop)
//! - `settings`: Validated configuration surface
//! - `metrics`: Trajectory recording and post-hoc run statistics
//! - `error`: Error taxonomy shared by all of the above

pub mod error;
pub mod metrics;
pub mod settings;
pub mod sim;

pub use error::{NavError, Result};
pub use settings::{SafetyParams, SimConfig};

use glam::DVec2;

/// 2D position, velocity or gradient
pub type Point2 = DVec2;

/// Default configuration constants
pub mod consts {
    use super::Point2;

    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: f64 = 500.0;
    pub const ARENA_HEIGHT: f64 = 500.0;

    /// Default start and goal
    pub const START: Point2 = Point2::new(50.0, 50.0);
    pub const GOAL: Point2 = Point2::new(450.0, 450.0);

    /// Obstacle field defaults
    pub const NUM_OBSTACLES: usize = 5;
    pub const OBSTACLE_RADIUS: f64 = 50.0;
    /// Rejection-sampling budget per obstacle before giving up
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Agent footprint used by the collision predicate
    pub const AGENT_RADIUS: f64 = 5.0;

    /// Potential field gains
    pub const K_ATT: f64 = 1.0;
    pub const K_REP: f64 = 1.0;
    /// Repulsive influence radius (distance from obstacle surface)
    pub const RHO_0: f64 = 5.0;
    /// Barrier safety margin
    pub const DELTA: f64 = 0.001;
    /// Class-K barrier gain
    pub const ALPHA: f64 = 0.1;

    /// Pacing delay between ticks (10 Hz)
    pub const TICK_INTERVAL_MS: u64 = 100;
    /// Integration step in manual mode
    pub const MANUAL_DT: f64 = 0.1;
    /// Integration step in safety-filtered mode
    pub const SAFE_DT: f64 = 0.01;
    /// Manual velocity change per key press is MANUAL_SPEED * MANUAL_DT
    pub const MANUAL_SPEED: f64 = 10.0;

    /// Distance to the goal counted as arrival
    pub const GOAL_TOLERANCE: f64 = 1.0;

    /// Headless driver: speed the autopilot holds in manual mode
    pub const AUTOPILOT_CRUISE_SPEED: f64 = 20.0;
    pub const DEFAULT_RUNS: u64 = 5;
    pub const DEFAULT_MAX_TICKS: u64 = 5000;

    /// Distances below this are treated as exactly zero
    pub const GEOMETRY_EPSILON: f64 = 1e-12;

    pub const DEFAULT_SEED: u64 = 42;
}

/// Clamp a point component-wise into `[0, arena.x] x [0, arena.y]`
#[inline]
pub fn clamp_to_arena(p: Point2, arena: Point2) -> Point2 {
    p.clamp(Point2::ZERO, arena)
}

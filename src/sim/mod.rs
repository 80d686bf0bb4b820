//! Deterministic simulation module
//!
//! All navigation logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacle index)
//! - No rendering or platform dependencies

pub mod barrier;
pub mod collision;
pub mod field;
pub mod potential;
pub mod runner;
pub mod safety;
pub mod state;
pub mod tick;

pub use barrier::{BarrierValue, barrier, barrier_gradient};
pub use collision::{collision, first_collision, min_clearance};
pub use field::generate_obstacles;
pub use potential::{
    attractive_gradient, attractive_potential, repulsive_gradient, repulsive_potential, rho,
};
pub use runner::{Frontend, IdleFrontend, RunSummary, run};
pub use safety::{FilterOutput, filter_velocity, v_star};
pub use state::{AgentState, ControlMode, Obstacle, RngState, SimState, Snapshot};
pub use tick::{TickInput, TickReport, tick};

//! Barrier function built on the repulsive potential
//!
//! `h(x) = 1 / (1 + U_rep(x)) - delta` sits at `1 - delta` far from every
//! obstacle and falls toward `-delta` as the agent closes on a surface.

use crate::Point2;
use crate::error::Result;
use crate::settings::SafetyParams;

use super::potential::{repulsive_gradient, repulsive_potential};
use super::state::Obstacle;

/// Barrier value and gradient at one position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierValue {
    pub h: f64,
    pub gradient: Point2,
}

impl BarrierValue {
    /// Evaluate `h` and `grad h` sharing a single pass over the repulsive field
    pub fn at(x: Point2, obstacles: &[Obstacle], params: &SafetyParams) -> Result<Self> {
        let u_rep = repulsive_potential(x, obstacles, params)?;
        let grad_u_rep = repulsive_gradient(x, obstacles, params)?;
        let denom = 1.0 + u_rep;
        Ok(Self {
            h: 1.0 / denom - params.delta,
            gradient: -grad_u_rep / (denom * denom),
        })
    }

    /// Whether the barrier gradient carries no obstacle influence
    #[inline]
    pub fn is_inactive(&self) -> bool {
        self.gradient.length_squared() == 0.0
    }
}

/// `h(x)`
pub fn barrier(x: Point2, obstacles: &[Obstacle], params: &SafetyParams) -> Result<f64> {
    let u_rep = repulsive_potential(x, obstacles, params)?;
    Ok(1.0 / (1.0 + u_rep) - params.delta)
}

/// `grad h(x) = -grad U_rep(x) / (1 + U_rep(x))^2`
pub fn barrier_gradient(x: Point2, obstacles: &[Obstacle], params: &SafetyParams) -> Result<Point2> {
    Ok(BarrierValue::at(x, obstacles, params)?.gradient)
}

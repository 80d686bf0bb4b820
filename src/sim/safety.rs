//! CBF safety filter over the attractive field
//!
//! The nominal velocity `v_att = -grad U_att` is kept whenever it already
//! satisfies `<grad h, v> + alpha * h >= 0`. Otherwise it is projected onto
//! that half-plane, which is the closed-form solution of
//!
//! ```text
//! minimize |v - v_att|^2  subject to  <grad h, v> + alpha * h >= 0
//! ```
//!
//! for a single linear constraint: `v = v_att - phi / |grad h|^2 * grad h`.

use crate::Point2;
use crate::error::Result;
use crate::settings::SafetyParams;

use super::barrier::BarrierValue;
use super::potential::attractive_gradient;
use super::state::Obstacle;

/// Everything the filter computed for one position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOutput {
    /// Commanded velocity
    pub velocity: Point2,
    /// Goal-seeking velocity before filtering
    pub nominal: Point2,
    /// Barrier value at the query position
    pub h: f64,
    /// Constraint slack for the nominal velocity; `None` when the barrier is inactive
    pub phi: Option<f64>,
}

impl FilterOutput {
    /// Whether the nominal velocity had to be corrected
    pub fn corrected(&self) -> bool {
        self.phi.is_some_and(|phi| phi < 0.0)
    }
}

/// Run the safety filter at `x`, keeping the intermediate quantities
pub fn filter_velocity(
    x: Point2,
    goal: Point2,
    obstacles: &[Obstacle],
    params: &SafetyParams,
) -> Result<FilterOutput> {
    let nominal = -attractive_gradient(x, goal, params);
    let barrier = BarrierValue::at(x, obstacles, params)?;

    if barrier.is_inactive() {
        return Ok(FilterOutput {
            velocity: nominal,
            nominal,
            h: barrier.h,
            phi: None,
        });
    }

    let grad = barrier.gradient;
    let phi = grad.dot(nominal) + params.alpha * barrier.h;
    let velocity = if phi < 0.0 {
        nominal + (-phi / grad.length_squared()) * grad
    } else {
        nominal
    };

    Ok(FilterOutput {
        velocity,
        nominal,
        h: barrier.h,
        phi: Some(phi),
    })
}

/// Commanded safe velocity at `x`
pub fn v_star(x: Point2, goal: Point2, obstacles: &[Obstacle], params: &SafetyParams) -> Result<Point2> {
    filter_velocity(x, goal, obstacles, params).map(|out| out.velocity)
}

//! Collision predicate between the agent disc and the obstacle discs
//!
//! This predicate is what switches the control loop into safety-filtered mode.

use crate::Point2;

use super::state::Obstacle;

/// Index of the first obstacle whose disc overlaps the agent disc
pub fn first_collision(position: Point2, agent_radius: f64, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|obstacle| (position - obstacle.position).length() < agent_radius + obstacle.radius)
}

/// True when the agent disc strictly overlaps any obstacle disc
#[inline]
pub fn collision(position: Point2, agent_radius: f64, obstacles: &[Obstacle]) -> bool {
    first_collision(position, agent_radius, obstacles).is_some()
}

/// Smallest signed surface distance from `position` to any obstacle
pub fn min_clearance(position: Point2, obstacles: &[Obstacle]) -> Option<f64> {
    obstacles
        .iter()
        .map(|obstacle| obstacle.clearance(position))
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

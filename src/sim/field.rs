//! Obstacle field generation
//!
//! Rejection sampling with a fixed radius: a candidate centre is drawn
//! uniformly in the arena and kept only if its disc clears the start point,
//! the goal point and every obstacle accepted so far.

use rand::Rng;

use super::state::Obstacle;
use crate::Point2;
use crate::error::{NavError, Result};

/// Place `count` non-overlapping obstacles of `radius`
///
/// Each obstacle gets at most `max_attempts` draws; exhausting them fails with
/// `InfeasibleDensity` instead of looping forever on a crowded arena.
pub fn generate_obstacles<R: Rng>(
    count: usize,
    start: Point2,
    goal: Point2,
    arena: Point2,
    radius: f64,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Vec<Obstacle>> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(NavError::invalid_config(format!(
            "obstacle radius must be positive, got {radius}"
        )));
    }
    if !(arena.is_finite() && arena.x > 0.0 && arena.y > 0.0) {
        return Err(NavError::invalid_config(format!(
            "arena must have positive finite extent, got {arena}"
        )));
    }

    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(count);
    let mut total_attempts: u64 = 0;

    while obstacles.len() < count {
        let mut placed = false;
        for attempt in 1..=max_attempts {
            let position = Point2::new(rng.random_range(0.0..arena.x), rng.random_range(0.0..arena.y));
            let candidate = Obstacle::new(position, radius);
            total_attempts += 1;

            if accepts(&candidate, start, goal, &obstacles) {
                log::debug!(
                    "Obstacle {} at ({:.1}, {:.1}) after {} attempts",
                    obstacles.len(),
                    position.x,
                    position.y,
                    attempt
                );
                obstacles.push(candidate);
                placed = true;
                break;
            }
        }

        if !placed {
            log::warn!(
                "Gave up placing obstacle {} of {} after {} attempts",
                obstacles.len() + 1,
                count,
                max_attempts
            );
            return Err(NavError::infeasible_density(count, obstacles.len(), max_attempts));
        }
    }

    log::debug!("Placed {} obstacles in {} draws", obstacles.len(), total_attempts);
    Ok(obstacles)
}

/// Acceptance test: clear of start, clear of goal, clear of every accepted disc
fn accepts(candidate: &Obstacle, start: Point2, goal: Point2, accepted: &[Obstacle]) -> bool {
    (candidate.position - start).length() > candidate.radius
        && (candidate.position - goal).length() > candidate.radius
        && accepted.iter().all(|other| !candidate.overlaps(other))
}

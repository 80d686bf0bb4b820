//! Attractive and repulsive potential fields
//!
//! The repulsive field has compact support: an obstacle contributes only while
//! the agent is within `rho_0` of its surface. Inclusion differs at the edge:
//! the potential counts `rho < rho_0`, the gradient counts `rho <= rho_0`.
//! Both terms vanish at `rho == rho_0` so the values agree.

use crate::Point2;
use crate::consts::GEOMETRY_EPSILON;
use crate::error::{NavError, Result};
use crate::settings::SafetyParams;

use super::state::Obstacle;

/// Signed distance from `x` to the obstacle surface (negative inside)
#[inline]
pub fn rho(x: Point2, obstacle: &Obstacle) -> f64 {
    obstacle.clearance(x)
}

/// `0.5 * K_att * |x - goal|^2`
#[inline]
pub fn attractive_potential(x: Point2, goal: Point2, params: &SafetyParams) -> f64 {
    0.5 * params.k_att * (x - goal).length_squared()
}

/// `K_att * (x - goal)`
#[inline]
pub fn attractive_gradient(x: Point2, goal: Point2, params: &SafetyParams) -> Point2 {
    params.k_att * (x - goal)
}

/// Sum of `0.5 * K_rep * (1/rho - 1/rho_0)^2` over obstacles with `rho < rho_0`
pub fn repulsive_potential(x: Point2, obstacles: &[Obstacle], params: &SafetyParams) -> Result<f64> {
    let mut total = 0.0;
    for (index, obstacle) in obstacles.iter().enumerate() {
        let rho_x = rho(x, obstacle);
        if rho_x < params.rho_0 {
            let (_, rho_x) = checked_geometry(index, x, obstacle)?;
            let excess = 1.0 / rho_x - 1.0 / params.rho_0;
            total += 0.5 * params.k_rep * excess * excess;
        }
    }
    Ok(total)
}

/// Gradient of the repulsive potential with respect to the agent position
///
/// Each obstacle with `rho <= rho_0` adds
/// `K_rep * (1/rho - 1/rho_0) * (-1/rho^2) * (x - centre) / |x - centre|`.
pub fn repulsive_gradient(
    x: Point2,
    obstacles: &[Obstacle],
    params: &SafetyParams,
) -> Result<Point2> {
    let mut total = Point2::ZERO;
    for (index, obstacle) in obstacles.iter().enumerate() {
        let rho_x = rho(x, obstacle);
        if rho_x <= params.rho_0 {
            let (distance, rho_x) = checked_geometry(index, x, obstacle)?;
            let outward = (x - obstacle.position) / distance;
            let excess = 1.0 / rho_x - 1.0 / params.rho_0;
            total += params.k_rep * excess * (-1.0 / (rho_x * rho_x)) * outward;
        }
    }
    Ok(total)
}

/// Centre distance and surface distance, or an error where the field is singular
fn checked_geometry(index: usize, x: Point2, obstacle: &Obstacle) -> Result<(f64, f64)> {
    let distance = (x - obstacle.position).length();
    let rho_x = distance - obstacle.radius;
    if !distance.is_finite() || distance < GEOMETRY_EPSILON || rho_x.abs() < GEOMETRY_EPSILON {
        return Err(NavError::degenerate_geometry(index, distance, rho_x));
    }
    Ok((distance, rho_x))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SafetyParams {
        SafetyParams::default()
    }

    fn obstacle() -> Obstacle {
        Obstacle::new(Point2::new(250.0, 250.0), 50.0)
    }

    #[test]
    fn test_attractive_field() {
        let p = SafetyParams {
            k_att: 2.0,
            ..params()
        };
        let x = Point2::new(3.0, 4.0);
        let goal = Point2::ZERO;
        assert!((attractive_potential(x, goal, &p) - 25.0).abs() < 1e-12);
        assert_eq!(attractive_gradient(x, goal, &p), Point2::new(6.0, 8.0));
    }

    #[test]
    fn test_repulsive_zero_outside_influence() {
        let x = Point2::new(300.0, 300.0); // rho ~ 20.7
        let obstacles = [obstacle()];
        assert_eq!(repulsive_potential(x, &obstacles, &params()).unwrap(), 0.0);
        assert_eq!(repulsive_gradient(x, &obstacles, &params()).unwrap(), Point2::ZERO);
    }

    #[test]
    fn test_repulsive_inside_influence() {
        let x = Point2::new(302.0, 250.0); // rho = 2
        let obstacles = [obstacle()];
        let u = repulsive_potential(x, &obstacles, &params()).unwrap();
        // 0.5 * (1/2 - 1/5)^2
        assert!((u - 0.045).abs() < 1e-12);

        let g = repulsive_gradient(x, &obstacles, &params()).unwrap();
        // 0.3 * (-1/4) along +x
        assert!((g.x + 0.075).abs() < 1e-12);
        assert!(g.y.abs() < 1e-12);
    }

    #[test]
    fn test_boundary_inclusion_at_rho_0() {
        let x = Point2::new(305.0, 250.0); // rho == rho_0 exactly
        let obstacles = [obstacle()];
        assert_eq!(repulsive_potential(x, &obstacles, &params()).unwrap(), 0.0);
        // Included by the gradient, but its excess term is zero
        assert_eq!(repulsive_gradient(x, &obstacles, &params()).unwrap(), Point2::ZERO);
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let x = Point2::new(295.0, 275.0); // rho ~ 1.48
        let obstacles = [obstacle()];
        let p = params();
        let h = 1e-6;
        let du_dx = (repulsive_potential(x + Point2::X * h, &obstacles, &p).unwrap()
            - repulsive_potential(x - Point2::X * h, &obstacles, &p).unwrap())
            / (2.0 * h);
        let du_dy = (repulsive_potential(x + Point2::Y * h, &obstacles, &p).unwrap()
            - repulsive_potential(x - Point2::Y * h, &obstacles, &p).unwrap())
            / (2.0 * h);
        let g = repulsive_gradient(x, &obstacles, &p).unwrap();
        assert!((g.x - du_dx).abs() < 1e-6 * g.length().max(1.0));
        assert!((g.y - du_dy).abs() < 1e-6 * g.length().max(1.0));
    }

    #[test]
    fn test_degenerate_at_centre() {
        let obstacles = [obstacle()];
        let err = repulsive_gradient(Point2::new(250.0, 250.0), &obstacles, &params()).unwrap_err();
        assert!(matches!(err, NavError::DegenerateGeometry { obstacle: 0, .. }));
    }

    #[test]
    fn test_degenerate_on_surface() {
        let obstacles = [Obstacle::new(Point2::new(100.0, 100.0), 10.0), obstacle()];
        let on_surface = Point2::new(300.0, 250.0);
        let err = repulsive_potential(on_surface, &obstacles, &params()).unwrap_err();
        assert!(matches!(err, NavError::DegenerateGeometry { obstacle: 1, .. }));
        let err = repulsive_gradient(on_surface, &obstacles, &params()).unwrap_err();
        assert!(matches!(err, NavError::DegenerateGeometry { obstacle: 1, .. }));
    }

    #[test]
    fn test_contributions_sum() {
        let a = Obstacle::new(Point2::new(0.0, 0.0), 10.0);
        let b = Obstacle::new(Point2::new(24.0, 0.0), 10.0);
        let x = Point2::new(12.0, 0.0); // rho = 2 to both
        let g = repulsive_gradient(x, &[a, b], &params()).unwrap();
        // Symmetric pushes cancel
        assert!(g.length() < 1e-12);
        let u = repulsive_potential(x, &[a, b], &params()).unwrap();
        assert!((u - 0.09).abs() < 1e-12);
    }
}

//! Property-based tests for the navigation core.
//!
//! Run with: cargo test --test proptest_nav

use barrier_nav::consts::*;
use barrier_nav::sim::{
    BarrierValue, Obstacle, RngState, SimState, TickInput, filter_velocity, generate_obstacles,
    rho, tick, v_star,
};
use barrier_nav::{NavError, Point2, SafetyParams, SimConfig};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = Point2> {
    (0.0..ARENA_WIDTH, 0.0..ARENA_HEIGHT).prop_map(|(x, y)| Point2::new(x, y))
}

fn arb_params() -> impl Strategy<Value = SafetyParams> {
    (0.1..5.0f64, 0.1..5.0f64, 1.0..20.0f64, 0.0001..0.5f64, 0.01..2.0f64).prop_map(
        |(k_att, k_rep, rho_0, delta, alpha)| SafetyParams {
            k_att,
            k_rep,
            rho_0,
            delta,
            alpha,
        },
    )
}

fn fixed_obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle::new(Point2::new(250.0, 250.0), 50.0),
        Obstacle::new(Point2::new(120.0, 380.0), 40.0),
        Obstacle::new(Point2::new(390.0, 110.0), 35.0),
    ]
}

/// A point just outside obstacle 0's surface, inside the influence band
fn arb_near_surface(rho_0: f64) -> impl Strategy<Value = Point2> {
    (0.0..std::f64::consts::TAU, 0.01..rho_0).prop_map(|(theta, gap)| {
        Point2::new(250.0, 250.0) + Point2::new(theta.cos(), theta.sin()) * (50.0 + gap)
    })
}

// =============================================================================
// Obstacle field
// =============================================================================

proptest! {
    #[test]
    fn generated_fields_never_overlap(
        seed in any::<u64>(),
        count in 0usize..8,
        radius in 5.0..50.0f64,
    ) {
        let mut rng = RngState::new(seed).to_rng();
        match generate_obstacles(count, START, GOAL, Point2::new(ARENA_WIDTH, ARENA_HEIGHT), radius, 2000, &mut rng) {
            Ok(obstacles) => {
                prop_assert_eq!(obstacles.len(), count);
                for (i, a) in obstacles.iter().enumerate() {
                    prop_assert!((a.position - START).length() > a.radius);
                    prop_assert!((a.position - GOAL).length() > a.radius);
                    for b in &obstacles[i + 1..] {
                        prop_assert!((a.position - b.position).length() > a.radius + b.radius);
                    }
                }
            }
            Err(NavError::InfeasibleDensity { requested, placed, .. }) => {
                prop_assert_eq!(requested, count);
                prop_assert!(placed < count);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

// =============================================================================
// Safety filter
// =============================================================================

proptest! {
    #[test]
    fn outside_influence_returns_nominal(x in arb_point(), goal in arb_point(), params in arb_params()) {
        let obstacles = fixed_obstacles();
        prop_assume!(obstacles.iter().all(|o| rho(x, o) >= params.rho_0));

        let v = v_star(x, goal, &obstacles, &params).unwrap();
        prop_assert_eq!(v, -(params.k_att * (x - goal)));
    }

    #[test]
    fn correction_is_tight_and_minimal(
        params in arb_params(),
        goal in arb_point(),
        seed_point in (0.0..std::f64::consts::TAU, 0.01..1.0f64),
    ) {
        let (theta, frac) = seed_point;
        let x = Point2::new(250.0, 250.0)
            + Point2::new(theta.cos(), theta.sin()) * (50.0 + 0.01 + frac * (params.rho_0 - 0.02));
        let obstacles = fixed_obstacles();
        let out = filter_velocity(x, goal, &obstacles, &params).unwrap();
        let barrier = BarrierValue::at(x, &obstacles, &params).unwrap();
        let phi = out.phi.unwrap();

        if phi >= 0.0 {
            prop_assert_eq!(out.velocity, out.nominal);
        } else {
            let slack = barrier.gradient.dot(out.velocity) + params.alpha * barrier.h;
            let scale = barrier.gradient.length() * out.nominal.length() + params.alpha;
            prop_assert!(slack.abs() <= 1e-9 * scale, "slack {} scale {}", slack, scale);
            // Only the component along grad h changes
            let delta_v = out.velocity - out.nominal;
            let tolerance = 1e-9 * (delta_v.length() + out.nominal.length()) * barrier.gradient.length();
            prop_assert!(delta_v.perp_dot(barrier.gradient).abs() <= tolerance);
        }
    }

    #[test]
    fn v_star_is_pure(x in arb_near_surface(5.0), goal in arb_point()) {
        let params = SafetyParams::default();
        let obstacles = fixed_obstacles();
        let a = v_star(x, goal, &obstacles, &params).unwrap();
        let b = v_star(x, goal, &obstacles, &params).unwrap();
        prop_assert_eq!(a, b);
    }
}

// =============================================================================
// Control loop
// =============================================================================

proptest! {
    #[test]
    fn tick_keeps_agent_in_arena(
        start in arb_point(),
        velocity in (-2000.0..2000.0f64, -2000.0..2000.0f64),
        keys in any::<[bool; 4]>(),
    ) {
        let config = SimConfig::default();
        let mut state = SimState::with_obstacles(&config, Vec::new()).unwrap();
        state.agent.position = start;
        state.agent.manual_velocity = Point2::new(velocity.0, velocity.1);
        let input = TickInput {
            left: keys[0],
            right: keys[1],
            up: keys[2],
            down: keys[3],
            ..Default::default()
        };
        tick(&mut state, &input, &config).unwrap();
        prop_assert!(config.contains(state.agent.position));
    }
}

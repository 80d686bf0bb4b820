//! Error types for navigation, field generation and configuration.

use thiserror::Error;

/// Errors surfaced by the navigation core.
#[derive(Debug, Error)]
pub enum NavError {
    /// Agent sits on an obstacle centre or exactly on its surface, where the
    /// repulsive gradient is undefined.
    #[error(
        "degenerate geometry at obstacle {obstacle}: centre distance {distance}, surface distance {clearance}"
    )]
    DegenerateGeometry {
        /// Index of the offending obstacle.
        obstacle: usize,
        /// Distance from the agent to the obstacle centre.
        distance: f64,
        /// Signed distance from the agent to the obstacle surface.
        clearance: f64,
    },

    /// The obstacle field could not be placed without overlap.
    #[error("infeasible density: placed {placed} of {requested} obstacles after {attempts} attempts")]
    InfeasibleDensity {
        /// Number of obstacles asked for.
        requested: usize,
        /// Number placed before the budget ran out.
        placed: usize,
        /// Attempts spent on the obstacle that failed.
        attempts: u32,
    },

    /// Out-of-range configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read or written.
    #[error("configuration io: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file is not valid JSON for `SimConfig`.
    #[error("configuration parse: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl NavError {
    /// Creates a degenerate geometry error.
    #[must_use]
    pub const fn degenerate_geometry(obstacle: usize, distance: f64, clearance: f64) -> Self {
        Self::DegenerateGeometry {
            obstacle,
            distance,
            clearance,
        }
    }

    /// Creates an infeasible density error.
    #[must_use]
    pub const fn infeasible_density(requested: usize, placed: usize, attempts: u32) -> Self {
        Self::InfeasibleDensity {
            requested,
            placed,
            attempts,
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// Result type for navigation operations.
pub type Result<T> = std::result::Result<T, NavError>;

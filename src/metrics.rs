//! Run recording and post-hoc statistics
//!
//! Nothing here feeds back into the controller. A `Trajectory` is the ordered
//! per-tick history of one run, `RunMetrics` condenses it, and `MetricsTable`
//! aggregates labeled groups of runs into max/min/mean/std per metric.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Point2;
use crate::error::Result;
use crate::sim::collision::min_clearance;
use crate::sim::state::{ControlMode, Obstacle, SimState};

/// State of the agent at the end of one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub tick: u64,
    pub position: Point2,
    pub velocity: Point2,
    pub mode: ControlMode,
}

/// Ordered per-tick history of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trajectory {
    pub label: String,
    pub records: Vec<TrajectoryRecord>,
}

impl Trajectory {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            records: Vec::new(),
        }
    }

    pub fn record(&mut self, state: &SimState) {
        self.records.push(TrajectoryRecord {
            tick: state.time_ticks,
            position: state.agent.position,
            velocity: state.agent.velocity,
            mode: state.mode,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One JSON object per record, newline separated
    pub fn to_json_lines(&self) -> Result<String> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Summary numbers for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Sum of distances between consecutive positions
    pub path_length: f64,
    pub duration_ticks: u64,
    pub mean_speed: f64,
    pub max_speed: f64,
    /// Smallest surface distance seen; `None` without obstacles
    pub min_clearance: Option<f64>,
    pub final_goal_distance: f64,
    /// Share of ticks spent safety-filtered
    pub filtered_fraction: f64,
}

impl RunMetrics {
    /// Condense a trajectory; `None` when it holds no records
    pub fn from_trajectory(trajectory: &Trajectory, goal: Point2, obstacles: &[Obstacle]) -> Option<Self> {
        let first = trajectory.records.first()?;
        let last = trajectory.records.last()?;

        let path_length: f64 = trajectory
            .records
            .windows(2)
            .map(|pair| (pair[1].position - pair[0].position).length())
            .sum();

        let speeds: Vec<f64> = trajectory.records.iter().map(|r| r.velocity.length()).collect();
        let count = speeds.len() as f64;
        let mean_speed = speeds.iter().sum::<f64>() / count;
        let max_speed = speeds.iter().copied().fold(0.0, f64::max);

        let closest = trajectory
            .records
            .iter()
            .filter_map(|r| min_clearance(r.position, obstacles))
            .reduce(f64::min);

        let filtered = trajectory
            .records
            .iter()
            .filter(|r| r.mode == ControlMode::SafetyFiltered)
            .count() as f64;

        Some(Self {
            path_length,
            duration_ticks: last.tick - first.tick,
            mean_speed,
            max_speed,
            min_clearance: closest,
            final_goal_distance: (last.position - goal).length(),
            filtered_fraction: filtered / count,
        })
    }

    /// Named numeric fields, skipping absent ones
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        let mut fields = vec![
            ("path_length", self.path_length),
            ("duration_ticks", self.duration_ticks as f64),
            ("mean_speed", self.mean_speed),
            ("max_speed", self.max_speed),
            ("final_goal_distance", self.final_goal_distance),
            ("filtered_fraction", self.filtered_fraction),
        ];
        if let Some(clearance) = self.min_clearance {
            fields.push(("min_clearance", clearance));
        }
        fields
    }
}

/// Aggregate of one metric across runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1); zero for a single sample
    pub std: f64,
}

impl FieldStats {
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std = if samples.len() > 1 {
            let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };
        Some(Self {
            max: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: samples.iter().copied().fold(f64::INFINITY, f64::min),
            mean,
            std,
        })
    }
}

/// Per-label, per-metric statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsTable {
    pub groups: BTreeMap<String, BTreeMap<String, FieldStats>>,
}

impl MetricsTable {
    /// Aggregate each labeled group of runs; empty groups are skipped
    pub fn aggregate(runs: &BTreeMap<String, Vec<RunMetrics>>) -> Self {
        let mut groups = BTreeMap::new();
        for (label, metrics) in runs {
            if metrics.is_empty() {
                log::warn!("No runs recorded for {label}");
                continue;
            }

            let mut samples: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();
            for run in metrics {
                for (name, value) in run.fields() {
                    samples.entry(name).or_default().push(value);
                }
            }

            let stats: BTreeMap<String, FieldStats> = samples
                .into_iter()
                .filter_map(|(name, values)| {
                    FieldStats::from_samples(&values).map(|s| (name.to_string(), s))
                })
                .collect();
            groups.insert(label.clone(), stats);
        }
        Self { groups }
    }

    pub fn get(&self, label: &str, metric: &str) -> Option<&FieldStats> {
        self.groups.get(label)?.get(metric)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

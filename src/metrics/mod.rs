//! Metrics for the ranked system evaluator
//!
//! This module collects Prometheus metrics about simulated games and epoch
//! convergence. Metrics are exported as text on demand; there is no HTTP
//! endpoint.

pub mod collector;

pub use collector::{EvaluationMetrics, MetricsCollector, MetricsTimer, SimulationMetrics};

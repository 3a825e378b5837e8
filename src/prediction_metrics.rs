use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::grade_prediction::grade_mapping::Grade;

/// How one evaluation ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Graded(Grade),
    ValidationFailed,
    ClassifierFailed,
    MappingFailed,
    Halted,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeCounts {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub successful: u64,
    pub grades: GradeCounts,
    pub validation_failures: u64,
    pub classifier_failures: u64,
    pub mapping_failures: u64,
    pub rejected_while_halted: u64,
    pub average_response_time_ms: f64,
    pub uptime_secs: f64,
}

#[derive(Debug, Default)]
struct Counters {
    snapshot: MetricsSnapshot,
    total_response_time: Duration,
}

/// Outcome counters and response times of the prediction service
pub struct PredictionMetrics {
    started_at: Instant,
    counters: Mutex<Counters>,
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionMetrics {
    pub fn new() -> Self {
        PredictionMetrics {
            started_at: Instant::now(),
            counters: Mutex::new(Counters::default()),
        }
    }

    fn counters(&self) -> MutexGuard<'_, Counters> {
        // counters stay usable even if a recording thread panicked
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(&self, outcome: Outcome, response_time: Duration) {
        let mut counters = self.counters();
        counters.total_response_time += response_time;

        let snapshot = &mut counters.snapshot;
        snapshot.total_requests += 1;
        match outcome {
            Outcome::Graded(grade) => {
                snapshot.successful += 1;
                match grade {
                    Grade::Low => snapshot.grades.low += 1,
                    Grade::Medium => snapshot.grades.medium += 1,
                    Grade::High => snapshot.grades.high += 1,
                }
            }
            Outcome::ValidationFailed => snapshot.validation_failures += 1,
            Outcome::ClassifierFailed => snapshot.classifier_failures += 1,
            Outcome::MappingFailed => snapshot.mapping_failures += 1,
            Outcome::Halted => snapshot.rejected_while_halted += 1,
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self.counters();
        let mut snapshot = counters.snapshot.clone();
        snapshot.average_response_time_ms = if snapshot.total_requests > 0 {
            counters.total_response_time.as_secs_f64() * 1000.0 / snapshot.total_requests as f64
        } else {
            0.0
        };
        snapshot.uptime_secs = self.started_at.elapsed().as_secs_f64();
        snapshot
    }

    pub fn log_summary(&self) {
        let snapshot = self.snapshot();
        info!("=== Prediction summary ===");
        info!("Total requests: {}", snapshot.total_requests);
        info!(
            "Graded: {} (low: {}, medium: {}, high: {})",
            snapshot.successful, snapshot.grades.low, snapshot.grades.medium, snapshot.grades.high
        );
        info!(
            "Failures - validation: {}, classifier: {}, mapping: {}, rejected while halted: {}",
            snapshot.validation_failures,
            snapshot.classifier_failures,
            snapshot.mapping_failures,
            snapshot.rejected_while_halted
        );
        info!(
            "Average response time: {:.2} ms",
            snapshot.average_response_time_ms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_are_counted() {
        let metrics = PredictionMetrics::new();
        metrics.record(Outcome::Graded(Grade::High), Duration::from_millis(4));
        metrics.record(Outcome::Graded(Grade::Low), Duration::from_millis(2));
        metrics.record(Outcome::ValidationFailed, Duration::from_millis(0));
        metrics.record(Outcome::ClassifierFailed, Duration::from_millis(6));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 4);
        assert_eq!(snapshot.successful, 2);
        assert_eq!(
            snapshot.grades,
            GradeCounts {
                low: 1,
                medium: 0,
                high: 1
            }
        );
        assert_eq!(snapshot.validation_failures, 1);
        assert_eq!(snapshot.classifier_failures, 1);
        assert_eq!(snapshot.mapping_failures, 0);
        assert!((snapshot.average_response_time_ms - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = PredictionMetrics::new().snapshot();
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.average_response_time_ms, 0.0);
    }
}

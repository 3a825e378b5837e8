use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::error::PredictionError;
use crate::grade_prediction::classifier::{Classifier, classify};
use crate::grade_prediction::grade_mapping::{Grade, map_grade};
use crate::grade_prediction::input_validator::{RawSample, validate};
use crate::grade_prediction::response_formatter::PredictionResponse;
use crate::prediction_metrics::{Outcome, PredictionMetrics};

/// Result of grading one sample. Built per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub class_index: i64,
    pub confidence: f64,
    pub grade: Grade,
}

/// Validation, assembly, inference and grade mapping over one injected
/// classifier.
///
/// A class index without a grade means the model and the grade table
/// disagree. The engine then latches into a halted state and refuses every
/// later request until the process restarts.
pub struct PredictionEngine {
    classifier: Arc<dyn Classifier>,
    halted: AtomicBool,
    metrics: PredictionMetrics,
}

impl PredictionEngine {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        PredictionEngine {
            classifier,
            halted: AtomicBool::new(false),
            metrics: PredictionMetrics::new(),
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    pub fn metrics(&self) -> &PredictionMetrics {
        &self.metrics
    }

    pub fn predict(&self, sample: &RawSample) -> Result<Prediction, PredictionError> {
        if self.is_halted() {
            return Err(PredictionError::Halted);
        }

        let features = validate(sample)?;
        let vector = features.to_vec();
        debug!("Assembled feature vector {:?}", vector);

        let score = classify(self.classifier.as_ref(), &vector)?;

        let info = match map_grade(score.class_index) {
            Ok(info) => info,
            Err(e) => {
                self.halted.store(true, Ordering::Release);
                error!(
                    target: "milk_quality::integrity",
                    class_index = e.class_index,
                    "{}; rejecting all further requests",
                    e
                );
                return Err(e.into());
            }
        };

        info!(
            "Predicted {} {} (confidence {:.2}%)",
            info.indicator,
            info.label,
            score.confidence * 100.0
        );

        Ok(Prediction {
            class_index: score.class_index,
            confidence: score.confidence,
            grade: info.grade,
        })
    }

    /// Run the whole pipeline and shape the outcome into a response envelope.
    pub fn evaluate(&self, sample: &RawSample) -> PredictionResponse {
        let start = Instant::now();
        let result = self.predict(sample);

        let outcome = match &result {
            Ok(prediction) => Outcome::Graded(prediction.grade),
            Err(PredictionError::Validation(_)) => Outcome::ValidationFailed,
            Err(PredictionError::Classifier(e)) => {
                warn!("Inference failed: {}", e);
                Outcome::ClassifierFailed
            }
            Err(PredictionError::Mapping(_)) => Outcome::MappingFailed,
            Err(PredictionError::Halted) => Outcome::Halted,
        };
        self.metrics.record(outcome, start.elapsed());

        result.into()
    }
}

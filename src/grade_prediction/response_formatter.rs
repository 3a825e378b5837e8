use serde::Serialize;

use crate::error::PredictionError;
use crate::grade_prediction::grade_mapping::Grade;
use crate::grade_prediction::prediction_engine::Prediction;

/// Envelope returned for every prediction request. Callers tell the two
/// shapes apart by `success` alone:
///
/// * `{"success": true, "grade": "high", "confidence": 0.7}`
/// * `{"success": false, "error": "odor: field is required"}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    grade: Option<Grade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl PredictionResponse {
    pub fn graded(grade: Grade, confidence: f64) -> Self {
        PredictionResponse {
            success: true,
            grade: Some(grade),
            confidence: Some(confidence),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        PredictionResponse {
            success: false,
            grade: None,
            confidence: None,
            error: Some(error.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl From<Result<Prediction, PredictionError>> for PredictionResponse {
    fn from(result: Result<Prediction, PredictionError>) -> Self {
        match result {
            Ok(prediction) => PredictionResponse::graded(prediction.grade, prediction.confidence),
            Err(e) => PredictionResponse::failure(e.to_string()),
        }
    }
}

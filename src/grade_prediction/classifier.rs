use anyhow::Result;

use crate::error::ClassifierFailure;
use crate::grade_prediction::features_schema::FeatureVector;

/// Number of grades the classifier was fitted with.
pub const CLASS_COUNT: usize = 3;

const PROBABILITY_TOLERANCE: f64 = 1e-3;

/// Pre-trained categorical model. Implementations are shared read-only
/// between concurrent requests.
pub trait Classifier: Send + Sync {
    /// Class index for each row of the batch.
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<i64>>;

    /// Probability distribution over the classes for each row of the batch.
    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f64>>>;

    /// Labels and distributions together. Implementations that produce both
    /// from a single evaluation should override this.
    fn predict_with_proba(&self, batch: &[FeatureVector]) -> Result<(Vec<i64>, Vec<Vec<f64>>)> {
        Ok((self.predict(batch)?, self.predict_proba(batch)?))
    }
}

/// Winning class and the probability mass the model put on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScore {
    pub class_index: i64,
    pub confidence: f64,
}

/// Run one sample through the classifier and extract its class and confidence.
pub fn classify(
    classifier: &dyn Classifier,
    features: &FeatureVector,
) -> Result<ClassScore, ClassifierFailure> {
    let batch = std::slice::from_ref(features);

    let (labels, distributions) = classifier
        .predict_with_proba(batch)
        .map_err(|e| ClassifierFailure::new(format!("prediction failed: {e:#}")))?;
    let class_index = match labels.as_slice() {
        [label] => *label,
        other => {
            return Err(ClassifierFailure::new(format!(
                "expected 1 prediction for 1 sample, got {}",
                other.len()
            )));
        }
    };

    let probabilities = match distributions.as_slice() {
        [probabilities] => probabilities,
        other => {
            return Err(ClassifierFailure::new(format!(
                "expected 1 probability distribution for 1 sample, got {}",
                other.len()
            )));
        }
    };

    let confidence = max_probability(probabilities)?;
    Ok(ClassScore {
        class_index,
        confidence,
    })
}

fn max_probability(probabilities: &[f64]) -> Result<f64, ClassifierFailure> {
    if probabilities.len() != CLASS_COUNT {
        return Err(ClassifierFailure::new(format!(
            "expected {} class probabilities, got {}",
            CLASS_COUNT,
            probabilities.len()
        )));
    }
    if let Some(p) = probabilities
        .iter()
        .find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0 + PROBABILITY_TOLERANCE)
    {
        return Err(ClassifierFailure::new(format!(
            "probability {p} is not within [0, 1]"
        )));
    }
    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(ClassifierFailure::new(format!(
            "class probabilities sum to {total}, expected 1"
        )));
    }

    let confidence = probabilities.iter().copied().fold(0.0_f64, f64::max);
    Ok(confidence.min(1.0))
}

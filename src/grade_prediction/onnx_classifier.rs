use std::path::Path;
use std::sync::Mutex;

use anyhow::{Result, anyhow, bail};
use ndarray::{Array, ArrayD};
use ort::{inputs, session::Session, value::Tensor};
use tracing::info;

use crate::grade_prediction::classifier::{CLASS_COUNT, Classifier};
use crate::grade_prediction::features_schema::{FEATURE_COUNT, FeatureVector};
use crate::grade_prediction::standard_scaler::StandardScaler;

/// Raw outputs of one inference run.
struct InferenceOutput {
    labels: Vec<i64>,
    probabilities_shape: Vec<i64>,
    probabilities: Vec<f32>,
}

/// Milk grade classifier exported from scikit-learn to ONNX.
///
/// The model must expose the label tensor as its first output and the
/// probability tensor (exported with zipmap disabled) as its second.
pub struct OnnxClassifier {
    // ort needs exclusive access to run a session
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    probabilities_output: String,
    scaler: Option<StandardScaler>,
}

impl OnnxClassifier {
    /// Load the model, plus an optional scaler applied before inference.
    pub fn load(model_path: &str, scaler_path: Option<&str>) -> Result<Self> {
        if !Path::new(model_path).exists() {
            bail!("Model file not found: {}", model_path);
        }

        let session = Session::builder()
            .map_err(|e| anyhow!("Failed to create session builder: {:?}", e))?
            .commit_from_file(model_path)
            .map_err(|e| anyhow!("Failed to load model from {}: {:?}", model_path, e))?;

        if session.inputs.is_empty() {
            bail!("Model {} declares no inputs", model_path);
        }
        if session.outputs.len() < 2 {
            bail!(
                "Model {} must output labels and probabilities, found {} output(s)",
                model_path,
                session.outputs.len()
            );
        }
        let input_name = session.inputs[0].name.clone();
        let label_output = session.outputs[0].name.clone();
        let probabilities_output = session.outputs[1].name.clone();

        let scaler = scaler_path.map(StandardScaler::from_file).transpose()?;
        if let Some(scaler) = &scaler {
            if scaler.width() != FEATURE_COUNT {
                bail!(
                    "Scaler covers {} features, the model takes {}",
                    scaler.width(),
                    FEATURE_COUNT
                );
            }
        }

        info!(
            "Loaded ONNX model {} (input '{}', outputs '{}'/'{}', scaler: {})",
            model_path,
            input_name,
            label_output,
            probabilities_output,
            scaler.is_some()
        );

        Ok(OnnxClassifier {
            session: Mutex::new(session),
            input_name,
            label_output,
            probabilities_output,
            scaler,
        })
    }

    fn input_tensor(&self, batch: &[FeatureVector]) -> Result<Tensor<f32>> {
        let mut all_features: Vec<f32> = Vec::with_capacity(batch.len() * FEATURE_COUNT);
        for features in batch {
            let row: Vec<f32> = features.iter().map(|&x| x as f32).collect();
            match &self.scaler {
                Some(scaler) => all_features.extend(scaler.transform(&row)),
                None => all_features.extend(row),
            }
        }

        let input_array = Array::from_shape_vec((batch.len(), FEATURE_COUNT), all_features)
            .map_err(|e| anyhow!("Failed to create input array: {:?}", e))?;
        let input_array_dyn: ArrayD<f32> = input_array.into_dyn();

        Tensor::from_array(input_array_dyn)
            .map_err(|e| anyhow!("Failed to create input value: {:?}", e))
    }

    fn infer(&self, batch: &[FeatureVector]) -> Result<InferenceOutput> {
        let input_value = self.input_tensor(batch)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Model session lock poisoned"))?;
        let outputs = session
            .run(inputs![self.input_name.as_str() => input_value])
            .map_err(|e| anyhow!("Failed to run inference: {:?}", e))?;

        let (_, labels) = outputs[self.label_output.as_str()]
            .try_extract_tensor::<i64>()
            .map_err(|e| anyhow!("Failed to extract label tensor: {:?}", e))?;
        let (shape, probabilities) = outputs[self.probabilities_output.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| anyhow!("Failed to extract probability tensor: {:?}", e))?;

        Ok(InferenceOutput {
            labels: labels.to_vec(),
            probabilities_shape: shape.to_vec(),
            probabilities: probabilities.to_vec(),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<i64>> {
        Ok(self.infer(batch)?.labels)
    }

    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f64>>> {
        let output = self.infer(batch)?;
        split_rows(&output.probabilities_shape, &output.probabilities, batch.len())
    }

    fn predict_with_proba(&self, batch: &[FeatureVector]) -> Result<(Vec<i64>, Vec<Vec<f64>>)> {
        let output = self.infer(batch)?;
        let probabilities =
            split_rows(&output.probabilities_shape, &output.probabilities, batch.len())?;
        Ok((output.labels, probabilities))
    }
}

/// Split a flat (batch_size, num_classes) tensor into one row per sample.
fn split_rows(shape: &[i64], data: &[f32], batch_size: usize) -> Result<Vec<Vec<f64>>> {
    let num_classes = match shape {
        [rows, cols] if *rows as usize == batch_size => *cols as usize,
        [len] if batch_size == 1 => *len as usize,
        _ => bail!(
            "Unexpected probability shape {:?} for batch size {}",
            shape,
            batch_size
        ),
    };
    if num_classes != CLASS_COUNT || data.len() != batch_size * num_classes {
        bail!(
            "Expected {} probabilities per sample, got shape {:?} with {} values",
            CLASS_COUNT,
            shape,
            data.len()
        );
    }

    Ok(data
        .chunks(num_classes)
        .map(|row| row.iter().map(|&p| p as f64).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file() {
        let err = OnnxClassifier::load("models/does_not_exist.onnx", None)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Model file not found"));
    }

    #[test]
    fn test_split_rows() {
        let rows = split_rows(&[2, 3], &[0.1, 0.2, 0.7, 0.5, 0.25, 0.25], 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert!((rows[0][2] - 0.7).abs() < 1e-6);
        assert!((rows[1][0] - 0.5).abs() < 1e-6);

        let rows = split_rows(&[3], &[0.1, 0.2, 0.7], 1).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_split_rows_rejects_wrong_class_count() {
        assert!(split_rows(&[1, 2], &[0.4, 0.6], 1).is_err());
        assert!(split_rows(&[2, 3], &[0.1, 0.2, 0.7], 1).is_err());
        assert!(split_rows(&[1, 2, 3], &[0.1, 0.2, 0.7], 1).is_err());
    }
}

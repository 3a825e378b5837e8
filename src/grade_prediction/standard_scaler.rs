use std::fs;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Parameters of a fitted sklearn StandardScaler, as exported to JSON.
#[derive(Debug, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl StandardScaler {
    pub fn from_file(scaler_file_path: &str) -> Result<Self> {
        let json_str = fs::read_to_string(scaler_file_path)
            .with_context(|| format!("Failed to read scaler file {}", scaler_file_path))?;
        Self::from_json(&json_str)
            .with_context(|| format!("Invalid scaler file {}", scaler_file_path))
    }

    pub fn from_json(json_str: &str) -> Result<Self> {
        let scaler: StandardScaler = serde_json::from_str(json_str)?;
        if scaler.mean.len() != scaler.scale.len() {
            bail!(
                "scaler has {} means but {} scales",
                scaler.mean.len(),
                scaler.scale.len()
            );
        }
        if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            bail!("scaler contains a zero or non-finite scale");
        }
        Ok(scaler)
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Equivalent to sklearn's StandardScaler.transform(X) for one row
    pub fn transform(&self, x: &[f32]) -> Vec<f32> {
        x.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((&xi, &m), &s)| (xi - m) / s)
            .collect()
    }
}

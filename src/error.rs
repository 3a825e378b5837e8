use thiserror::Error;

use crate::grade_prediction::features_schema::FeatureField;

/// A single field that failed validation. At most one per field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("{field}: field is required")]
    Missing { field: FeatureField },

    #[error("{field}: '{raw}' is not a number")]
    NotNumeric { field: FeatureField, raw: String },

    #[error("{field}: '{raw}' is not a whole number")]
    NotInteger { field: FeatureField, raw: String },

    #[error("{field}: '{raw}' must be 0 or 1")]
    NotBinary { field: FeatureField, raw: String },

    #[error("{field}: {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        field: FeatureField,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl FieldError {
    pub fn field(&self) -> FeatureField {
        match self {
            FieldError::Missing { field }
            | FieldError::NotNumeric { field, .. }
            | FieldError::NotInteger { field, .. }
            | FieldError::NotBinary { field, .. }
            | FieldError::OutOfRange { field, .. } => *field,
        }
    }
}

/// Every field failure of one sample, in canonical field order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", join_errors(.errors))]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("classifier failure: {cause}")]
pub struct ClassifierFailure {
    pub cause: String,
}

impl ClassifierFailure {
    pub fn new(cause: impl Into<String>) -> Self {
        ClassifierFailure {
            cause: cause.into(),
        }
    }
}

/// The model produced a class the grade table does not know about.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("class index {class_index} has no grade mapping, model and grade table are out of sync")]
pub struct MappingFailure {
    pub class_index: i64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Classifier(#[from] ClassifierFailure),

    #[error(transparent)]
    Mapping(#[from] MappingFailure),

    #[error("service halted after a grade mapping failure, restart with a consistent model")]
    Halted,
}

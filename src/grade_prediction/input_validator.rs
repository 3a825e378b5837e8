use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{FieldError, ValidationFailure};
use crate::grade_prediction::features_schema::{FEATURE_COUNT, FeatureField, FeatureSet, FieldKind};

/// Untrusted request input: field name -> whatever the caller sent.
pub type RawSample = HashMap<String, Value>;

/// Canonical scalar left after normalizing one raw value.
#[derive(Debug, Clone, PartialEq)]
enum Scalar {
    Number(f64),
    Text(String),
    Flag(bool),
    Other(String),
}

impl Scalar {
    fn raw(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) | Scalar::Other(s) => s.clone(),
            Scalar::Flag(b) => b.to_string(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        let number = match self {
            Scalar::Number(n) => *n,
            Scalar::Text(s) => s.parse::<f64>().ok()?,
            Scalar::Flag(_) | Scalar::Other(_) => return None,
        };
        number.is_finite().then_some(number)
    }
}

/// Collapse option tuples, blanks and nulls into a single scalar.
/// `None` means the field counts as missing.
fn normalize(value: Option<&Value>) -> Option<Scalar> {
    match value? {
        Value::Null => None,
        Value::Array(items) => match items.first() {
            // option tuples from form widgets: (value, label)
            Some(Value::Array(_)) | Some(Value::Object(_)) => {
                Some(Scalar::Other(Value::Array(items.clone()).to_string()))
            }
            first => normalize(first),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(Scalar::Text(trimmed.to_string()))
            }
        }
        Value::Number(n) => match n.as_f64() {
            Some(number) => Some(Scalar::Number(number)),
            None => Some(Scalar::Other(n.to_string())),
        },
        Value::Bool(b) => Some(Scalar::Flag(*b)),
        other @ Value::Object(_) => Some(Scalar::Other(other.to_string())),
    }
}

fn check_range(field: FeatureField, value: f64, min: f64, max: f64) -> Result<f64, FieldError> {
    if value < min || value > max {
        return Err(FieldError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Validate one field. Stops at the first problem of that field.
fn validate_field(field: FeatureField, raw: Option<&Value>) -> Result<f64, FieldError> {
    let scalar = normalize(raw).ok_or(FieldError::Missing { field })?;

    match field.spec().kind {
        FieldKind::Decimal { min, max } => {
            let value = scalar.as_number().ok_or_else(|| FieldError::NotNumeric {
                field,
                raw: scalar.raw(),
            })?;
            check_range(field, value, min, max)
        }
        FieldKind::Integer { min, max } => {
            let value = scalar.as_number().ok_or_else(|| FieldError::NotNumeric {
                field,
                raw: scalar.raw(),
            })?;
            if value.fract() != 0.0 {
                return Err(FieldError::NotInteger {
                    field,
                    raw: scalar.raw(),
                });
            }
            check_range(field, value, min, max)
        }
        FieldKind::Binary => {
            let value = match &scalar {
                Scalar::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
                other => other.as_number(),
            };
            match value {
                Some(v) if v == 0.0 || v == 1.0 => Ok(v),
                _ => Err(FieldError::NotBinary {
                    field,
                    raw: scalar.raw(),
                }),
            }
        }
    }
}

/// Validate a raw sample into a `FeatureSet`.
///
/// Every field is checked even after an earlier one failed, so callers get
/// the complete list of problems in one response.
pub fn validate(sample: &RawSample) -> Result<FeatureSet, ValidationFailure> {
    let mut values = [0.0; FEATURE_COUNT];
    let mut errors = Vec::new();

    for field in FeatureField::ALL {
        match validate_field(field, sample.get(field.name())) {
            Ok(value) => values[field.position()] = value,
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        debug!("Rejected sample with {} invalid field(s)", errors.len());
        return Err(ValidationFailure { errors });
    }

    let [ph, temperature, taste, odor, fat, turbidity, colour] = values;
    Ok(FeatureSet::new(
        ph,
        temperature,
        taste == 1.0,
        odor == 1.0,
        fat == 1.0,
        turbidity == 1.0,
        colour as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(value: Value) -> RawSample {
        serde_json::from_value(value).unwrap()
    }

    fn valid_sample() -> RawSample {
        sample(json!({
            "ph": 6.6,
            "temperature": 35,
            "taste": 1,
            "odor": 1,
            "fat": 0,
            "turbidity": 0,
            "colour": 255
        }))
    }

    #[test]
    fn test_valid_sample_assembles_in_order() {
        let features = validate(&valid_sample()).unwrap();
        assert_eq!(features.to_vec(), [6.6, 35.0, 1.0, 1.0, 0.0, 0.0, 255.0]);
    }

    #[test]
    fn test_ph_range() {
        let mut raw = valid_sample();
        raw.insert("ph".to_string(), json!(14.5));
        let failure = validate(&raw).unwrap_err();
        assert_eq!(
            failure.errors,
            vec![FieldError::OutOfRange {
                field: FeatureField::Ph,
                value: 14.5,
                min: 0.0,
                max: 14.0,
            }]
        );
        assert_eq!(
            failure.to_string(),
            "ph: 14.5 is outside the valid range [0, 14]"
        );

        raw.insert("ph".to_string(), json!(6.6));
        assert_eq!(validate(&raw).unwrap().ph(), 6.6);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let mut raw = valid_sample();
        raw.insert("ph".to_string(), json!(0));
        raw.insert("temperature".to_string(), json!(100));
        raw.insert("colour".to_string(), json!(240));
        let features = validate(&raw).unwrap();
        assert_eq!(features.ph(), 0.0);
        assert_eq!(features.temperature(), 100.0);
        assert_eq!(features.colour(), 240);
    }

    #[test]
    fn test_missing_odor_is_named() {
        let mut raw = valid_sample();
        raw.remove("odor");
        let failure = validate(&raw).unwrap_err();
        assert_eq!(
            failure.errors,
            vec![FieldError::Missing {
                field: FeatureField::Odor
            }]
        );
        assert!(failure.to_string().contains("odor"));
    }

    #[test]
    fn test_blank_and_null_count_as_missing() {
        let mut raw = valid_sample();
        raw.insert("taste".to_string(), json!(""));
        raw.insert("fat".to_string(), json!("   "));
        raw.insert("colour".to_string(), Value::Null);
        raw.insert("odor".to_string(), json!([]));
        let failure = validate(&raw).unwrap_err();
        let fields: Vec<FeatureField> = failure.errors.iter().map(|e| e.field()).collect();
        assert_eq!(
            fields,
            vec![
                FeatureField::Taste,
                FeatureField::Odor,
                FeatureField::Fat,
                FeatureField::Colour
            ]
        );
        assert!(
            failure
                .errors
                .iter()
                .all(|e| matches!(e, FieldError::Missing { .. }))
        );
    }

    #[test]
    fn test_all_errors_collected_once_per_field() {
        let raw = sample(json!({
            "ph": "acidic",
            "temperature": 120,
            "taste": 2,
            "fat": "yes",
            "turbidity": 0,
            "colour": 250.5
        }));
        let failure = validate(&raw).unwrap_err();
        assert_eq!(
            failure.errors,
            vec![
                FieldError::NotNumeric {
                    field: FeatureField::Ph,
                    raw: "acidic".to_string()
                },
                FieldError::OutOfRange {
                    field: FeatureField::Temperature,
                    value: 120.0,
                    min: 0.0,
                    max: 100.0
                },
                FieldError::NotBinary {
                    field: FeatureField::Taste,
                    raw: "2".to_string()
                },
                FieldError::Missing {
                    field: FeatureField::Odor
                },
                FieldError::NotBinary {
                    field: FeatureField::Fat,
                    raw: "yes".to_string()
                },
                FieldError::NotInteger {
                    field: FeatureField::Colour,
                    raw: "250.5".to_string()
                },
            ]
        );
        assert_eq!(failure.to_string().matches("; ").count(), 5);
    }

    #[test]
    fn test_strings_are_coerced() {
        let raw = sample(json!({
            "ph": " 6.8 ",
            "temperature": "40.5",
            "taste": "0",
            "odor": "1",
            "fat": "1",
            "turbidity": "0",
            "colour": "250.0"
        }));
        let features = validate(&raw).unwrap();
        assert_eq!(features.to_vec(), [6.8, 40.5, 0.0, 1.0, 1.0, 0.0, 250.0]);
    }

    #[test]
    fn test_option_tuples_and_booleans_normalize() {
        let raw = sample(json!({
            "ph": [6.6],
            "temperature": 35,
            "taste": [1, "Good (1)"],
            "odor": [0, "Bad (0)"],
            "fat": true,
            "turbidity": false,
            "colour": [255, "Colour"]
        }));
        let features = validate(&raw).unwrap();
        assert!(features.taste());
        assert!(!features.odor());
        assert!(features.fat());
        assert!(!features.turbidity());
        assert_eq!(features.colour(), 255);
    }

    #[test]
    fn test_non_finite_and_nested_values_rejected() {
        let mut raw = valid_sample();
        raw.insert("ph".to_string(), json!("NaN"));
        raw.insert("temperature".to_string(), json!({"celsius": 35}));
        raw.insert("taste".to_string(), json!([[1, "Good (1)"]]));
        let failure = validate(&raw).unwrap_err();
        assert!(matches!(
            failure.errors[0],
            FieldError::NotNumeric { field: FeatureField::Ph, .. }
        ));
        assert!(matches!(
            failure.errors[1],
            FieldError::NotNumeric { field: FeatureField::Temperature, .. }
        ));
        assert!(matches!(
            failure.errors[2],
            FieldError::NotBinary { field: FeatureField::Taste, .. }
        ));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let mut raw = valid_sample();
        raw.insert("grade".to_string(), json!("high"));
        assert!(validate(&raw).is_ok());
    }
}

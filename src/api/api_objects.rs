use serde::Serialize;

use crate::grade_prediction::features_schema::{FEATURE_SCHEMA, FieldSpec};
use crate::grade_prediction::grade_mapping::{GRADE_MAPPING, GradeInfo};

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn new(halted: bool) -> Self {
        HealthResponse {
            status: if halted { "halted" } else { "ok" }.to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Input fields in the order the classifier consumes them.
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub fields: &'static [FieldSpec],
}

impl Default for SchemaResponse {
    fn default() -> Self {
        SchemaResponse {
            fields: &FEATURE_SCHEMA,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GradesResponse {
    pub grades: &'static [GradeInfo],
}

impl Default for GradesResponse {
    fn default() -> Self {
        GradesResponse {
            grades: &GRADE_MAPPING,
        }
    }
}

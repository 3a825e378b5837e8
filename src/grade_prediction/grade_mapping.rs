use std::fmt;

use serde::Serialize;

use crate::error::MappingFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Low,
    Medium,
    High,
}

impl Grade {
    pub fn name(self) -> &'static str {
        match self {
            Grade::Low => "low",
            Grade::Medium => "medium",
            Grade::High => "high",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradeInfo {
    pub class_index: i64,
    pub grade: Grade,
    pub label: &'static str,
    pub indicator: &'static str,
}

/// Class index of the fitted model -> grade. Index order must match the
/// label encoding the model was trained with.
pub static GRADE_MAPPING: [GradeInfo; 3] = [
    GradeInfo {
        class_index: 0,
        grade: Grade::Low,
        label: "LOW Quality",
        indicator: "🟢",
    },
    GradeInfo {
        class_index: 1,
        grade: Grade::Medium,
        label: "MEDIUM Quality",
        indicator: "🟡",
    },
    GradeInfo {
        class_index: 2,
        grade: Grade::High,
        label: "HIGH Quality",
        indicator: "🔴",
    },
];

pub fn map_grade(class_index: i64) -> Result<&'static GradeInfo, MappingFailure> {
    GRADE_MAPPING
        .iter()
        .find(|info| info.class_index == class_index)
        .ok_or(MappingFailure { class_index })
}

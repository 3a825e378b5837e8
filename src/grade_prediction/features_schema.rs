use std::fmt;

use serde::Serialize;

/// Number of inputs the classifier was fitted on.
pub const FEATURE_COUNT: usize = 7;

/// Fixed-order numeric input of the classifier.
pub type FeatureVector = [f64; FEATURE_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureField {
    Ph,
    Temperature,
    Taste,
    Odor,
    Fat,
    Turbidity,
    Colour,
}

impl FeatureField {
    /// Canonical vector order. The model has no schema awareness, so
    /// changing this order silently corrupts every prediction.
    pub const ALL: [FeatureField; FEATURE_COUNT] = [
        FeatureField::Ph,
        FeatureField::Temperature,
        FeatureField::Taste,
        FeatureField::Odor,
        FeatureField::Fat,
        FeatureField::Turbidity,
        FeatureField::Colour,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FeatureField::Ph => "ph",
            FeatureField::Temperature => "temperature",
            FeatureField::Taste => "taste",
            FeatureField::Odor => "odor",
            FeatureField::Fat => "fat",
            FeatureField::Turbidity => "turbidity",
            FeatureField::Colour => "colour",
        }
    }

    /// Position of the field in the feature vector.
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static FieldSpec {
        &FEATURE_SCHEMA[self.position()]
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Decimal { min: f64, max: f64 },
    Integer { min: f64, max: f64 },
    Binary,
}

impl FieldKind {
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            FieldKind::Decimal { min, max } | FieldKind::Integer { min, max } => (min, max),
            FieldKind::Binary => (0.0, 1.0),
        }
    }
}

/// Choice offered for a binary field, e.g. `(1, "Good (1)")`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldOption {
    pub value: u8,
    pub label: &'static str,
}

/// Validation rule plus the form metadata of one input field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub field: FeatureField,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Narrower range suggested to the person filling the form
    pub hint: Option<(f64, f64)>,
    pub default: Option<f64>,
    pub step: Option<f64>,
    pub help: Option<&'static str>,
    pub options: &'static [FieldOption],
}

const GOOD_BAD: &[FieldOption] = &[
    FieldOption {
        value: 1,
        label: "Good (1)",
    },
    FieldOption {
        value: 0,
        label: "Bad (0)",
    },
];

const HIGH_LOW: &[FieldOption] = &[
    FieldOption {
        value: 1,
        label: "High (1)",
    },
    FieldOption {
        value: 0,
        label: "Low (0)",
    },
];

/// Input schema, indexed by `FeatureField::position`.
pub static FEATURE_SCHEMA: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        field: FeatureField::Ph,
        label: "pH Level",
        kind: FieldKind::Decimal { min: 0.0, max: 14.0 },
        hint: Some((3.0, 10.0)),
        default: Some(6.6),
        step: Some(0.1),
        help: Some("Milk pH is typically between 6.5-6.8"),
        options: &[],
    },
    FieldSpec {
        field: FeatureField::Temperature,
        label: "Temperature (°C)",
        kind: FieldKind::Decimal { min: 0.0, max: 100.0 },
        hint: Some((20.0, 90.0)),
        default: Some(35.0),
        step: None,
        help: Some("Temperature in Celsius"),
        options: &[],
    },
    FieldSpec {
        field: FeatureField::Taste,
        label: "Taste",
        kind: FieldKind::Binary,
        hint: None,
        default: None,
        step: None,
        help: None,
        options: GOOD_BAD,
    },
    FieldSpec {
        field: FeatureField::Odor,
        label: "Odor",
        kind: FieldKind::Binary,
        hint: None,
        default: None,
        step: None,
        help: None,
        options: GOOD_BAD,
    },
    FieldSpec {
        field: FeatureField::Fat,
        label: "Fat",
        kind: FieldKind::Binary,
        hint: None,
        default: None,
        step: None,
        help: None,
        options: HIGH_LOW,
    },
    FieldSpec {
        field: FeatureField::Turbidity,
        label: "Turbidity",
        kind: FieldKind::Binary,
        hint: None,
        default: None,
        step: None,
        help: None,
        options: HIGH_LOW,
    },
    FieldSpec {
        field: FeatureField::Colour,
        label: "Colour (240-255)",
        kind: FieldKind::Integer { min: 240.0, max: 255.0 },
        hint: Some((240.0, 255.0)),
        default: Some(255.0),
        step: Some(1.0),
        help: Some("Colour value between 240-255"),
        options: &[],
    },
];

/// One validated milk sample. Only the input validator builds these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSet {
    ph: f64,
    temperature: f64,
    taste: bool,
    odor: bool,
    fat: bool,
    turbidity: bool,
    colour: u8,
}

impl FeatureSet {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        ph: f64,
        temperature: f64,
        taste: bool,
        odor: bool,
        fat: bool,
        turbidity: bool,
        colour: u8,
    ) -> Self {
        FeatureSet {
            ph,
            temperature,
            taste,
            odor,
            fat,
            turbidity,
            colour,
        }
    }

    pub fn ph(&self) -> f64 {
        self.ph
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn taste(&self) -> bool {
        self.taste
    }

    pub fn odor(&self) -> bool {
        self.odor
    }

    pub fn fat(&self) -> bool {
        self.fat
    }

    pub fn turbidity(&self) -> bool {
        self.turbidity
    }

    pub fn colour(&self) -> u8 {
        self.colour
    }

    /// Assemble the classifier input in canonical order.
    pub fn to_vec(&self) -> FeatureVector {
        [
            self.ph,
            self.temperature,
            flag(self.taste),
            flag(self.odor),
            flag(self.fat),
            flag(self.turbidity),
            self.colour as f64,
        ]
    }
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_follows_canonical_order() {
        for (position, field) in FeatureField::ALL.iter().enumerate() {
            assert_eq!(field.position(), position);
            assert_eq!(FEATURE_SCHEMA[position].field, *field);
        }
    }

    #[test]
    fn test_to_vec_keeps_canonical_order() {
        let features = FeatureSet::new(6.6, 35.0, true, true, false, false, 255);
        assert_eq!(features.to_vec(), [6.6, 35.0, 1.0, 1.0, 0.0, 0.0, 255.0]);

        // every slot distinct so any swap would show
        let features = FeatureSet::new(3.5, 41.0, false, true, true, false, 246);
        let vector = features.to_vec();
        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(vector[FeatureField::Ph.position()], 3.5);
        assert_eq!(vector[FeatureField::Temperature.position()], 41.0);
        assert_eq!(vector[FeatureField::Taste.position()], 0.0);
        assert_eq!(vector[FeatureField::Odor.position()], 1.0);
        assert_eq!(vector[FeatureField::Fat.position()], 1.0);
        assert_eq!(vector[FeatureField::Turbidity.position()], 0.0);
        assert_eq!(vector[FeatureField::Colour.position()], 246.0);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(FeatureField::Ph.spec().kind.bounds(), (0.0, 14.0));
        assert_eq!(FeatureField::Temperature.spec().kind.bounds(), (0.0, 100.0));
        assert_eq!(FeatureField::Colour.spec().kind.bounds(), (240.0, 255.0));
        assert_eq!(FeatureField::Fat.spec().kind, FieldKind::Binary);
    }
}

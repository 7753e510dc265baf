//! Soil/crop parameter record and its validation rules.
//!
//! A parameter record is a name → value map. Names match the backend's
//! column names ("Nitrogen", "Soil Type", ...) because the same map is posted
//! to the prediction service and stored with each recommendation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const TEMPERATURE: &str = "Temperature";
pub const HUMIDITY: &str = "Humidity";
pub const MOISTURE: &str = "Moisture";
pub const NITROGEN: &str = "Nitrogen";
pub const PHOSPHORUS: &str = "Phosphorus";
pub const POTASSIUM: &str = "Potassium";
pub const SOIL_TYPE: &str = "Soil Type";
pub const CROP_TYPE: &str = "Crop Type";

/// Field every prediction request must carry
pub const REQUIRED_FIELDS: [&str; 8] = [
    TEMPERATURE,
    HUMIDITY,
    MOISTURE,
    NITROGEN,
    PHOSPHORUS,
    POTASSIUM,
    SOIL_TYPE,
    CROP_TYPE,
];

/// One parameter value: numeric or categorical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Text(String),
}

impl InputValue {
    /// Numeric view of the value; text is parsed after trimming
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// True for text that is empty after trimming
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for InputValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Parameter record: field name → value
pub type Inputs = BTreeMap<String, InputValue>;

/// Realistic bounds for a numeric field (inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

impl FieldRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for FieldRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Value should be between {} and {} {}",
            self.min, self.max, self.unit
        )
    }
}

/// Declared range for a numeric field, `None` for categorical fields
pub fn range_for(field: &str) -> Option<FieldRange> {
    let (min, max, unit) = match field {
        TEMPERATURE => (-10.0, 50.0, "°C"),
        HUMIDITY => (0.0, 100.0, "%"),
        MOISTURE => (0.0, 100.0, "%"),
        NITROGEN => (0.0, 500.0, "kg/ha"),
        PHOSPHORUS => (0.0, 200.0, "kg/ha"),
        POTASSIUM => (0.0, 300.0, "kg/ha"),
        _ => return None,
    };
    Some(FieldRange { min, max, unit })
}

/// One reason a field failed validation
#[derive(Debug, Clone, PartialEq)]
pub enum FieldProblem {
    Missing { field: String },
    NotNumeric { field: String, value: String },
    OutOfRange { field: String, value: f64, range: FieldRange },
}

impl FieldProblem {
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field } | Self::NotNumeric { field, .. } => field,
            Self::OutOfRange { field, .. } => field,
        }
    }
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{field}: required"),
            Self::NotNumeric { field, value } => write!(f, "{field}: '{value}' is not a number"),
            Self::OutOfRange { field, range, .. } => write!(f, "{field}: {range}"),
        }
    }
}

/// Local, recoverable input error. Never reaches a service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Please fill in all required fields with valid values.")]
pub struct ValidationError {
    pub problems: Vec<FieldProblem>,
}

/// Check required fields and declared ranges, collecting every problem
pub fn validate(inputs: &Inputs) -> Result<(), ValidationError> {
    let mut problems = Vec::new();

    for field in REQUIRED_FIELDS {
        let value = match inputs.get(field) {
            Some(v) if !v.is_blank() => v,
            _ => {
                problems.push(FieldProblem::Missing {
                    field: field.to_string(),
                });
                continue;
            }
        };

        let Some(range) = range_for(field) else {
            continue;
        };

        match value.as_number() {
            Some(n) if !n.is_finite() || !range.contains(n) => {
                problems.push(FieldProblem::OutOfRange {
                    field: field.to_string(),
                    value: n,
                    range,
                });
            }
            Some(_) => {}
            None => problems.push(FieldProblem::NotNumeric {
                field: field.to_string(),
                value: value.to_string(),
            }),
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { problems })
    }
}

/// Typed soil/crop reading as entered on the recommendation form
#[derive(Debug, Clone, PartialEq)]
pub struct SoilReading {
    pub temperature: f64,
    pub humidity: f64,
    pub moisture: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub soil_type: String,
    pub crop_type: String,
}

impl SoilReading {
    /// Convert to the name → value map used on the wire and in history
    pub fn to_inputs(&self) -> Inputs {
        let mut inputs = Inputs::new();
        inputs.insert(TEMPERATURE.into(), self.temperature.into());
        inputs.insert(HUMIDITY.into(), self.humidity.into());
        inputs.insert(MOISTURE.into(), self.moisture.into());
        inputs.insert(NITROGEN.into(), self.nitrogen.into());
        inputs.insert(PHOSPHORUS.into(), self.phosphorus.into());
        inputs.insert(POTASSIUM.into(), self.potassium.into());
        inputs.insert(SOIL_TYPE.into(), self.soil_type.trim().into());
        inputs.insert(CROP_TYPE.into(), self.crop_type.trim().into());
        inputs
    }
}

//! Apartment request schema
//!
//! Validates untyped request input (query strings or JSON bodies) into an
//! [`ApartmentFeatures`] record. Values are coerced leniently to integers:
//! numeric strings, whole floats and booleans are accepted, anything that
//! would lose information is rejected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::num::IntErrorKind;
use thiserror::Error;

/// Number of features the model expects
pub const FEATURE_COUNT: usize = 9;

/// Wire names of the features, in the order the model was trained on
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "area",
    "constructionYear",
    "bedrooms",
    "gardenArea",
    "balconyPresent",
    "parkingPresent",
    "furnished",
    "garagePresent",
    "storagePresent",
];

/// Validated apartment attributes.
///
/// The presence flags (`balcony_present`, `parking_present`, `furnished`,
/// `garage_present`, `storage_present`) are 0/1 values; no range check is
/// applied to them or to any other field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentFeatures {
    /// Floor area
    pub area: i64,
    pub construction_year: i64,
    pub bedrooms: i64,
    /// Garden area, 0 when there is no garden
    pub garden_area: i64,
    pub balcony_present: i64,
    pub parking_present: i64,
    pub furnished: i64,
    pub garage_present: i64,
    pub storage_present: i64,
}

impl ApartmentFeatures {
    /// Validate raw key/value input against the schema.
    ///
    /// Every field is checked; the returned error lists all failures in
    /// feature order. Unknown keys are ignored.
    pub fn validate(raw: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut values = [0_i64; FEATURE_COUNT];
        let mut errors = Vec::new();

        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            match raw.get(name) {
                None => errors.push(FieldError::new(name, FieldErrorKind::Missing)),
                Some(value) => match coerce_integer(value) {
                    Ok(v) => *slot = v,
                    Err(kind) => errors.push(FieldError::new(name, kind)),
                },
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        Ok(Self::from_ordered(values))
    }

    fn from_ordered(values: [i64; FEATURE_COUNT]) -> Self {
        let [
            area,
            construction_year,
            bedrooms,
            garden_area,
            balcony_present,
            parking_present,
            furnished,
            garage_present,
            storage_present,
        ] = values;
        Self {
            area,
            construction_year,
            bedrooms,
            garden_area,
            balcony_present,
            parking_present,
            furnished,
            garage_present,
            storage_present,
        }
    }

    /// Field values in [`FEATURE_NAMES`] order
    pub fn to_ordered(&self) -> [i64; FEATURE_COUNT] {
        [
            self.area,
            self.construction_year,
            self.bedrooms,
            self.garden_area,
            self.balcony_present,
            self.parking_present,
            self.furnished,
            self.garage_present,
            self.storage_present,
        ]
    }

    /// Feature vector handed to the model. Position matters, names do not.
    pub fn to_feature_vector(&self) -> [f64; FEATURE_COUNT] {
        self.to_ordered().map(|v| v as f64)
    }
}

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    Null,
    NotAnInteger,
    Fractional,
    OutOfRange,
    WrongType,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FieldErrorKind::Missing => "field required",
            FieldErrorKind::Null => "value must not be null",
            FieldErrorKind::NotAnInteger => "value is not a valid integer",
            FieldErrorKind::Fractional => "value has a fractional part",
            FieldErrorKind::OutOfRange => "value does not fit in a 64-bit integer",
            FieldErrorKind::WrongType => "value must be a number or a numeric string",
        };
        f.write_str(msg)
    }
}

/// A rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, reason: FieldErrorKind) -> Self {
        Self {
            field: field.to_string(),
            reason,
            message: reason.to_string(),
        }
    }
}

/// Request input did not match the apartment schema
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} validation error(s): {}", .errors.len(), summarize(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Names of the fields that were absent from the input
    pub fn missing_fields(&self) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.reason == FieldErrorKind::Missing)
            .map(|e| e.field.as_str())
            .collect()
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

fn coerce_integer(value: &Value) -> Result<i64, FieldErrorKind> {
    match value {
        Value::Null => Err(FieldErrorKind::Null),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if n.is_u64() {
                return Err(FieldErrorKind::OutOfRange);
            }
            let f = n.as_f64().ok_or(FieldErrorKind::NotAnInteger)?;
            whole_float_to_integer(f)
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => FieldErrorKind::OutOfRange,
            _ => FieldErrorKind::NotAnInteger,
        }),
        Value::Array(_) | Value::Object(_) => Err(FieldErrorKind::WrongType),
    }
}

fn whole_float_to_integer(f: f64) -> Result<i64, FieldErrorKind> {
    if !f.is_finite() {
        return Err(FieldErrorKind::NotAnInteger);
    }
    if f.fract() != 0.0 {
        return Err(FieldErrorKind::Fractional);
    }
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(FieldErrorKind::OutOfRange);
    }
    Ok(f as i64)
}

//! Request-body validation for sensor batches.
//!
//! Bodies arrive as untyped JSON and are checked field by field before any typed [`Unit`] is
//! built, so a client gets every problem in one response instead of the first decode failure.

use serde_json::{Map, Value as JsonValue};

use crate::model::{Pod, Reading, Unit};
use crate::time::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldProblem {
    #[error("field required")]
    Missing,
    #[error("expected {0}")]
    WrongType(&'static str),
    #[error("must not be negative")]
    Negative,
    #[error("{0}")]
    BadTimestamp(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub problem: FieldProblem,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: String, problem: FieldProblem) {
        self.0.push(FieldError { field, problem });
    }

    pub fn single(field: impl Into<String>, problem: FieldProblem) -> Self {
        Self(vec![FieldError {
            field: field.into(),
            problem,
        }])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validates a `POST /api/sensor` body and converts it into units. Unknown fields are ignored,
/// including any client-supplied `classification`.
pub fn validate_units(body: &JsonValue) -> Result<Vec<Unit>, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let Some(items) = body.as_array() else {
        errors.push("body".to_string(), FieldProblem::WrongType("array"));
        return Err(errors);
    };

    let mut units = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        if let Some(unit) = unit_from_json(item, &format!("body[{idx}]"), &mut errors) {
            units.push(unit);
        }
    }

    if errors.is_empty() {
        Ok(units)
    } else {
        Err(errors)
    }
}

fn unit_from_json(value: &JsonValue, path: &str, errors: &mut ValidationErrors) -> Option<Unit> {
    let obj = object(value, path, errors)?;
    let id = required_id(obj, path, errors);

    let pods = array(obj, "pods", path, errors).map(|items| {
        items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| pod_from_json(item, &format!("{path}.pods[{idx}]"), errors))
            .collect::<Vec<_>>()
    });
    let readings = array(obj, "readings", path, errors).map(|items| {
        items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| {
                reading_from_json(item, &format!("{path}.readings[{idx}]"), errors)
            })
            .collect::<Vec<_>>()
    });

    Some(Unit {
        id: id?,
        pods: pods?,
        readings: readings?,
        classification: None,
    })
}

fn pod_from_json(value: &JsonValue, path: &str, errors: &mut ValidationErrors) -> Option<Pod> {
    let obj = object(value, path, errors)?;
    let id = required_id(obj, path, errors);
    let field = format!("{path}.age");
    let age = match obj.get("age") {
        None | Some(JsonValue::Null) => {
            errors.push(field, FieldProblem::Missing);
            None
        }
        Some(raw) => match raw.as_i64() {
            Some(age) if age < 0 => {
                errors.push(field, FieldProblem::Negative);
                None
            }
            Some(age) => Some(age),
            None => {
                errors.push(field, FieldProblem::WrongType("integer"));
                None
            }
        },
    };
    Some(Pod { id: id?, age: age? })
}

fn reading_from_json(
    value: &JsonValue,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<Reading> {
    let obj = object(value, path, errors)?;
    let id = required_id(obj, path, errors);
    let ph = number(obj, "pH", path, errors);
    let temp = number(obj, "temp", path, errors);
    let ec = number(obj, "ec", path, errors);
    let timestamp = string(obj, "timestamp", path, errors).and_then(|raw| {
        match parse_timestamp(raw) {
            Ok(_) => Some(raw.to_string()),
            Err(message) => {
                errors.push(format!("{path}.timestamp"), FieldProblem::BadTimestamp(message));
                None
            }
        }
    });

    Some(Reading {
        id: id?,
        ph: ph?,
        temp: temp?,
        ec: ec?,
        timestamp: timestamp?,
    })
}

fn object<'a>(
    value: &'a JsonValue,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a Map<String, JsonValue>> {
    let obj = value.as_object();
    if obj.is_none() {
        errors.push(path.to_string(), FieldProblem::WrongType("object"));
    }
    obj
}

fn string<'a>(
    obj: &'a Map<String, JsonValue>,
    key: &str,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a str> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => {
            errors.push(format!("{path}.{key}"), FieldProblem::Missing);
            None
        }
        Some(JsonValue::String(value)) => Some(value.as_str()),
        Some(_) => {
            errors.push(format!("{path}.{key}"), FieldProblem::WrongType("string"));
            None
        }
    }
}

fn required_id(
    obj: &Map<String, JsonValue>,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    string(obj, "id", path, errors).map(str::to_string)
}

fn number(
    obj: &Map<String, JsonValue>,
    key: &str,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => {
            errors.push(format!("{path}.{key}"), FieldProblem::Missing);
            None
        }
        Some(raw) => {
            let value = raw.as_f64();
            if value.is_none() {
                errors.push(format!("{path}.{key}"), FieldProblem::WrongType("number"));
            }
            value
        }
    }
}

fn array<'a>(
    obj: &'a Map<String, JsonValue>,
    key: &str,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a Vec<JsonValue>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => {
            errors.push(format!("{path}.{key}"), FieldProblem::Missing);
            None
        }
        Some(JsonValue::Array(items)) => Some(items),
        Some(_) => {
            errors.push(format!("{path}.{key}"), FieldProblem::WrongType("array"));
            None
        }
    }
}

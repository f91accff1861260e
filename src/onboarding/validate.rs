//! Required-field validation for agent records.
//!
//! Only presence of the four core fields is checked. Enum membership, the
//! `genderOther` subfield, length limits and consents are left to the UI.

use serde::Serialize;
use serde_json::Value;

use super::model::AgentRecord;
use super::schema::fields;

/// Outcome of `validate`. `valid` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Field ids named by the errors, in error order.
    pub fn failed_fields(&self) -> Vec<&str> {
        self.errors
            .iter()
            .filter_map(|e| e.split_once(':').map(|(field, _)| field))
            .collect()
    }
}

/// Check callsign, gender, age and region, in that order.
pub fn validate(record: &AgentRecord) -> ValidationResult {
    let mut errors = Vec::new();

    if record.callsign.as_deref().is_none_or(|c| c.trim().is_empty()) {
        errors.push(required(fields::CALLSIGN));
    }
    for field in [fields::GENDER, fields::AGE, fields::REGION] {
        if !is_present(record.field(field)) {
            errors.push(required(field));
        }
    }

    ValidationResult::from_errors(errors)
}

/// `validate` for untyped input; wrong-typed fields count as missing.
pub fn validate_value(value: &Value) -> ValidationResult {
    validate(&AgentRecord::from_value(value.clone()))
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn required(field: &str) -> String {
    format!("{field}: required")
}

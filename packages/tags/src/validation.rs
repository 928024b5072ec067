// ABOUTME: Input validation for tag payloads
// ABOUTME: Converts untrusted JSON maps into typed inputs or structured field errors

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{TagCreateInput, TagUpdateInput};

pub const NAME_MIN_LENGTH: usize = 1;
pub const NAME_MAX_LENGTH: usize = 64;

/// Field name to the messages describing what is wrong with it
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    pub fields: FieldErrors,
}

impl ValidationErrors {
    fn single(field: &str, message: String) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message]);
        Self { fields }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a create payload: `name` is required
pub fn validate_create(input: &Map<String, Value>) -> Result<TagCreateInput, ValidationErrors> {
    match input.get("name") {
        Some(value) => validate_name(value)
            .map(|name| TagCreateInput { name })
            .map_err(|message| ValidationErrors::single("name", message)),
        None => Err(ValidationErrors::single(
            "name",
            "Missing data for required field.".to_string(),
        )),
    }
}

/// Validate an update payload: every field is optional
pub fn validate_update(input: &Map<String, Value>) -> Result<TagUpdateInput, ValidationErrors> {
    let name = input
        .get("name")
        .map(validate_name)
        .transpose()
        .map_err(|message| ValidationErrors::single("name", message))?;

    Ok(TagUpdateInput { name })
}

fn validate_name(value: &Value) -> Result<String, String> {
    let name = match value {
        Value::String(name) => name,
        Value::Null => return Err("Field may not be null.".to_string()),
        _ => return Err("Not a valid string.".to_string()),
    };

    let length = name.chars().count();
    if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&length) {
        return Err(format!(
            "Length must be between {} and {}.",
            NAME_MIN_LENGTH, NAME_MAX_LENGTH
        ));
    }

    Ok(name.clone())
}

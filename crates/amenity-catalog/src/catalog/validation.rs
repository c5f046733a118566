use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::domain::{AmenityDraft, LocalizedText};

const LANGUAGE_PRIMARY_MAX: usize = 8;
const LANGUAGE_SUBTAG_MAX: usize = 8;

/// Single offending field, optionally scoped to a batch item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub item: Option<usize>,
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            item: None,
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn at_item(mut self, index: usize) -> Self {
        self.item = Some(index);
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item {
            Some(index) => write!(f, "[{index}].{}: {}", self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// Rejected amenity payload; lists every offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amenity payload: {}", summarize(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a single create payload.
pub fn validate_draft(payload: &Value) -> Result<AmenityDraft, ValidationError> {
    parse_draft(payload).map_err(|fields| ValidationError { fields })
}

/// Validate every batch item before anything is persisted.
pub fn validate_batch(payload: &Value) -> Result<Vec<AmenityDraft>, ValidationError> {
    let items = payload.as_array().ok_or_else(|| ValidationError {
        fields: vec![FieldError::new("non_field_errors", "expected a list of items")],
    })?;

    let mut drafts = Vec::with_capacity(items.len());
    let mut fields = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match parse_draft(item) {
            Ok(draft) => drafts.push(draft),
            Err(errors) => fields.extend(errors.into_iter().map(|error| error.at_item(index))),
        }
    }

    if fields.is_empty() {
        Ok(drafts)
    } else {
        Err(ValidationError { fields })
    }
}

fn parse_draft(payload: &Value) -> Result<AmenityDraft, Vec<FieldError>> {
    let Some(object) = payload.as_object() else {
        return Err(vec![FieldError::new("non_field_errors", "expected an object")]);
    };

    let title = localized_field(object.get("title"), "title");
    let abbreviation = localized_field(object.get("abbreviation"), "abbreviation");

    match (title, abbreviation) {
        (Ok(title), Ok(abbreviation)) => Ok(AmenityDraft {
            title,
            abbreviation,
        }),
        (title, abbreviation) => Err(title
            .err()
            .into_iter()
            .flatten()
            .chain(abbreviation.err().into_iter().flatten())
            .collect()),
    }
}

fn localized_field(value: Option<&Value>, field: &str) -> Result<LocalizedText, Vec<FieldError>> {
    let object = match value {
        None | Some(Value::Null) => {
            return Err(vec![FieldError::new(field, "this field is required")])
        }
        Some(Value::Object(object)) => object,
        Some(_) => {
            return Err(vec![FieldError::new(
                field,
                "expected an object of language codes to strings",
            )])
        }
    };

    if object.is_empty() {
        return Err(vec![FieldError::new(
            field,
            "at least one language is required",
        )]);
    }

    let mut entries = BTreeMap::new();
    let mut errors = Vec::new();
    for (language, text) in object {
        if !is_language_code(language) {
            errors.push(FieldError::new(
                field,
                format!("'{language}' is not a language code"),
            ));
            continue;
        }
        match text.as_str() {
            None => errors.push(FieldError::new(
                field,
                format!("value for '{language}' must be a string"),
            )),
            Some(text) if text.trim().is_empty() => errors.push(FieldError::new(
                field,
                format!("value for '{language}' must not be blank"),
            )),
            Some(text) => {
                entries.insert(language.clone(), text.to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(LocalizedText::new(entries))
    } else {
        Err(errors)
    }
}

/// Accepts `en`, `pt-BR`, `zh_Hant` style codes.
fn is_language_code(code: &str) -> bool {
    let mut parts = code.splitn(2, |c: char| c == '-' || c == '_');
    let primary = parts.next().unwrap_or_default();
    let primary_ok = (2..=LANGUAGE_PRIMARY_MAX).contains(&primary.len())
        && primary.chars().all(|c| c.is_ascii_alphabetic());

    let subtag_ok = match parts.next() {
        None => true,
        Some(subtag) => {
            (1..=LANGUAGE_SUBTAG_MAX).contains(&subtag.len())
                && subtag.chars().all(|c| c.is_ascii_alphanumeric())
        }
    };

    primary_ok && subtag_ok
}

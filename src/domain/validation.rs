use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A single rejected field of a request, named by its wire name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field error collected while parsing a request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether any error was recorded against `field`
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Move the errors of a nested object under `prefix`, e.g. `customerInfo.email`
    pub fn extend_nested(&mut self, prefix: &str, nested: ValidationErrors) {
        for error in nested.0 {
            self.0.push(FieldError {
                field: format!("{}.{}", prefix, error.field),
                message: error.message,
            });
        }
    }

    /// Parse a required text field, recording an error if it is missing or invalid
    pub fn require<T>(&mut self, field: &str, value: Option<&str>) -> Option<T>
    where
        T: FromStr<Err = String>,
    {
        match value {
            None => {
                self.push(field, format!("{} is required", field));
                None
            }
            Some(value) => match value.parse() {
                Ok(parsed) => Some(parsed),
                Err(message) => {
                    self.push(field, message);
                    None
                }
            },
        }
    }

    /// `Ok(value)` when nothing was recorded
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if !self.is_empty() {
            return Err(self);
        }
        match value() {
            Some(value) => Ok(value),
            None => Err(self),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", fields.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

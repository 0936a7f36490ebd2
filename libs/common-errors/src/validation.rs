use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// A single violated constraint on a request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collected constraint violations. Validation keeps going after the first
/// failure so callers see every problem at once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn fields(&self) -> &[FieldError] { &self.0 }

    pub fn into_inner(self) -> Vec<FieldError> { self.0 }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn require_not_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "must not be blank");
        }
    }

    pub fn require_max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(
                field,
                &format!("length must be at most {max} characters"),
            );
        }
    }

    /// Integral number with at most `max_digits` digits and no fraction.
    pub fn require_digits(
        &mut self, field: &str, value: &str, max_digits: usize,
    ) {
        if value.is_empty() {
            return;
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            self.add(field, "must contain only digits");
        }
        else if value.len() > max_digits {
            self.add(
                field,
                &format!("must have at most {max_digits} digits"),
            );
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Structural checks run on a decoded request body before it reaches a
/// handler.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

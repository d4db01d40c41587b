#![forbid(unsafe_code)]

//! Core validation types and the built-in field rules.

use std::collections::HashMap;
use std::fmt;

use crate::values::FieldValue;

// ---------------------------------------------------------------------------
// Error Codes
// ---------------------------------------------------------------------------

/// Error code for required field validation.
pub const ERROR_CODE_REQUIRED: &str = "required";

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A validation error with code, message, and interpolation parameters.
///
/// The `code` is stable for programmatic handling; `message` is the
/// human-readable text shown next to the field.
///
/// # Example
///
/// ```rust
/// use formnav_form::validation::ValidationError;
///
/// let error = ValidationError::new("required", "{field} is required")
///     .with_param("field", "Age");
///
/// assert_eq!(error.format_message(), "Age is required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable error code.
    pub code: &'static str,
    /// Human-readable error message template.
    pub message: String,
    /// Parameters for message interpolation.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Create a new validation error with the given code and message.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: HashMap::new(),
        }
    }

    /// Add a parameter for message interpolation.
    ///
    /// Parameters are substituted in the message using `{key}` syntax.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Format the message with parameter substitution.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            result = result.replace(&format!("{{{key}}}"), value);
        }
        result
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// The result of a validation operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    /// The value is valid.
    #[default]
    Valid,
    /// The value is invalid with an error.
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Returns `true` if the result is `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the error if the result is `Invalid`, otherwise `None`.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// Returns the error message if the result is `Invalid`, otherwise `None`.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ValidationError::format_message)
    }

    /// Combine two results, returning the first error if any.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::Valid => other,
            Self::Invalid(_) => self,
        }
    }
}

// ---------------------------------------------------------------------------
// Validator Trait
// ---------------------------------------------------------------------------

/// A rule applied to a single field value.
///
/// # Implementing a Custom Validator
///
/// ```rust
/// use formnav_form::validation::{ValidationError, ValidationResult, Validator};
/// use formnav_form::values::FieldValue;
///
/// struct Adult;
///
/// impl Validator for Adult {
///     fn validate(&self, value: &FieldValue) -> ValidationResult {
///         match value.as_number() {
///             Some(n) if n < 18 => ValidationResult::Invalid(
///                 ValidationError::new("adult", "Must be 18 or older"),
///             ),
///             _ => ValidationResult::Valid,
///         }
///     }
///
///     fn error_message(&self) -> &str {
///         "Must be 18 or older"
///     }
/// }
/// ```
pub trait Validator: Send + Sync {
    /// Validate the given value.
    fn validate(&self, value: &FieldValue) -> ValidationResult;

    /// Return the default error message for this validator.
    fn error_message(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Required
// ---------------------------------------------------------------------------

/// Rejects blank values.
///
/// Blank means whitespace-only text, no selected option, or a number field
/// that does not hold a number. A non-numeric age therefore fails with the
/// same message as an empty one.
#[derive(Debug, Clone)]
pub struct Required {
    message: String,
}

impl Required {
    /// Create a `Required` rule with the generic message.
    #[must_use]
    pub fn new() -> Self {
        Self::with_message("This field is required")
    }

    /// Create a `Required` rule with a field-specific message.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for Required {
    fn validate(&self, value: &FieldValue) -> ValidationResult {
        if value.is_blank() {
            ValidationResult::Invalid(ValidationError::new(
                ERROR_CODE_REQUIRED,
                self.message.clone(),
            ))
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Ordered list of rules for one field. The first failing rule wins.
#[derive(Default)]
pub struct Rules {
    validators: Vec<Box<dyn Validator>>,
}

impl Rules {
    /// An empty rule list (always valid).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    #[must_use]
    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run the rules in order, stopping at the first failure.
    #[must_use]
    pub fn check(&self, value: &FieldValue) -> ValidationResult {
        self.validators
            .iter()
            .fold(ValidationResult::Valid, |acc, v| match acc {
                ValidationResult::Valid => v.validate(value),
                invalid => invalid,
            })
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("len", &self.validators.len())
            .finish()
    }
}

#![forbid(unsafe_code)]

//! Field validation: rules, results, and the validation trace.
//!
//! # Example
//!
//! ```rust
//! use formnav_form::validation::{Required, Rules, Validator};
//! use formnav_form::values::FieldValue;
//!
//! let required = Required::with_message("Age is required");
//! assert!(required.validate(&FieldValue::Number(Some(36))).is_valid());
//! assert!(!required.validate(&FieldValue::Number(None)).is_valid());
//!
//! let rules = Rules::new().with(required);
//! assert!(rules.check(&FieldValue::Number(Some(1))).is_valid());
//! ```

pub mod trace;
mod validators;

pub use trace::{ValidationEvent, ValidationScope, ValidationToken, ValidationTrace};
pub use validators::{
    ERROR_CODE_REQUIRED, Required, Rules, ValidationError, ValidationResult, Validator,
};

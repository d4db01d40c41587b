#![forbid(unsafe_code)]

//! The validation capability and its default implementation.
//!
//! [`ValidationCapability`] is the seam between the navigator and whatever
//! owns form state and rules. [`FormController`] is the stock implementation:
//! a plain value mapping plus one [`Rules`] list per field, independent of
//! any rendering mechanism.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::field::{FieldId, NavigationSequence};
use crate::validation::{
    Required, Rules, ValidationEvent, ValidationScope, ValidationToken, ValidationTrace,
};
use crate::values::FormValues;

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Current error message per field. Fields without an entry are valid (or
/// have not been validated yet).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    messages: BTreeMap<FieldId, String>,
}

impl FieldErrors {
    /// Message for a field, if it is currently invalid.
    #[must_use]
    pub fn get(&self, id: FieldId) -> Option<&str> {
        self.messages.get(&id).map(String::as_str)
    }

    /// Returns `true` if the field currently has an error.
    #[must_use]
    pub fn contains(&self, id: FieldId) -> bool {
        self.messages.contains_key(&id)
    }

    /// Set or clear a field's message.
    pub fn set(&mut self, id: FieldId, message: Option<String>) {
        match message {
            Some(m) => {
                self.messages.insert(id, m);
            }
            None => {
                self.messages.remove(&id);
            }
        }
    }

    /// Number of invalid fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Invalid fields with their messages. Order is unspecified; use the
    /// navigation sequence when order matters.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.messages.iter().map(|(id, m)| (*id, m.as_str()))
    }
}

// ---------------------------------------------------------------------------
// ValidationCapability
// ---------------------------------------------------------------------------

/// Rule checking plus form-state storage, as consumed by the navigator.
///
/// Validation calls are futures so implementations may resolve them
/// asynchronously. There is no cancellation: a started validation always
/// runs to completion and writes its outcome.
#[allow(async_fn_in_trait)]
pub trait ValidationCapability {
    /// Write a control's raw text into the form values.
    ///
    /// Returns `true` if the stored value changed.
    fn set_value(&mut self, field: FieldId, raw: &str) -> bool;

    /// Validate one field and update its error slot.
    async fn validate_one(&mut self, field: FieldId) -> bool;

    /// Validate every field and update all error slots.
    async fn validate_all(&mut self) -> bool;

    /// Current error messages.
    fn errors(&self) -> &FieldErrors;

    /// Current form values.
    fn values(&self) -> &FormValues;
}

// ---------------------------------------------------------------------------
// FormController
// ---------------------------------------------------------------------------

/// Default [`ValidationCapability`]: values, rules, errors and a trace.
#[derive(Debug)]
pub struct FormController {
    sequence: NavigationSequence,
    values: FormValues,
    rules: HashMap<FieldId, Rules>,
    errors: FieldErrors,
    last_token: ValidationToken,
    trace: ValidationTrace,
}

impl FormController {
    /// Controller where every field is required, with its field-specific
    /// message ("First name is required", ...).
    #[must_use]
    pub fn new(sequence: NavigationSequence) -> Self {
        Self::with_rules(sequence, |id| {
            Rules::new().with(Required::with_message(id.required_message()))
        })
    }

    /// Controller with custom rules per field.
    #[must_use]
    pub fn with_rules(sequence: NavigationSequence, mut rules: impl FnMut(FieldId) -> Rules) -> Self {
        let values = FormValues::new(&sequence);
        let rules = sequence.iter().map(|id| (id, rules(id))).collect();
        Self {
            sequence,
            values,
            rules,
            errors: FieldErrors::default(),
            last_token: ValidationToken::NONE,
            trace: ValidationTrace::new(),
        }
    }

    /// The navigation sequence this controller was built for.
    #[must_use]
    pub fn sequence(&self) -> &NavigationSequence {
        &self.sequence
    }

    /// Log of every validation run so far.
    #[must_use]
    pub fn trace(&self) -> &ValidationTrace {
        &self.trace
    }

    /// Token of the most recent validation trigger.
    #[must_use]
    pub fn last_token(&self) -> ValidationToken {
        self.last_token
    }

    fn begin(&mut self, scope: ValidationScope) -> ValidationToken {
        self.last_token = self.last_token.next();
        let token = self.last_token;
        self.trace.push(ValidationEvent::Started { token, scope });
        formnav_core::trace!(token = token.raw(), ?scope, "validation started");
        token
    }

    fn finish(&mut self, token: ValidationToken, scope: ValidationScope, is_valid: bool) {
        self.trace.push(ValidationEvent::Completed {
            token,
            scope,
            is_valid,
        });
        formnav_core::debug!(token = token.raw(), ?scope, is_valid, "validation completed");
    }

    /// Run a field's rules and update its error slot.
    fn check_field(&mut self, id: FieldId) -> bool {
        let (Some(value), Some(rules)) = (self.values.get(id), self.rules.get(&id)) else {
            return true;
        };
        let message = rules.check(value).error_message();
        let valid = message.is_none();
        self.errors.set(id, message);
        valid
    }
}

impl ValidationCapability for FormController {
    fn set_value(&mut self, field: FieldId, raw: &str) -> bool {
        self.values.set_raw(field, raw)
    }

    /// Fields outside the sequence have no rules and validate as `true`
    /// without touching any error slot.
    async fn validate_one(&mut self, field: FieldId) -> bool {
        let scope = ValidationScope::Field(field);
        let token = self.begin(scope);
        let valid = self.check_field(field);
        self.finish(token, scope, valid);
        valid
    }

    async fn validate_all(&mut self) -> bool {
        let token = self.begin(ValidationScope::All);
        let fields: Vec<FieldId> = self.sequence.iter().collect();
        let mut valid = true;
        for id in fields {
            // No short-circuit: every error slot is refreshed.
            valid &= self.check_field(id);
        }
        self.finish(token, ValidationScope::All, valid);
        valid
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn values(&self) -> &FormValues {
        &self.values
    }
}

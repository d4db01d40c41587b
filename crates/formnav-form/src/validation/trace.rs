#![forbid(unsafe_code)]

//! Validation trace: a token per trigger and an ordered event log.
//!
//! Every `validate_one` / `validate_all` call issues a fresh token. The
//! trace records when each token started and how it resolved, so tests can
//! assert exactly which validations ran and in what order.
//!
//! # Invariants
//!
//! - Tokens are strictly monotonic: `token_n < token_{n+1}`
//! - Token 0 is reserved for "no validation"
//! - Each `Completed` event is preceded by a `Started` event with the same token

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::field::FieldId;

// ---------------------------------------------------------------------------
// ValidationToken
// ---------------------------------------------------------------------------

/// A monotonically increasing token identifying one validation trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ValidationToken(u64);

impl ValidationToken {
    /// The null token representing no validation.
    pub const NONE: Self = Self(0);

    /// Create a token from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw token value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The token after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for ValidationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// ValidationScope / ValidationEvent
// ---------------------------------------------------------------------------

/// Which fields a validation trigger covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationScope {
    Field(FieldId),
    All,
}

/// An event in the validation lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidationEvent {
    /// Validation started for a token.
    Started {
        token: ValidationToken,
        scope: ValidationScope,
    },

    /// Validation resolved and its outcome was written to the error slots.
    Completed {
        token: ValidationToken,
        scope: ValidationScope,
        is_valid: bool,
    },
}

impl ValidationEvent {
    /// Get the token associated with this event.
    #[must_use]
    pub fn token(&self) -> ValidationToken {
        match self {
            Self::Started { token, .. } | Self::Completed { token, .. } => *token,
        }
    }

    /// Get the scope associated with this event.
    #[must_use]
    pub fn scope(&self) -> ValidationScope {
        match self {
            Self::Started { scope, .. } | Self::Completed { scope, .. } => *scope,
        }
    }

    /// Get the event type name for logging.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Completed { .. } => "completed",
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationTrace
// ---------------------------------------------------------------------------

/// Ordered log of validation events.
#[derive(Debug, Clone, Default)]
pub struct ValidationTrace {
    events: Vec<ValidationEvent>,
}

impl ValidationTrace {
    /// Create a new empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the trace.
    pub fn push(&mut self, event: ValidationEvent) {
        self.events.push(event);
    }

    /// Get all events in the trace.
    #[must_use]
    pub fn events(&self) -> &[ValidationEvent] {
        &self.events
    }

    /// Check if the trace contains a specific event type for a token.
    #[must_use]
    pub fn contains_event_type(&self, token: ValidationToken, event_type: &str) -> bool {
        self.events
            .iter()
            .any(|e| e.token() == token && e.event_type() == event_type)
    }

    /// Get all events for a specific token.
    #[must_use]
    pub fn events_for_token(&self, token: ValidationToken) -> Vec<&ValidationEvent> {
        self.events.iter().filter(|e| e.token() == token).collect()
    }

    /// Outcomes of completed validations, oldest first.
    pub fn outcomes(&self) -> impl Iterator<Item = (ValidationScope, bool)> + '_ {
        self.events.iter().filter_map(|e| match e {
            ValidationEvent::Completed {
                scope, is_valid, ..
            } => Some((*scope, *is_valid)),
            ValidationEvent::Started { .. } => None,
        })
    }

    /// Compute a checksum of the trace for golden comparison.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for event in &self.events {
            event.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Get the number of events in the trace.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the trace is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_ordering() {
        let t = ValidationToken::NONE;
        assert_eq!(t.raw(), 0);
        assert!(t.next() > t);
        assert_eq!(t.next().to_string(), "Token(1)");
    }

    #[test]
    fn trace_queries() {
        let t1 = ValidationToken::from_raw(1);
        let t2 = ValidationToken::from_raw(2);
        let mut trace = ValidationTrace::new();
        trace.push(ValidationEvent::Started {
            token: t1,
            scope: ValidationScope::Field(FieldId::Age),
        });
        trace.push(ValidationEvent::Completed {
            token: t1,
            scope: ValidationScope::Field(FieldId::Age),
            is_valid: false,
        });
        trace.push(ValidationEvent::Started {
            token: t2,
            scope: ValidationScope::All,
        });

        assert_eq!(trace.len(), 3);
        assert!(trace.contains_event_type(t1, "completed"));
        assert!(!trace.contains_event_type(t2, "completed"));
        assert_eq!(trace.events_for_token(t1).len(), 2);
        let outcomes: Vec<_> = trace.outcomes().collect();
        assert_eq!(
            outcomes,
            vec![(ValidationScope::Field(FieldId::Age), false)]
        );
    }

    #[test]
    fn checksum_tracks_content() {
        let mut a = ValidationTrace::new();
        let mut b = ValidationTrace::new();
        assert_eq!(a.checksum(), b.checksum());
        a.push(ValidationEvent::Started {
            token: ValidationToken::from_raw(1),
            scope: ValidationScope::All,
        });
        assert_ne!(a.checksum(), b.checksum());
        b.push(ValidationEvent::Started {
            token: ValidationToken::from_raw(1),
            scope: ValidationScope::All,
        });
        assert_eq!(a.checksum(), b.checksum());
        a.clear();
        assert!(a.is_empty());
    }
}

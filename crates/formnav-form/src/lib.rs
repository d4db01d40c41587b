#![forbid(unsafe_code)]

//! Keyboard-driven form navigation with per-field validation.
//!
//! A [`FieldNavigator`] owns the navigation sequence, a
//! [`ValidationCapability`] (by default the [`FormController`]), the control
//! registry and the focus target. Enter on a field validates it and moves
//! focus forward; submitting validates everything and focuses the first
//! invalid field in navigation order.
//!
//! # Example
//!
//! ```rust
//! use formnav_core::event::{KeyCode, KeyEvent};
//! use formnav_form::{FieldId, FieldKeyEvent, FieldNavigator, KeyOutcome, RecordSubmit};
//!
//! let mut nav = FieldNavigator::standard(RecordSubmit::default());
//! let mut event = FieldKeyEvent::new(KeyEvent::new(KeyCode::Enter), "Ada");
//! let outcome = pollster::block_on(nav.handle_field_key(&mut event, 0, FieldId::FirstName));
//!
//! assert!(matches!(outcome, KeyOutcome::Advanced(_)));
//! assert!(event.is_default_prevented());
//! ```

pub mod controller;
pub mod field;
pub mod navigator;
pub mod registry;
pub mod submit;
pub mod validation;
pub mod values;

pub use controller::{FieldErrors, FormController, ValidationCapability};
pub use field::{
    FieldDescriptor, FieldId, FieldKind, FieldPhase, GENDER_OPTIONS, NavigationSequence,
    SequenceError,
};
pub use navigator::{
    FieldKeyEvent, FieldNavigator, KeyOutcome, SubmitEvent, SubmitKeyEvent, SubmitOutcome,
};
pub use registry::{ControlId, ControlRegistry, FocusTracker};
pub use submit::{LogSubmit, RecordSubmit, SubmitHandler};
pub use values::{FieldValue, FormValues};

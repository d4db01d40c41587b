#![forbid(unsafe_code)]

//! Field navigator: Enter-driven validation and focus advancement.
//!
//! The navigator reacts to three inputs:
//!
//! - a key event on a field control ([`FieldNavigator::handle_field_key`])
//! - a form submit request ([`FieldNavigator::handle_submit`])
//! - a key event on the submit control ([`FieldNavigator::handle_submit_key`])
//!
//! Validation failures are never errors here. They land in the field's
//! error slot and the outcome enums tell the caller what happened to focus.
//!
//! Handlers take `&mut self`, so events for one form are processed strictly
//! one after another: a second event cannot start until the previous
//! handler's future has resolved.

use formnav_core::event::KeyEvent;

use crate::controller::{FieldErrors, FormController, ValidationCapability};
use crate::field::{FieldDescriptor, FieldId, FieldPhase, NavigationSequence, SequenceError};
use crate::registry::{ControlId, ControlRegistry, FocusTracker};
use crate::submit::SubmitHandler;
use crate::values::FormValues;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Key event delivered to a field control, carrying the control's current
/// raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKeyEvent<'a> {
    pub key: KeyEvent,
    /// What the control shows right now, including the latest keystroke.
    pub value: &'a str,
    default_prevented: bool,
}

impl<'a> FieldKeyEvent<'a> {
    #[must_use]
    pub fn new(key: KeyEvent, value: &'a str) -> Self {
        Self {
            key,
            value,
            default_prevented: false,
        }
    }

    /// Suppress the control's own handling of this key.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Form submission request (e.g. the submit control was activated).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Key event delivered to the submit control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitKeyEvent {
    pub key: KeyEvent,
    default_prevented: bool,
}

impl SubmitKeyEvent {
    #[must_use]
    pub fn new(key: KeyEvent) -> Self {
        Self {
            key,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What a field key event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not the confirm key; the value was recorded and nothing else happened.
    Ignored,
    /// Field was valid and focus moved to this control.
    Advanced(ControlId),
    /// Field was valid but there was no control to move to.
    Stuck,
    /// Field was invalid; focus stays put.
    Rejected,
}

/// What a submit attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every field was valid and the submit handler ran.
    Submitted,
    /// At least one field was invalid.
    Rejected {
        /// First invalid field in navigation order.
        first_invalid: Option<FieldId>,
        /// Control that received focus, if one was registered.
        focused: Option<ControlId>,
    },
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

// ---------------------------------------------------------------------------
// FieldNavigator
// ---------------------------------------------------------------------------

/// Drives focus and validation for one form instance.
#[derive(Debug)]
pub struct FieldNavigator<C, S> {
    sequence: NavigationSequence,
    controller: C,
    registry: ControlRegistry,
    focus: FocusTracker,
    phases: Vec<FieldPhase>,
    submit: S,
    show_results: bool,
    last_submitted: Option<FormValues>,
    submissions: u64,
}

impl<S: SubmitHandler> FieldNavigator<FormController, S> {
    /// The four-field form: default order, every field required, controls
    /// numbered `0..4` and the submit control `4`.
    #[must_use]
    pub fn standard(submit: S) -> Self {
        let sequence = NavigationSequence::default();
        let registry = ControlRegistry::sequential(sequence.len());
        let controller = FormController::new(sequence.clone());
        Self::assemble(sequence, controller, registry, submit)
    }
}

impl<C: ValidationCapability, S: SubmitHandler> FieldNavigator<C, S> {
    /// Wire a navigator together.
    ///
    /// Focus starts on the first registered field control.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::ValuesMismatch`] if the controller's value
    /// keys are not exactly the fields of `sequence`, in order.
    pub fn new(
        sequence: NavigationSequence,
        controller: C,
        registry: ControlRegistry,
        submit: S,
    ) -> Result<Self, SequenceError> {
        if !controller.values().keys().eq(sequence.iter()) {
            return Err(SequenceError::ValuesMismatch);
        }
        Ok(Self::assemble(sequence, controller, registry, submit))
    }

    fn assemble(
        sequence: NavigationSequence,
        controller: C,
        registry: ControlRegistry,
        submit: S,
    ) -> Self {
        let focus = FocusTracker::starting_at(registry.field(0));
        let phases = vec![FieldPhase::Clean; sequence.len()];
        Self {
            sequence,
            controller,
            registry,
            focus,
            phases,
            submit,
            show_results: true,
            last_submitted: None,
            submissions: 0,
        }
    }

    /// Keep (or stop keeping) a copy of the last submitted values.
    #[must_use]
    pub fn with_result_display(mut self, show: bool) -> Self {
        self.show_results = show;
        if !show {
            self.last_submitted = None;
        }
        self
    }

    // -- handlers ----------------------------------------------------------

    /// Handle a key event on the field at `index`.
    ///
    /// The control's raw value is always written into the form values first.
    /// Only the confirm key goes further: it prevents the default action,
    /// validates `field`, and on success moves focus to the control at
    /// `index + 1`, or to the submit control after the last field.
    ///
    /// An `index` outside the navigation sequence is ignored (and logged).
    pub async fn handle_field_key(
        &mut self,
        event: &mut FieldKeyEvent<'_>,
        index: usize,
        field: FieldId,
    ) -> KeyOutcome {
        if index >= self.sequence.len() {
            formnav_core::warn!(index, %field, "field key for position outside the sequence");
            return KeyOutcome::Ignored;
        }

        if self.controller.set_value(field, event.value) {
            self.update_phase(field, FieldPhase::on_edit);
        }

        if !event.key.is_confirm() {
            return KeyOutcome::Ignored;
        }
        event.prevent_default();

        if !self.validate_field(field).await {
            formnav_core::debug!(%field, "field rejected, focus stays");
            return KeyOutcome::Rejected;
        }

        let target = self
            .registry
            .field(index + 1)
            .or_else(|| self.registry.submit());
        match target {
            Some(control) => {
                self.focus.focus(control);
                formnav_core::debug!(%field, %control, "focus advanced");
                KeyOutcome::Advanced(control)
            }
            None => {
                formnav_core::warn!(%field, index, "no control to advance to");
                KeyOutcome::Stuck
            }
        }
    }

    /// Handle a form submission.
    ///
    /// Always prevents the default action, then validates the whole form.
    /// Valid: the submit handler runs once with the current values.
    /// Invalid: focus moves to the first invalid field in navigation order.
    pub async fn handle_submit(&mut self, event: &mut SubmitEvent) -> SubmitOutcome {
        event.prevent_default();
        self.submit_form().await
    }

    /// Handle a key event on the submit control.
    ///
    /// The confirm key takes the same path as [`Self::handle_submit`] and
    /// returns its outcome; any other key returns `None` untouched.
    pub async fn handle_submit_key(&mut self, event: &mut SubmitKeyEvent) -> Option<SubmitOutcome> {
        if !event.key.is_confirm() {
            return None;
        }
        event.prevent_default();
        Some(self.submit_form().await)
    }

    /// Validate one field without navigating, e.g. when focus leaves it.
    pub async fn validate_field(&mut self, field: FieldId) -> bool {
        self.update_phase(field, FieldPhase::on_validate);
        let valid = self.controller.validate_one(field).await;
        self.update_phase(field, |p| p.on_resolved(valid));
        valid
    }

    async fn submit_form(&mut self) -> SubmitOutcome {
        for phase in &mut self.phases {
            *phase = phase.on_validate();
        }
        let valid = self.controller.validate_all().await;

        let errors = self.controller.errors();
        for (phase, id) in self.phases.iter_mut().zip(self.sequence.iter()) {
            *phase = phase.on_resolved(!errors.contains(id));
        }

        if valid {
            let values = self.controller.values();
            self.submit.submit(values);
            self.submissions += 1;
            if self.show_results {
                self.last_submitted = Some(values.clone());
            }
            formnav_core::info!(submissions = self.submissions, "form submitted");
            return SubmitOutcome::Submitted;
        }

        let Some((position, first_invalid)) = self.sequence.first_where(|id| errors.contains(id))
        else {
            formnav_core::warn!("form invalid but no field reports an error");
            return SubmitOutcome::Rejected {
                first_invalid: None,
                focused: None,
            };
        };

        let focused = self.registry.field(position);
        match focused {
            Some(control) => {
                self.focus.focus(control);
                formnav_core::debug!(field = %first_invalid, %control, "focus moved to first invalid field");
            }
            None => {
                formnav_core::warn!(field = %first_invalid, position, "no control registered for invalid field");
            }
        }
        SubmitOutcome::Rejected {
            first_invalid: Some(first_invalid),
            focused,
        }
    }

    fn update_phase(&mut self, field: FieldId, f: impl FnOnce(FieldPhase) -> FieldPhase) {
        if let Some(pos) = self.sequence.position(field) {
            self.phases[pos] = f(self.phases[pos]);
        }
    }

    // -- surface-driven focus ---------------------------------------------

    /// Move focus on behalf of the rendering surface (Tab, mouse click).
    ///
    /// Returns `false` and leaves focus alone if `control` is not registered.
    pub fn focus_control(&mut self, control: ControlId) -> bool {
        let known =
            self.registry.position_of(control).is_some() || self.registry.submit() == Some(control);
        if known {
            self.focus.focus(control);
        }
        known
    }

    // -- accessors ---------------------------------------------------------

    /// Focused control, if any.
    #[must_use]
    pub fn focused(&self) -> Option<ControlId> {
        self.focus.focused()
    }

    /// Returns `true` if `control` has focus.
    #[must_use]
    pub fn is_focused(&self, control: ControlId) -> bool {
        self.focus.is_focused(control)
    }

    /// Number of focus moves so far.
    #[must_use]
    pub fn focus_moves(&self) -> u64 {
        self.focus.moves()
    }

    /// Descriptor for the field at a position.
    #[must_use]
    pub fn field(&self, position: usize) -> Option<FieldDescriptor<'_>> {
        let id = self.sequence.get(position)?;
        Some(FieldDescriptor {
            id,
            position,
            control: self.registry.field(position),
            error: self.controller.errors().get(id),
            phase: self.phases[position],
        })
    }

    /// Descriptors for every field in navigation order.
    pub fn fields(&self) -> impl Iterator<Item = FieldDescriptor<'_>> + '_ {
        (0..self.sequence.len()).filter_map(|pos| self.field(pos))
    }

    /// Phase of a field.
    #[must_use]
    pub fn phase(&self, field: FieldId) -> Option<FieldPhase> {
        self.sequence.position(field).map(|pos| self.phases[pos])
    }

    #[must_use]
    pub fn sequence(&self) -> &NavigationSequence {
        &self.sequence
    }

    #[must_use]
    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    #[must_use]
    pub fn controller(&self) -> &C {
        &self.controller
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        self.controller.errors()
    }

    #[must_use]
    pub fn values(&self) -> &FormValues {
        self.controller.values()
    }

    #[must_use]
    pub fn submit_handler(&self) -> &S {
        &self.submit
    }

    /// Values of the last successful submission, when result display is on.
    #[must_use]
    pub fn last_submitted(&self) -> Option<&FormValues> {
        self.last_submitted.as_ref()
    }

    /// How many times the submit handler ran.
    #[must_use]
    pub fn submission_count(&self) -> u64 {
        self.submissions
    }
}

#![forbid(unsafe_code)]

//! Control registry and focus tracking.
//!
//! The rendering surface hands out a [`ControlId`] for every focusable
//! control it draws. Field controls are registered in navigation order while
//! the form is built; the registry is append-only afterwards.

use std::fmt;

/// Opaque handle for a focusable control owned by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControlId(u32);

impl ControlId {
    /// Wrap a surface-specific id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ControlRegistry
// ---------------------------------------------------------------------------

/// Ordered `position → control` table plus the submit control.
#[derive(Debug, Clone, Default)]
pub struct ControlRegistry {
    fields: Vec<ControlId>,
    submit: Option<ControlId>,
}

impl ControlRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with field controls `0..field_count` and the submit control
    /// numbered right after them.
    #[must_use]
    pub fn sequential(field_count: usize) -> Self {
        let mut registry = Self::new();
        let mut next = 0u32;
        for _ in 0..field_count {
            registry.push_field(ControlId::new(next));
            next += 1;
        }
        registry.set_submit(ControlId::new(next));
        registry
    }

    /// Register the control for the next field position and return that
    /// position.
    pub fn push_field(&mut self, control: ControlId) -> usize {
        self.fields.push(control);
        self.fields.len() - 1
    }

    /// Register the submit control. Only the first registration sticks.
    ///
    /// Returns `false` if a submit control was already registered.
    pub fn set_submit(&mut self, control: ControlId) -> bool {
        if self.submit.is_some() {
            return false;
        }
        self.submit = Some(control);
        true
    }

    /// Control registered at a field position.
    #[must_use]
    pub fn field(&self, position: usize) -> Option<ControlId> {
        self.fields.get(position).copied()
    }

    /// The submit control.
    #[must_use]
    pub fn submit(&self) -> Option<ControlId> {
        self.submit
    }

    /// Position of a field control.
    #[must_use]
    pub fn position_of(&self, control: ControlId) -> Option<usize> {
        self.fields.iter().position(|c| *c == control)
    }

    /// Number of registered field controls.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

// ---------------------------------------------------------------------------
// FocusTracker
// ---------------------------------------------------------------------------

/// Which control currently has input focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTracker {
    focused: Option<ControlId>,
    moves: u64,
}

impl FocusTracker {
    /// Tracker starting on `initial`.
    #[must_use]
    pub fn starting_at(initial: Option<ControlId>) -> Self {
        Self {
            focused: initial,
            moves: 0,
        }
    }

    /// Focused control, if any.
    #[must_use]
    pub fn focused(&self) -> Option<ControlId> {
        self.focused
    }

    /// Returns `true` if `control` has focus.
    #[must_use]
    pub fn is_focused(&self, control: ControlId) -> bool {
        self.focused == Some(control)
    }

    /// Move focus. Counts as a move even when `control` was already focused,
    /// matching a programmatic `focus()` call.
    pub fn focus(&mut self, control: ControlId) {
        self.focused = Some(control);
        self.moves += 1;
    }

    /// Number of focus calls so far.
    #[must_use]
    pub fn moves(&self) -> u64 {
        self.moves
    }
}

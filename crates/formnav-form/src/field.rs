#![forbid(unsafe_code)]

//! Field identifiers, the navigation sequence, and per-field phase tracking.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::ControlId;

// ---------------------------------------------------------------------------
// FieldId
// ---------------------------------------------------------------------------

/// Identifier of one of the form's inputs.
///
/// Serializes to the camelCase wire names (`firstName`, `lastName`, `gender`,
/// `age`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    FirstName,
    LastName,
    Gender,
    Age,
}

impl FieldId {
    /// All identifiers in default navigation order.
    pub const ALL: [FieldId; 4] = [Self::FirstName, Self::LastName, Self::Gender, Self::Age];

    /// Wire name of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Gender => "gender",
            Self::Age => "age",
        }
    }

    /// What kind of input control backs this field.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::FirstName | Self::LastName => FieldKind::Text,
            Self::Gender => FieldKind::Choice,
            Self::Age => FieldKind::Number,
        }
    }

    /// Placeholder shown while the control is empty.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Gender => "Select gender",
            Self::Age => "Age",
        }
    }

    /// Message reported when the field is left empty.
    #[must_use]
    pub const fn required_message(self) -> &'static str {
        match self {
            Self::FirstName => "First name is required",
            Self::LastName => "Last name is required",
            Self::Gender => "Gender is required",
            Self::Age => "Age is required",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input control type backing a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// One of a fixed list of options (see [`GENDER_OPTIONS`]).
    Choice,
    /// Integer input; anything that does not parse is treated as empty.
    Number,
}

/// Selectable gender options as `(value, label)`. The empty value is the
/// "nothing selected" entry.
pub const GENDER_OPTIONS: [(&str, &str); 3] =
    [("", "Select gender"), ("male", "Male"), ("female", "Female")];

// ---------------------------------------------------------------------------
// FieldPhase
// ---------------------------------------------------------------------------

/// Where a single field is in its edit/validate cycle.
///
/// ```text
/// Clean ──edit──▶ Editing ──confirm/submit──▶ Validating ──▶ Valid | Invalid
///                    ▲                                          │
///                    └──────────────────edit────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldPhase {
    #[default]
    Clean,
    Editing,
    Validating,
    Valid,
    Invalid,
}

impl FieldPhase {
    /// Phase after the field's value changed.
    #[must_use]
    pub const fn on_edit(self) -> Self {
        match self {
            Self::Validating => Self::Validating,
            _ => Self::Editing,
        }
    }

    /// Phase once a validation trigger covering this field has started.
    #[must_use]
    pub const fn on_validate(self) -> Self {
        Self::Validating
    }

    /// Phase once validation resolved.
    #[must_use]
    pub const fn on_resolved(self, valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid }
    }

    /// Returns `true` once validation has produced an outcome.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Valid | Self::Invalid)
    }
}

// ---------------------------------------------------------------------------
// NavigationSequence
// ---------------------------------------------------------------------------

/// Error building a [`NavigationSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    /// The sequence has no fields.
    Empty,
    /// A field appears more than once.
    Duplicate(FieldId),
    /// Form values do not hold exactly the sequence's fields.
    ValuesMismatch,
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("navigation sequence is empty"),
            Self::Duplicate(id) => write!(f, "field {id} appears more than once"),
            Self::ValuesMismatch => f.write_str("form values do not match the navigation sequence"),
        }
    }
}

impl std::error::Error for SequenceError {}

/// Fixed traversal order for Enter-driven navigation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationSequence {
    fields: Vec<FieldId>,
}

impl NavigationSequence {
    /// Build a sequence from an explicit order.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError`] if `fields` is empty or repeats a field.
    pub fn new(fields: impl IntoIterator<Item = FieldId>) -> Result<Self, SequenceError> {
        let fields: Vec<FieldId> = fields.into_iter().collect();
        if fields.is_empty() {
            return Err(SequenceError::Empty);
        }
        for (i, id) in fields.iter().enumerate() {
            if fields[..i].contains(id) {
                return Err(SequenceError::Duplicate(*id));
            }
        }
        Ok(Self { fields })
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at a position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<FieldId> {
        self.fields.get(index).copied()
    }

    /// Position of a field.
    #[must_use]
    pub fn position(&self, id: FieldId) -> Option<usize> {
        self.fields.iter().position(|f| *f == id)
    }

    /// Returns `true` if the field is part of the sequence.
    #[must_use]
    pub fn contains(&self, id: FieldId) -> bool {
        self.fields.contains(&id)
    }

    /// Fields in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.fields.iter().copied()
    }

    /// First field (in sequence order) that satisfies `pred`.
    #[must_use]
    pub fn first_where(&self, mut pred: impl FnMut(FieldId) -> bool) -> Option<(usize, FieldId)> {
        self.iter().enumerate().find(|(_, id)| pred(*id))
    }
}

impl Default for NavigationSequence {
    fn default() -> Self {
        Self {
            fields: FieldId::ALL.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldDescriptor
// ---------------------------------------------------------------------------

/// Read-only snapshot of one field for the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor<'a> {
    pub id: FieldId,
    /// Position in the navigation sequence.
    pub position: usize,
    /// Registered control, if any.
    pub control: Option<ControlId>,
    /// Current validation message; `None` when valid or not yet validated.
    pub error: Option<&'a str>,
    pub phase: FieldPhase,
}

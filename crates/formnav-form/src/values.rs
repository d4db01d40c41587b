#![forbid(unsafe_code)]

//! Form values: one entry per field of the navigation sequence.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::field::{FieldId, FieldKind, NavigationSequence};

/// A single value held by the form.
///
/// Serializes untagged, so `Number(Some(36))` becomes `36` and
/// `Number(None)` becomes `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Choice(String),
    /// `None` when the control is empty or holds something non-numeric.
    Number(Option<i64>),
}

impl FieldValue {
    /// The empty value for a field kind.
    #[must_use]
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => Self::Text(String::new()),
            FieldKind::Choice => Self::Choice(String::new()),
            FieldKind::Number => Self::Number(None),
        }
    }

    /// Coerce a control's raw text into a value of the given kind.
    ///
    /// Numbers are parsed after trimming; anything unparseable (including
    /// fractions and out-of-range integers) becomes `Number(None)`.
    #[must_use]
    pub fn from_raw(kind: FieldKind, raw: &str) -> Self {
        match kind {
            FieldKind::Text => Self::Text(raw.to_string()),
            FieldKind::Choice => Self::Choice(raw.to_string()),
            FieldKind::Number => Self::Number(raw.trim().parse().ok()),
        }
    }

    /// Returns `true` if the value counts as "not filled in".
    ///
    /// Whitespace-only text is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) | Self::Choice(s) => s.trim().is_empty(),
            Self::Number(n) => n.is_none(),
        }
    }

    /// Text content, if this is a text or choice value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Choice(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Numeric content, if this is a number value holding a number.
    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => *n,
            _ => None,
        }
    }
}

/// Current values of every field, in navigation order.
///
/// Keys are exactly the fields of the sequence the values were built from;
/// writes to any other field are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    entries: Vec<(FieldId, FieldValue)>,
}

impl FormValues {
    /// Empty values for every field of `sequence`.
    #[must_use]
    pub fn new(sequence: &NavigationSequence) -> Self {
        Self {
            entries: sequence
                .iter()
                .map(|id| (id, FieldValue::empty(id.kind())))
                .collect(),
        }
    }

    /// Value of a field.
    #[must_use]
    pub fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.entries.iter().find(|(f, _)| *f == id).map(|(_, v)| v)
    }

    /// Write a control's raw text into a field.
    ///
    /// Returns `true` if the stored value changed. Unknown fields are left
    /// alone and report `false`.
    pub fn set_raw(&mut self, id: FieldId, raw: &str) -> bool {
        let Some((_, slot)) = self.entries.iter_mut().find(|(f, _)| *f == id) else {
            return false;
        };
        let next = FieldValue::from_raw(id.kind(), raw);
        if *slot == next {
            return false;
        }
        *slot = next;
        true
    }

    /// Iterate `(field, value)` pairs in navigation order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        self.entries.iter().map(|(f, v)| (*f, v))
    }

    /// Field identifiers in navigation order.
    pub fn keys(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compact JSON rendering, e.g. for logs.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for FormValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id.name(), value)?;
        }
        map.end()
    }
}

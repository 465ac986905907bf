//! The failure type of the domain try-construct capability.
//!
//! A domain type's validating constructor reports failure with
//! [`ConstructError`]: a non-empty list of entries, each optionally carrying
//! its own field attribution. A plain entry is attributed to whatever field
//! is current when the converter records it; a field-qualified entry keeps
//! the attribution the domain validator chose (the case where the domain
//! layer aggregates several per-field failures itself).

use std::fmt::{self, Display};

use stillwater::prelude::*;

/// One failure entry from a domain validating constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructEntry {
    /// Field attribution chosen by the domain validator, if any. `None`
    /// means "attribute to the current field" at record time.
    pub field: Option<String>,
    /// Human-readable failure message.
    pub message: String,
}

impl ConstructEntry {
    /// Creates an unattributed entry.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Creates an entry attributed to a specific field.
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

/// A non-empty collection of construction failure entries.
///
/// Implements `Semigroup` so a domain validator can accumulate several
/// violations before failing:
///
/// ```rust
/// use dragnet::ConstructError;
/// use stillwater::prelude::*;
///
/// let err = ConstructError::message("too long")
///     .combine(ConstructError::message("bad format"));
/// assert_eq!(err.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructError(NonEmptyVec<ConstructEntry>);

impl ConstructError {
    /// Creates an error with a single unattributed message.
    pub fn message(message: impl Into<String>) -> Self {
        Self(NonEmptyVec::singleton(ConstructEntry::new(message)))
    }

    /// Creates an error with a single field-qualified message.
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(NonEmptyVec::singleton(ConstructEntry::for_field(
            field, message,
        )))
    }

    /// Creates an error from a `Vec<ConstructEntry>`.
    ///
    /// # Panics
    ///
    /// Panics if the provided vec is empty.
    pub fn from_entries(entries: Vec<ConstructEntry>) -> Self {
        Self(NonEmptyVec::from_vec(entries).expect("ConstructError requires at least one entry"))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns false since this collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the first entry.
    pub fn first(&self) -> &ConstructEntry {
        self.0.head()
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &ConstructEntry> {
        self.0.iter()
    }

    /// Converts this error into its entries.
    pub fn into_entries(self) -> Vec<ConstructEntry> {
        self.0.into_vec()
    }
}

impl Semigroup for ConstructError {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            match &entry.field {
                Some(field) => write!(f, "{}: {}", field, entry.message)?,
                None => write!(f, "{}", entry.message)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConstructError {}

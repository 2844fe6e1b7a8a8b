//! Error types for schema construction and archetype resolution.

use std::fmt;

/// Errors detected while building a [`SchemaArena`](crate::SchemaArena).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// Two raw schemas declared the same class name.
    DuplicateClass {
        /// The duplicated class name.
        class: String,
    },
    /// A class named a parent that is not in the arena.
    UnknownParent {
        /// The class whose parent is missing.
        class: String,
        /// The missing parent name.
        parent: String,
    },
    /// A class's parent chain loops back on itself.
    ParentCycle {
        /// The class at which the cycle was detected.
        class: String,
    },
    /// A class declared a property id its parent chain already owns.
    DuplicatePropertyId {
        /// The class declaring the duplicate.
        class: String,
        /// The conflicting property id.
        id: u32,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateClass { class } => {
                write!(f, "duplicate class schema '{class}'")
            }
            Self::UnknownParent { class, parent } => {
                write!(f, "class '{class}' names unknown parent '{parent}'")
            }
            Self::ParentCycle { class } => {
                write!(f, "parent chain of class '{class}' contains a cycle")
            }
            Self::DuplicatePropertyId { class, id } => {
                write!(f, "class '{class}' redeclares property id {id}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Errors from archetype → schema resolution.
///
/// Both variants are fail-fast: a zero-match archetype cannot be decoded
/// at all, and an ambiguous one must not be guessed silently — a wrong
/// schema would desynchronize the bit stream and corrupt everything
/// after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// No known class matches the archetype.
    NoMatch {
        /// The unresolvable archetype name.
        archetype: String,
    },
    /// More than one known class matches the derived candidate suffix.
    Ambiguous {
        /// The archetype being resolved.
        archetype: String,
        /// Every class name that matched.
        candidates: Vec<String>,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch { archetype } => {
                write!(f, "no class schema matches archetype '{archetype}'")
            }
            Self::Ambiguous {
                archetype,
                candidates,
            } => {
                write!(
                    f,
                    "archetype '{archetype}' matches {} classes: {}",
                    candidates.len(),
                    candidates.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ResolveError {}

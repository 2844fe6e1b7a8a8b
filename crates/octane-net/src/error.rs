//! Error types for network-stream decoding and encoding.

use octane_bits::BitError;
use octane_schema::ResolveError;
use std::fmt;

/// Errors from frame and actor transcoding.
///
/// Every variant carries the bit offset at which it occurred, so a
/// failed strict-mode pass points at the exact wire position that
/// could not be interpreted.
#[derive(Clone, Debug, PartialEq)]
pub enum NetError {
    /// The stream ran out of bits mid-value.
    TruncatedStream {
        /// Bit offset at which the read was attempted.
        bit: u64,
    },
    /// A value decoded structurally but is not interpretable
    /// (bad string payload, unknown platform tag, or an attempt to
    /// re-encode an incomplete record).
    MalformedValue {
        /// Bit offset of the offending value.
        bit: u64,
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The schema resolver found zero or several classes for a spawned
    /// archetype.
    UnresolvedClass {
        /// Bit offset of the spawn record.
        bit: u64,
        /// The underlying resolver failure.
        reason: ResolveError,
    },
    /// An update or despawn referenced a channel id never spawned.
    UnknownActor {
        /// Bit offset of the actor record.
        bit: u64,
        /// The unknown channel id.
        channel: u32,
    },
    /// A resolved property name has no layout decoder.
    UnsupportedProperty {
        /// Bit offset of the property id.
        bit: u64,
        /// Class whose schema resolved the name.
        class: String,
        /// The unsupported property name.
        property: String,
    },
    /// A composite field decoded outside its documented legal range.
    ValueOutOfRange {
        /// Bit offset of the composite value.
        bit: u64,
        /// The property whose composite failed validation.
        property: String,
        /// The violated bound.
        violation: crate::value::RangeViolation,
    },
}

impl NetError {
    /// Bit offset at which the error occurred.
    pub fn bit(&self) -> u64 {
        match self {
            Self::TruncatedStream { bit }
            | Self::MalformedValue { bit, .. }
            | Self::UnresolvedClass { bit, .. }
            | Self::UnknownActor { bit, .. }
            | Self::UnsupportedProperty { bit, .. }
            | Self::ValueOutOfRange { bit, .. } => *bit,
        }
    }
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedStream { bit } => {
                write!(f, "stream truncated at bit {bit}")
            }
            Self::MalformedValue { bit, detail } => {
                write!(f, "malformed value at bit {bit}: {detail}")
            }
            Self::UnresolvedClass { bit, reason } => {
                write!(f, "unresolved class at bit {bit}: {reason}")
            }
            Self::UnknownActor { bit, channel } => {
                write!(f, "update for unknown actor channel {channel} at bit {bit}")
            }
            Self::UnsupportedProperty {
                bit,
                class,
                property,
            } => {
                write!(
                    f,
                    "no decoder for property '{property}' of class '{class}' at bit {bit}"
                )
            }
            Self::ValueOutOfRange {
                bit,
                property,
                violation,
            } => {
                write!(f, "property '{property}' at bit {bit}: {violation}")
            }
        }
    }
}

impl std::error::Error for NetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnresolvedClass { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl From<BitError> for NetError {
    fn from(e: BitError) -> Self {
        match e {
            BitError::TruncatedStream { bit } => Self::TruncatedStream { bit },
            BitError::MalformedString { bit, detail } => Self::MalformedValue { bit, detail },
        }
    }
}

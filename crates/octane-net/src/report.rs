//! Structured diagnostics for lenient decoding.
//!
//! Nothing here is logged; the report is returned to the caller, who
//! decides what to surface. A strict-mode pass that succeeds always has
//! a clean report.

use octane_bits::RawBits;

use crate::error::NetError;
use crate::value::RangeViolation;

/// One unit (actor or property) that could not be fully decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct IncompleteUnit {
    /// Bit offset at which decoding failed.
    pub bit: u64,
    /// The failure, as the strict-mode error it would have been.
    pub error: NetError,
    /// The bits the unit consumed before failing.
    pub consumed: RawBits,
    /// A fixed lookahead window past the failure point, for inspection.
    pub lookahead: RawBits,
}

/// A spawn whose archetype resolved only through the fallback heuristic.
///
/// The mapping is deterministic but worth an operator's eye: promoting
/// the pair into the exact table removes the guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessedClass {
    /// Bit offset of the spawn record.
    pub bit: u64,
    /// The archetype that needed guessing.
    pub archetype: String,
    /// The class it was mapped to.
    pub class: String,
}

/// A composite property field outside its documented legal range.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeFlag {
    /// Bit offset of the property value.
    pub bit: u64,
    /// Channel id of the actor carrying the property.
    pub channel: u32,
    /// The property whose value violated its range.
    pub property: String,
    /// The violated bound.
    pub violation: RangeViolation,
}

/// Everything a lenient decode pass wants to tell the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodeReport {
    /// Units that failed to decode and were preserved as raw bits.
    pub incomplete: Vec<IncompleteUnit>,
    /// Fallback-resolved archetype mappings.
    pub guessed: Vec<GuessedClass>,
    /// Range violations that were flagged instead of fatal.
    pub range_flags: Vec<RangeFlag>,
}

impl DecodeReport {
    /// True when the pass decoded everything without incident.
    ///
    /// Guessed mappings do not count against cleanliness: they are
    /// deterministic and the decode is still byte-exact.
    pub fn is_clean(&self) -> bool {
        self.incomplete.is_empty() && self.range_flags.is_empty()
    }
}

//! Decode configuration and per-capture context.

use octane_schema::SchemaArena;

/// The producing application's version pair, stamped into every capture.
///
/// Several wire layouts changed across versions; decoders gate on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    /// Major (build) version.
    pub major: u32,
    /// Minor (patch) version.
    pub minor: u32,
}

impl Version {
    /// A version pair.
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// True when this version is at or past `(major, minor)`.
    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }
}

/// How a decode pass reacts to uninterpretable data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Every failure aborts the pass with a typed error. Required when
    /// the decode feeds re-encoding: any incompleteness would corrupt
    /// the output stream.
    #[default]
    Strict,
    /// Failures are isolated to the unit being decoded: the unit is
    /// marked incomplete, its bits are preserved for inspection, and
    /// the pass keeps whatever decoded cleanly. For inspection and
    /// export tooling against captures whose schema catalog is known
    /// to be incomplete.
    Lenient,
}

/// Runtime decode configuration, threaded through the entry points.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeConfig {
    /// Failure-propagation policy.
    pub mode: DecodeMode,
}

/// Borrowed, already-parsed inputs for one capture.
///
/// The outer container format locates the network-stream region and
/// parses the name table, schema catalog, channel cap, and version pair
/// before the core ever runs; this struct is that boundary.
#[derive(Clone, Copy, Debug)]
pub struct CaptureContext<'a> {
    /// Object index → name table.
    pub object_names: &'a [String],
    /// Class-name-keyed schema catalog.
    pub schemas: &'a SchemaArena,
    /// Channel cap: actor ids are bounded integers in `[0, max_channels]`.
    pub max_channels: u32,
    /// The capture's version pair.
    pub version: Version,
}

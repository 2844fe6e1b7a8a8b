//! Octane: a byte-exact transcoder for bit-packed game-capture
//! network streams.
//!
//! This is the top-level facade crate re-exporting the public API from
//! the Octane sub-crates. For most users, adding `octane` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use octane::prelude::*;
//! use octane::schema::{RawSchema, SchemaArena};
//!
//! // The outer container hands over pre-parsed inputs: the name table,
//! // the schema catalog, the channel cap, and the version pair.
//! let object_names = vec!["Archetypes.Ball.Ball_Default".to_string()];
//! let schemas = SchemaArena::build(vec![RawSchema {
//!     class_name: "TAGame.Ball_TA".into(),
//!     parent: None,
//!     properties: vec![(0, "TAGame.Ball_TA:HitTeamNum".into())],
//! }])
//! .unwrap();
//! let ctx = CaptureContext {
//!     object_names: &object_names,
//!     schemas: &schemas,
//!     max_channels: 1023,
//!     version: Version::new(868, 14),
//! };
//!
//! // One empty frame: time, delta, and a frame-terminating zero bit.
//! let mut w = octane::bits::BitWriter::new();
//! w.write_f32(0.5);
//! w.write_f32(1.0 / 30.0);
//! w.write_bit(false);
//! let region = w.into_bytes();
//!
//! // Decode, then re-encode byte-exactly.
//! let (net, report) = decode_frames(&DecodeConfig::default(), &ctx, &region, 1).unwrap();
//! assert!(report.is_clean());
//! assert_eq!(net.frames.len(), 1);
//! assert_eq!(encode_frames(&ctx, &net).unwrap(), region);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`bits`] | `octane-bits` | Bit reader/writer, bounded and quantized codecs, raw runs |
//! | [`schema`] | `octane-schema` | Class schemas, parent chaining, archetype resolution |
//! | [`net`] | `octane-net` | Frames, actor deltas, property values, decode/encode |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Bit-level codec primitives (`octane-bits`).
///
/// [`bits::BitReader`] and [`bits::BitWriter`] are exact inverses over
/// every operation; [`bits::RawBits`] preserves opaque runs.
pub use octane_bits as bits;

/// Class schemas and archetype resolution (`octane-schema`).
///
/// Build a [`schema::SchemaArena`] from the capture's raw class tables,
/// then [`schema::resolve`] maps spawned archetypes onto schemas.
pub use octane_schema as schema;

/// Network-stream transcoding (`octane-net`).
///
/// [`net::decode_frames`] and [`net::encode_frames`] are the
/// capture-level entry points.
pub use octane_net as net;

/// Common imports for typical Octane usage.
///
/// ```rust
/// use octane::prelude::*;
/// ```
pub mod prelude {
    // Entry points and their inputs
    pub use octane_net::{
        decode_frames, encode_frames, CaptureContext, DecodeConfig, DecodeMode, Version,
    };

    // Decoded structure
    pub use octane_net::{ActorRecord, Frame, Lifecycle, NetworkFrames, PropertyUpdate};

    // Values
    pub use octane_net::{PropertyValue, RigidBodyState};

    // Diagnostics and errors
    pub use octane_bits::BitError;
    pub use octane_net::{DecodeReport, NetError};
    pub use octane_schema::{ResolveError, SchemaError};
}

//! Network-stream transcoding for bit-packed game captures.
//!
//! A capture's network-stream region is an undelimited bit run of
//! frames, each holding actor deltas — spawns, property updates, and
//! despawns — against a live-actor table threaded across the whole
//! pass. This crate decodes that region into structured frames and
//! re-encodes the structure byte-exactly.
//!
//! # Architecture
//!
//! - [`decode_frames`] / [`encode_frames`] are the capture-level entry
//!   points, driven by a borrowed [`CaptureContext`] of pre-parsed
//!   inputs (name table, schema catalog, channel cap, version pair)
//! - [`geometry`] holds the quantized vector and rotation codecs
//! - [`property`] dispatches version-gated, name-keyed value layouts
//! - [`DecodeReport`] carries lenient-mode diagnostics — incomplete
//!   units with their raw bits, fallback-guessed class mappings, and
//!   range violations — instead of any logging
//!
//! # Round-trip law
//!
//! For any capture decoded end-to-end in strict mode, re-encoding
//! reproduces the original byte buffer exactly, length and contents.
//! Lenient mode trades that guarantee for partial-failure resilience.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod actor;
pub mod context;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod property;
pub mod report;
pub mod table;
pub mod value;

pub use actor::{ActorRecord, Lifecycle};
pub use context::{CaptureContext, DecodeConfig, DecodeMode, Version};
pub use error::NetError;
pub use frame::{decode_frames, encode_frames, Frame, NetworkFrames};
pub use property::PropertyUpdate;
pub use report::{DecodeReport, GuessedClass, IncompleteUnit, RangeFlag};
pub use table::{LiveActor, LiveActorTable};
pub use value::{
    CameraSettings, Loadout, PropertyValue, RangeViolation, RemoteId, RigidBodyState, TeamPaint,
    UniqueId,
};

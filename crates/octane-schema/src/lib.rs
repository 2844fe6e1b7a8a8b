//! Replicated-class schemas and archetype resolution.
//!
//! A capture replicates objects by small integer property ids whose
//! meaning is class-specific. This crate owns the schema side of
//! decoding: [`SchemaArena`] holds one [`ClassSchema`] per replicated
//! class, each an ordered id → property-name table built by resolving
//! the class's parent chain ("resolve parent, then extend" — an
//! explicit build pass over an arena, not inheritance).
//!
//! [`resolve`] maps the archetype name observed at spawn time onto the
//! schema governing that actor's updates. The mapping is heuristic over
//! an incomplete catalog, so it is modeled as a pure function of the
//! archetype name and the arena, returning a [`Resolution`] that flags
//! fallback-derived ("guessed") mappings for the caller's diagnostics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod classes;
pub mod error;
pub mod resolve;
pub mod schema;

pub use classes::{has_initial_position, has_rotation};
pub use error::{ResolveError, SchemaError};
pub use resolve::{resolve, Resolution};
pub use schema::{ClassSchema, RawSchema, SchemaArena};

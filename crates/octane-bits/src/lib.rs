//! Bit-level codec primitives for the Octane capture transcoder.
//!
//! The capture wire format is bit-packed with no alignment padding:
//! values start at arbitrary bit offsets and integers are laid out
//! least-significant-bit first within each byte. This crate owns the
//! pure bit I/O layer and nothing else — no schema knowledge, no actor
//! semantics.
//!
//! # Architecture
//!
//! - [`BitReader`] decodes from a borrowed, immutable byte slice
//! - [`BitWriter`] encodes into a growing owned buffer
//! - [`RawBits`] captures opaque bit runs for byte-exact re-emission
//!
//! Every read operation has a write inverse that produces exactly the
//! bits the reader consumes. That pairing is the foundation of the
//! capture-level round-trip guarantee, and the property tests in this
//! crate exercise it directly.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod raw;
pub mod reader;
pub mod string;
pub mod writer;

pub use error::BitError;
pub use raw::RawBits;
pub use reader::BitReader;
pub use string::NetString;
pub use writer::BitWriter;

/// Quantize a float in `[-range, range]` to a `width`-bit unsigned integer.
///
/// Linear scaling with round-to-nearest. Out-of-range inputs clamp to the
/// representable extremes. `width` must be in `[2, 31]`.
///
/// The quantization step is `range / (2^(width-1) - 1)`, so a first
/// quantize/dequantize cycle loses at most one step; a value that has
/// already been through one cycle reproduces exactly on the next.
pub fn quantize(value: f32, range: f32, width: u32) -> u32 {
    debug_assert!((2..=31).contains(&width));
    let bias = 1i64 << (width - 1);
    let max_packed = (1i64 << width) - 1;
    let scale = (bias - 1) as f32 / range;
    // Float-to-int casts saturate, so even infinite inputs clamp cleanly.
    let packed = ((value * scale).round() as i64).saturating_add(bias);
    packed.clamp(0, max_packed) as u32
}

/// Reverse [`quantize`]: map a `width`-bit packed integer back to a float.
pub fn dequantize(packed: u32, range: f32, width: u32) -> f32 {
    debug_assert!((2..=31).contains(&width));
    let bias = 1i64 << (width - 1);
    let scale = (bias - 1) as f32 / range;
    (packed as i64 - bias) as f32 / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn quantize_first_cycle_error_bounded(
            v in -100.0f32..100.0,
            width in 8u32..17,
        ) {
            let range = 100.0;
            let step = range / ((1u32 << (width - 1)) - 1) as f32;
            let back = dequantize(quantize(v, range, width), range, width);
            prop_assert!((back - v).abs() <= step);
        }

        #[test]
        fn quantize_idempotent_after_first_snap(
            v in -1.0f32..1.0,
            width in 8u32..17,
        ) {
            let range = 1.0;
            let once = dequantize(quantize(v, range, width), range, width);
            let twice = dequantize(quantize(once, range, width), range, width);
            prop_assert_eq!(once.to_bits(), twice.to_bits());
        }
    }

    #[test]
    fn quantize_clamps_out_of_range() {
        let max = (1u32 << 8) - 1;
        assert_eq!(quantize(99.0, 1.0, 8), max);
        assert_eq!(quantize(-99.0, 1.0, 8), 0);
    }
}

//! Quantized vectors and rotations.
//!
//! Decoded geometry retains its raw wire form — selector, signs, and
//! integer magnitudes — rather than only a dequantized float triple.
//! Re-encoding therefore reproduces the original bits even when a value
//! would also have fit the other width class, and the float accessors
//! are pure views over the raw form.

use octane_bits::{dequantize, quantize, BitError, BitReader, BitWriter};

/// Per-axis magnitude width for ordinary in-bounds coordinates.
///
/// Calibration constant: validated through the capture round-trip law,
/// not derived from first principles.
pub const COMPACT_AXIS_BITS: u32 = 14;

/// Per-axis magnitude width for rare out-of-bounds coordinates.
///
/// Calibration constant, like [`COMPACT_AXIS_BITS`].
pub const EXTENDED_AXIS_BITS: u32 = 22;

/// One signed axis in raw wire form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Axis {
    neg: bool,
    mag: u32,
}

impl Axis {
    fn from_units(units: i32) -> Self {
        // Magnitudes saturate at the extended width.
        let max = (1u32 << EXTENDED_AXIS_BITS) - 1;
        Self {
            neg: units < 0,
            mag: units.unsigned_abs().min(max),
        }
    }

    fn units(self) -> i32 {
        if self.neg {
            -(self.mag as i32)
        } else {
            self.mag as i32
        }
    }
}

/// A 3-component position or velocity in integer world units.
///
/// Wire layout: one selector bit (extended widths or compact), then per
/// axis a sign bit and a magnitude at the selected width.
///
/// # Examples
///
/// ```
/// use octane_net::geometry::QuantVector;
///
/// let v = QuantVector::from_f32(100.4, -20.6, 0.0);
/// assert_eq!(v.units(), (100, -21, 0));
/// assert_eq!(v.components(), (100.0, -21.0, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantVector {
    extended: bool,
    axes: [Axis; 3],
}

impl QuantVector {
    /// Build from integer units, choosing the narrowest sufficient width.
    pub fn from_units(x: i32, y: i32, z: i32) -> Self {
        let axes = [Axis::from_units(x), Axis::from_units(y), Axis::from_units(z)];
        let extended = axes
            .iter()
            .any(|a| a.mag >= (1 << COMPACT_AXIS_BITS));
        Self { extended, axes }
    }

    /// Build from floats, rounding each component to the nearest unit.
    ///
    /// The first round trip moves a component by at most half a unit;
    /// any later cycle is exact.
    pub fn from_f32(x: f32, y: f32, z: f32) -> Self {
        Self::from_units(
            x.round() as i32,
            y.round() as i32,
            z.round() as i32,
        )
    }

    /// The raw integer units `(x, y, z)`.
    pub fn units(&self) -> (i32, i32, i32) {
        (
            self.axes[0].units(),
            self.axes[1].units(),
            self.axes[2].units(),
        )
    }

    /// The components as floats.
    pub fn components(&self) -> (f32, f32, f32) {
        let (x, y, z) = self.units();
        (x as f32, y as f32, z as f32)
    }

    /// True when the wire form used the extended widths.
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub(crate) fn decode(r: &mut BitReader<'_>) -> Result<Self, BitError> {
        let extended = r.read_bit()?;
        let width = if extended {
            EXTENDED_AXIS_BITS
        } else {
            COMPACT_AXIS_BITS
        };
        let mut axes = [Axis::default(); 3];
        for axis in &mut axes {
            let neg = r.read_bit()?;
            let mag = r.read_fixed(width)?;
            *axis = Axis { neg, mag };
        }
        Ok(Self { extended, axes })
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) {
        w.write_bit(self.extended);
        let width = if self.extended {
            EXTENDED_AXIS_BITS
        } else {
            COMPACT_AXIS_BITS
        };
        for axis in &self.axes {
            w.write_bit(axis.neg);
            w.write_fixed(axis.mag, width);
        }
    }
}

/// An orientation as three byte-scale angles.
///
/// Each axis is one raw byte mapped onto degrees by `raw * 360 / 256`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuantRotator {
    /// Raw pitch byte.
    pub pitch: u8,
    /// Raw yaw byte.
    pub yaw: u8,
    /// Raw roll byte.
    pub roll: u8,
}

impl QuantRotator {
    /// Build from degrees, rounding each axis to its nearest byte step.
    pub fn from_degrees(pitch: f32, yaw: f32, roll: f32) -> Self {
        let snap = |deg: f32| (deg.rem_euclid(360.0) * 256.0 / 360.0).round() as u32 as u8;
        Self {
            pitch: snap(pitch),
            yaw: snap(yaw),
            roll: snap(roll),
        }
    }

    /// The angles in degrees `(pitch, yaw, roll)`, each in `[0, 360)`.
    pub fn degrees(&self) -> (f32, f32, f32) {
        let deg = |raw: u8| raw as f32 * 360.0 / 256.0;
        (deg(self.pitch), deg(self.yaw), deg(self.roll))
    }

    pub(crate) fn decode(r: &mut BitReader<'_>) -> Result<Self, BitError> {
        Ok(Self {
            pitch: r.read_u8()?,
            yaw: r.read_u8()?,
            roll: r.read_u8()?,
        })
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) {
        w.write_u8(self.pitch);
        w.write_u8(self.yaw);
        w.write_u8(self.roll);
    }
}

/// A unit-range vector with 16-bit quantized components.
///
/// Used for the orientation part of rigid-body state: each component
/// lies in `[-1, 1]` and is stored packed, so re-encoding is exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormVector {
    raw: [u32; 3],
}

/// Component range for [`NormVector`].
const NORM_RANGE: f32 = 1.0;
/// Packed width per [`NormVector`] component.
const NORM_BITS: u32 = 16;

impl NormVector {
    /// Quantize three components in `[-1, 1]`.
    pub fn from_components(x: f32, y: f32, z: f32) -> Self {
        Self {
            raw: [
                quantize(x, NORM_RANGE, NORM_BITS),
                quantize(y, NORM_RANGE, NORM_BITS),
                quantize(z, NORM_RANGE, NORM_BITS),
            ],
        }
    }

    /// The dequantized components.
    pub fn components(&self) -> (f32, f32, f32) {
        (
            dequantize(self.raw[0], NORM_RANGE, NORM_BITS),
            dequantize(self.raw[1], NORM_RANGE, NORM_BITS),
            dequantize(self.raw[2], NORM_RANGE, NORM_BITS),
        )
    }

    pub(crate) fn decode(r: &mut BitReader<'_>) -> Result<Self, BitError> {
        let mut raw = [0u32; 3];
        for slot in &mut raw {
            *slot = r.read_fixed(NORM_BITS)?;
        }
        Ok(Self { raw })
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) {
        for slot in &self.raw {
            w.write_fixed(*slot, NORM_BITS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roundtrip_vector(v: QuantVector) -> (QuantVector, u64) {
        let mut w = BitWriter::new();
        v.encode(&mut w);
        let produced = w.position();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        let back = QuantVector::decode(&mut r).unwrap();
        assert_eq!(r.position(), produced);
        (back, produced)
    }

    proptest! {
        #[test]
        fn vector_roundtrip(x in -4_000_000i32..4_000_000, y in -4_000_000i32..4_000_000, z in -4_000_000i32..4_000_000) {
            let v = QuantVector::from_units(x, y, z);
            let (back, _) = roundtrip_vector(v);
            prop_assert_eq!(back, v);
            prop_assert_eq!(back.units(), (x, y, z));
        }

        #[test]
        fn float_snap_is_within_half_unit_then_exact(x in -8000.0f32..8000.0, y in -8000.0f32..8000.0, z in -8000.0f32..8000.0) {
            let v = QuantVector::from_f32(x, y, z);
            let (cx, cy, cz) = v.components();
            prop_assert!((cx - x).abs() <= 0.5);
            prop_assert!((cy - y).abs() <= 0.5);
            prop_assert!((cz - z).abs() <= 0.5);
            // Second cycle is exact.
            prop_assert_eq!(QuantVector::from_f32(cx, cy, cz), v);
        }

        #[test]
        fn norm_vector_roundtrip(x in -1.0f32..1.0, y in -1.0f32..1.0, z in -1.0f32..1.0) {
            let n = NormVector::from_components(x, y, z);
            let mut w = BitWriter::new();
            n.encode(&mut w);
            let bytes = w.into_bytes();
            let back = NormVector::decode(&mut BitReader::new(&bytes)).unwrap();
            prop_assert_eq!(back, n);
        }
    }

    #[test]
    fn selector_chooses_width_by_magnitude() {
        assert!(!QuantVector::from_units(8191, 0, 0).is_extended());
        assert!(QuantVector::from_units(1 << COMPACT_AXIS_BITS, 0, 0).is_extended());
    }

    #[test]
    fn decoded_selector_survives_reencode_even_when_compact_would_fit() {
        // Wire form with the extended selector but a small magnitude:
        // re-encoding must keep the extended form, not "improve" it.
        let mut w = BitWriter::new();
        w.write_bit(true); // extended
        for _ in 0..3 {
            w.write_bit(false);
            w.write_fixed(5, EXTENDED_AXIS_BITS);
        }
        let bytes = w.into_bytes();
        let v = QuantVector::decode(&mut BitReader::new(&bytes)).unwrap();
        assert!(v.is_extended());

        let mut w2 = BitWriter::new();
        v.encode(&mut w2);
        assert_eq!(w2.into_bytes(), bytes);
    }

    #[test]
    fn negative_zero_axis_reencodes_exactly() {
        // A sign bit set on a zero magnitude must survive the round trip.
        let mut w = BitWriter::new();
        w.write_bit(false);
        w.write_bit(true); // x: negative zero
        w.write_fixed(0, COMPACT_AXIS_BITS);
        for _ in 0..2 {
            w.write_bit(false);
            w.write_fixed(7, COMPACT_AXIS_BITS);
        }
        let bytes = w.into_bytes();
        let v = QuantVector::decode(&mut BitReader::new(&bytes)).unwrap();
        assert_eq!(v.units(), (0, 7, 7));

        let mut w2 = BitWriter::new();
        v.encode(&mut w2);
        assert_eq!(w2.into_bytes(), bytes);
    }

    #[test]
    fn rotator_roundtrips_raw_bytes() {
        let rot = QuantRotator {
            pitch: 0,
            yaw: 128,
            roll: 255,
        };
        let mut w = BitWriter::new();
        rot.encode(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 3);
        let back = QuantRotator::decode(&mut BitReader::new(&bytes)).unwrap();
        assert_eq!(back, rot);
        let (pitch, yaw, _) = back.degrees();
        assert_eq!(pitch, 0.0);
        assert_eq!(yaw, 180.0);
    }

    #[test]
    fn rotator_from_degrees_snaps() {
        let rot = QuantRotator::from_degrees(90.0, -90.0, 359.9);
        assert_eq!(rot.pitch, 64);
        assert_eq!(rot.yaw, 192);
        assert_eq!(rot.roll, 0); // 359.9° rounds up to the 256 step, wrapping to 0
    }
}

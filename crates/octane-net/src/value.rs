//! Decoded property values.
//!
//! Primitive values are self-describing. Composite records each have a
//! fixed field layout and documented legal ranges established from real
//! captures; [`PropertyValue::validate`] checks those ranges so callers
//! can reject (strict) or flag (lenient) corrupt-looking data.

use octane_bits::NetString;
use std::fmt;

use crate::geometry::{NormVector, QuantVector};

/// A documented numeric bound that a decoded field violated.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeViolation {
    /// Which field was out of range.
    pub field: &'static str,
    /// The decoded value.
    pub value: f64,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} outside [{}, {}]",
            self.field, self.value, self.min, self.max
        )
    }
}

/// Check one field against an inclusive range.
fn in_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), RangeViolation> {
    if value < min || value > max {
        return Err(RangeViolation {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// A spectator-camera configuration record.
///
/// Ranges reflect the in-game settings UI limits; every instance
/// decoded from a real capture stays inside them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    /// Field of view, degrees. Legal range `[60, 110]`.
    pub field_of_view: f32,
    /// Camera height. Legal range `[40, 200]`.
    pub height: f32,
    /// Camera pitch, degrees. Legal range `[-45, 0]`.
    pub pitch: f32,
    /// Follow distance. Legal range `[100, 400]`.
    pub distance: f32,
    /// Camera stiffness. Legal range `[0, 1]`.
    pub stiffness: f32,
    /// Swivel speed. Legal range `[1, 10]`.
    pub swivel_speed: f32,
    /// Transition speed; only replicated by newer producers.
    pub transition_speed: Option<f32>,
}

impl CameraSettings {
    /// Validate every field against its documented range.
    pub fn validate(&self) -> Result<(), RangeViolation> {
        in_range("field_of_view", self.field_of_view as f64, 60.0, 110.0)?;
        in_range("height", self.height as f64, 40.0, 200.0)?;
        in_range("pitch", self.pitch as f64, -45.0, 0.0)?;
        in_range("distance", self.distance as f64, 100.0, 400.0)?;
        in_range("stiffness", self.stiffness as f64, 0.0, 1.0)?;
        in_range("swivel_speed", self.swivel_speed as f64, 1.0, 10.0)?;
        Ok(())
    }
}

/// A vehicle team-colorization record.
///
/// Identifier bounds come from the paint catalog sizes at modeling time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeamPaint {
    /// Team number; 0 or 1.
    pub team: u8,
    /// Primary team color id. Legal range `[0, 17]`.
    pub team_color: u8,
    /// Accent color id. Legal range `[0, 104]`.
    pub custom_color: u8,
    /// Primary finish id. Legal range `[0, 623]`.
    pub team_finish: u32,
    /// Accent finish id. Legal range `[0, 623]`.
    pub custom_finish: u32,
}

impl TeamPaint {
    /// Validate every identifier against its catalog bound.
    pub fn validate(&self) -> Result<(), RangeViolation> {
        in_range("team", self.team as f64, 0.0, 1.0)?;
        in_range("team_color", self.team_color as f64, 0.0, 17.0)?;
        in_range("custom_color", self.custom_color as f64, 0.0, 104.0)?;
        in_range("team_finish", self.team_finish as f64, 0.0, 623.0)?;
        in_range("custom_finish", self.custom_finish as f64, 0.0, 623.0)?;
        Ok(())
    }
}

/// A player's equipped-item selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Loadout {
    /// Record layout version. Observed values are 10 and 11.
    pub version: u8,
    /// Product ids: body, decal, wheels, rocket trail, antenna, topper,
    /// and one unidentified slot.
    pub products: [u32; 7],
    /// Extra product id carried when `version > 10`.
    pub extra: Option<u32>,
}

impl Loadout {
    /// Validate the layout version against the observed corpus.
    pub fn validate(&self) -> Result<(), RangeViolation> {
        in_range("version", self.version as f64, 10.0, 11.0)?;
        Ok(())
    }
}

/// Platform-specific part of a player identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteId {
    /// Local splitscreen player; the payload is a 24-bit placeholder.
    SplitScreen(u32),
    /// Steam 64-bit id.
    Steam(u64),
    /// PlayStation Network id blob.
    PlayStation([u8; 32]),
    /// Xbox Live 64-bit id.
    Xbox(u64),
}

/// A replicated player identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniqueId {
    /// Platform-specific id payload.
    pub remote: RemoteId,
    /// Per-console player number (splitscreen slot).
    pub local_id: u8,
}

/// A rigid-body motion snapshot.
///
/// Sleeping bodies replicate only their transform; awake bodies carry
/// linear and angular velocity as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RigidBodyState {
    /// True when the body is at rest.
    pub sleeping: bool,
    /// World position.
    pub position: QuantVector,
    /// Orientation components, each quantized into `[-1, 1]`.
    pub rotation: NormVector,
    /// Linear velocity; present iff awake.
    pub linear_velocity: Option<QuantVector>,
    /// Angular velocity; present iff awake.
    pub angular_velocity: Option<QuantVector>,
}

/// One decoded replicated value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Single-bit boolean.
    Bool(bool),
    /// Eight-bit unsigned value.
    Byte(u8),
    /// 32-bit signed integer.
    Int(i32),
    /// Range-bounded unsigned integer with its wire bound.
    Bounded {
        /// The decoded value.
        value: u32,
        /// The inclusive bound it was encoded against.
        max: u32,
    },
    /// 32-bit float.
    Float(f32),
    /// Length-prefixed string.
    Str(NetString),
    /// A flagged reference to another live actor.
    ActiveActor {
        /// The flag bit preceding the reference.
        active: bool,
        /// The referenced channel id (-1 when none).
        actor: i32,
    },
    /// A quantized vector.
    Vector(QuantVector),
    /// Rigid-body motion state.
    RigidBody(RigidBodyState),
    /// Spectator camera configuration.
    Camera(CameraSettings),
    /// Vehicle team colorization.
    TeamPaint(TeamPaint),
    /// Equipped-item selection.
    Loadout(Loadout),
    /// Player identity.
    UniqueId(UniqueId),
}

impl PropertyValue {
    /// Validate composite values against their documented ranges.
    ///
    /// Primitives always pass; they have no documented bounds.
    pub fn validate(&self) -> Result<(), RangeViolation> {
        match self {
            Self::Camera(v) => v.validate(),
            Self::TeamPaint(v) => v.validate(),
            Self::Loadout(v) => v.validate(),
            _ => Ok(()),
        }
    }
}

//! Property-delta decoding and encoding.
//!
//! A property run is a sequence of `(bounded id, value)` pairs
//! terminated by an id equal to the schema's bound. Values dispatch by
//! resolved property name to fixed layout decoders; a few layouts also
//! gate on the capture version.

use octane_bits::{BitReader, BitWriter};
use octane_schema::ClassSchema;

use crate::context::Version;
use crate::error::NetError;
use crate::geometry::{NormVector, QuantVector};
use crate::value::{
    CameraSettings, Loadout, PropertyValue, RemoteId, RigidBodyState, TeamPaint, UniqueId,
};

/// One decoded property delta attached to an updated actor.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyUpdate {
    /// Wire property id within the actor's schema.
    pub id: u32,
    /// Resolved property name.
    pub name: String,
    /// The decoded value.
    pub value: PropertyValue,
}

/// Wire layout of a property value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Bool,
    Byte,
    Int,
    Float,
    Str,
    ActiveActor,
    Vector,
    Bounded(u32),
    RigidBody,
    Camera,
    TeamPaint,
    Loadout,
    UniqueId,
}

/// Name-keyed layout table.
///
/// Covers the properties the known classes replicate; anything else is
/// an unsupported property and, in lenient mode, an opaque capture.
fn layout_for(property: &str) -> Option<Layout> {
    let layout = match property {
        "TAGame.Vehicle_TA:bReplicatedHandbrake"
        | "TAGame.Vehicle_TA:bDriving"
        | "Engine.PlayerReplicationInfo:bBot"
        | "Engine.PlayerReplicationInfo:bReadyToPlay"
        | "Engine.PlayerReplicationInfo:bIsSpectator"
        | "TAGame.PRI_TA:bReady"
        | "TAGame.PRI_TA:bUsingSecondaryCamera"
        | "TAGame.GameEvent_TA:bHasLeaveMatchPenalty"
        | "TAGame.GameEvent_Soccar_TA:bOverTime"
        | "TAGame.CarComponent_FlipCar_TA:bFlipRight"
        | "Engine.Actor:bCollideWorld"
        | "Engine.Actor:bBlockActors"
        | "Engine.GameReplicationInfo:bMatchIsOver" => Layout::Bool,
        "TAGame.Vehicle_TA:ReplicatedThrottle"
        | "TAGame.Vehicle_TA:ReplicatedSteer"
        | "TAGame.CarComponent_Boost_TA:ReplicatedBoostAmount"
        | "TAGame.Ball_TA:HitTeamNum"
        | "TAGame.GameEvent_Soccar_TA:ReplicatedScoredOnTeam"
        | "TAGame.CameraSettingsActor_TA:CameraYaw"
        | "TAGame.CameraSettingsActor_TA:CameraPitch"
        | "TAGame.PRI_TA:CameraYaw"
        | "TAGame.PRI_TA:CameraPitch" => Layout::Byte,
        "Engine.TeamInfo:Score"
        | "TAGame.PRI_TA:MatchScore"
        | "TAGame.PRI_TA:MatchGoals"
        | "TAGame.PRI_TA:MatchAssists"
        | "TAGame.PRI_TA:MatchSaves"
        | "TAGame.PRI_TA:MatchShots"
        | "TAGame.PRI_TA:TotalXP"
        | "TAGame.GameEvent_Soccar_TA:SecondsRemaining"
        | "TAGame.GameEvent_TA:ReplicatedGameStateTimeRemaining"
        | "TAGame.CrowdActor_TA:ReplicatedCountDownNumber" => Layout::Int,
        "Engine.Actor:DrawScale"
        | "TAGame.Ball_TA:ReplicatedBallScale"
        | "TAGame.Ball_TA:ReplicatedAddedCarBounceScale"
        | "TAGame.CarComponent_FlipCar_TA:FlipCarTime"
        | "TAGame.CrowdActor_TA:ModifiedNoise" => Layout::Float,
        "Engine.GameReplicationInfo:ServerName"
        | "Engine.PlayerReplicationInfo:PlayerName"
        | "TAGame.Team_TA:CustomTeamName"
        | "TAGame.GRI_TA:NewDedicatedServerIP" => Layout::Str,
        "Engine.Pawn:PlayerReplicationInfo"
        | "Engine.PlayerReplicationInfo:Team"
        | "TAGame.CarComponent_TA:Vehicle"
        | "TAGame.Ball_TA:GameEvent"
        | "TAGame.PRI_TA:ReplicatedGameEvent"
        | "TAGame.Team_TA:GameEvent"
        | "TAGame.CameraSettingsActor_TA:PRI"
        | "TAGame.Car_TA:AttachedPickup" => Layout::ActiveActor,
        "TAGame.CarComponent_Dodge_TA:DodgeTorque" => Layout::Vector,
        "TAGame.GameEvent_TA:ReplicatedStateIndex" => Layout::Bounded(140),
        "TAGame.RBActor_TA:ReplicatedRBState" => Layout::RigidBody,
        "TAGame.PRI_TA:CameraSettings" => Layout::Camera,
        "TAGame.Car_TA:TeamPaint" => Layout::TeamPaint,
        "TAGame.PRI_TA:ClientLoadout" => Layout::Loadout,
        "Engine.PlayerReplicationInfo:UniqueId" | "TAGame.PRI_TA:PartyLeader" => {
            Layout::UniqueId
        }
        _ => return None,
    };
    Some(layout)
}

/// Decode the next property of a run.
///
/// Returns `Ok(None)` at the end-of-properties marker (an id equal to
/// the schema's bound).
pub fn decode_property(
    schema: &ClassSchema,
    version: Version,
    r: &mut BitReader<'_>,
) -> Result<Option<PropertyUpdate>, NetError> {
    let start = r.position();
    let max = schema.max_property_id();
    let id = r.read_bounded(max)?;
    if id == max {
        return Ok(None);
    }

    let name = schema
        .property_name(id)
        .ok_or_else(|| NetError::MalformedValue {
            bit: start,
            detail: format!(
                "property id {id} has no entry in schema '{}'",
                schema.class_name()
            ),
        })?
        .to_string();

    let layout = layout_for(&name).ok_or_else(|| NetError::UnsupportedProperty {
        bit: start,
        class: schema.class_name().to_string(),
        property: name.clone(),
    })?;

    let value = decode_value(layout, version, r)?;
    Ok(Some(PropertyUpdate { id, name, value }))
}

/// Encode one property of a run.
pub fn encode_property(
    schema: &ClassSchema,
    update: &PropertyUpdate,
    w: &mut BitWriter,
) -> Result<(), NetError> {
    w.write_bounded(update.id, schema.max_property_id());
    encode_value(&update.value, w)
}

/// Terminate a property run.
pub fn encode_end_marker(schema: &ClassSchema, w: &mut BitWriter) {
    let max = schema.max_property_id();
    w.write_bounded(max, max);
}

fn decode_value(
    layout: Layout,
    version: Version,
    r: &mut BitReader<'_>,
) -> Result<PropertyValue, NetError> {
    let value = match layout {
        Layout::Bool => PropertyValue::Bool(r.read_bit()?),
        Layout::Byte => PropertyValue::Byte(r.read_u8()?),
        Layout::Int => PropertyValue::Int(r.read_i32()?),
        Layout::Float => PropertyValue::Float(r.read_f32()?),
        Layout::Str => PropertyValue::Str(r.read_string()?),
        Layout::ActiveActor => PropertyValue::ActiveActor {
            active: r.read_bit()?,
            actor: r.read_i32()?,
        },
        Layout::Vector => PropertyValue::Vector(QuantVector::decode(r)?),
        Layout::Bounded(max) => PropertyValue::Bounded {
            value: r.read_bounded(max)?,
            max,
        },
        Layout::RigidBody => {
            let sleeping = r.read_bit()?;
            let position = QuantVector::decode(r)?;
            let rotation = NormVector::decode(r)?;
            let (linear_velocity, angular_velocity) = if sleeping {
                (None, None)
            } else {
                (
                    Some(QuantVector::decode(r)?),
                    Some(QuantVector::decode(r)?),
                )
            };
            PropertyValue::RigidBody(RigidBodyState {
                sleeping,
                position,
                rotation,
                linear_velocity,
                angular_velocity,
            })
        }
        Layout::Camera => {
            let mut camera = CameraSettings {
                field_of_view: r.read_f32()?,
                height: r.read_f32()?,
                pitch: r.read_f32()?,
                distance: r.read_f32()?,
                stiffness: r.read_f32()?,
                swivel_speed: r.read_f32()?,
                transition_speed: None,
            };
            if version.at_least(868, 20) {
                camera.transition_speed = Some(r.read_f32()?);
            }
            PropertyValue::Camera(camera)
        }
        Layout::TeamPaint => PropertyValue::TeamPaint(TeamPaint {
            team: r.read_u8()?,
            team_color: r.read_u8()?,
            custom_color: r.read_u8()?,
            team_finish: r.read_u32()?,
            custom_finish: r.read_u32()?,
        }),
        Layout::Loadout => {
            let version_byte = r.read_u8()?;
            let mut products = [0u32; 7];
            for slot in &mut products {
                *slot = r.read_u32()?;
            }
            let extra = if version_byte > 10 {
                Some(r.read_u32()?)
            } else {
                None
            };
            PropertyValue::Loadout(Loadout {
                version: version_byte,
                products,
                extra,
            })
        }
        Layout::UniqueId => {
            let start = r.position();
            let platform = r.read_u8()?;
            let remote = match platform {
                0 => RemoteId::SplitScreen(r.read_fixed(24)?),
                1 => RemoteId::Steam(r.read_u64()?),
                2 => {
                    let mut blob = [0u8; 32];
                    for byte in &mut blob {
                        *byte = r.read_u8()?;
                    }
                    RemoteId::PlayStation(blob)
                }
                4 => RemoteId::Xbox(r.read_u64()?),
                other => {
                    return Err(NetError::MalformedValue {
                        bit: start,
                        detail: format!("unknown identity platform tag {other}"),
                    })
                }
            };
            PropertyValue::UniqueId(UniqueId {
                remote,
                local_id: r.read_u8()?,
            })
        }
    };
    Ok(value)
}

fn encode_value(value: &PropertyValue, w: &mut BitWriter) -> Result<(), NetError> {
    match value {
        PropertyValue::Bool(b) => w.write_bit(*b),
        PropertyValue::Byte(b) => w.write_u8(*b),
        PropertyValue::Int(i) => w.write_i32(*i),
        PropertyValue::Float(f) => w.write_f32(*f),
        PropertyValue::Str(s) => w.write_string(s)?,
        PropertyValue::ActiveActor { active, actor } => {
            w.write_bit(*active);
            w.write_i32(*actor);
        }
        PropertyValue::Vector(v) => v.encode(w),
        PropertyValue::Bounded { value, max } => w.write_bounded(*value, *max),
        PropertyValue::RigidBody(rb) => {
            w.write_bit(rb.sleeping);
            rb.position.encode(w);
            rb.rotation.encode(w);
            if let (Some(linear), Some(angular)) = (rb.linear_velocity, rb.angular_velocity) {
                linear.encode(w);
                angular.encode(w);
            }
        }
        PropertyValue::Camera(cam) => {
            w.write_f32(cam.field_of_view);
            w.write_f32(cam.height);
            w.write_f32(cam.pitch);
            w.write_f32(cam.distance);
            w.write_f32(cam.stiffness);
            w.write_f32(cam.swivel_speed);
            if let Some(transition) = cam.transition_speed {
                w.write_f32(transition);
            }
        }
        PropertyValue::TeamPaint(paint) => {
            w.write_u8(paint.team);
            w.write_u8(paint.team_color);
            w.write_u8(paint.custom_color);
            w.write_u32(paint.team_finish);
            w.write_u32(paint.custom_finish);
        }
        PropertyValue::Loadout(loadout) => {
            w.write_u8(loadout.version);
            for product in loadout.products {
                w.write_u32(product);
            }
            if let Some(extra) = loadout.extra {
                w.write_u32(extra);
            }
        }
        PropertyValue::UniqueId(uid) => {
            match &uid.remote {
                RemoteId::SplitScreen(pad) => {
                    w.write_u8(0);
                    w.write_fixed(*pad, 24);
                }
                RemoteId::Steam(id) => {
                    w.write_u8(1);
                    w.write_u64(*id);
                }
                RemoteId::PlayStation(blob) => {
                    w.write_u8(2);
                    for byte in blob {
                        w.write_u8(*byte);
                    }
                }
                RemoteId::Xbox(id) => {
                    w.write_u8(4);
                    w.write_u64(*id);
                }
            }
            w.write_u8(uid.local_id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use octane_bits::NetString;
    use octane_schema::{RawSchema, SchemaArena};

    fn test_arena() -> SchemaArena {
        SchemaArena::build(vec![RawSchema {
            class_name: "TAGame.PRI_TA".into(),
            parent: None,
            properties: vec![
                (0, "Engine.PlayerReplicationInfo:PlayerName".into()),
                (1, "TAGame.PRI_TA:MatchScore".into()),
                (2, "TAGame.PRI_TA:CameraSettings".into()),
                (3, "TAGame.PRI_TA:bReady".into()),
                (5, "TAGame.PRI_TA:SecretHandshake".into()),
                (6, "TAGame.GameEvent_TA:ReplicatedStateIndex".into()),
            ],
        }])
        .unwrap()
    }

    fn old_version() -> Version {
        Version::new(868, 12)
    }

    fn roundtrip(update: &PropertyUpdate, version: Version) -> PropertyUpdate {
        let arena = test_arena();
        let schema = arena.get("TAGame.PRI_TA").unwrap();
        let mut w = BitWriter::new();
        encode_property(schema, update, &mut w).unwrap();
        encode_end_marker(schema, &mut w);
        let bytes = w.into_bytes();

        let mut r = BitReader::new(&bytes);
        let back = decode_property(schema, version, &mut r).unwrap().unwrap();
        assert!(decode_property(schema, version, &mut r).unwrap().is_none());
        back
    }

    #[test]
    fn int_property_roundtrip() {
        let update = PropertyUpdate {
            id: 1,
            name: "TAGame.PRI_TA:MatchScore".into(),
            value: PropertyValue::Int(-300),
        };
        assert_eq!(roundtrip(&update, old_version()), update);
    }

    #[test]
    fn string_property_roundtrip() {
        let update = PropertyUpdate {
            id: 0,
            name: "Engine.PlayerReplicationInfo:PlayerName".into(),
            value: PropertyValue::Str(NetString::narrow("player one")),
        };
        assert_eq!(roundtrip(&update, old_version()), update);
    }

    #[test]
    fn camera_gains_transition_speed_at_868_20() {
        let old = PropertyUpdate {
            id: 2,
            name: "TAGame.PRI_TA:CameraSettings".into(),
            value: PropertyValue::Camera(crate::value::CameraSettings {
                field_of_view: 90.0,
                height: 100.0,
                pitch: -4.0,
                distance: 270.0,
                stiffness: 0.45,
                swivel_speed: 4.7,
                transition_speed: None,
            }),
        };
        assert_eq!(roundtrip(&old, old_version()), old);

        let mut new = old.clone();
        if let PropertyValue::Camera(cam) = &mut new.value {
            cam.transition_speed = Some(1.2);
        }
        assert_eq!(roundtrip(&new, Version::new(868, 20)), new);
    }

    #[test]
    fn rigid_body_awake_carries_velocities() {
        let rb = RigidBodyState {
            sleeping: false,
            position: QuantVector::from_units(10, -20, 30),
            rotation: NormVector::from_components(0.1, -0.5, 0.9),
            linear_velocity: Some(QuantVector::from_units(1, 2, 3)),
            angular_velocity: Some(QuantVector::from_units(-1, 0, 4)),
        };
        let mut w = BitWriter::new();
        encode_value(&PropertyValue::RigidBody(rb), &mut w).unwrap();
        let awake_bits = w.position();
        let bytes = w.into_bytes();
        let got = decode_value(Layout::RigidBody, old_version(), &mut BitReader::new(&bytes))
            .unwrap();
        assert_eq!(got, PropertyValue::RigidBody(rb));

        let asleep = RigidBodyState {
            sleeping: true,
            linear_velocity: None,
            angular_velocity: None,
            ..rb
        };
        let mut w = BitWriter::new();
        encode_value(&PropertyValue::RigidBody(asleep), &mut w).unwrap();
        assert!(w.position() < awake_bits);
    }

    #[test]
    fn unique_id_platforms_roundtrip() {
        for remote in [
            RemoteId::SplitScreen(0),
            RemoteId::Steam(0x0110_0001_0203_0405),
            RemoteId::PlayStation([7u8; 32]),
            RemoteId::Xbox(42),
        ] {
            let value = PropertyValue::UniqueId(UniqueId {
                remote: remote.clone(),
                local_id: 1,
            });
            let mut w = BitWriter::new();
            encode_value(&value, &mut w).unwrap();
            let bytes = w.into_bytes();
            let got =
                decode_value(Layout::UniqueId, old_version(), &mut BitReader::new(&bytes))
                    .unwrap();
            assert_eq!(got, value);
        }
    }

    #[test]
    fn unknown_platform_tag_is_malformed() {
        let mut w = BitWriter::new();
        w.write_u8(9);
        let bytes = w.into_bytes();
        let err = decode_value(Layout::UniqueId, old_version(), &mut BitReader::new(&bytes))
            .unwrap_err();
        assert!(matches!(err, NetError::MalformedValue { .. }));
    }

    #[test]
    fn loadout_version_11_reads_extra_slot() {
        let loadout = Loadout {
            version: 11,
            products: [1, 2, 3, 4, 5, 6, 7],
            extra: Some(8),
        };
        let mut w = BitWriter::new();
        encode_value(&PropertyValue::Loadout(loadout), &mut w).unwrap();
        let bytes = w.into_bytes();
        let got =
            decode_value(Layout::Loadout, old_version(), &mut BitReader::new(&bytes)).unwrap();
        assert_eq!(got, PropertyValue::Loadout(loadout));
    }

    #[test]
    fn unsupported_property_is_typed_error() {
        let arena = test_arena();
        let schema = arena.get("TAGame.PRI_TA").unwrap();
        let mut w = BitWriter::new();
        w.write_bounded(5, schema.max_property_id());
        let bytes = w.into_bytes();
        let err = decode_property(schema, old_version(), &mut BitReader::new(&bytes))
            .unwrap_err();
        match err {
            NetError::UnsupportedProperty { property, .. } => {
                assert_eq!(property, "TAGame.PRI_TA:SecretHandshake");
            }
            other => panic!("expected UnsupportedProperty, got {other:?}"),
        }
    }

    #[test]
    fn id_gap_is_malformed() {
        let arena = test_arena();
        let schema = arena.get("TAGame.PRI_TA").unwrap();
        // id 4 is inside the bound but has no table entry.
        let mut w = BitWriter::new();
        w.write_bounded(4, schema.max_property_id());
        let bytes = w.into_bytes();
        let err = decode_property(schema, old_version(), &mut BitReader::new(&bytes))
            .unwrap_err();
        assert!(matches!(err, NetError::MalformedValue { .. }));
    }

    #[test]
    fn bounded_state_index_roundtrip() {
        let update = PropertyUpdate {
            id: 6,
            name: "TAGame.GameEvent_TA:ReplicatedStateIndex".into(),
            value: PropertyValue::Bounded {
                value: 140,
                max: 140,
            },
        };
        assert_eq!(roundtrip(&update, old_version()), update);
    }
}

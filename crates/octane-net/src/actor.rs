//! The per-actor delta protocol.
//!
//! Every record in a frame is one of three shapes against the live
//! table: a spawn (type id, optional transform), an update (property
//! run bounded by the schema resolved at spawn time), or a despawn.
//! State is re-derived fresh per record; there are no transitions
//! within one decode.

use octane_bits::{BitReader, BitWriter};
use octane_schema::{has_initial_position, has_rotation, resolve};

use crate::context::{CaptureContext, DecodeConfig, DecodeMode};
use crate::error::NetError;
use crate::geometry::{QuantRotator, QuantVector};
use crate::property::{decode_property, encode_end_marker, encode_property, PropertyUpdate};
use crate::report::{DecodeReport, GuessedClass, IncompleteUnit, RangeFlag};
use crate::table::{LiveActor, LiveActorTable};

/// Lookahead window captured past a lenient-mode failure point.
pub(crate) const DIAGNOSTIC_WINDOW_BITS: u64 = 100;

/// Version at which spawn records gained the extra name-index field.
const NAME_INDEX_VERSION: (u32, u32) = (868, 14);

/// Lifecycle shape of one decoded actor record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// The channel came alive this frame.
    Spawned,
    /// The channel replicated property deltas.
    Updated,
    /// The channel went away this frame.
    Despawned,
}

/// One actor's delta within a frame.
///
/// A `Spawned` record owns the resolved type; an `Updated` record
/// depends on — but does not duplicate — what was resolved at spawn
/// time, so its `type_id` is inherited from the live table and its
/// class fields stay empty.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorRecord {
    /// Channel id, bounded by the capture's channel cap.
    pub channel: u32,
    /// Which delta shape this record is.
    pub lifecycle: Lifecycle,
    /// Undeciphered flag bit read at spawn.
    pub spawn_flag: bool,
    /// Extra spawn field carried by newer captures; meaning unknown.
    pub name_index: Option<u32>,
    /// Type id, resolved at spawn and inherited on update.
    pub type_id: Option<u32>,
    /// Archetype name the type id mapped to (spawn only).
    pub archetype: Option<String>,
    /// Resolved replicated class name (spawn only).
    pub class_name: Option<String>,
    /// Initial position, for classes that replicate one.
    pub position: Option<QuantVector>,
    /// Initial rotation, for classes that replicate one.
    pub rotation: Option<QuantRotator>,
    /// Property deltas (update only).
    pub properties: Vec<PropertyUpdate>,
    /// False when lenient decoding gave up partway through this record.
    pub complete: bool,
}

impl ActorRecord {
    fn placeholder() -> Self {
        Self {
            channel: 0,
            lifecycle: Lifecycle::Spawned,
            spawn_flag: false,
            name_index: None,
            type_id: None,
            archetype: None,
            class_name: None,
            position: None,
            rotation: None,
            properties: Vec::new(),
            complete: false,
        }
    }
}

/// Decode one actor record, mutating the live table on spawn/despawn.
///
/// In strict mode every failure is a typed error. In lenient mode a
/// failure is confined to this record: it comes back with
/// `complete == false`, the consumed bits and a lookahead window go
/// into the report, and the table is left exactly as it was — partial
/// decodes never mutate it.
pub(crate) fn decode_actor(
    ctx: &CaptureContext<'_>,
    config: &DecodeConfig,
    table: &mut LiveActorTable,
    r: &mut BitReader<'_>,
    report: &mut DecodeReport,
) -> Result<ActorRecord, NetError> {
    let start = r.position();
    let mut record = ActorRecord::placeholder();
    match decode_actor_inner(ctx, config.mode, table, r, report, &mut record) {
        Ok(()) => {
            record.complete = true;
            Ok(record)
        }
        Err(err) => match config.mode {
            DecodeMode::Strict => Err(err),
            DecodeMode::Lenient => {
                report.incomplete.push(IncompleteUnit {
                    bit: err.bit(),
                    error: err,
                    consumed: r.consumed_since(start),
                    lookahead: r.lookahead(DIAGNOSTIC_WINDOW_BITS),
                });
                Ok(record)
            }
        },
    }
}

fn decode_actor_inner(
    ctx: &CaptureContext<'_>,
    mode: DecodeMode,
    table: &mut LiveActorTable,
    r: &mut BitReader<'_>,
    report: &mut DecodeReport,
    record: &mut ActorRecord,
) -> Result<(), NetError> {
    let start = r.position();
    record.channel = r.read_bounded(ctx.max_channels)?;

    if !r.read_bit()? {
        record.lifecycle = Lifecycle::Despawned;
        table.despawn(record.channel);
        return Ok(());
    }

    if r.read_bit()? {
        decode_spawn(ctx, table, r, report, record, start)
    } else {
        decode_update(ctx, mode, table, r, report, record, start)
    }
}

fn decode_spawn(
    ctx: &CaptureContext<'_>,
    table: &mut LiveActorTable,
    r: &mut BitReader<'_>,
    report: &mut DecodeReport,
    record: &mut ActorRecord,
    start: u64,
) -> Result<(), NetError> {
    record.lifecycle = Lifecycle::Spawned;
    record.spawn_flag = r.read_bit()?;
    if ctx.version.at_least(NAME_INDEX_VERSION.0, NAME_INDEX_VERSION.1) {
        record.name_index = Some(r.read_u32()?);
    }

    let type_id = r.read_u32()?;
    record.type_id = Some(type_id);
    let archetype = ctx
        .object_names
        .get(type_id as usize)
        .ok_or_else(|| NetError::MalformedValue {
            bit: start,
            detail: format!("type id {type_id} outside the object name table"),
        })?
        .clone();

    let resolution = resolve(&archetype, ctx.schemas)
        .map_err(|reason| NetError::UnresolvedClass { bit: start, reason })?;
    let class_name = resolution.schema.class_name().to_string();
    if resolution.guessed {
        report.guessed.push(GuessedClass {
            bit: start,
            archetype: archetype.clone(),
            class: class_name.clone(),
        });
    }
    record.archetype = Some(archetype.clone());
    record.class_name = Some(class_name.clone());

    if has_initial_position(&class_name) {
        record.position = Some(QuantVector::decode(r)?);
        if has_rotation(&class_name) {
            record.rotation = Some(QuantRotator::decode(r)?);
        }
    }

    // Only a fully decoded spawn goes live.
    table.spawn(
        record.channel,
        LiveActor {
            type_id,
            archetype,
            class_name,
        },
    );
    Ok(())
}

fn decode_update(
    ctx: &CaptureContext<'_>,
    mode: DecodeMode,
    table: &LiveActorTable,
    r: &mut BitReader<'_>,
    report: &mut DecodeReport,
    record: &mut ActorRecord,
    start: u64,
) -> Result<(), NetError> {
    record.lifecycle = Lifecycle::Updated;
    let live = table.get(record.channel).ok_or(NetError::UnknownActor {
        bit: start,
        channel: record.channel,
    })?;
    record.type_id = Some(live.type_id);
    let schema = ctx
        .schemas
        .get(&live.class_name)
        .expect("live table classes come from the arena");

    loop {
        let prop_start = r.position();
        let Some(update) = decode_property(schema, ctx.version, r)? else {
            break;
        };
        if let Err(violation) = update.value.validate() {
            match mode {
                DecodeMode::Strict => {
                    return Err(NetError::ValueOutOfRange {
                        bit: prop_start,
                        property: update.name,
                        violation,
                    });
                }
                DecodeMode::Lenient => {
                    // The cursor is still synchronized; flag and go on.
                    report.range_flags.push(RangeFlag {
                        bit: prop_start,
                        channel: record.channel,
                        property: update.name.clone(),
                        violation,
                    });
                }
            }
        }
        record.properties.push(update);
    }
    Ok(())
}

/// Encode one actor record, mirroring the decode branches bit-for-bit.
///
/// The table is threaded through encoding the same way it is through
/// decoding; an `Updated` record recovers its schema from the *current*
/// table, not from the record itself, since updates do not duplicate
/// what spawn resolved.
pub(crate) fn encode_actor(
    ctx: &CaptureContext<'_>,
    table: &mut LiveActorTable,
    record: &ActorRecord,
    w: &mut BitWriter,
) -> Result<(), NetError> {
    let malformed = |detail: String| NetError::MalformedValue {
        bit: 0,
        detail,
    };
    if !record.complete {
        return Err(malformed(format!(
            "cannot re-encode incomplete record for channel {}",
            record.channel
        )));
    }

    w.write_bounded(record.channel, ctx.max_channels);
    match record.lifecycle {
        Lifecycle::Despawned => {
            w.write_bit(false);
            table.despawn(record.channel);
        }
        Lifecycle::Spawned => {
            w.write_bit(true);
            w.write_bit(true);
            w.write_bit(record.spawn_flag);
            if ctx.version.at_least(NAME_INDEX_VERSION.0, NAME_INDEX_VERSION.1) {
                let name_index = record
                    .name_index
                    .ok_or_else(|| malformed("spawn record missing name index".into()))?;
                w.write_u32(name_index);
            }
            let type_id = record
                .type_id
                .ok_or_else(|| malformed("spawn record missing type id".into()))?;
            w.write_u32(type_id);

            let class_name = record
                .class_name
                .as_deref()
                .ok_or_else(|| malformed("spawn record missing class name".into()))?;
            if has_initial_position(class_name) {
                let position = record
                    .position
                    .ok_or_else(|| malformed("spawn record missing position".into()))?;
                position.encode(w);
                if has_rotation(class_name) {
                    let rotation = record
                        .rotation
                        .ok_or_else(|| malformed("spawn record missing rotation".into()))?;
                    rotation.encode(w);
                }
            }

            let archetype = record
                .archetype
                .clone()
                .ok_or_else(|| malformed("spawn record missing archetype".into()))?;
            table.spawn(
                record.channel,
                LiveActor {
                    type_id,
                    archetype,
                    class_name: class_name.to_string(),
                },
            );
        }
        Lifecycle::Updated => {
            w.write_bit(true);
            w.write_bit(false);
            let live = table.get(record.channel).ok_or(NetError::UnknownActor {
                bit: w.position(),
                channel: record.channel,
            })?;
            let schema = ctx
                .schemas
                .get(&live.class_name)
                .expect("live table classes come from the arena");
            for update in &record.properties {
                encode_property(schema, update, w)?;
            }
            encode_end_marker(schema, w);
        }
    }
    Ok(())
}

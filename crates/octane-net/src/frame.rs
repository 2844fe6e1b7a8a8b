//! Frame sequencing and the capture-level entry points.
//!
//! A frame is a time/delta pair followed by actor records, each
//! preceded by a continuation bit. The sequencer threads one
//! [`LiveActorTable`] across all frames of a pass, in both directions.

use octane_bits::{BitReader, BitWriter, RawBits};

use crate::actor::{decode_actor, encode_actor, ActorRecord, DIAGNOSTIC_WINDOW_BITS};
use crate::context::{CaptureContext, DecodeConfig, DecodeMode};
use crate::error::NetError;
use crate::report::{DecodeReport, IncompleteUnit};
use crate::table::LiveActorTable;

/// One frame's worth of actor deltas.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Capture time of the frame, seconds.
    pub time: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Actor deltas, in wire order.
    pub actors: Vec<ActorRecord>,
}

/// A decoded network-stream region.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkFrames {
    /// The frames, in capture order.
    pub frames: Vec<Frame>,
    /// Bits between the final frame and the end of the region,
    /// preserved verbatim for byte-exact re-encoding.
    pub trailing: RawBits,
}

/// Decode a network-stream region into frames.
///
/// `frame_count` comes from the capture's top-level property dictionary
/// (the outer container's concern). In strict mode any failure aborts
/// with a typed error carrying its bit offset; in lenient mode failures
/// are recorded in the report, the failed unit keeps its bits, and
/// everything decoded so far is returned.
pub fn decode_frames(
    config: &DecodeConfig,
    ctx: &CaptureContext<'_>,
    data: &[u8],
    frame_count: usize,
) -> Result<(NetworkFrames, DecodeReport), NetError> {
    let mut r = BitReader::new(data);
    let mut table = LiveActorTable::new();
    let mut report = DecodeReport::default();
    let mut frames = Vec::with_capacity(frame_count);

    match decode_frames_inner(config, ctx, &mut r, &mut table, &mut report, &mut frames, frame_count)
    {
        Ok(trailing) => Ok((NetworkFrames { frames, trailing }, report)),
        Err(err) => match config.mode {
            DecodeMode::Strict => Err(err),
            DecodeMode::Lenient => {
                report.incomplete.push(IncompleteUnit {
                    bit: err.bit(),
                    error: err,
                    consumed: RawBits::new(),
                    lookahead: r.lookahead(DIAGNOSTIC_WINDOW_BITS),
                });
                Ok((
                    NetworkFrames {
                        frames,
                        trailing: RawBits::new(),
                    },
                    report,
                ))
            }
        },
    }
}

fn decode_frames_inner(
    config: &DecodeConfig,
    ctx: &CaptureContext<'_>,
    r: &mut BitReader<'_>,
    table: &mut LiveActorTable,
    report: &mut DecodeReport,
    frames: &mut Vec<Frame>,
    frame_count: usize,
) -> Result<RawBits, NetError> {
    for _ in 0..frame_count {
        let time = r.read_f32()?;
        let delta = r.read_f32()?;
        let mut actors = Vec::new();
        let mut desynced = false;

        while r.read_bit()? {
            let record = decode_actor(ctx, config, table, r, report)?;
            let complete = record.complete;
            actors.push(record);
            if !complete {
                // An undelimited bit run cannot be re-synchronized past
                // a failed unit; keep what we have and end the pass.
                desynced = true;
                break;
            }
        }

        frames.push(Frame {
            time,
            delta,
            actors,
        });
        if desynced {
            return Ok(RawBits::new());
        }
    }
    let remaining = r.remaining();
    Ok(r.read_raw(remaining)?)
}

/// Encode frames back into a byte buffer.
///
/// For a capture decoded cleanly in strict mode, the output is
/// byte-for-byte identical to the original region, length included.
/// Incomplete records refuse to encode.
pub fn encode_frames(
    ctx: &CaptureContext<'_>,
    net: &NetworkFrames,
) -> Result<Vec<u8>, NetError> {
    let mut w = BitWriter::new();
    let mut table = LiveActorTable::new();

    for frame in &net.frames {
        w.write_f32(frame.time);
        w.write_f32(frame.delta);
        for record in &frame.actors {
            w.write_bit(true);
            encode_actor(ctx, &mut table, record, &mut w)?;
        }
        w.write_bit(false);
    }

    w.write_raw(&net.trailing);
    Ok(w.into_bytes())
}

//! Test fixtures and synthetic capture builders for Octane development.
//!
//! [`StreamBuilder`] writes network-stream regions at the wire level,
//! independently of the production encoder — round-trip tests that
//! decode a built stream and re-encode it are comparing two separate
//! implementations of the format, not an encoder against itself.
//! [`fixture_arena`] and [`fixture_names`] provide a miniature but
//! realistically shaped schema catalog, and [`random_capture`] grows
//! seeded multi-frame captures for soak-style round-trip tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use octane_bits::BitWriter;
use octane_schema::{ClassSchema, RawSchema, SchemaArena};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ── Fixture catalog ─────────────────────────────────────────────

/// Object-name table index of `Archetypes.Car.Car_Default`.
pub const OBJ_CAR: u32 = 0;
/// Object-name table index of `Archetypes.Ball.Ball_Default`.
pub const OBJ_BALL: u32 = 1;
/// Object-name table index of a stadium crowd actor instance.
pub const OBJ_CROWD: u32 = 2;
/// Object-name table index of `TAGame.Default__PRI_TA`.
pub const OBJ_PRI: u32 = 3;
/// Object-name table index of `Archetypes.Teams.Team0`.
pub const OBJ_TEAM0: u32 = 4;

/// The fixture object-index → name table.
pub fn fixture_names() -> Vec<String> {
    [
        "Archetypes.Car.Car_Default",
        "Archetypes.Ball.Ball_Default",
        "Stadium_p.TheWorld:PersistentLevel.CrowdActor_TA_0",
        "TAGame.Default__PRI_TA",
        "Archetypes.Teams.Team0",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// A miniature schema catalog shaped like a real capture's: a common
/// parent class, a vehicle chain two levels deep, and standalone
/// classes for the ball, crowd, player info, and teams.
pub fn fixture_arena() -> SchemaArena {
    let raw = |class: &str, parent: Option<&str>, props: &[(u32, &str)]| RawSchema {
        class_name: class.into(),
        parent: parent.map(Into::into),
        properties: props.iter().map(|(id, n)| (*id, (*n).into())).collect(),
    };

    SchemaArena::build(vec![
        raw("Engine.Actor", None, &[(0, "Engine.Actor:DrawScale")]),
        raw(
            "TAGame.Vehicle_TA",
            Some("Engine.Actor"),
            &[
                (1, "TAGame.Vehicle_TA:ReplicatedThrottle"),
                (2, "TAGame.Vehicle_TA:bReplicatedHandbrake"),
            ],
        ),
        raw(
            "TAGame.Car_TA",
            Some("TAGame.Vehicle_TA"),
            &[
                (3, "TAGame.Car_TA:TeamPaint"),
                (4, "TAGame.RBActor_TA:ReplicatedRBState"),
            ],
        ),
        raw(
            "TAGame.Ball_TA",
            Some("Engine.Actor"),
            &[
                (1, "TAGame.Ball_TA:HitTeamNum"),
                (2, "TAGame.RBActor_TA:ReplicatedRBState"),
            ],
        ),
        raw(
            "TAGame.CrowdActor_TA",
            None,
            &[
                (0, "TAGame.CrowdActor_TA:ReplicatedCountDownNumber"),
                (1, "TAGame.CrowdActor_TA:ModifiedNoise"),
            ],
        ),
        raw(
            "TAGame.PRI_TA",
            Some("Engine.Actor"),
            &[
                (1, "Engine.PlayerReplicationInfo:PlayerName"),
                (2, "TAGame.PRI_TA:MatchScore"),
                (3, "TAGame.PRI_TA:CameraSettings"),
                (4, "TAGame.PRI_TA:ClientLoadout"),
                (5, "Engine.PlayerReplicationInfo:UniqueId"),
            ],
        ),
        raw("TAGame.Team_Soccar_TA", None, &[(0, "Engine.TeamInfo:Score")]),
    ])
    .expect("fixture catalog is well-formed")
}

/// Wire property id of `name` within `schema`.
pub fn property_id(schema: &ClassSchema, name: &str) -> u32 {
    schema
        .properties()
        .find(|(_, n)| *n == name)
        .unwrap_or_else(|| panic!("{name} not in schema {}", schema.class_name()))
        .0
}

// ── Wire-level stream builder ───────────────────────────────────

/// Compact per-axis magnitude width; mirrors the production constant so
/// built vectors parse with the production geometry codec.
const COMPACT_AXIS_BITS: u32 = 14;

/// Version at which spawn records carry the extra name-index field.
const NAME_INDEX_VERSION: (u32, u32) = (868, 14);

/// Builds a network-stream region bit by bit, at the wire level.
pub struct StreamBuilder {
    w: BitWriter,
    max_channels: u32,
    version: (u32, u32),
}

impl StreamBuilder {
    pub fn new(max_channels: u32, version: (u32, u32)) -> Self {
        Self {
            w: BitWriter::new(),
            max_channels,
            version,
        }
    }

    fn writes_name_index(&self) -> bool {
        self.version.0 > NAME_INDEX_VERSION.0
            || (self.version.0 == NAME_INDEX_VERSION.0 && self.version.1 >= NAME_INDEX_VERSION.1)
    }

    pub fn begin_frame(&mut self, time: f32, delta: f32) {
        self.w.write_f32(time);
        self.w.write_f32(delta);
    }

    pub fn end_frame(&mut self) {
        self.w.write_bit(false);
    }

    /// A spawn with a compact-width position and optional raw-byte rotation.
    pub fn spawn_with_transform(
        &mut self,
        channel: u32,
        type_id: u32,
        units: (i32, i32, i32),
        rotation: Option<(u8, u8, u8)>,
    ) {
        self.spawn_header(channel, type_id);
        self.write_vector(units);
        if let Some((pitch, yaw, roll)) = rotation {
            self.w.write_u8(pitch);
            self.w.write_u8(yaw);
            self.w.write_u8(roll);
        }
    }

    /// A spawn for a class without an initial position.
    pub fn spawn_bare(&mut self, channel: u32, type_id: u32) {
        self.spawn_header(channel, type_id);
    }

    fn spawn_header(&mut self, channel: u32, type_id: u32) {
        self.w.write_bit(true); // another actor follows
        self.w.write_bounded(channel, self.max_channels);
        self.w.write_bit(true); // live
        self.w.write_bit(true); // new
        self.w.write_bit(false); // spawn flag
        if self.writes_name_index() {
            self.w.write_u32(channel.wrapping_mul(2) + 1);
        }
        self.w.write_u32(type_id);
    }

    fn write_vector(&mut self, units: (i32, i32, i32)) {
        self.w.write_bit(false); // compact widths
        for axis in [units.0, units.1, units.2] {
            assert!(axis.unsigned_abs() < (1 << COMPACT_AXIS_BITS));
            self.w.write_bit(axis < 0);
            self.w.write_fixed(axis.unsigned_abs(), COMPACT_AXIS_BITS);
        }
    }

    pub fn despawn(&mut self, channel: u32) {
        self.w.write_bit(true);
        self.w.write_bounded(channel, self.max_channels);
        self.w.write_bit(false); // not live
    }

    pub fn begin_update(&mut self, channel: u32) {
        self.w.write_bit(true);
        self.w.write_bounded(channel, self.max_channels);
        self.w.write_bit(true); // live
        self.w.write_bit(false); // existing
    }

    pub fn end_update(&mut self, arena: &SchemaArena, class: &str) {
        let max = arena.get(class).unwrap().max_property_id();
        self.w.write_bounded(max, max);
    }

    fn property_header(&mut self, arena: &SchemaArena, class: &str, name: &str) {
        let schema = arena.get(class).unwrap();
        self.w
            .write_bounded(property_id(schema, name), schema.max_property_id());
    }

    pub fn property_bool(&mut self, arena: &SchemaArena, class: &str, name: &str, value: bool) {
        self.property_header(arena, class, name);
        self.w.write_bit(value);
    }

    pub fn property_byte(&mut self, arena: &SchemaArena, class: &str, name: &str, value: u8) {
        self.property_header(arena, class, name);
        self.w.write_u8(value);
    }

    pub fn property_int(&mut self, arena: &SchemaArena, class: &str, name: &str, value: i32) {
        self.property_header(arena, class, name);
        self.w.write_i32(value);
    }

    pub fn property_float(&mut self, arena: &SchemaArena, class: &str, name: &str, value: f32) {
        self.property_header(arena, class, name);
        self.w.write_f32(value);
    }

    pub fn property_str(&mut self, arena: &SchemaArena, class: &str, name: &str, text: &str) {
        self.property_header(arena, class, name);
        self.w.write_i32(text.len() as i32 + 1);
        for byte in text.bytes() {
            self.w.write_u8(byte);
        }
        self.w.write_u8(0);
    }

    /// A camera-settings record; pass `transition` only for versions
    /// that replicate the seventh float.
    pub fn property_camera(
        &mut self,
        arena: &SchemaArena,
        class: &str,
        fields: [f32; 6],
        transition: Option<f32>,
    ) {
        self.property_header(arena, class, "TAGame.PRI_TA:CameraSettings");
        for field in fields {
            self.w.write_f32(field);
        }
        if let Some(speed) = transition {
            self.w.write_f32(speed);
        }
    }

    pub fn property_team_paint(
        &mut self,
        arena: &SchemaArena,
        class: &str,
        team: u8,
        team_color: u8,
        custom_color: u8,
        team_finish: u32,
        custom_finish: u32,
    ) {
        self.property_header(arena, class, "TAGame.Car_TA:TeamPaint");
        self.w.write_u8(team);
        self.w.write_u8(team_color);
        self.w.write_u8(custom_color);
        self.w.write_u32(team_finish);
        self.w.write_u32(custom_finish);
    }

    /// A sleeping rigid-body snapshot: transform only, no velocities.
    pub fn property_rigid_body_sleeping(
        &mut self,
        arena: &SchemaArena,
        class: &str,
        units: (i32, i32, i32),
        rotation_raw: [u32; 3],
    ) {
        self.property_header(arena, class, "TAGame.RBActor_TA:ReplicatedRBState");
        self.w.write_bit(true); // sleeping
        self.write_vector(units);
        for component in rotation_raw {
            self.w.write_fixed(component, 16);
        }
    }

    /// Append raw padding bits after the final frame.
    pub fn pad_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.w.write_bit(bit);
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.w.into_bytes()
    }
}

// ── Seeded random captures ──────────────────────────────────────

/// Deterministically generate a multi-frame capture.
///
/// Spawns cars, drives throttle/handbrake/paint updates, and despawns
/// actors, tracking liveness so the produced stream is always valid.
/// Returns the region bytes and the frame count. The same seed always
/// produces the same bytes.
pub fn random_capture(
    seed: u64,
    frame_count: usize,
    max_channels: u32,
    version: (u32, u32),
) -> (Vec<u8>, usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut b = StreamBuilder::new(max_channels, version);
    let arena = fixture_arena();
    let mut live: Vec<u32> = Vec::new();
    let mut next_channel = 0u32;
    let mut time = 0.0f32;

    for _ in 0..frame_count {
        let delta = 1.0 / 30.0;
        time += delta;
        b.begin_frame(time, delta);

        for _ in 0..rng.random_range(0..4usize) {
            // Bias towards updates once a few actors are live.
            let action = rng.random_range(0..10u32);
            if live.is_empty() || action < 3 {
                if next_channel >= max_channels {
                    continue;
                }
                let channel = next_channel;
                next_channel += 1;
                b.spawn_with_transform(
                    channel,
                    OBJ_CAR,
                    (
                        rng.random_range(-8000..8000),
                        rng.random_range(-8000..8000),
                        rng.random_range(0..2000),
                    ),
                    Some((rng.random(), rng.random(), rng.random())),
                );
                live.push(channel);
            } else if action < 9 {
                let channel = live[rng.random_range(0..live.len())];
                b.begin_update(channel);
                if rng.random() {
                    b.property_byte(
                        &arena,
                        "TAGame.Car_TA",
                        "TAGame.Vehicle_TA:ReplicatedThrottle",
                        rng.random(),
                    );
                }
                if rng.random() {
                    b.property_bool(
                        &arena,
                        "TAGame.Car_TA",
                        "TAGame.Vehicle_TA:bReplicatedHandbrake",
                        rng.random(),
                    );
                }
                b.property_team_paint(
                    &arena,
                    "TAGame.Car_TA",
                    rng.random_range(0..2),
                    rng.random_range(0..18),
                    rng.random_range(0..105),
                    rng.random_range(0..624),
                    rng.random_range(0..624),
                );
                b.end_update(&arena, "TAGame.Car_TA");
            } else {
                let idx = rng.random_range(0..live.len());
                let channel = live.swap_remove(idx);
                b.despawn(channel);
            }
        }
        b.end_frame();
    }

    // Trailing padding bits, like a real region carries.
    let pad: Vec<bool> = (0..rng.random_range(0..7u32)).map(|_| rng.random()).collect();
    b.pad_bits(&pad);

    (b.finish(), frame_count)
}

//! Archetype → class schema resolution.

use crate::error::ResolveError;
use crate::schema::{ClassSchema, SchemaArena};

/// A successful archetype resolution.
#[derive(Clone, Copy, Debug)]
pub struct Resolution<'a> {
    /// The schema governing the actor's updates.
    pub schema: &'a ClassSchema,
    /// True when the mapping came from the suffix-derivation fallback
    /// rather than the known tables. Surfaced in decode reports so an
    /// operator can promote the pair into the exact table.
    pub guessed: bool,
}

/// Known archetype → class pairs.
///
/// Ordered roughly by spawn frequency. Extend by name as new archetypes
/// are observed in captures.
fn exact_class(archetype: &str) -> Option<&'static str> {
    match archetype {
        "Archetypes.Car.Car_Default" => Some("TAGame.Car_TA"),
        "Archetypes.Ball.Ball_Default"
        | "Archetypes.Ball.Ball_Basketball"
        | "Archetypes.Ball.Ball_BasketBall_Mutator"
        | "Archetypes.Ball.Ball_Puck"
        | "Archetypes.Ball.CubeBall" => Some("TAGame.Ball_TA"),
        "Archetypes.CarComponents.CarComponent_Boost" => Some("TAGame.CarComponent_Boost_TA"),
        "Archetypes.CarComponents.CarComponent_Dodge" => Some("TAGame.CarComponent_Dodge_TA"),
        "Archetypes.CarComponents.CarComponent_DoubleJump" => {
            Some("TAGame.CarComponent_DoubleJump_TA")
        }
        "Archetypes.CarComponents.CarComponent_FlipCar" => Some("TAGame.CarComponent_FlipCar_TA"),
        "Archetypes.CarComponents.CarComponent_Jump" => Some("TAGame.CarComponent_Jump_TA"),
        "Archetypes.Teams.Team0" | "Archetypes.Teams.Team1" => Some("TAGame.Team_Soccar_TA"),
        "TAGame.Default__PRI_TA" => Some("TAGame.PRI_TA"),
        "Archetypes.GameEvent.GameEvent_Basketball"
        | "Archetypes.GameEvent.GameEvent_Soccar"
        | "Archetypes.GameEvent.GameEvent_Items" => Some("TAGame.GameEvent_Soccar_TA"),
        "Archetypes.GameEvent.GameEvent_SoccarPrivate"
        | "Archetypes.GameEvent.GameEvent_BasketballPrivate"
        | "Archetypes.GameEvent.GameEvent_HockeyPrivate" => {
            Some("TAGame.GameEvent_SoccarPrivate_TA")
        }
        "Archetypes.GameEvent.GameEvent_SoccarSplitscreen"
        | "Archetypes.GameEvent.GameEvent_BasketballSplitscreen"
        | "Archetypes.GameEvent.GameEvent_HockeySplitscreen" => {
            Some("TAGame.GameEvent_SoccarSplitscreen_TA")
        }
        "Archetypes.GameEvent.GameEvent_Season" => Some("TAGame.GameEvent_Season_TA"),
        "Archetypes.GameEvent.GameEvent_Season:CarArchetype" => Some("TAGame.Car_TA"),
        "GameInfo_Basketball.GameInfo.GameInfo_Basketball:GameReplicationInfoArchetype"
        | "Gameinfo_Hockey.GameInfo.Gameinfo_Hockey:GameReplicationInfoArchetype"
        | "GameInfo_Season.GameInfo.GameInfo_Season:GameReplicationInfoArchetype"
        | "GameInfo_Soccar.GameInfo.GameInfo_Soccar:GameReplicationInfoArchetype"
        | "GameInfo_Items.GameInfo.GameInfo_Items:GameReplicationInfoArchetype" => {
            Some("TAGame.GRI_TA")
        }
        "TAGame.Default__CameraSettingsActor_TA" => Some("TAGame.CameraSettingsActor_TA"),
        "Archetypes.SpecialPickups.SpecialPickup_GravityWell" => {
            Some("TAGame.SpecialPickup_BallGravity_TA")
        }
        "Archetypes.SpecialPickups.SpecialPickup_BallVelcro" => {
            Some("TAGame.SpecialPickup_BallVelcro_TA")
        }
        "Archetypes.SpecialPickups.SpecialPickup_BallLasso" => {
            Some("TAGame.SpecialPickup_BallLasso_TA")
        }
        "Archetypes.SpecialPickups.SpecialPickup_BallGrapplingHook" => {
            Some("TAGame.SpecialPickup_GrapplingHook_TA")
        }
        "Archetypes.SpecialPickups.SpecialPickup_Swapper" => {
            Some("TAGame.SpecialPickup_Swapper_TA")
        }
        "Archetypes.SpecialPickups.SpecialPickup_BallFreeze" => {
            Some("TAGame.SpecialPickup_BallFreeze_TA")
        }
        "Archetypes.SpecialPickups.SpecialPickup_BoostOverride" => {
            Some("TAGame.SpecialPickup_BoostOverride_TA")
        }
        "Archetypes.SpecialPickups.SpecialPickup_Tornado" => {
            Some("TAGame.SpecialPickup_Tornado_TA")
        }
        "Archetypes.SpecialPickups.SpecialPickup_CarSpring"
        | "Archetypes.SpecialPickups.SpecialPickup_BallSpring" => {
            Some("TAGame.SpecialPickup_BallCarSpring_TA")
        }
        "Archetypes.SpecialPickups.SpecialPickup_StrongHit" => {
            Some("TAGame.SpecialPickup_HitForce_TA")
        }
        "Archetypes.SpecialPickups.SpecialPickup_Batarang" => {
            Some("TAGame.SpecialPickup_Batarang_TA")
        }
        "Neotokyo_p.TheWorld:PersistentLevel.InMapScoreboard_TA_0"
        | "Neotokyo_p.TheWorld:PersistentLevel.InMapScoreboard_TA_1" => {
            Some("TAGame.InMapScoreboard_TA")
        }
        _ => None,
    }
}

/// Actor families recognized by a shared name fragment, independent of
/// the numeric instance suffix their archetypes carry.
const FRAGMENT_RULES: &[(&str, &str)] = &[
    ("CrowdActor_TA", "TAGame.CrowdActor_TA"),
    ("VehiclePickup_Boost_TA", "TAGame.VehiclePickup_Boost_TA"),
    ("CrowdManager_TA", "TAGame.CrowdManager_TA"),
];

/// Drop every `_<digits>` run from the name.
fn strip_numeric_suffixes(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' && chars.peek().is_some_and(|d| d.is_ascii_digit()) {
            while chars.peek().is_some_and(|d| d.is_ascii_digit()) {
                chars.next();
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Derive the class-name fragment an unknown archetype most plausibly
/// maps to: take the last `.`/`:` segment, then rewrite the filler
/// tokens design-time names carry (`_Default`, `Archetype`, `Default__`,
/// digit markers) into their replicated-class spellings.
fn candidate_suffix(archetype: &str) -> String {
    let stripped = strip_numeric_suffixes(archetype);
    let tail = stripped.rsplit('.').next().unwrap_or(&stripped);
    let tail = tail.rsplit(':').next().unwrap_or(tail);
    tail.replace("_Default", "_TA")
        .replace("Archetype", "")
        .replace("_0", "")
        .replace('0', "_TA")
        .replace('1', "_TA")
        .replace("Default__", "")
}

/// Resolve a spawned archetype name to the class schema that governs
/// how its updates decode.
///
/// Pure over its two inputs. Resolution order: the exact-match table,
/// then shared-fragment rules, then the derived-suffix fallback. The
/// fallback succeeds only on exactly one containment match — zero is
/// [`ResolveError::NoMatch`], several is [`ResolveError::Ambiguous`];
/// guessing among candidates could silently desynchronize the stream.
pub fn resolve<'a>(
    archetype: &str,
    arena: &'a SchemaArena,
) -> Result<Resolution<'a>, ResolveError> {
    let no_match = || ResolveError::NoMatch {
        archetype: archetype.to_string(),
    };

    if let Some(class) = exact_class(archetype) {
        let schema = arena.get(class).ok_or_else(no_match)?;
        return Ok(Resolution {
            schema,
            guessed: false,
        });
    }

    for (fragment, class) in FRAGMENT_RULES {
        if archetype.contains(fragment) {
            let schema = arena.get(class).ok_or_else(no_match)?;
            return Ok(Resolution {
                schema,
                guessed: false,
            });
        }
    }

    let needle = format!(".{}", candidate_suffix(archetype));
    let mut matches = arena.class_names().filter(|name| name.contains(&needle));
    match (matches.next(), matches.next()) {
        (None, _) => Err(no_match()),
        (Some(only), None) => Ok(Resolution {
            schema: arena.get(only).expect("name taken from the arena"),
            guessed: true,
        }),
        (Some(first), Some(second)) => {
            let mut candidates = vec![first.to_string(), second.to_string()];
            candidates.extend(matches.map(String::from));
            Err(ResolveError::Ambiguous {
                archetype: archetype.to_string(),
                candidates,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RawSchema;

    fn arena_of(classes: &[&str]) -> SchemaArena {
        SchemaArena::build(
            classes
                .iter()
                .map(|name| RawSchema {
                    class_name: (*name).into(),
                    parent: None,
                    properties: vec![],
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn exact_table_hits() {
        let arena = arena_of(&[
            "TAGame.Car_TA",
            "TAGame.Ball_TA",
            "TAGame.PRI_TA",
            "TAGame.CarComponent_Boost_TA",
            "TAGame.Team_Soccar_TA",
            "TAGame.GameEvent_Soccar_TA",
            "TAGame.GameEvent_SoccarPrivate_TA",
            "TAGame.GRI_TA",
            "TAGame.CameraSettingsActor_TA",
            "TAGame.SpecialPickup_BallCarSpring_TA",
            "TAGame.InMapScoreboard_TA",
        ]);
        for (archetype, class) in [
            ("Archetypes.Car.Car_Default", "TAGame.Car_TA"),
            ("Archetypes.Ball.Ball_Puck", "TAGame.Ball_TA"),
            ("TAGame.Default__PRI_TA", "TAGame.PRI_TA"),
            (
                "Archetypes.CarComponents.CarComponent_Boost",
                "TAGame.CarComponent_Boost_TA",
            ),
            ("Archetypes.Teams.Team1", "TAGame.Team_Soccar_TA"),
            (
                "Archetypes.GameEvent.GameEvent_Basketball",
                "TAGame.GameEvent_Soccar_TA",
            ),
            (
                "Archetypes.GameEvent.GameEvent_HockeyPrivate",
                "TAGame.GameEvent_SoccarPrivate_TA",
            ),
            (
                "GameInfo_Soccar.GameInfo.GameInfo_Soccar:GameReplicationInfoArchetype",
                "TAGame.GRI_TA",
            ),
            (
                "TAGame.Default__CameraSettingsActor_TA",
                "TAGame.CameraSettingsActor_TA",
            ),
            (
                "Archetypes.SpecialPickups.SpecialPickup_BallSpring",
                "TAGame.SpecialPickup_BallCarSpring_TA",
            ),
            (
                "Neotokyo_p.TheWorld:PersistentLevel.InMapScoreboard_TA_1",
                "TAGame.InMapScoreboard_TA",
            ),
        ] {
            let res = resolve(archetype, &arena).unwrap();
            assert_eq!(res.schema.class_name(), class, "{archetype}");
            assert!(!res.guessed, "{archetype}");
        }
    }

    #[test]
    fn fragment_rules_ignore_instance_suffix() {
        let arena = arena_of(&[
            "TAGame.CrowdActor_TA",
            "TAGame.CrowdManager_TA",
            "TAGame.VehiclePickup_Boost_TA",
        ]);
        let res = resolve(
            "Stadium_p.TheWorld:PersistentLevel.CrowdActor_TA_3",
            &arena,
        )
        .unwrap();
        assert_eq!(res.schema.class_name(), "TAGame.CrowdActor_TA");
        assert!(!res.guessed);

        let res = resolve(
            "Stadium_p.TheWorld:PersistentLevel.VehiclePickup_Boost_TA_20",
            &arena,
        )
        .unwrap();
        assert_eq!(res.schema.class_name(), "TAGame.VehiclePickup_Boost_TA");
    }

    #[test]
    fn fallback_single_match_is_guessed() {
        let arena = arena_of(&["TAGame.Ball_Breakout_TA", "TAGame.Car_TA"]);
        let res = resolve("Archetypes.Ball.Ball_Breakout_Default", &arena).unwrap();
        assert_eq!(res.schema.class_name(), "TAGame.Ball_Breakout_TA");
        assert!(res.guessed);
    }

    #[test]
    fn fallback_zero_matches_fails() {
        let arena = arena_of(&["TAGame.Car_TA"]);
        let err = resolve("Archetypes.Mystery.Widget_Default", &arena).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatch { .. }));
    }

    #[test]
    fn fallback_multiple_matches_fails_with_candidates() {
        let arena = arena_of(&["A.Thing_TA", "B.Thing_TA"]);
        let err = resolve("Archetypes.Misc.Thing_Default", &arena).unwrap_err();
        match err {
            ResolveError::Ambiguous { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn exact_entry_with_missing_class_is_no_match() {
        // The archetype is known but the capture's catalog lacks the class.
        let arena = arena_of(&["TAGame.Car_TA"]);
        let err = resolve("Archetypes.Ball.Ball_Default", &arena).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatch { .. }));
    }

    #[test]
    fn suffix_derivation_strips_filler_tokens() {
        assert_eq!(candidate_suffix("Archetypes.Misc.Widget_Default"), "Widget_TA");
        assert_eq!(candidate_suffix("Pkg.Sub:Deep.Widget_12"), "Widget");
        assert_eq!(candidate_suffix("TAGame.Default__Widget_TA"), "Widget_TA");
    }
}

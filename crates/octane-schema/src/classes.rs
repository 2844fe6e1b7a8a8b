//! Class-level protocol predicates.
//!
//! Two closed, name-keyed sets gate what a spawn record carries on the
//! wire. Membership was established by observation; extend by name as
//! new classes show up in captures.

/// Whether a class's spawn record carries an initial position.
///
/// Ambient actors that exist outside play space replicate no transform
/// at spawn.
pub fn has_initial_position(class_name: &str) -> bool {
    !matches!(
        class_name,
        "TAGame.CrowdActor_TA"
            | "TAGame.CrowdManager_TA"
            | "TAGame.VehiclePickup_Boost_TA"
            | "TAGame.InMapScoreboard_TA"
    )
}

/// Whether a class's spawn record additionally carries a rotation.
pub fn has_rotation(class_name: &str) -> bool {
    matches!(
        class_name,
        "TAGame.Ball_TA" | "TAGame.Car_TA" | "TAGame.Car_Season_TA"
    )
}

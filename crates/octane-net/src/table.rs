//! The live-actor table.

use indexmap::IndexMap;

/// What the decoder must remember about a spawned actor to interpret
/// its later updates: the type resolved at spawn time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveActor {
    /// Type id from the spawn record.
    pub type_id: u32,
    /// Archetype name the type id resolved to.
    pub archetype: String,
    /// Class name whose schema governs the actor's updates.
    pub class_name: String,
}

/// Working set of currently live actors, keyed by channel id.
///
/// Owned by exactly one decode or encode pass and mutated only by the
/// frame sequencer driving it: inserts on spawn, removes on despawn,
/// nothing else. It is never persisted — the table is re-derivable from
/// the frame sequence alone. Iteration order is insertion order, so a
/// pass is deterministic.
#[derive(Clone, Debug, Default)]
pub struct LiveActorTable {
    actors: IndexMap<u32, LiveActor>,
}

impl LiveActorTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a spawn. A respawn on a live channel replaces the entry.
    pub fn spawn(&mut self, channel: u32, actor: LiveActor) {
        self.actors.insert(channel, actor);
    }

    /// Look up a live actor.
    pub fn get(&self, channel: u32) -> Option<&LiveActor> {
        self.actors.get(&channel)
    }

    /// Record a despawn. Returns whether the channel was live; removing
    /// an absent channel is a no-op, not an error.
    pub fn despawn(&mut self, channel: u32) -> bool {
        self.actors.shift_remove(&channel).is_some()
    }

    /// Number of live actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// True when no actors are live.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Live channel ids in spawn order.
    pub fn channels(&self) -> impl Iterator<Item = u32> + '_ {
        self.actors.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(class: &str) -> LiveActor {
        LiveActor {
            type_id: 1,
            archetype: "Archetypes.Car.Car_Default".into(),
            class_name: class.into(),
        }
    }

    #[test]
    fn spawn_get_despawn() {
        let mut table = LiveActorTable::new();
        table.spawn(4, actor("TAGame.Car_TA"));
        assert_eq!(table.get(4).unwrap().class_name, "TAGame.Car_TA");
        assert!(table.despawn(4));
        assert!(table.get(4).is_none());
    }

    #[test]
    fn despawn_absent_is_noop() {
        let mut table = LiveActorTable::new();
        assert!(!table.despawn(9));
        assert!(table.is_empty());
    }

    #[test]
    fn respawn_replaces() {
        let mut table = LiveActorTable::new();
        table.spawn(2, actor("TAGame.Car_TA"));
        table.spawn(2, actor("TAGame.Ball_TA"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(2).unwrap().class_name, "TAGame.Ball_TA");
    }

    #[test]
    fn channels_iterate_in_spawn_order() {
        let mut table = LiveActorTable::new();
        for channel in [7, 1, 5] {
            table.spawn(channel, actor("TAGame.Car_TA"));
        }
        let order: Vec<u32> = table.channels().collect();
        assert_eq!(order, [7, 1, 5]);
    }
}

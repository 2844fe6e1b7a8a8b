//! Class schemas and the arena that builds them.

use indexmap::IndexMap;

use crate::error::SchemaError;

/// One class's schema as parsed from the capture, before parent chaining.
///
/// The outer container hands these over already associated with class
/// names; property ids here are only the entries the class declares
/// itself, not what it inherits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawSchema {
    /// Fully qualified replicated class name (e.g. `TAGame.Ball_TA`).
    pub class_name: String,
    /// Parent class name, if the class extends another's id table.
    pub parent: Option<String>,
    /// Property ids this class declares itself, with their names.
    pub properties: Vec<(u32, String)>,
}

/// A replicated class's complete, chained property-id table.
///
/// Built by [`SchemaArena::build`]; immutable afterwards. The table is
/// ordered parent-first and deterministic for a given capture version,
/// and `max_property_id` is the bound the wire encodes property ids
/// against — an id equal to the bound is the end-of-properties marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassSchema {
    class_name: String,
    properties: IndexMap<u32, String>,
    max_property_id: u32,
}

impl ClassSchema {
    /// Fully qualified class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Look up a property name by wire id, chained through parents.
    pub fn property_name(&self, id: u32) -> Option<&str> {
        self.properties.get(&id).map(String::as_str)
    }

    /// Exclusive upper bound for wire property ids.
    ///
    /// Equal to the highest declared id plus one; the wire value equal
    /// to this bound terminates a property run.
    pub fn max_property_id(&self) -> u32 {
        self.max_property_id
    }

    /// All `(id, name)` entries, parents first, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (u32, &str)> {
        self.properties.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

/// All class schemas of one capture, keyed by class name.
///
/// # Examples
///
/// ```
/// use octane_schema::{RawSchema, SchemaArena};
///
/// let arena = SchemaArena::build(vec![
///     RawSchema {
///         class_name: "Engine.Actor".into(),
///         parent: None,
///         properties: vec![(0, "Engine.Actor:DrawScale".into())],
///     },
///     RawSchema {
///         class_name: "TAGame.Ball_TA".into(),
///         parent: Some("Engine.Actor".into()),
///         properties: vec![(1, "TAGame.Ball_TA:HitTeamNum".into())],
///     },
/// ])
/// .unwrap();
///
/// let ball = arena.get("TAGame.Ball_TA").unwrap();
/// // The child chains through its parent's table and extends it.
/// assert_eq!(ball.property_name(0), Some("Engine.Actor:DrawScale"));
/// assert_eq!(ball.property_name(1), Some("TAGame.Ball_TA:HitTeamNum"));
/// assert_eq!(ball.max_property_id(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SchemaArena {
    by_name: IndexMap<String, ClassSchema>,
}

impl SchemaArena {
    /// Build the arena: resolve every class's parent chain, then extend.
    ///
    /// The input order does not matter; chains are resolved root-first
    /// on demand. Fails on duplicate classes, unknown parents, chain
    /// cycles, and property ids redeclared across a chain.
    pub fn build(raw: Vec<RawSchema>) -> Result<Self, SchemaError> {
        let mut pending: IndexMap<String, RawSchema> = IndexMap::new();
        for schema in raw {
            let name = schema.class_name.clone();
            if pending.insert(name.clone(), schema).is_some() {
                return Err(SchemaError::DuplicateClass { class: name });
            }
        }

        let mut arena = Self::default();
        let names: Vec<String> = pending.keys().cloned().collect();
        for name in names {
            arena.resolve_chain(&name, &pending, &mut Vec::new())?;
        }
        Ok(arena)
    }

    /// Resolve one class, recursing into its parent first.
    fn resolve_chain(
        &mut self,
        name: &str,
        pending: &IndexMap<String, RawSchema>,
        visiting: &mut Vec<String>,
    ) -> Result<(), SchemaError> {
        if self.by_name.contains_key(name) {
            return Ok(());
        }
        if visiting.iter().any(|n| n == name) {
            return Err(SchemaError::ParentCycle { class: name.into() });
        }
        visiting.push(name.to_string());

        let raw = &pending[name];
        let mut properties = IndexMap::new();
        if let Some(parent) = &raw.parent {
            if !pending.contains_key(parent.as_str()) {
                return Err(SchemaError::UnknownParent {
                    class: name.into(),
                    parent: parent.clone(),
                });
            }
            self.resolve_chain(parent, pending, visiting)?;
            properties = self.by_name[parent.as_str()].properties.clone();
        }

        for (id, prop_name) in &raw.properties {
            if properties.insert(*id, prop_name.clone()).is_some() {
                return Err(SchemaError::DuplicatePropertyId {
                    class: name.into(),
                    id: *id,
                });
            }
        }

        let max_property_id = properties.keys().max().map_or(0, |id| id + 1);
        self.by_name.insert(
            name.to_string(),
            ClassSchema {
                class_name: name.to_string(),
                properties,
                max_property_id,
            },
        );
        visiting.pop();
        Ok(())
    }

    /// Look up a class schema by name.
    pub fn get(&self, class_name: &str) -> Option<&ClassSchema> {
        self.by_name.get(class_name)
    }

    /// All class names, in build order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Number of classes in the arena.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// True when the arena holds no classes.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(class: &str, parent: Option<&str>, props: &[(u32, &str)]) -> RawSchema {
        RawSchema {
            class_name: class.into(),
            parent: parent.map(Into::into),
            properties: props.iter().map(|(id, n)| (*id, (*n).into())).collect(),
        }
    }

    #[test]
    fn chains_through_grandparent() {
        let arena = SchemaArena::build(vec![
            raw("C", Some("B"), &[(4, "C:z")]),
            raw("A", None, &[(0, "A:x")]),
            raw("B", Some("A"), &[(1, "B:y")]),
        ])
        .unwrap();

        let c = arena.get("C").unwrap();
        assert_eq!(c.property_name(0), Some("A:x"));
        assert_eq!(c.property_name(1), Some("B:y"));
        assert_eq!(c.property_name(4), Some("C:z"));
        assert_eq!(c.max_property_id(), 5);
    }

    #[test]
    fn table_order_is_parent_first() {
        let arena = SchemaArena::build(vec![
            raw("B", Some("A"), &[(1, "B:y")]),
            raw("A", None, &[(0, "A:x")]),
        ])
        .unwrap();
        let order: Vec<u32> = arena.get("B").unwrap().properties().map(|(id, _)| id).collect();
        assert_eq!(order, [0, 1]);
    }

    #[test]
    fn empty_class_has_zero_bound() {
        let arena = SchemaArena::build(vec![raw("A", None, &[])]).unwrap();
        assert_eq!(arena.get("A").unwrap().max_property_id(), 0);
    }

    #[test]
    fn unknown_parent_rejected() {
        let err = SchemaArena::build(vec![raw("B", Some("A"), &[])]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownParent {
                class: "B".into(),
                parent: "A".into(),
            }
        );
    }

    #[test]
    fn parent_cycle_rejected() {
        let err = SchemaArena::build(vec![
            raw("A", Some("B"), &[]),
            raw("B", Some("A"), &[]),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::ParentCycle { .. }));
    }

    #[test]
    fn redeclared_id_rejected() {
        let err = SchemaArena::build(vec![
            raw("A", None, &[(0, "A:x")]),
            raw("B", Some("A"), &[(0, "B:y")]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicatePropertyId {
                class: "B".into(),
                id: 0,
            }
        );
    }

    #[test]
    fn duplicate_class_rejected() {
        let err = SchemaArena::build(vec![raw("A", None, &[]), raw("A", None, &[])]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateClass { class: "A".into() });
    }
}

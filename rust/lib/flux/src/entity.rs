use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

/// A record that can live in an `EntityState`.
pub trait Entity: Clone {
    type Id: Clone + Eq + Hash + Debug;

    fn id(&self) -> Self::Id;
}

/// Normalized entity table: an ordered id list plus an id → entity map.
///
/// Order is insertion order. Upserting an existing id keeps its position;
/// removing an id drops it from both halves.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<E: Entity> {
    ids: Vec<E::Id>,
    entities: HashMap<E::Id, E>,
}

impl<E: Entity> EntityState<E> {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            entities: HashMap::new(),
        }
    }

    /// Insert unless the id is already present. Returns whether it was added.
    pub fn add_one(&mut self, entity: E) -> bool {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return false;
        }
        self.ids.push(id.clone());
        self.entities.insert(id, entity);
        true
    }

    /// `add_one` for each entity. Returns how many were added.
    pub fn add_many(&mut self, entities: impl IntoIterator<Item = E>) -> usize {
        entities
            .into_iter()
            .map(|e| self.add_one(e))
            .filter(|added| *added)
            .count()
    }

    /// Insert, or replace an existing entity in place.
    pub fn upsert_one(&mut self, entity: E) {
        let id = entity.id();
        if self.entities.insert(id.clone(), entity).is_none() {
            self.ids.push(id);
        }
    }

    pub fn upsert_many(&mut self, entities: impl IntoIterator<Item = E>) {
        for entity in entities {
            self.upsert_one(entity);
        }
    }

    /// Apply `change` to the entity with this id. Returns `false` if absent.
    ///
    /// The change must not alter the id.
    pub fn update_one(&mut self, id: &E::Id, change: impl FnOnce(&mut E)) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                change(entity);
                debug_assert!(&entity.id() == id, "update_one changed an entity id");
                true
            }
            None => false,
        }
    }

    pub fn remove_one(&mut self, id: &E::Id) -> Option<E> {
        let removed = self.entities.remove(id)?;
        self.ids.retain(|existing| existing != id);
        Some(removed)
    }

    pub fn remove_all(&mut self) {
        self.ids.clear();
        self.entities.clear();
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &E::Id) -> Option<&mut E> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.entities.contains_key(id)
    }

    pub fn ids(&self) -> &[E::Id] {
        &self.ids
    }

    /// Entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.ids.iter().filter_map(|id| self.entities.get(id))
    }

    /// Mutable access to every entity, in no particular order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut E> + '_ {
        self.entities.values_mut()
    }

    /// Owned copies in id order.
    pub fn all(&self) -> Vec<E> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<E: Entity> Default for EntityState<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> FromIterator<E> for EntityState<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut state = Self::new();
        state.upsert_many(iter);
        state
    }
}

/// Serialized as `{"ids": [...], "entities": {id: entity, ...}}` with the
/// entity map written in id order.
impl<E> Serialize for EntityState<E>
where
    E: Entity + Serialize,
    E::Id: Serialize,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut out = serializer.serialize_struct("EntityState", 2)?;
        out.serialize_field("ids", &self.ids)?;
        out.serialize_field("entities", &Ordered(self))?;
        out.end()
    }
}

struct Ordered<'a, E: Entity>(&'a EntityState<E>);

impl<E> Serialize for Ordered<'_, E>
where
    E: Entity + Serialize,
    E::Id: Serialize,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for id in &self.0.ids {
            if let Some(entity) = self.0.entities.get(id) {
                map.serialize_entry(id, entity)?;
            }
        }
        map.end()
    }
}

use std::any::{self, Any};
use std::{iter, slice};

use xias::Xias;

use super::AnyStorage;
use crate::entity::Entity;
use crate::error::{self, Error, Result};

/// A dense array of components with an entity↔slot index in both directions.
///
/// Components always occupy slots `0..len()`,
/// so iterating over [`as_slice`](Self::as_slice) never visits a hole.
/// Removal moves the last component into the vacated slot,
/// which keeps the array dense at the cost of insertion order.
pub struct Packed<T> {
    /// The component values, indexed by slot.
    data:           Vec<T>,
    /// The owner of each slot. Always the same length as `data`.
    slot_to_entity: Vec<Entity>,
    /// The slot of each entity, indexed by entity. Has one entry per identity.
    entity_to_slot: Vec<Option<u32>>,
}

impl<T> Packed<T> {
    /// Creates a storage that can hold components for entities `0..capacity`.
    ///
    /// All backing memory is reserved here.
    pub fn new(capacity: usize) -> Self {
        Self {
            data:           Vec::with_capacity(capacity),
            slot_to_entity: Vec::with_capacity(capacity),
            entity_to_slot: vec![None; capacity],
        }
    }

    /// The maximum number of components this storage can hold.
    pub fn capacity(&self) -> usize { self.entity_to_slot.len() }

    /// The number of stored components.
    pub fn len(&self) -> usize { self.data.len() }

    /// Whether no component is stored.
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Returns the slot currently holding the component of `entity`.
    pub fn slot_of(&self, entity: Entity) -> Option<usize> {
        match self.entity_to_slot.get(entity.usize()) {
            Some(&Some(slot)) => Some(slot.small_int()),
            _ => None,
        }
    }

    /// Returns the entity owning the component at `slot`.
    pub fn entity_at(&self, slot: usize) -> Option<Entity> { self.slot_to_entity.get(slot).copied() }

    /// Whether `entity` has a component in this storage.
    pub fn contains(&self, entity: Entity) -> bool { self.slot_of(entity).is_some() }

    /// Appends the component of `entity` at the end of the dense array.
    pub fn insert(&mut self, entity: Entity, value: T) -> Result<()> {
        let capacity = self.capacity();
        let new_slot = self.data.len();

        let entry = match self.entity_to_slot.get_mut(entity.usize()) {
            Some(entry) => entry,
            None => return Err(error::reject(Error::InvalidEntity { entity, capacity })),
        };
        if entry.is_some() {
            return Err(error::reject(Error::DuplicateComponent {
                entity,
                component: any::type_name::<T>(),
            }));
        }

        *entry = Some(new_slot.small_int());
        self.slot_to_entity.push(entity);
        self.data.push(value);
        Ok(())
    }

    /// Removes and returns the component of `entity`.
    ///
    /// The component in the last slot is moved into the vacated slot.
    pub fn remove(&mut self, entity: Entity) -> Result<T> {
        let slot = match self.slot_of(entity) {
            Some(slot) => slot,
            None => return Err(Self::missing(entity)),
        };

        let last = *self.slot_to_entity.last().expect("entity has a slot, so storage is nonempty");

        let value = self.data.swap_remove(slot);
        self.slot_to_entity.swap_remove(slot);

        // `last` may be `entity` itself, so repoint it before erasing `entity`.
        *self.entity_to_slot.get_mut(last.usize()).expect("slot owner is in range") =
            Some(slot.small_int());
        *self.entity_to_slot.get_mut(entity.usize()).expect("slot_of checked range") = None;

        Ok(value)
    }

    /// Gets a shared reference to the component of `entity`.
    pub fn get(&self, entity: Entity) -> Result<&T> {
        match self.slot_of(entity) {
            Some(slot) => Ok(self.data.get(slot).expect("slot index is within data")),
            None => Err(Self::missing(entity)),
        }
    }

    /// Gets a mutable reference to the component of `entity`.
    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T> {
        match self.slot_of(entity) {
            Some(slot) => Ok(self.data.get_mut(slot).expect("slot index is within data")),
            None => Err(Self::missing(entity)),
        }
    }

    /// The components in slot order.
    pub fn as_slice(&self) -> &[T] { &self.data }

    /// The components in slot order.
    pub fn as_mut_slice(&mut self) -> &mut [T] { &mut self.data }

    /// The owners of the components in slot order.
    pub fn entities(&self) -> &[Entity] { &self.slot_to_entity }

    /// The owners and the components in slot order,
    /// with mutable access to the components only.
    pub fn split_mut(&mut self) -> (&[Entity], &mut [T]) { (&self.slot_to_entity, &mut self.data) }

    /// Iterates over `(owner, component)` pairs in slot order.
    pub fn iter(&self) -> iter::Zip<iter::Copied<slice::Iter<'_, Entity>>, slice::Iter<'_, T>> {
        self.slot_to_entity.iter().copied().zip(self.data.iter())
    }

    /// Iterates over `(owner, component)` pairs in slot order.
    pub fn iter_mut(
        &mut self,
    ) -> iter::Zip<iter::Copied<slice::Iter<'_, Entity>>, slice::IterMut<'_, T>> {
        self.slot_to_entity.iter().copied().zip(self.data.iter_mut())
    }

    fn missing(entity: Entity) -> Error {
        error::reject(Error::MissingComponent { entity, component: any::type_name::<T>() })
    }
}

impl<T: Send + Sync + 'static> AnyStorage for Packed<T> {
    fn on_entity_destroyed(&mut self, entity: Entity) {
        if self.contains(entity) {
            let _ = self.remove(entity);
        }
    }

    fn contains(&self, entity: Entity) -> bool { Packed::contains(self, entity) }

    fn len(&self) -> usize { Packed::len(self) }

    fn component_name(&self) -> &'static str { any::type_name::<T>() }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}

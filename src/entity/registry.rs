use bitvec::prelude::BitVec;
use xias::Xias;

use super::{Ealloc, Entity};
use crate::error::{self, Error, Result};
use crate::Signature;

/// Owns the identity pool and the signature of every entity.
#[derive(Debug)]
pub struct Registry {
    ealloc:     Ealloc,
    /// Indexed by entity. Dead entities always have an empty signature.
    signatures: Vec<Signature>,
    /// Indexed by entity.
    alive:      BitVec,
}

impl Registry {
    /// Creates a registry for `max_entities` entities
    /// whose signatures are `max_component_kinds` bits wide.
    pub fn new(max_entities: u32, max_component_kinds: usize) -> Self {
        let capacity: usize = max_entities.small_int();
        Self {
            ealloc:     Ealloc::new(max_entities),
            signatures: vec![Signature::new(max_component_kinds); capacity],
            alive:      BitVec::repeat(false, capacity),
        }
    }

    /// Allocates a new entity with an empty signature.
    pub fn create(&mut self) -> Result<Entity> {
        let entity = self.ealloc.allocate()?;
        self.alive.set(entity.usize(), true);
        log::trace!("allocated entity {entity}");
        Ok(entity)
    }

    /// Clears the signature of `entity` and returns it to the pool.
    ///
    /// This does not purge components or tracked sets;
    /// use [`World::destroy_entity`](crate::World::destroy_entity) for that.
    pub fn destroy(&mut self, entity: Entity) -> Result<()> {
        let index = self.check_alive(entity)?;

        self.signatures.get_mut(index).expect("signatures has one entry per identity").clear();
        self.alive.set(index, false);
        self.ealloc.deallocate(entity);
        log::trace!("deallocated entity {entity}");
        Ok(())
    }

    /// Overwrites the signature of `entity`.
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> Result<()> {
        let index = self.check_range(entity)?;
        *self.signatures.get_mut(index).expect("signatures has one entry per identity") = signature;
        Ok(())
    }

    /// Returns the signature of `entity`.
    pub fn signature(&self, entity: Entity) -> Result<&Signature> {
        let index = self.check_range(entity)?;
        Ok(self.signatures.get(index).expect("signatures has one entry per identity"))
    }

    /// Whether `entity` is currently allocated.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.usize()).map_or(false, |bit| *bit)
    }

    /// The number of live entities.
    pub fn len(&self) -> usize { self.ealloc.live() }

    /// Whether no entity is alive.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// The maximum number of live entities.
    pub fn capacity(&self) -> usize { self.ealloc.capacity() }

    /// Iterates over live entities in index order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.iter_ones().map(|index| Entity::new(index.small_int()))
    }

    /// Iterates over live entities and their signatures in index order.
    pub fn iter_signatures(&self) -> impl Iterator<Item = (Entity, &Signature)> + '_ {
        self.iter().map(|entity| {
            let signature =
                self.signatures.get(entity.usize()).expect("signatures has one entry per identity");
            (entity, signature)
        })
    }

    /// Returns the index of `entity`, or `InvalidEntity` if it is out of range.
    pub(crate) fn check_range(&self, entity: Entity) -> Result<usize> {
        let index = entity.usize();
        if index < self.capacity() {
            Ok(index)
        } else {
            Err(error::reject(Error::InvalidEntity { entity, capacity: self.capacity() }))
        }
    }

    /// Like [`check_range`](Self::check_range), but also rejects dead entities.
    pub(crate) fn check_alive(&self, entity: Entity) -> Result<usize> {
        let index = self.check_range(entity)?;
        if self.is_alive(entity) {
            Ok(index)
        } else {
            Err(error::reject(Error::DeadEntity(entity)))
        }
    }
}

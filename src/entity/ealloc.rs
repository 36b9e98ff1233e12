//! Manages entity ID allocation and deallocation.

use std::collections::VecDeque;

use xias::Xias;

use super::Entity;
use crate::error::{self, Error, Result};

/// A FIFO pool of entity identities.
///
/// The queue is seeded with every index in `0..capacity`.
/// Freed identities go to the back of the queue,
/// so the identity freed most recently is reused last.
#[derive(Debug)]
pub struct Ealloc {
    /// Identities available for allocation, in allocation order.
    available: VecDeque<Entity>,
    /// The total number of identities.
    capacity:  usize,
}

impl Ealloc {
    /// Creates a pool holding `capacity` identities.
    pub fn new(capacity: u32) -> Self {
        Self { available: (0..capacity).map(Entity::new).collect(), capacity: capacity.small_int() }
    }

    /// Takes the identity at the front of the queue.
    pub fn allocate(&mut self) -> Result<Entity> {
        match self.available.pop_front() {
            Some(entity) => Ok(entity),
            None => Err(error::reject(Error::CapacityExceeded { capacity: self.capacity })),
        }
    }

    /// Returns an identity to the back of the queue.
    ///
    /// The caller must ensure `entity` is currently allocated.
    pub fn deallocate(&mut self, entity: Entity) {
        debug_assert!(entity.usize() < self.capacity, "{entity} was not allocated by this pool");
        self.available.push_back(entity);
    }

    /// The number of allocated identities.
    pub fn live(&self) -> usize { self.capacity - self.available.len() }

    /// The total number of identities.
    pub fn capacity(&self) -> usize { self.capacity }
}

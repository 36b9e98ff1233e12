use std::any;

use indexmap::IndexMap;
use xias::Xias;

use super::{Component, Kind};
use crate::entity::Entity;
use crate::error::{self, Error, Result};
use crate::storage::{AnyStorage, Packed};
use crate::util::DbgTypeId;

/// Assigns kinds to component types and owns one storage per kind.
///
/// The storages are kept in registration order,
/// so the index of a storage in the map is its [`Kind`].
pub struct Registry {
    storages:            IndexMap<DbgTypeId, Box<dyn AnyStorage>>,
    max_entities:        usize,
    max_component_kinds: usize,
}

impl Registry {
    /// Creates an empty registry.
    ///
    /// Each storage created by this registry holds up to `max_entities` components,
    /// and at most `max_component_kinds` types can be registered.
    pub fn new(max_entities: usize, max_component_kinds: usize) -> Self {
        Self { storages: IndexMap::new(), max_entities, max_component_kinds }
    }

    /// Assigns the next kind to `T` and creates its storage.
    pub fn register<T: Component>(&mut self) -> Result<Kind> {
        let ty = DbgTypeId::of::<T>();
        if self.storages.contains_key(&ty) {
            return Err(error::reject(Error::AlreadyRegistered(ty.name)));
        }
        if self.storages.len() >= self.max_component_kinds {
            return Err(error::reject(Error::TooManyKinds { limit: self.max_component_kinds }));
        }

        let storage: Box<dyn AnyStorage> = Box::new(Packed::<T>::new(self.max_entities));
        let (index, _) = self.storages.insert_full(ty, storage);
        let kind = Kind::new(index.small_int());
        log::debug!("registered component {ty} as {kind}");
        Ok(kind)
    }

    /// Returns the kind assigned to `T`.
    pub fn kind<T: Component>(&self) -> Result<Kind> {
        match self.storages.get_index_of(&DbgTypeId::of::<T>()) {
            Some(index) => Ok(Kind::new(index.small_int())),
            None => Err(not_registered::<T>()),
        }
    }

    /// The number of registered kinds.
    pub fn len(&self) -> usize { self.storages.len() }

    /// Whether no kind is registered.
    pub fn is_empty(&self) -> bool { self.storages.is_empty() }

    /// The maximum number of kinds.
    pub fn max_component_kinds(&self) -> usize { self.max_component_kinds }

    /// Returns the storage of `T`.
    pub fn storage<T: Component>(&self) -> Result<&Packed<T>> {
        match self.storages.get(&DbgTypeId::of::<T>()) {
            Some(storage) => {
                Ok(storage.as_any().downcast_ref::<Packed<T>>().expect("TypeId mismatch"))
            }
            None => Err(not_registered::<T>()),
        }
    }

    /// Returns the storage of `T`.
    pub fn storage_mut<T: Component>(&mut self) -> Result<&mut Packed<T>> {
        match self.storages.get_mut(&DbgTypeId::of::<T>()) {
            Some(storage) => {
                Ok(storage.as_any_mut().downcast_mut::<Packed<T>>().expect("TypeId mismatch"))
            }
            None => Err(not_registered::<T>()),
        }
    }

    /// Returns the type-erased storage of `kind`.
    pub fn storage_of(&self, kind: Kind) -> Option<&dyn AnyStorage> {
        self.storages.get_index(kind.usize()).map(|(_, storage)| &**storage)
    }

    /// Adds a component to `entity`, returning the kind of `T`.
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> Result<Kind> {
        let kind = self.kind::<T>()?;
        self.storage_mut::<T>()?.insert(entity, value)?;
        Ok(kind)
    }

    /// Removes the `T` component of `entity`, returning it along with the kind of `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<(Kind, T)> {
        let kind = self.kind::<T>()?;
        let value = self.storage_mut::<T>()?.remove(entity)?;
        Ok((kind, value))
    }

    /// Gets the `T` component of `entity`.
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T> { self.storage::<T>()?.get(entity) }

    /// Gets the `T` component of `entity` mutably.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Removes all components of `entity` from every storage.
    pub fn on_entity_destroyed(&mut self, entity: Entity) {
        for storage in self.storages.values_mut() {
            if storage.contains(entity) {
                log::trace!("dropping {} of {entity}", storage.component_name());
            }
            storage.on_entity_destroyed(entity);
        }
    }
}

fn not_registered<T: Component>() -> Error {
    error::reject(Error::NotRegistered(any::type_name::<T>()))
}

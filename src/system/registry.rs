use std::any::{self, Any};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use super::{Handle, System, Tracked};
use crate::entity::Entity;
use crate::error::{self, Error, Result};
use crate::util::DbgTypeId;
use crate::Signature;

/// The bookkeeping for one registered system.
struct Record {
    required: Signature,
    tracked:  Tracked,
    /// The `Arc<Mutex<S>>` of the system, for [`Registry::handle`].
    instance: Box<dyn Any + Send>,
}

/// Owns every registered system along with its required signature and tracked set.
pub struct Registry {
    systems: IndexMap<DbgTypeId, Record>,
    width:   usize,
}

impl Registry {
    /// Creates an empty registry whose default signatures are `width` bits wide.
    pub fn new(width: usize) -> Self { Self { systems: IndexMap::new(), width } }

    /// Stores `system`, initially requiring the empty signature and tracking nothing.
    pub fn register<S: System>(&mut self, system: S) -> Result<Handle<S>> {
        let ty = DbgTypeId::of::<S>();
        if self.systems.contains_key(&ty) {
            return Err(error::reject(Error::AlreadyRegistered(ty.name)));
        }

        let handle = Handle::new(system);
        self.systems.insert(ty, Record {
            required: Signature::new(self.width),
            tracked:  handle.tracked().clone(),
            instance: Box::new(Arc::clone(handle.shared())),
        });
        log::debug!("registered system {ty}");
        Ok(handle)
    }

    /// Returns another handle to the registered system `S`.
    pub fn handle<S: System>(&self) -> Result<Handle<S>> {
        let record = self.record::<S>()?;
        let system = record
            .instance
            .downcast_ref::<Arc<Mutex<S>>>()
            .expect("TypeId mismatch");
        Ok(Handle::from_parts(Arc::clone(system), record.tracked.clone()))
    }

    /// Sets the signature that entities must cover to be tracked by `S`.
    ///
    /// The tracked set is not recomputed;
    /// see [`retrack`](Self::retrack).
    pub fn set_signature<S: System>(&mut self, signature: Signature) -> Result<()> {
        let record = self.record_mut::<S>()?;
        log::debug!("system {} requires {signature:?}", any::type_name::<S>());
        record.required = signature;
        Ok(())
    }

    /// Returns the signature required by `S`.
    pub fn signature<S: System>(&self) -> Result<&Signature> {
        Ok(&self.record::<S>()?.required)
    }

    /// Rebuilds the tracked set of `S` from scratch.
    pub fn retrack<'t, S: System>(
        &self,
        entities: impl IntoIterator<Item = (Entity, &'t Signature)>,
    ) -> Result<()> {
        let record = self.record::<S>()?;
        record.tracked.clear();
        for (entity, signature) in entities {
            if signature.matches(&record.required) {
                record.tracked.insert(entity);
            }
        }
        Ok(())
    }

    /// The number of registered systems.
    pub fn len(&self) -> usize { self.systems.len() }

    /// Whether no system is registered.
    pub fn is_empty(&self) -> bool { self.systems.is_empty() }

    /// Removes `entity` from every tracked set.
    pub fn on_entity_destroyed(&self, entity: Entity) {
        for record in self.systems.values() {
            record.tracked.remove(entity);
        }
    }

    /// Adds `entity` to the tracked set of every system whose signature it covers,
    /// and removes it from all others.
    pub fn on_entity_signature_changed(&self, entity: Entity, signature: &Signature) {
        for (ty, record) in &self.systems {
            if signature.matches(&record.required) {
                if record.tracked.insert(entity) {
                    log::trace!("{ty} starts tracking {entity}");
                }
            } else if record.tracked.remove(entity) {
                log::trace!("{ty} stops tracking {entity}");
            }
        }
    }

    fn record<S: System>(&self) -> Result<&Record> {
        match self.systems.get(&DbgTypeId::of::<S>()) {
            Some(record) => Ok(record),
            None => Err(error::reject(Error::NotRegistered(any::type_name::<S>()))),
        }
    }

    fn record_mut<S: System>(&mut self) -> Result<&mut Record> {
        match self.systems.get_mut(&DbgTypeId::of::<S>()) {
            Some(record) => Ok(record),
            None => Err(error::reject(Error::NotRegistered(any::type_name::<S>()))),
        }
    }
}

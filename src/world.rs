//! The world is the single integration point for entities, components and systems.
//!
//! Callers never touch the entity, component and system registries directly.
//! Every structural change goes through [`World`],
//! which keeps the three registries consistent:
//! the signature of an entity always has the bit of a kind set
//! exactly when the storage of that kind holds a component for the entity,
//! and every system tracks exactly the live entities whose signature covers its own.

use xias::Xias;

use crate::comp::{self, Component, Kind};
use crate::entity::{self, Entity};
use crate::error::Result;
use crate::event::{self, Event, EventId};
use crate::storage::Packed;
use crate::system::{self, System};
use crate::Signature;

mod builder;
pub use builder::{Builder, DEFAULT_MAX_COMPONENT_KINDS, DEFAULT_MAX_ENTITIES};

#[cfg(test)]
mod tests;

/// A bundle encapsulates the components, systems and entities of a specific feature.
/// This can be used by library crates to expose their features as a single API.
pub trait Bundle {
    /// Registers the component and system types used by this bundle.
    fn register(&self, _world: &mut World) -> Result<()> { Ok(()) }

    /// Populates the world with entities.
    ///
    /// This is called after every bundle has been registered.
    fn populate(&self, _world: &mut World) -> Result<()> { Ok(()) }
}

/// Creates a world with the default capacities from bundles.
pub fn new<'t>(bundles: impl IntoIterator<Item = &'t dyn Bundle> + Copy) -> Result<World> {
    Builder::default().build_with(bundles)
}

/// The data structure that stores all entities, components and systems.
pub struct World {
    /// Identity pool and per-entity signatures.
    entities:   entity::Registry,
    /// One packed storage per component kind.
    components: comp::Registry,
    /// Registered systems and their tracked sets.
    systems:    system::Registry,
    /// Listeners for application events.
    events:     event::Bus,
}

#[cfg(test)]
static_assertions::assert_impl_all!(World: Send);

impl Default for World {
    fn default() -> Self { Builder::default().build() }
}

impl World {
    /// Creates an empty world with the default capacities.
    pub fn new() -> Self { Self::default() }

    pub(crate) fn with_capacity(max_entities: u32, max_component_kinds: usize) -> Self {
        Self {
            entities:   entity::Registry::new(max_entities, max_component_kinds),
            components: comp::Registry::new(max_entities.small_int(), max_component_kinds),
            systems:    system::Registry::new(max_component_kinds),
            events:     event::Bus::default(),
        }
    }

    // Entities

    /// Creates an entity without components.
    pub fn create_entity(&mut self) -> Result<Entity> {
        let entity = self.entities.create()?;
        // systems requiring nothing track every entity, including bare ones
        self.systems.on_entity_signature_changed(entity, self.entities.signature(entity)?);
        Ok(entity)
    }

    /// Destroys an entity along with all its components.
    ///
    /// The identity is recycled only after the entity has left every storage and tracked set.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<()> {
        self.entities.check_alive(entity)?;

        self.components.on_entity_destroyed(entity);
        self.systems.on_entity_destroyed(entity);
        self.entities.destroy(entity)
    }

    /// Whether `entity` is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool { self.entities.is_alive(entity) }

    /// The number of live entities.
    pub fn entity_count(&self) -> usize { self.entities.len() }

    /// Iterates over live entities in index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ { self.entities.iter() }

    /// The maximum number of live entities.
    pub fn max_entities(&self) -> usize { self.entities.capacity() }

    /// Returns the signature of `entity`.
    pub fn signature(&self, entity: Entity) -> Result<&Signature> { self.entities.signature(entity) }

    // Components

    /// Registers a component type, returning its kind.
    pub fn register_component<T: Component>(&mut self) -> Result<Kind> {
        self.components.register::<T>()
    }

    /// Returns the kind of a registered component type.
    pub fn component_kind<T: Component>(&self) -> Result<Kind> { self.components.kind::<T>() }

    /// The number of registered component types.
    pub fn component_kind_count(&self) -> usize { self.components.len() }

    /// Attaches a component to `entity`.
    ///
    /// Fails if `entity` is dead or already has a `T` component.
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> Result<()> {
        self.entities.check_alive(entity)?;

        let kind = self.components.add(entity, value)?;
        log::trace!("added {kind} to {entity}");

        let mut signature = self.entities.signature(entity)?.clone();
        signature.set(kind);
        self.update_signature(entity, signature)
    }

    /// Detaches the `T` component from `entity` and returns it.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<T> {
        self.entities.check_alive(entity)?;

        let (kind, value) = self.components.remove::<T>(entity)?;
        log::trace!("removed {kind} from {entity}");

        let mut signature = self.entities.signature(entity)?.clone();
        signature.reset(kind);
        self.update_signature(entity, signature)?;
        Ok(value)
    }

    fn update_signature(&mut self, entity: Entity, signature: Signature) -> Result<()> {
        self.entities.set_signature(entity, signature)?;
        self.systems.on_entity_signature_changed(entity, self.entities.signature(entity)?);
        Ok(())
    }

    /// Gets the `T` component of `entity`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T> {
        self.components.get::<T>(entity)
    }

    /// Gets the `T` component of `entity` mutably.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T> {
        self.components.get_mut::<T>(entity)
    }

    /// Whether `entity` has a `T` component.
    pub fn has_component<T: Component>(&self, entity: Entity) -> Result<bool> {
        Ok(self.components.storage::<T>()?.contains(entity))
    }

    /// Returns the storage of `T` for dense iteration.
    pub fn storage<T: Component>(&self) -> Result<&Packed<T>> { self.components.storage::<T>() }

    /// Returns the owners and values of all `T` components in storage order,
    /// with mutable access to the values.
    pub fn components_mut<T: Component>(&mut self) -> Result<(&[Entity], &mut [T])> {
        Ok(self.components.storage_mut::<T>()?.split_mut())
    }

    /// Returns a signature with no kind set.
    pub fn empty_signature(&self) -> Signature {
        Signature::new(self.components.max_component_kinds())
    }

    /// Returns the signature containing every type in `C`.
    ///
    /// ```
    /// # fn main() -> nexus_ecs::error::Result<()> {
    /// #[derive(Default)]
    /// struct Position([f32; 3]);
    /// #[derive(Default)]
    /// struct Velocity([f32; 3]);
    ///
    /// let mut world = nexus_ecs::World::new();
    /// let position = world.register_component::<Position>()?;
    /// let velocity = world.register_component::<Velocity>()?;
    ///
    /// let signature = world.signature_of::<(Position, Velocity)>()?;
    /// assert!(signature.contains(position) && signature.contains(velocity));
    /// # Ok(())
    /// # }
    /// ```
    pub fn signature_of<C: comp::Set>(&self) -> Result<Signature> {
        let mut signature = self.empty_signature();
        C::add_to(&self.components, &mut signature)?;
        Ok(signature)
    }

    /// The maximum number of component kinds.
    pub fn max_component_kinds(&self) -> usize { self.components.max_component_kinds() }

    // Systems

    /// Registers a default-constructed system.
    pub fn register_system<S: System + Default>(&mut self) -> Result<system::Handle<S>> {
        self.register_system_with(S::default())
    }

    /// Registers a system instance.
    ///
    /// The system initially requires the empty signature,
    /// so it tracks every live entity until its signature is set.
    pub fn register_system_with<S: System>(&mut self, system: S) -> Result<system::Handle<S>> {
        let handle = self.systems.register(system)?;
        self.systems.retrack::<S>(self.entities.iter_signatures())?;
        Ok(handle)
    }

    /// Sets the signature required by `S` and recomputes its tracked set.
    pub fn set_system_signature<S: System>(&mut self, signature: Signature) -> Result<()> {
        self.systems.set_signature::<S>(signature)?;
        self.systems.retrack::<S>(self.entities.iter_signatures())
    }

    /// Sets the signature required by `S` to the kinds of `C`.
    pub fn set_system_signature_of<S: System, C: comp::Set>(&mut self) -> Result<()> {
        let signature = self.signature_of::<C>()?;
        self.set_system_signature::<S>(signature)
    }

    /// Returns the signature required by `S`.
    pub fn system_signature<S: System>(&self) -> Result<&Signature> {
        self.systems.signature::<S>()
    }

    /// Returns another handle to the registered system `S`.
    pub fn system<S: System>(&self) -> Result<system::Handle<S>> { self.systems.handle::<S>() }

    // Events

    /// Registers a listener for events with ID `id`.
    pub fn add_event_listener(&mut self, id: EventId, listener: impl FnMut(&Event) + Send + 'static) {
        self.events.add_listener(id, listener);
    }

    /// Sends an event to its listeners.
    pub fn send_event(&mut self, event: &Event) { self.events.send(event); }

    /// Sends a parameterless event to its listeners.
    pub fn send_event_id(&mut self, id: EventId) { self.events.send_id(id); }
}

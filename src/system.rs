//! Systems are actions performed every frame on the entities that own a set of components.
//!
//! Each system type is registered once and is given a required [`Signature`](crate::Signature).
//! The world keeps a [`Tracked`] set for each system,
//! containing exactly the live entities whose signature covers the required one.
//! A system learns which entities to process only through this set;
//! it reads and writes component values through the [`World`].
//!
//! The world never calls systems by itself.
//! The main loop calls [`Handle::init`] once and [`Handle::update`] every frame.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::entity::Entity;
use crate::error::Result;
use crate::World;

mod registry;
pub use registry::Registry;


/// A behavior unit run by the main loop.
pub trait System: Send + 'static {
    /// Called once after the system is registered and its signature is set.
    fn init(&mut self, _world: &mut World) -> Result<()> { Ok(()) }

    /// Called once per frame.
    ///
    /// `entities` are the entities tracked by this system when the update started,
    /// in ascending order.
    /// `dt` is the time elapsed since the previous frame, in seconds.
    fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32) -> Result<()>;
}

/// The set of entities currently matching a system's signature.
///
/// Cloning a `Tracked` shares the underlying set.
#[derive(Debug, Clone, Default)]
pub struct Tracked(Arc<RwLock<BTreeSet<Entity>>>);

impl Tracked {
    pub(crate) fn insert(&self, entity: Entity) -> bool { self.0.write().insert(entity) }

    pub(crate) fn remove(&self, entity: Entity) -> bool { self.0.write().remove(&entity) }

    pub(crate) fn clear(&self) { self.0.write().clear(); }

    /// Whether `entity` is tracked.
    pub fn contains(&self, entity: Entity) -> bool { self.0.read().contains(&entity) }

    /// The number of tracked entities.
    pub fn len(&self) -> usize { self.0.read().len() }

    /// Whether no entity is tracked.
    pub fn is_empty(&self) -> bool { self.0.read().is_empty() }

    /// Copies the tracked entities in ascending order.
    pub fn snapshot(&self) -> Vec<Entity> { self.0.read().iter().copied().collect() }
}

/// A shared handle to a registered system.
///
/// The handle is how the main loop drives the system.
pub struct Handle<S> {
    system:  Arc<Mutex<S>>,
    tracked: Tracked,
}

impl<S> Clone for Handle<S> {
    fn clone(&self) -> Self {
        Self { system: Arc::clone(&self.system), tracked: self.tracked.clone() }
    }
}

impl<S: System> Handle<S> {
    pub(crate) fn new(system: S) -> Self {
        Self { system: Arc::new(Mutex::new(system)), tracked: Tracked::default() }
    }

    pub(crate) fn shared(&self) -> &Arc<Mutex<S>> { &self.system }

    pub(crate) fn from_parts(system: Arc<Mutex<S>>, tracked: Tracked) -> Self {
        Self { system, tracked }
    }

    /// Runs [`System::init`].
    pub fn init(&self, world: &mut World) -> Result<()> { self.system.lock().init(world) }

    /// Runs [`System::update`] over the entities tracked at this moment.
    ///
    /// The system may create, destroy and modify entities during the update.
    /// Such changes apply to the tracked set immediately,
    /// but the entity list passed to this update is not affected.
    pub fn update(&self, world: &mut World, dt: f32) -> Result<()> {
        let entities = self.tracked.snapshot();
        self.system.lock().update(world, &entities, dt)
    }

    /// Locks the system for direct access to its state.
    ///
    /// The returned guard must be dropped before calling [`init`](Self::init) or
    /// [`update`](Self::update), otherwise the call deadlocks.
    pub fn lock(&self) -> MutexGuard<'_, S> { self.system.lock() }

    /// The entities tracked by this system.
    pub fn tracked(&self) -> &Tracked { &self.tracked }

    /// Copies the tracked entities in ascending order.
    pub fn entities(&self) -> Vec<Entity> { self.tracked.snapshot() }

    /// Whether `entity` is tracked by this system.
    pub fn contains(&self, entity: Entity) -> bool { self.tracked.contains(entity) }

    /// The number of tracked entities.
    pub fn len(&self) -> usize { self.tracked.len() }

    /// Whether no entity is tracked.
    pub fn is_empty(&self) -> bool { self.tracked.is_empty() }
}

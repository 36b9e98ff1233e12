//! A storage is the data structure where components of the same type for all entities are stored.

use std::any::Any;

use crate::entity::Entity;

mod packed;
pub use packed::Packed;

#[cfg(test)]
mod tests;

/// The type-erased view of a [`Packed`] storage.
///
/// The component registry holds one storage per kind behind this trait,
/// so that entity destruction can be broadcast without knowing the component types.
pub trait AnyStorage: Send + Sync + 'static {
    /// Removes the component of `entity` if it has one; does nothing otherwise.
    fn on_entity_destroyed(&mut self, entity: Entity);

    /// Whether `entity` has a component in this storage.
    fn contains(&self, entity: Entity) -> bool;

    /// The number of components in this storage.
    fn len(&self) -> usize;

    /// Whether the storage is empty.
    fn is_empty(&self) -> bool { self.len() == 0 }

    /// The name of the component type, for diagnostics.
    fn component_name(&self) -> &'static str;

    /// Upcasts to [`Any`] for downcasting to the concrete storage.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to [`Any`] for downcasting to the concrete storage.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

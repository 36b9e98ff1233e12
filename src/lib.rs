//! A small entity-component-system registry.
//!
//! # What is ECS?
//! ECS is a data-oriented programming paradigm that focuses on optimizing the CPU cache.
//! Objects ("Entities") store their data in "Components",
//! which are processed in "Systems".
//!
//! # Entities
//! An [`Entity`] is just an integer in `0..max_entities`.
//! Identities are handed out from a first-in-first-out pool,
//! so a destroyed identity is reused only after every identity freed before it.
//! Entities carry no generation counter:
//! holding an entity after destroying it is a logic error,
//! and the world cannot tell it apart from a newer entity that reused the identity.
//!
//! # Components
//! Any `Send + Sync + 'static` type can be a component once it is registered.
//! Registration assigns the type a [`Kind`](comp::Kind),
//! which is its bit position in the [`Signature`] of every entity.
//! Components of the same type are stored contiguously in a [`Packed`](storage::Packed) storage,
//! so iterating over all positions of the world walks a single slice.
//! Removing a component moves the last component of the storage into the freed slot,
//! so storage order is not insertion order.
//!
//! # Systems
//! A [`System`] declares the signature it requires.
//! The world tracks, for each system,
//! the set of live entities whose signature covers the required one.
//! This set is updated eagerly on every component change,
//! so a system never needs to query the storages to find its entities.
//!
//! ```
//! use nexus_ecs::{Entity, System, World};
//!
//! #[derive(Debug, Default)]
//! struct Position([f32; 3]);
//! #[derive(Debug, Default)]
//! struct Velocity([f32; 3]);
//!
//! #[derive(Default)]
//! struct Movement;
//!
//! impl System for Movement {
//!     fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32) -> nexus_ecs::Result<()> {
//!         for &entity in entities {
//!             let velocity = world.get_component::<Velocity>(entity)?.0;
//!             let position = world.get_component_mut::<Position>(entity)?;
//!             for i in 0..3 {
//!                 position.0[i] += velocity[i] * dt;
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> nexus_ecs::Result<()> {
//! let mut world = World::new();
//! world.register_component::<Position>()?;
//! world.register_component::<Velocity>()?;
//! let movement = world.register_system::<Movement>()?;
//! world.set_system_signature_of::<Movement, (Position, Velocity)>()?;
//!
//! let ball = world.create_entity()?;
//! world.add_component(ball, Position::default())?;
//! world.add_component(ball, Velocity([1.0, 0.0, 0.0]))?;
//!
//! movement.update(&mut world, 0.5)?;
//! assert_eq!(world.get_component::<Position>(ball)?.0, [0.5, 0.0, 0.0]);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(doc, warn(missing_docs))]

pub mod comp;
pub use comp::Component;

pub mod entity;
pub use entity::Entity;

pub mod error;
pub use error::{Error, Result};

pub mod event;

pub mod signature;
pub use signature::Signature;

pub mod storage;

pub mod system;
pub use system::System;

#[cfg(any(test, feature = "internal-bench"))]
pub mod test_util;

pub mod world;
pub use world::{new, Builder, Bundle, World};

pub mod util;

//! Shared fixtures for unit tests and benchmarks.

#![allow(missing_docs)]

use parking_lot::Once;

use crate::entity::Entity;
use crate::error::Result;
use crate::system::System;
use crate::world::{self, World};

/// Initializes the logger once per test binary.
pub fn init() {
    static SET_LOGGER_ONCE: Once = Once::new();
    SET_LOGGER_ONCE.call_once(env_logger::init);
}

/// Builds a world with small capacities.
pub fn world(max_entities: u32) -> World {
    init();
    world::Builder::default().max_entities(max_entities).max_component_kinds(8).build()
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub [f32; 3]);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub [f32; 3]);

/// A family of distinct component types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompN<const N: usize>(pub i32);

/// Moves every tracked entity by its velocity.
#[derive(Default)]
pub struct Integrate {
    pub frames: usize,
}

impl System for Integrate {
    fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32) -> Result<()> {
        for &entity in entities {
            let velocity = *world.get_component::<Velocity>(entity)?;
            let position = world.get_component_mut::<Position>(entity)?;
            for (p, v) in position.0.iter_mut().zip(velocity.0) {
                *p += v * dt;
            }
        }
        self.frames += 1;
        Ok(())
    }
}

/// Remembers the entities passed to the last update.
#[derive(Default)]
pub struct Recorder {
    pub initialized: bool,
    pub last_seen:   Vec<Entity>,
}

impl System for Recorder {
    fn init(&mut self, _world: &mut World) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn update(&mut self, _world: &mut World, entities: &[Entity], _dt: f32) -> Result<()> {
        self.last_seen = entities.to_vec();
        Ok(())
    }
}

/// Destroys every tracked entity during its update.
#[derive(Default)]
pub struct Reaper;

impl System for Reaper {
    fn update(&mut self, world: &mut World, entities: &[Entity], _dt: f32) -> Result<()> {
        for &entity in entities {
            world.destroy_entity(entity)?;
        }
        Ok(())
    }
}

use super::{Bundle, World};
use crate::error::Result;

/// The default maximum number of live entities.
pub const DEFAULT_MAX_ENTITIES: u32 = 5000;

/// The default maximum number of component kinds, i.e. the width of a signature.
pub const DEFAULT_MAX_COMPONENT_KINDS: usize = 32;

/// Configures the capacities of a world.
///
/// Capacities are fixed once the world is built:
/// every storage reserves `max_entities` slots up front.
#[derive(Debug, Clone)]
pub struct Builder {
    max_entities:        u32,
    max_component_kinds: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            max_entities:        DEFAULT_MAX_ENTITIES,
            max_component_kinds: DEFAULT_MAX_COMPONENT_KINDS,
        }
    }
}

impl Builder {
    /// Sets the size of the entity identity pool.
    #[must_use]
    pub fn max_entities(mut self, max_entities: u32) -> Self {
        self.max_entities = max_entities;
        self
    }

    /// Sets the maximum number of component types that can be registered.
    #[must_use]
    pub fn max_component_kinds(mut self, max_component_kinds: usize) -> Self {
        self.max_component_kinds = max_component_kinds;
        self
    }

    /// Constructs an empty world.
    pub fn build(self) -> World {
        log::debug!(
            "building world with {} entities and {} component kinds",
            self.max_entities,
            self.max_component_kinds
        );
        World::with_capacity(self.max_entities, self.max_component_kinds)
    }

    /// Constructs a world from bundles.
    ///
    /// All bundles are registered before any bundle populates the world.
    pub fn build_with<'t>(
        self,
        bundles: impl IntoIterator<Item = &'t dyn Bundle> + Copy,
    ) -> Result<World> {
        let mut world = self.build();

        for bundle in bundles {
            bundle.register(&mut world)?;
        }

        for bundle in bundles {
            bundle.populate(&mut world)?;
        }

        Ok(world)
    }
}

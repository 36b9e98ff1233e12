//! An entity is a single simulated object that owns components.
//!
//! Entities carry no data themselves.
//! An entity is just an index into the fixed-capacity identity pool,
//! unique while alive and recycled after destruction.

use std::fmt;

use xias::Xias;

pub mod ealloc;
pub use ealloc::Ealloc;

mod registry;
pub use registry::Registry;


/// An opaque entity identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    pub(crate) fn new(index: u32) -> Self { Self(index) }

    /// The raw index of this entity in the identity pool.
    pub fn index(self) -> u32 { self.0 }

    pub(crate) fn usize(self) -> usize { self.0.small_int() }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

//! A component is a plain data value that can be attached to an entity.
//!
//! # Registration
//! Every component type must be registered with
//! [`World::register_component`](crate::World::register_component) before use.
//! Registration assigns the type a [`Kind`],
//! which is the bit position of the type in every [`Signature`].
//! Kinds are assigned in registration order and are never reused.
//!
//! # Storage
//! All components of the same type are stored together in a [`Packed`](crate::storage::Packed)
//! storage, which keeps them contiguous regardless of insertion and removal order.
//!
//! Each entity can have at most one component of each type.

use std::fmt;

use xias::Xias;

use crate::error::Result;
use crate::Signature;

mod registry;
pub use registry::Registry;


/// A type that can be stored as a component.
///
/// This trait is implemented for all eligible types automatically.
pub trait Component: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Component for T {}

/// The identity of a registered component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Kind(u32);

impl Kind {
    pub(crate) fn new(id: u32) -> Self { Self(id) }

    /// The bit position of this kind in a signature.
    pub fn id(self) -> u32 { self.0 }

    pub(crate) fn usize(self) -> usize { self.0.small_int() }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "kind {}", self.0) }
}

/// A set of component types, used to build signatures.
///
/// This trait is implemented for tuples of up to 8 component types.
/// Repeated types in the tuple are harmless.
pub trait Set {
    /// Sets the bit of every type in this set.
    fn add_to(registry: &Registry, signature: &mut Signature) -> Result<()>;
}

macro_rules! impl_set_for_tuple {
    ($($idents:ident)*) => {
        impl<$($idents: Component,)*> Set for ($($idents,)*) {
            #[allow(unused_variables)]
            fn add_to(registry: &Registry, signature: &mut Signature) -> Result<()> {
                $(
                    signature.set(registry.kind::<$idents>()?);
                )*
                Ok(())
            }
        }
    };
}

macro_rules! impl_set_for_tuple_accumulate {
    () => {
        impl_set_for_tuple!();
    };
    ($first:ident $($rest:ident)*) => {
        impl_set_for_tuple!($first $($rest)*);
        impl_set_for_tuple_accumulate!($($rest)*);
    };
}

impl_set_for_tuple_accumulate!(T1 T2 T3 T4 T5 T6 T7 T8);

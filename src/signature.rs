//! A signature is the set of component kinds an entity owns,
//! or the set of kinds a system requires.

use std::fmt;

use bitvec::prelude::BitVec;
use itertools::Itertools;
use xias::Xias;

use crate::comp::Kind;

/// A bitset with one bit per registered component kind.
///
/// The width starts at `max_component_kinds` of the world that created it.
/// Setting a bit beyond the width grows the set,
/// and bits beyond the width of either operand compare as unset.
#[derive(Clone, Default)]
pub struct Signature {
    bits: BitVec,
}

impl Signature {
    /// Creates an empty signature able to hold `width` kinds without growing.
    pub fn new(width: usize) -> Self { Self { bits: BitVec::repeat(false, width) } }

    /// Marks `kind` as present.
    pub fn set(&mut self, kind: Kind) {
        let index = kind.usize();
        if self.bits.len() <= index {
            self.bits.resize(index + 1, false);
        }
        self.bits.set(index, true);
    }

    /// Marks `kind` as absent.
    pub fn reset(&mut self, kind: Kind) {
        let index = kind.usize();
        if index < self.bits.len() {
            self.bits.set(index, false);
        }
    }

    /// Builder-style variant of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, kind: Kind) -> Self {
        self.set(kind);
        self
    }

    /// Whether `kind` is present.
    pub fn contains(&self, kind: Kind) -> bool {
        self.bits.get(kind.usize()).map_or(false, |bit| *bit)
    }

    /// Unsets all kinds, keeping the width.
    pub fn clear(&mut self) { self.bits.fill(false); }

    /// Whether no kind is present.
    pub fn is_empty(&self) -> bool { self.bits.not_any() }

    /// The number of kinds present.
    pub fn len(&self) -> usize { self.bits.count_ones() }

    /// Iterates over the present kinds in ascending order.
    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        self.bits.iter_ones().map(|index| Kind::new(index.small_int()))
    }

    /// Whether `self & required == required`.
    ///
    /// An empty `required` matches every signature.
    pub fn matches(&self, required: &Signature) -> bool {
        required.bits.iter_ones().all(|index| self.bits.get(index).map_or(false, |bit| *bit))
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool { self.bits.iter_ones().eq(other.bits.iter_ones()) }
}

impl Eq for Signature {}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature{{{}}}", self.bits.iter_ones().join(", "))
    }
}

impl FromIterator<Kind> for Signature {
    fn from_iter<I: IntoIterator<Item = Kind>>(iter: I) -> Self {
        let mut signature = Signature::default();
        for kind in iter {
            signature.set(kind);
        }
        signature
    }
}

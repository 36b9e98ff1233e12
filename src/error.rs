//! Errors returned by the registries.
//!
//! Every variant describes a call made outside the API contract.
//! Operations check their preconditions before touching any index,
//! so an `Err` never leaves a registry half-updated.

use crate::entity::Entity;
use crate::event::{EventId, ParamId};

/// The error type of all fallible operations in this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// All entity identities are in use.
    #[error("cannot create more than {capacity} entities")]
    CapacityExceeded {
        /// The configured maximum number of entities.
        capacity: usize,
    },

    /// The entity index is outside the configured range.
    #[error("entity {entity} is out of range (capacity {capacity})")]
    InvalidEntity {
        /// The offending entity.
        entity:   Entity,
        /// The configured maximum number of entities.
        capacity: usize,
    },

    /// The entity is in range but is not currently alive.
    #[error("entity {0} is not alive")]
    DeadEntity(Entity),

    /// The entity already owns a component of this type.
    #[error("entity {entity} already has a {component} component")]
    DuplicateComponent {
        /// The entity the component was added to.
        entity:    Entity,
        /// The component type name.
        component: &'static str,
    },

    /// The entity does not own a component of this type.
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        /// The queried entity.
        entity:    Entity,
        /// The component type name.
        component: &'static str,
    },

    /// The component or system type was registered before.
    #[error("{0} is already registered")]
    AlreadyRegistered(&'static str),

    /// The component or system type was used before registration.
    #[error("{0} is used before registration")]
    NotRegistered(&'static str),

    /// No more component kinds fit in a signature.
    #[error("cannot register more than {limit} component kinds")]
    TooManyKinds {
        /// The configured signature width.
        limit: usize,
    },

    /// An event parameter is absent or has a different type.
    #[error("event {event:?} has no parameter {param:?} of the requested type")]
    MissingParam {
        /// The event being read.
        event: EventId,
        /// The requested parameter.
        param: ParamId,
    },
}

/// Shorthand for results with [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Logs a rejected operation and passes the error through.
pub(crate) fn reject(err: Error) -> Error {
    log::warn!("{err}");
    err
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by the property registry and property stores.

use crate::id::{KindId, PropertyId};

/// Errors returned by [`PropertyRegistry`](crate::PropertyRegistry) and
/// [`DependencyObjectExt`](crate::DependencyObjectExt) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    /// A property with the same name is already registered on the owner kind,
    /// or a kind with the same name already exists.
    #[error("'{name}' is already registered on '{owner}'")]
    DuplicateRegistration {
        /// Name of the property or kind.
        name: &'static str,
        /// Name of the owner kind (the kind itself for kind registrations).
        owner: &'static str,
    },
    /// A candidate value was rejected by the property's validator.
    #[error("value rejected by the validator of '{property}'")]
    Validation {
        /// Name of the property.
        property: &'static str,
    },
    /// The operation is not permitted for this property.
    #[error("invalid operation on '{property}': {reason}")]
    InvalidOperation {
        /// Name of the property.
        property: &'static str,
        /// Why the operation was refused.
        reason: &'static str,
    },
    /// The kind was never registered with this registry.
    #[error("unknown kind {0:?}")]
    UnknownKind(KindId),
    /// The property was never registered with this registry.
    #[error("unknown property {0}")]
    UnknownProperty(PropertyId),
    /// The property was registered with a different value type.
    #[error("'{property}' does not hold values of type {expected}")]
    TypeMismatch {
        /// Name of the property.
        property: &'static str,
        /// Name of the requested type.
        expected: &'static str,
    },
}

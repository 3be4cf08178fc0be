// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property and kind identification types.
//!
//! This module provides [`PropertyId`] for runtime property identification,
//! [`Property<T>`] for type-safe keys, [`PropertyKey<T>`] as the write
//! capability of read-only properties, and [`KindId`] for entity kinds.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A runtime property identifier.
///
/// This is a lightweight handle (u16) that uniquely identifies a property
/// within a [`PropertyRegistry`](crate::PropertyRegistry).
///
/// ```rust
/// use trellis_property::PropertyId;
///
/// let id = PropertyId::new(42);
/// assert_eq!(id.index(), 42);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u16);

impl PropertyId {
    /// Creates a new property ID from the given index.
    ///
    /// This is typically called by the registry rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index of this property ID.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyId").field(&self.0).finish()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

/// Identifier of an entity kind (the "type" properties are declared on).
///
/// Kinds form a single-inheritance chain; metadata lookups walk from a
/// concrete kind towards its root.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct KindId(u16);

impl KindId {
    /// Creates a kind ID from the given index.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

/// A type-safe property key.
///
/// This wraps a [`PropertyId`] with a phantom type parameter `T` that represents
/// the property's value type, so getters and setters are checked at compile time.
///
/// `Property<T>` is the same size as `PropertyId` (2 bytes).
pub struct Property<T> {
    id: PropertyId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    /// Creates a new typed property from a property ID.
    ///
    /// The caller must ensure that the `PropertyId` was registered with the same
    /// type `T`; mismatched types surface as [`PropertyError::TypeMismatch`](crate::PropertyError::TypeMismatch).
    #[must_use]
    #[inline]
    pub const fn from_id(id: PropertyId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying property ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> PropertyId {
        self.id
    }
}

// Manual trait implementations to avoid requiring T: Clone, etc.

impl<T> Copy for Property<T> {}

impl<T> Clone for Property<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Property<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Property<T> {}

impl<T> Hash for Property<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.id)
            .field("type", &core::any::type_name::<T>())
            .finish()
    }
}

/// Write capability for a read-only property.
///
/// Only [`PropertyRegistry::register_read_only`](crate::PropertyRegistry::register_read_only)
/// hands these out. Holding the key allows overriding metadata and setting
/// values that plain [`Property<T>`] handles may not.
pub struct PropertyKey<T> {
    property: Property<T>,
}

impl<T> PropertyKey<T> {
    pub(crate) const fn new(property: Property<T>) -> Self {
        Self { property }
    }

    /// Returns the public property handle guarded by this key.
    #[must_use]
    #[inline]
    pub const fn property(&self) -> Property<T> {
        self.property
    }
}

impl<T> fmt::Debug for PropertyKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyKey")
            .field("property", &self.property)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn property_id_basics() {
        let id = PropertyId::new(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id, PropertyId::new(42));
        assert_ne!(id, PropertyId::new(43));
        assert_eq!(format!("{id}"), "PropertyId(42)");
    }

    #[test]
    fn property_type_safety() {
        let id = PropertyId::new(1);
        let prop_f64: Property<f64> = Property::from_id(id);
        let prop_i32: Property<i32> = Property::from_id(id);

        assert_eq!(prop_f64.id(), prop_i32.id());
    }

    #[test]
    fn handles_stay_small() {
        use core::mem::size_of;
        assert_eq!(size_of::<Property<String>>(), 2);
        assert_eq!(size_of::<PropertyKey<f64>>(), 2);
        assert_eq!(size_of::<KindId>(), 2);
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object sparse property storage.
//!
//! This module provides [`PropertyStore`], a sorted small vector of explicit
//! local values searched by [`PropertyId`]. Most elements set only a handful
//! of properties, so the first few entries live inline.

use smallvec::SmallVec;

use crate::error::PropertyError;
use crate::id::{KindId, Property, PropertyId};
use crate::registry::PropertyRegistry;
use crate::value::{ErasedValue, PropertyValue};

/// Inline capacity for property entries.
const INLINE_CAPACITY: usize = 8;

/// Per-object storage of explicitly set property values.
///
/// The store knows nothing about inheritance or change notification; those
/// are layered on top by [`DependencyObjectExt`](crate::DependencyObjectExt).
///
/// ```rust
/// use trellis_property::{PropertyMetadata, PropertyRegistry, PropertyStore};
///
/// let mut registry = PropertyRegistry::new();
/// let element = registry.register_kind("Element", None).unwrap();
/// let width = registry
///     .register("Width", element, PropertyMetadata::new(0.0_f64), None)
///     .unwrap();
///
/// let mut store = PropertyStore::<u32>::new(1);
/// assert!(store.get_local(width).is_none());
/// assert_eq!(store.get_effective_local(width, element, &registry), Ok(0.0));
///
/// store.set_local(width, 100.0);
/// assert_eq!(store.get_local(width), Some(&100.0));
/// assert_eq!(store.get_effective_local(width, element, &registry), Ok(100.0));
/// ```
#[derive(Clone, Debug)]
pub struct PropertyStore<K> {
    /// Local values, sorted by [`PropertyId`].
    entries: SmallVec<[(PropertyId, ErasedValue); INLINE_CAPACITY]>,
    owner: K,
}

impl<K: Copy + Eq> PropertyStore<K> {
    /// Creates a new property store for the given owner key.
    #[must_use]
    pub fn new(owner: K) -> Self {
        Self {
            entries: SmallVec::new(),
            owner,
        }
    }

    /// Returns the owner key of this store.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> K {
        self.owner
    }

    /// Returns `true` if no properties have explicit values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of properties with explicit values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the property IDs that have values set, in ascending order.
    pub fn property_ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    #[inline]
    fn find(&self, id: PropertyId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&id, |(pid, _)| *pid)
    }

    /// Gets the local value, if set.
    #[must_use]
    #[inline]
    pub fn get_local<T: 'static>(&self, property: Property<T>) -> Option<&T> {
        self.get_erased(property.id())
            .and_then(ErasedValue::downcast_ref)
    }

    /// Gets the erased local value, if set.
    #[must_use]
    pub fn get_erased(&self, id: PropertyId) -> Option<&ErasedValue> {
        self.find(id).ok().map(|idx| &self.entries[idx].1)
    }

    /// Sets the local value, returning the previous one.
    pub fn set_local<T: PropertyValue>(&mut self, property: Property<T>, value: T) -> Option<T> {
        self.set_erased(property.id(), ErasedValue::new(value))
            .and_then(|old| old.downcast_ref::<T>().cloned())
    }

    /// Sets an erased local value, returning the previous one.
    pub fn set_erased(&mut self, id: PropertyId, value: ErasedValue) -> Option<ErasedValue> {
        match self.find(id) {
            Ok(idx) => Some(core::mem::replace(&mut self.entries[idx].1, value)),
            Err(idx) => {
                self.entries.insert(idx, (id, value));
                None
            }
        }
    }

    /// Clears the local value.
    ///
    /// Returns `true` if a value was removed.
    pub fn clear_local<T>(&mut self, property: Property<T>) -> bool {
        self.clear_erased(property.id())
    }

    /// Clears the local value of an untyped property.
    pub fn clear_erased(&mut self, id: PropertyId) -> bool {
        if let Ok(idx) = self.find(id) {
            self.entries.remove(idx);
            true
        } else {
            false
        }
    }

    /// Returns `true` if the property has a local value.
    #[must_use]
    #[inline]
    pub fn has_local<T>(&self, property: Property<T>) -> bool {
        self.find(property.id()).is_ok()
    }

    /// Removes every local value.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Gets the local value, falling back to the default seen from `kind`.
    ///
    /// Inheritance is not considered.
    pub fn get_effective_local<T: PropertyValue>(
        &self,
        property: Property<T>,
        kind: KindId,
        registry: &PropertyRegistry,
    ) -> Result<T, PropertyError> {
        self.get_effective_local_ref(property, kind, registry)
            .cloned()
    }

    /// Borrowed variant of [`get_effective_local`](Self::get_effective_local).
    pub fn get_effective_local_ref<'a, T: PropertyValue>(
        &'a self,
        property: Property<T>,
        kind: KindId,
        registry: &'a PropertyRegistry,
    ) -> Result<&'a T, PropertyError> {
        if let Some(value) = self.get_local(property) {
            return Ok(value);
        }
        registry.default_value(property, kind)
    }
}

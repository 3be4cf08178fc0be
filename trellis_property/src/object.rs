// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dependency object traits.
//!
//! This module provides the [`DependencyObject`] trait for objects that carry
//! a [`PropertyStore`], and [`DependencyObjectExt`] for value resolution with
//! inheritance, validation, coercion and change reporting.

use crate::error::PropertyError;
use crate::id::{KindId, Property, PropertyKey};
use crate::registry::{PropertyChange, PropertyRegistry};
use crate::store::PropertyStore;
use crate::value::PropertyValue;

/// A lookup mechanism for walking parent chains for inheritance.
///
/// Given an object key, returns its [`PropertyStore`] and its parent key.
pub trait ParentLookup<'a, K: Copy + Eq + 'a> {
    /// Looks up the store and parent key for `key`.
    fn lookup(&self, key: K) -> Option<(&'a PropertyStore<K>, Option<K>)>;
}

impl<'a, K, F> ParentLookup<'a, K> for F
where
    K: Copy + Eq + 'a,
    F: Fn(K) -> Option<(&'a PropertyStore<K>, Option<K>)>,
{
    #[inline]
    fn lookup(&self, key: K) -> Option<(&'a PropertyStore<K>, Option<K>)> {
        self(key)
    }
}

/// Walks the parent chain starting at `current_key` and returns the first
/// explicit value found.
pub fn walk_inherited<'a, K, T, F>(
    mut current_key: Option<K>,
    property: Property<T>,
    store_lookup: &F,
) -> Option<&'a T>
where
    K: Copy + Eq + 'a,
    T: 'static,
    F: ParentLookup<'a, K> + ?Sized,
{
    while let Some(key) = current_key {
        let (store, parent) = store_lookup.lookup(key)?;
        if let Some(value) = store.get_local(property) {
            return Some(value);
        }
        current_key = parent;
    }
    None
}

/// An object that can hold dependency property values.
///
/// ```rust
/// use trellis_property::{DependencyObject, KindId, PropertyStore};
///
/// struct Node {
///     key: u32,
///     kind: KindId,
///     parent: Option<u32>,
///     store: PropertyStore<u32>,
/// }
///
/// impl DependencyObject<u32> for Node {
///     fn property_store(&self) -> &PropertyStore<u32> {
///         &self.store
///     }
///
///     fn property_store_mut(&mut self) -> &mut PropertyStore<u32> {
///         &mut self.store
///     }
///
///     fn key(&self) -> u32 {
///         self.key
///     }
///
///     fn kind(&self) -> KindId {
///         self.kind
///     }
///
///     fn parent_key(&self) -> Option<u32> {
///         self.parent
///     }
/// }
/// ```
pub trait DependencyObject<K: Copy + Eq> {
    /// Returns a reference to the object's property store.
    fn property_store(&self) -> &PropertyStore<K>;

    /// Returns a mutable reference to the object's property store.
    fn property_store_mut(&mut self) -> &mut PropertyStore<K>;

    /// Returns the key that identifies this object.
    fn key(&self) -> K;

    /// Returns the kind of this object, used for metadata resolution.
    fn kind(&self) -> KindId;

    /// Returns the parent's key, used for inheritance.
    fn parent_key(&self) -> Option<K>;
}

/// Extension methods for [`DependencyObject`].
///
/// Writes take the effective value before the write as `previous`. Callers
/// usually obtain it with [`get_value`](Self::get_value) first; the store
/// walk needs shared access to ancestors, which the write cannot hold.
pub trait DependencyObjectExt<K: Copy + Eq>: DependencyObject<K> {
    /// Gets the local value only.
    fn get_local_value<'a, T: 'static>(&'a self, property: Property<T>) -> Option<&'a T>
    where
        K: 'a,
    {
        self.property_store().get_local(property)
    }

    /// Gets the effective value.
    ///
    /// Resolution order: the object's local value, then (for inheriting
    /// properties) the nearest ancestor's explicit value, then the default
    /// registered for the nearest kind in this object's ancestry.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use trellis_property::{
    ///     DependencyObject, DependencyObjectExt, KindId, PropertyMetadataBuilder,
    ///     PropertyRegistry, PropertyStore,
    /// };
    ///
    /// let mut registry = PropertyRegistry::new();
    /// let element = registry.register_kind("Element", None).unwrap();
    /// let font_size = registry
    ///     .register(
    ///         "FontSize",
    ///         element,
    ///         PropertyMetadataBuilder::new(12.0_f64).inherits(true).build(),
    ///         None,
    ///     )
    ///     .unwrap();
    ///
    /// struct Node { key: u32, kind: KindId, parent: Option<u32>, store: PropertyStore<u32> }
    /// impl DependencyObject<u32> for Node {
    ///     fn property_store(&self) -> &PropertyStore<u32> { &self.store }
    ///     fn property_store_mut(&mut self) -> &mut PropertyStore<u32> { &mut self.store }
    ///     fn key(&self) -> u32 { self.key }
    ///     fn kind(&self) -> KindId { self.kind }
    ///     fn parent_key(&self) -> Option<u32> { self.parent }
    /// }
    ///
    /// let mut parent = Node { key: 1, kind: element, parent: None, store: PropertyStore::new(1) };
    /// let child = Node { key: 2, kind: element, parent: Some(1), store: PropertyStore::new(2) };
    /// parent.store.set_local(font_size, 16.0);
    ///
    /// let nodes: HashMap<u32, &Node> = [(1, &parent), (2, &child)].into_iter().collect();
    /// let value = child
    ///     .get_value(font_size, &registry, &|key| {
    ///         nodes.get(&key).map(|n| (n.property_store(), n.parent_key()))
    ///     })
    ///     .unwrap();
    /// assert_eq!(value, 16.0);
    /// ```
    fn get_value<'a, T, F>(
        &'a self,
        property: Property<T>,
        registry: &PropertyRegistry,
        store_lookup: &F,
    ) -> Result<T, PropertyError>
    where
        K: 'a,
        T: PropertyValue,
        F: ParentLookup<'a, K> + ?Sized,
    {
        if let Some(value) = self.property_store().get_local(property) {
            return Ok(value.clone());
        }
        let metadata = registry.metadata(property, self.kind())?;
        if metadata.inherits()
            && let Some(value) = walk_inherited(self.parent_key(), property, store_lookup)
        {
            return Ok(value.clone());
        }
        Ok(metadata.default_value().clone())
    }

    /// Gets the local value, falling back to the kind's default.
    fn get_effective_local<T: PropertyValue>(
        &self,
        property: Property<T>,
        registry: &PropertyRegistry,
    ) -> Result<T, PropertyError> {
        self.property_store()
            .get_effective_local(property, self.kind(), registry)
    }

    /// Validates, coerces and stores a local value.
    ///
    /// Fails with [`PropertyError::Validation`] if the validator rejects the
    /// value and with [`PropertyError::InvalidOperation`] for read-only
    /// properties. Returns the change record when the effective value moved
    /// from `previous`; the changed callback has run by then.
    fn set_value<T: PropertyValue>(
        &mut self,
        property: Property<T>,
        value: T,
        previous: T,
        registry: &PropertyRegistry,
    ) -> Result<Option<PropertyChange<K>>, PropertyError> {
        if registry.is_read_only(property.id()) {
            return Err(PropertyError::InvalidOperation {
                property: registry.name(property.id()).unwrap_or_default(),
                reason: "read-only properties require their key",
            });
        }
        store_value(self, property, value, previous, registry)
    }

    /// Stores a value of a read-only property through its key.
    fn set_read_only_value<T: PropertyValue>(
        &mut self,
        key: &PropertyKey<T>,
        value: T,
        previous: T,
        registry: &PropertyRegistry,
    ) -> Result<Option<PropertyChange<K>>, PropertyError> {
        store_value(self, key.property(), value, previous, registry)
    }

    /// Removes the local value.
    ///
    /// Returns `true` if a value was removed. The caller resolves the new
    /// effective value and reports the change with
    /// [`PropertyRegistry::raise_changed`].
    fn clear_value<T: PropertyValue>(
        &mut self,
        property: Property<T>,
        registry: &PropertyRegistry,
    ) -> Result<bool, PropertyError> {
        if registry.is_read_only(property.id()) {
            return Err(PropertyError::InvalidOperation {
                property: registry.name(property.id()).unwrap_or_default(),
                reason: "read-only properties require their key",
            });
        }
        Ok(self.property_store_mut().clear_local(property))
    }
}

impl<K: Copy + Eq, D: DependencyObject<K> + ?Sized> DependencyObjectExt<K> for D {}

fn store_value<K, T, D>(
    object: &mut D,
    property: Property<T>,
    value: T,
    previous: T,
    registry: &PropertyRegistry,
) -> Result<Option<PropertyChange<K>>, PropertyError>
where
    K: Copy + Eq,
    T: PropertyValue,
    D: DependencyObject<K> + ?Sized,
{
    registry.validate(property, &value)?;
    let kind = object.kind();
    let value = registry.metadata(property, kind)?.coerce(value);
    object
        .property_store_mut()
        .set_local(property, value.clone());
    registry.raise_changed(object.key(), kind, property, &previous, &value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{PropertyFlags, PropertyMetadata, PropertyMetadataBuilder};
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicU32, Ordering};

    struct Node {
        key: u32,
        kind: KindId,
        parent: Option<u32>,
        store: PropertyStore<u32>,
    }

    impl Node {
        fn new(key: u32, kind: KindId, parent: Option<u32>) -> Self {
            Self {
                key,
                kind,
                parent,
                store: PropertyStore::new(key),
            }
        }
    }

    impl DependencyObject<u32> for Node {
        fn property_store(&self) -> &PropertyStore<u32> {
            &self.store
        }

        fn property_store_mut(&mut self) -> &mut PropertyStore<u32> {
            &mut self.store
        }

        fn key(&self) -> u32 {
            self.key
        }

        fn kind(&self) -> KindId {
            self.kind
        }

        fn parent_key(&self) -> Option<u32> {
            self.parent
        }
    }

    fn lookup_in<'a>(
        nodes: &'a [Node],
    ) -> impl Fn(u32) -> Option<(&'a PropertyStore<u32>, Option<u32>)> + 'a {
        move |key| {
            nodes
                .iter()
                .find(|n| n.key == key)
                .map(|n| (&n.store, n.parent))
        }
    }

    #[test]
    fn inherited_value_comes_from_nearest_explicit_ancestor() {
        let mut registry = PropertyRegistry::new();
        let element = registry.register_kind("Element", None).unwrap();
        let font_size = registry
            .register(
                "FontSize",
                element,
                PropertyMetadataBuilder::new(12.0_f64).inherits(true).build(),
                None,
            )
            .unwrap();

        let mut nodes = Vec::from([
            Node::new(1, element, None),
            Node::new(2, element, Some(1)),
            Node::new(3, element, Some(2)),
        ]);
        nodes[0].store.set_local(font_size, 20.0);

        let lookup = lookup_in(&nodes);
        assert_eq!(nodes[2].get_value(font_size, &registry, &lookup), Ok(20.0));
    }

    #[test]
    fn non_inheriting_property_ignores_ancestors() {
        let mut registry = PropertyRegistry::new();
        let element = registry.register_kind("Element", None).unwrap();
        let width = registry
            .register("Width", element, PropertyMetadata::new(0.0_f64), None)
            .unwrap();
        let mut nodes = Vec::from([Node::new(1, element, None), Node::new(2, element, Some(1))]);
        nodes[0].store.set_local(width, 50.0);

        let lookup = lookup_in(&nodes);
        assert_eq!(nodes[1].get_value(width, &registry, &lookup), Ok(0.0));
    }

    #[test]
    fn set_value_validates_coerces_and_reports() {
        static CHANGES: AtomicU32 = AtomicU32::new(0);

        let mut registry = PropertyRegistry::new();
        let element = registry.register_kind("Element", None).unwrap();
        let width = registry
            .register(
                "Width",
                element,
                PropertyMetadataBuilder::new(0.0_f64)
                    .flags(PropertyFlags::AFFECTS_MEASURE)
                    .coerce(|v| v.min(100.0))
                    .on_changed(|_, _| {
                        CHANGES.fetch_add(1, Ordering::SeqCst);
                    })
                    .build(),
                Some(Arc::new(|v: &f64| *v >= 0.0)),
            )
            .unwrap();

        let mut node = Node::new(1, element, None);
        assert_eq!(
            node.set_value(width, -1.0, 0.0, &registry),
            Err(PropertyError::Validation { property: "Width" })
        );
        assert_eq!(node.get_local_value(width), None);

        let change = node.set_value(width, 500.0, 0.0, &registry).unwrap().unwrap();
        assert_eq!(change.key, 1);
        assert!(change.flags.contains(PropertyFlags::AFFECTS_MEASURE));
        assert_eq!(node.get_local_value(width), Some(&100.0));
        assert_eq!(CHANGES.load(Ordering::SeqCst), 1);

        // Equal effective value: stored, but no change and no callback.
        assert_eq!(node.set_value(width, 100.0, 100.0, &registry), Ok(None));
        assert_eq!(CHANGES.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn read_only_requires_key() {
        let mut registry = PropertyRegistry::new();
        let element = registry.register_kind("Element", None).unwrap();
        let (actual, key) = registry
            .register_read_only("ActualWidth", element, PropertyMetadata::new(0.0_f64), None)
            .unwrap();

        let mut node = Node::new(1, element, None);
        assert!(matches!(
            node.set_value(actual, 5.0, 0.0, &registry),
            Err(PropertyError::InvalidOperation { .. })
        ));
        assert!(node.clear_value(actual, &registry).is_err());
        assert!(
            node.set_read_only_value(&key, 5.0, 0.0, &registry)
                .unwrap()
                .is_some()
        );
        assert_eq!(node.get_effective_local(actual, &registry), Ok(5.0));
    }

    #[test]
    fn clear_value_falls_back_to_kind_default() {
        let mut registry = PropertyRegistry::new();
        let element = registry.register_kind("Element", None).unwrap();
        let button = registry.register_kind("Button", Some(element)).unwrap();
        let width = registry
            .register("Width", element, PropertyMetadata::new(0.0_f64), None)
            .unwrap();
        registry
            .override_metadata(width, button, PropertyMetadata::new(80.0))
            .unwrap();

        let mut node = Node::new(1, button, None);
        node.set_value(width, 10.0, 80.0, &registry).unwrap();
        assert_eq!(node.clear_value(width, &registry), Ok(true));
        assert_eq!(node.get_effective_local(width, &registry), Ok(80.0));
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kind and property registry.
//!
//! This module provides [`PropertyRegistry`] for registering kinds and
//! properties, resolving per-kind metadata and validating values.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use hashbrown::HashMap;

use crate::error::PropertyError;
use crate::id::{KindId, Property, PropertyId, PropertyKey};
use crate::metadata::{PropertyFlags, PropertyMetadata, Validator};
use crate::value::{ErasedValue, PropertyValue};

/// A registered kind: its name, base and precomputed ancestry.
#[derive(Debug)]
struct KindEntry {
    name: &'static str,
    base: Option<KindId>,
    /// The kind itself followed by its bases, nearest first.
    ancestry: Vec<KindId>,
}

/// A registration entry for a property.
pub struct PropertyRegistration {
    name: &'static str,
    owner: KindId,
    type_id: TypeId,
    type_name: &'static str,
    read_only: bool,
    attached: bool,
    entry: Box<dyn ErasedEntry>,
}

impl PropertyRegistration {
    /// Returns the property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the kind that registered the property.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> KindId {
        self.owner
    }

    /// Returns the [`TypeId`] of the property's value type.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns whether the property can only be written with its [`PropertyKey`].
    #[must_use]
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns whether the property was registered as attached.
    #[must_use]
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl core::fmt::Debug for PropertyRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyRegistration")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("type", &self.type_name)
            .field("read_only", &self.read_only)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

/// A property change that passed validation and altered the effective value.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyChange<K> {
    /// The object whose value changed.
    pub key: K,
    /// The property that changed.
    pub property: PropertyId,
    /// The effective value before the change.
    pub old: ErasedValue,
    /// The effective value after the change.
    pub new: ErasedValue,
    /// Change-effect flags resolved for the object's kind.
    pub flags: PropertyFlags,
}

/// A registry of kinds and dependency properties.
///
/// Kinds and properties are registered once at startup. Metadata may be
/// overridden per kind; lookups walk the kind's precomputed ancestry so the
/// nearest override wins.
///
/// ```rust
/// use trellis_property::{PropertyFlags, PropertyMetadataBuilder, PropertyRegistry};
///
/// let mut registry = PropertyRegistry::new();
/// let element = registry.register_kind("Element", None).unwrap();
/// let button = registry.register_kind("Button", Some(element)).unwrap();
///
/// let width = registry
///     .register(
///         "Width",
///         element,
///         PropertyMetadataBuilder::new(0.0_f64)
///             .flags(PropertyFlags::AFFECTS_MEASURE)
///             .build(),
///         None,
///     )
///     .unwrap();
/// registry
///     .override_metadata(width, button, PropertyMetadataBuilder::new(80.0).build())
///     .unwrap();
///
/// assert_eq!(registry.metadata(width, element).unwrap().default_value(), &0.0);
/// assert_eq!(registry.metadata(width, button).unwrap().default_value(), &80.0);
/// ```
#[derive(Default)]
pub struct PropertyRegistry {
    kinds: Vec<KindEntry>,
    kinds_by_name: HashMap<&'static str, KindId>,
    properties: Vec<PropertyRegistration>,
    by_name: HashMap<(&'static str, KindId), PropertyId>,
}

impl PropertyRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Kinds
    // =========================================================================

    /// Registers a kind deriving from `base`.
    ///
    /// The ancestry used for metadata lookups is computed here, once.
    pub fn register_kind(
        &mut self,
        name: &'static str,
        base: Option<KindId>,
    ) -> Result<KindId, PropertyError> {
        if self.kinds_by_name.contains_key(name) {
            return Err(PropertyError::DuplicateRegistration { name, owner: name });
        }
        let mut ancestry = Vec::new();
        if let Some(base) = base {
            ancestry.extend_from_slice(&self.kind_entry(base)?.ancestry);
        }
        let id = KindId::new(Self::next_index(self.kinds.len()));
        ancestry.insert(0, id);
        self.kinds.push(KindEntry {
            name,
            base,
            ancestry,
        });
        self.kinds_by_name.insert(name, id);
        Ok(id)
    }

    /// Returns the name of a kind.
    #[must_use]
    pub fn kind_name(&self, kind: KindId) -> Option<&'static str> {
        self.kinds.get(kind.index() as usize).map(|k| k.name)
    }

    /// Returns the direct base of a kind.
    #[must_use]
    pub fn kind_base(&self, kind: KindId) -> Option<KindId> {
        self.kinds.get(kind.index() as usize).and_then(|k| k.base)
    }

    /// Looks up a kind by name.
    #[must_use]
    pub fn kind_by_name(&self, name: &str) -> Option<KindId> {
        self.kinds_by_name.get(name).copied()
    }

    /// Returns the kind followed by its bases, nearest first.
    ///
    /// Unknown kinds have an empty ancestry.
    #[must_use]
    pub fn ancestry(&self, kind: KindId) -> &[KindId] {
        self.kinds
            .get(kind.index() as usize)
            .map(|k| k.ancestry.as_slice())
            .unwrap_or_default()
    }

    /// Returns `true` if `kind` is `ancestor` or derives from it.
    #[must_use]
    pub fn is_kind_of(&self, kind: KindId, ancestor: KindId) -> bool {
        self.ancestry(kind).contains(&ancestor)
    }

    fn kind_entry(&self, kind: KindId) -> Result<&KindEntry, PropertyError> {
        self.kinds
            .get(kind.index() as usize)
            .ok_or(PropertyError::UnknownKind(kind))
    }

    fn next_index(len: usize) -> u16 {
        assert!(len < u16::MAX as usize, "too many registrations (max {})", u16::MAX);
        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let index = len as u16;
        index
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a property on `owner`.
    ///
    /// The metadata becomes both the fallback metadata and the owner's own
    /// metadata. Fails with [`PropertyError::DuplicateRegistration`] if
    /// `owner` already has a property called `name`, and with
    /// [`PropertyError::Validation`] if the default value is rejected by
    /// `validator`.
    pub fn register<T: PropertyValue>(
        &mut self,
        name: &'static str,
        owner: KindId,
        metadata: PropertyMetadata<T>,
        validator: Option<Validator<T>>,
    ) -> Result<Property<T>, PropertyError> {
        self.register_impl(name, owner, metadata, validator, false, false)
    }

    /// Registers an attached property: declared by `owner` but settable on
    /// objects of any kind (for example a grid's row index).
    pub fn register_attached<T: PropertyValue>(
        &mut self,
        name: &'static str,
        owner: KindId,
        metadata: PropertyMetadata<T>,
        validator: Option<Validator<T>>,
    ) -> Result<Property<T>, PropertyError> {
        self.register_impl(name, owner, metadata, validator, true, false)
    }

    /// Registers a read-only property and returns its write capability.
    pub fn register_read_only<T: PropertyValue>(
        &mut self,
        name: &'static str,
        owner: KindId,
        metadata: PropertyMetadata<T>,
        validator: Option<Validator<T>>,
    ) -> Result<(Property<T>, PropertyKey<T>), PropertyError> {
        let property = self.register_impl(name, owner, metadata, validator, false, true)?;
        Ok((property, PropertyKey::new(property)))
    }

    fn register_impl<T: PropertyValue>(
        &mut self,
        name: &'static str,
        owner: KindId,
        metadata: PropertyMetadata<T>,
        validator: Option<Validator<T>>,
        attached: bool,
        read_only: bool,
    ) -> Result<Property<T>, PropertyError> {
        let owner_name = self.kind_entry(owner)?.name;
        if self.by_name.contains_key(&(name, owner)) {
            return Err(PropertyError::DuplicateRegistration {
                name,
                owner: owner_name,
            });
        }
        if let Some(validator) = &validator
            && !validator(metadata.default_value())
        {
            return Err(PropertyError::Validation { property: name });
        }

        let id = PropertyId::new(Self::next_index(self.properties.len()));
        let mut by_kind = HashMap::new();
        if !attached {
            by_kind.insert(owner, metadata.clone());
        }
        self.properties.push(PropertyRegistration {
            name,
            owner,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            read_only,
            attached,
            entry: Box::new(TypedEntry {
                default_metadata: metadata,
                by_kind,
                validator,
            }),
        });
        self.by_name.insert((name, owner), id);
        Ok(Property::from_id(id))
    }

    /// Attaches kind-specific metadata to a property.
    ///
    /// Fails with [`PropertyError::InvalidOperation`] if the property is
    /// read-only (use [`override_metadata_with_key`](Self::override_metadata_with_key))
    /// or if `for_kind` already has metadata for it.
    pub fn override_metadata<T: PropertyValue>(
        &mut self,
        property: Property<T>,
        for_kind: KindId,
        metadata: PropertyMetadata<T>,
    ) -> Result<(), PropertyError> {
        let registration = self.registration(property.id())?;
        if registration.read_only {
            return Err(PropertyError::InvalidOperation {
                property: registration.name,
                reason: "read-only metadata can only be overridden with its key",
            });
        }
        self.override_impl(property, for_kind, metadata)
    }

    /// Attaches kind-specific metadata to a read-only property.
    pub fn override_metadata_with_key<T: PropertyValue>(
        &mut self,
        key: &PropertyKey<T>,
        for_kind: KindId,
        metadata: PropertyMetadata<T>,
    ) -> Result<(), PropertyError> {
        self.override_impl(key.property(), for_kind, metadata)
    }

    /// Adds `kind` as an additional owner of an existing property.
    ///
    /// The property keeps its identity; looking it up by name from `kind`
    /// resolves to the same handle.
    pub fn add_owner<T: PropertyValue>(
        &mut self,
        property: Property<T>,
        kind: KindId,
        metadata: PropertyMetadata<T>,
    ) -> Result<Property<T>, PropertyError> {
        let name = self.registration(property.id())?.name;
        let kind_name = self.kind_entry(kind)?.name;
        if self.by_name.contains_key(&(name, kind)) {
            return Err(PropertyError::DuplicateRegistration {
                name,
                owner: kind_name,
            });
        }
        self.override_metadata(property, kind, metadata)?;
        self.by_name.insert((name, kind), property.id());
        Ok(property)
    }

    fn override_impl<T: PropertyValue>(
        &mut self,
        property: Property<T>,
        for_kind: KindId,
        metadata: PropertyMetadata<T>,
    ) -> Result<(), PropertyError> {
        let ancestry = self.kind_entry(for_kind)?.ancestry.clone();
        let registration = self
            .properties
            .get_mut(property.id().index() as usize)
            .ok_or(PropertyError::UnknownProperty(property.id()))?;
        let name = registration.name;
        let entry = registration
            .entry
            .as_any_mut()
            .downcast_mut::<TypedEntry<T>>()
            .ok_or(PropertyError::TypeMismatch {
                property: name,
                expected: type_name::<T>(),
            })?;

        if entry.by_kind.contains_key(&for_kind) {
            return Err(PropertyError::InvalidOperation {
                property: name,
                reason: "metadata is already set for this kind",
            });
        }
        if let Some(validator) = &entry.validator
            && !validator(metadata.default_value())
        {
            return Err(PropertyError::Validation { property: name });
        }
        let merged = metadata.merged_with(entry.resolve(&ancestry));
        entry.by_kind.insert(for_kind, merged);
        Ok(())
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the number of registered properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no properties are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Looks up a property by name as seen from `kind`, walking its ancestry.
    #[must_use]
    pub fn lookup(&self, name: &str, kind: KindId) -> Option<PropertyId> {
        self.ancestry(kind)
            .iter()
            .find_map(|k| self.by_name.get(&(name, *k)).copied())
    }

    /// Returns the name of a property.
    #[must_use]
    pub fn name(&self, id: PropertyId) -> Option<&'static str> {
        self.get(id).map(PropertyRegistration::name)
    }

    /// Returns the registration for a property.
    #[must_use]
    pub fn get(&self, id: PropertyId) -> Option<&PropertyRegistration> {
        self.properties.get(id.index() as usize)
    }

    fn registration(&self, id: PropertyId) -> Result<&PropertyRegistration, PropertyError> {
        self.get(id).ok_or(PropertyError::UnknownProperty(id))
    }

    /// Returns whether a property is read-only.
    #[must_use]
    pub fn is_read_only(&self, id: PropertyId) -> bool {
        self.get(id).is_some_and(PropertyRegistration::is_read_only)
    }

    /// Returns the change-effect flags of a property as seen from `kind`.
    #[must_use]
    pub fn flags(&self, id: PropertyId, kind: KindId) -> PropertyFlags {
        self.get(id)
            .map(|r| r.entry.flags(self.ancestry(kind)))
            .unwrap_or_default()
    }

    /// Returns the metadata of a property as seen from `kind`.
    ///
    /// Walks the ancestry of `kind`; the nearest kind with metadata wins,
    /// otherwise the registration metadata is returned.
    pub fn metadata<T: PropertyValue>(
        &self,
        property: Property<T>,
        kind: KindId,
    ) -> Result<&PropertyMetadata<T>, PropertyError> {
        Ok(self.typed_entry(property)?.resolve(self.ancestry(kind)))
    }

    /// Returns the default value of a property as seen from `kind`.
    pub fn default_value<T: PropertyValue>(
        &self,
        property: Property<T>,
        kind: KindId,
    ) -> Result<&T, PropertyError> {
        self.metadata(property, kind)
            .map(PropertyMetadata::default_value)
    }

    /// Checks a candidate value against the property's validator.
    pub fn validate<T: PropertyValue>(
        &self,
        property: Property<T>,
        value: &T,
    ) -> Result<(), PropertyError> {
        let entry = self.typed_entry(property)?;
        match &entry.validator {
            Some(validator) if !validator(value) => Err(PropertyError::Validation {
                property: self.name(property.id()).unwrap_or_default(),
            }),
            _ => Ok(()),
        }
    }

    /// Compares an old and new effective value and, when they differ, runs the
    /// changed callback resolved for `kind` and builds the change record.
    ///
    /// Returns `None` when the values are equal.
    pub fn raise_changed<K, T: PropertyValue>(
        &self,
        key: K,
        kind: KindId,
        property: Property<T>,
        old: &T,
        new: &T,
    ) -> Result<Option<PropertyChange<K>>, PropertyError> {
        if old == new {
            return Ok(None);
        }
        let metadata = self.metadata(property, kind)?;
        metadata.on_changed(old, new);
        Ok(Some(PropertyChange {
            key,
            property: property.id(),
            old: ErasedValue::new(old.clone()),
            new: ErasedValue::new(new.clone()),
            flags: metadata.flags(),
        }))
    }

    /// Returns an iterator over all registered properties.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &PropertyRegistration)> {
        self.properties.iter().enumerate().map(|(i, r)| {
            #[expect(clippy::cast_possible_truncation, reason = "index < len < u16::MAX")]
            (PropertyId::new(i as u16), r)
        })
    }

    fn typed_entry<T: PropertyValue>(
        &self,
        property: Property<T>,
    ) -> Result<&TypedEntry<T>, PropertyError> {
        let registration = self.registration(property.id())?;
        registration
            .entry
            .as_any()
            .downcast_ref::<TypedEntry<T>>()
            .ok_or(PropertyError::TypeMismatch {
                property: registration.name,
                expected: type_name::<T>(),
            })
    }
}

impl core::fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("kinds", &self.kinds.iter().map(|k| k.name).collect::<Vec<_>>())
            .field(
                "properties",
                &self.properties.iter().map(|p| p.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Typed per-property state: fallback metadata, per-kind overrides and validator.
struct TypedEntry<T: 'static> {
    default_metadata: PropertyMetadata<T>,
    by_kind: HashMap<KindId, PropertyMetadata<T>>,
    validator: Option<Validator<T>>,
}

impl<T: PropertyValue> TypedEntry<T> {
    fn resolve(&self, ancestry: &[KindId]) -> &PropertyMetadata<T> {
        ancestry
            .iter()
            .find_map(|kind| self.by_kind.get(kind))
            .unwrap_or(&self.default_metadata)
    }
}

/// Type-erased entry trait for heterogeneous storage.
trait ErasedEntry: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn flags(&self, ancestry: &[KindId]) -> PropertyFlags;
}

impl<T: PropertyValue> ErasedEntry for TypedEntry<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn flags(&self, ancestry: &[KindId]) -> PropertyFlags {
        self.resolve(ancestry).flags()
    }
}

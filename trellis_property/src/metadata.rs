// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property metadata definitions.
//!
//! This module provides [`PropertyMetadata`] for storing per-kind property
//! configuration, [`PropertyMetadataBuilder`] for ergonomic construction and
//! [`PropertyFlags`] describing what a change invalidates.

use alloc::sync::Arc;

bitflags::bitflags! {
    /// Change-effect flags of a property.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u8 {
        /// A change invalidates the desired size of the owner.
        const AFFECTS_MEASURE = 0b0000_0001;
        /// A change invalidates the arrangement of the owner.
        const AFFECTS_ARRANGE = 0b0000_0010;
        /// A change requires the owner to be redrawn.
        const AFFECTS_RENDER  = 0b0000_0100;
        /// Unset values flow down from the nearest visual ancestor.
        const INHERITS        = 0b0000_1000;
    }
}

impl PropertyFlags {
    /// Returns `true` if a change requires a layout pass.
    #[must_use]
    #[inline]
    pub const fn affects_layout(self) -> bool {
        self.intersects(Self::AFFECTS_MEASURE.union(Self::AFFECTS_ARRANGE))
    }
}

/// Callback invoked when a property value changes, with the old and new value.
pub type PropertyChangedCallback<T> = Arc<dyn Fn(&T, &T) + Send + Sync>;

/// Callback for coercing a property value before it's stored.
pub type CoerceValueCallback<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Predicate deciding whether a candidate value is acceptable.
pub type Validator<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Metadata for a dependency property as seen by one kind.
///
/// ```rust
/// use trellis_property::{PropertyFlags, PropertyMetadataBuilder};
///
/// let metadata = PropertyMetadataBuilder::new(12.0_f64)
///     .flags(PropertyFlags::AFFECTS_MEASURE)
///     .inherits(true)
///     .build();
///
/// assert_eq!(metadata.default_value(), &12.0);
/// assert!(metadata.inherits());
/// assert!(metadata.flags().affects_layout());
/// ```
pub struct PropertyMetadata<T: 'static> {
    default_value: T,
    flags: PropertyFlags,
    changed_callback: Option<PropertyChangedCallback<T>>,
    coerce_callback: Option<CoerceValueCallback<T>>,
}

impl<T: Clone + 'static> PropertyMetadata<T> {
    /// Creates new property metadata with the given default value and no flags.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            default_value,
            flags: PropertyFlags::empty(),
            changed_callback: None,
            coerce_callback: None,
        }
    }

    /// Returns a reference to the default value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Returns the change-effect flags.
    #[must_use]
    #[inline]
    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    /// Returns whether this property inherits from visual ancestors.
    #[must_use]
    #[inline]
    pub fn inherits(&self) -> bool {
        self.flags.contains(PropertyFlags::INHERITS)
    }

    /// Invokes the changed callback if one is set.
    #[inline]
    pub fn on_changed(&self, old_value: &T, new_value: &T) {
        if let Some(callback) = &self.changed_callback {
            callback(old_value, new_value);
        }
    }

    /// Coerces a value using the coerce callback if one is set.
    #[inline]
    pub fn coerce(&self, value: T) -> T {
        match &self.coerce_callback {
            Some(callback) => callback(value),
            None => value,
        }
    }

    /// Returns whether a changed callback is set.
    #[must_use]
    #[inline]
    pub fn has_changed_callback(&self) -> bool {
        self.changed_callback.is_some()
    }

    /// Returns whether a coerce callback is set.
    #[must_use]
    #[inline]
    pub fn has_coerce_callback(&self) -> bool {
        self.coerce_callback.is_some()
    }

    /// Fills callbacks this metadata leaves unset from `base`.
    ///
    /// Used when a kind overrides metadata: the default value and flags of the
    /// override win, callbacks fall back to the ones the kind saw before.
    #[must_use]
    pub(crate) fn merged_with(mut self, base: &Self) -> Self {
        if self.changed_callback.is_none() {
            self.changed_callback.clone_from(&base.changed_callback);
        }
        if self.coerce_callback.is_none() {
            self.coerce_callback.clone_from(&base.coerce_callback);
        }
        self
    }
}

impl<T: Clone + 'static> Clone for PropertyMetadata<T> {
    fn clone(&self) -> Self {
        Self {
            default_value: self.default_value.clone(),
            flags: self.flags,
            changed_callback: self.changed_callback.clone(),
            coerce_callback: self.coerce_callback.clone(),
        }
    }
}

// Manual Debug impl since callbacks aren't Debug
impl<T: core::fmt::Debug + 'static> core::fmt::Debug for PropertyMetadata<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("default_value", &self.default_value)
            .field("flags", &self.flags)
            .field("has_changed_callback", &self.changed_callback.is_some())
            .field("has_coerce_callback", &self.coerce_callback.is_some())
            .finish()
    }
}

/// Builder for [`PropertyMetadata`].
///
/// ```rust
/// use trellis_property::{PropertyFlags, PropertyMetadataBuilder};
///
/// let metadata = PropertyMetadataBuilder::new(0.0_f64)
///     .flags(PropertyFlags::AFFECTS_MEASURE | PropertyFlags::AFFECTS_RENDER)
///     .coerce(|v| v.clamp(0.0, 100.0))
///     .build();
/// assert_eq!(metadata.coerce(140.0), 100.0);
/// ```
pub struct PropertyMetadataBuilder<T: 'static> {
    metadata: PropertyMetadata<T>,
}

impl<T: core::fmt::Debug + 'static> core::fmt::Debug for PropertyMetadataBuilder<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyMetadataBuilder")
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl<T: Clone + 'static> PropertyMetadataBuilder<T> {
    /// Creates a new builder with the given default value.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            metadata: PropertyMetadata::new(default_value),
        }
    }

    /// Adds change-effect flags.
    #[must_use]
    pub fn flags(mut self, flags: PropertyFlags) -> Self {
        self.metadata.flags |= flags;
        self
    }

    /// Sets whether this property inherits from visual ancestors.
    #[must_use]
    pub fn inherits(mut self, inherits: bool) -> Self {
        self.metadata.flags.set(PropertyFlags::INHERITS, inherits);
        self
    }

    /// Sets a callback to be invoked when the property value changes.
    #[must_use]
    pub fn on_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
    {
        self.metadata.changed_callback = Some(Arc::new(callback));
        self
    }

    /// Sets a callback to coerce values before they are stored.
    #[must_use]
    pub fn coerce<F>(mut self, callback: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.metadata.coerce_callback = Some(Arc::new(callback));
        self
    }

    /// Builds the [`PropertyMetadata`].
    #[must_use]
    pub fn build(self) -> PropertyMetadata<T> {
        self.metadata
    }
}

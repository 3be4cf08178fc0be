// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Property: kinds, dependency properties and sparse value storage.
//!
//! ## Core Concepts
//!
//! - A [`PropertyRegistry`] holds registered kinds (single-inheritance
//!   "types" such as `Element` or `Grid`) and properties declared on them.
//! - [`Property<T>`] is a typed, copyable handle; [`PropertyKey<T>`] is the
//!   write capability handed out for read-only properties.
//! - [`PropertyMetadata`] carries a default value, [`PropertyFlags`]
//!   describing what a change invalidates, and optional changed/coerce
//!   callbacks. Kinds may override metadata; lookups pick the nearest kind.
//! - [`PropertyStore`] keeps the explicitly set values of one object.
//! - [`DependencyObjectExt`] resolves effective values (local, inherited,
//!   default) and performs validated writes that report a [`PropertyChange`].
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis_property::{PropertyFlags, PropertyMetadataBuilder, PropertyRegistry, PropertyStore};
//!
//! let mut registry = PropertyRegistry::new();
//! let element = registry.register_kind("Element", None).unwrap();
//! let width = registry
//!     .register(
//!         "Width",
//!         element,
//!         PropertyMetadataBuilder::new(f64::NAN)
//!             .flags(PropertyFlags::AFFECTS_MEASURE)
//!             .build(),
//!         None,
//!     )
//!     .unwrap();
//!
//! let mut store = PropertyStore::<u32>::new(1);
//! store.set_local(width, 100.0);
//! assert_eq!(store.get_effective_local(width, element, &registry), Ok(100.0));
//! assert!(registry.flags(width.id(), element).affects_layout());
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod id;
mod metadata;
mod object;
mod registry;
mod store;
mod value;

pub use error::PropertyError;
pub use id::{KindId, Property, PropertyId, PropertyKey};
pub use metadata::{
    CoerceValueCallback, PropertyChangedCallback, PropertyFlags, PropertyMetadata,
    PropertyMetadataBuilder, Validator,
};
pub use object::{DependencyObject, DependencyObjectExt, ParentLookup, walk_inherited};
pub use registry::{PropertyChange, PropertyRegistration, PropertyRegistry};
pub use store::PropertyStore;
pub use value::{ErasedValue, PropertyValue};

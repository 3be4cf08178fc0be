// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The UI host: element storage, property access and invalidation.

use std::fmt;

use hashbrown::HashMap;
use kurbo::{Affine, Rect, Size, Vec2};
use trellis_layout::{GridArrangement, LayoutSlot, LayoutState};
use trellis_property::{
    DependencyObject, DependencyObjectExt, KindId, Property, PropertyChange, PropertyError,
    PropertyFlags, PropertyKey, PropertyRegistry, PropertyStore, PropertyValue,
};
use trellis_visual::{NodeFlags, NodeId, VisualTree};

use crate::dispatcher::{Dispatcher, Task};
use crate::element::Element;
use crate::elements::Grid;
use crate::headless::HeadlessPlatform;
use crate::platform::{Platform, TimerHandle};
use crate::props::{self, Keys, Kinds, Props};
use crate::scheduler::LayoutScheduler;
use crate::timer::TimerEntry;
use crate::window::WindowEntry;
use crate::{ElementId, TimerId, UiError, WindowId};

pub(crate) struct ElementNode {
    pub(crate) kind: KindId,
    pub(crate) parent: Option<ElementId>,
    pub(crate) store: PropertyStore<ElementId>,
    pub(crate) slot: LayoutSlot,
    pub(crate) behavior: Option<Box<dyn Element>>,
    pub(crate) window: Option<WindowId>,
}

impl DependencyObject<ElementId> for ElementNode {
    fn property_store(&self) -> &PropertyStore<ElementId> {
        &self.store
    }

    fn property_store_mut(&mut self) -> &mut PropertyStore<ElementId> {
        &mut self.store
    }

    fn key(&self) -> ElementId {
        self.store.owner()
    }

    fn kind(&self) -> KindId {
        self.kind
    }

    fn parent_key(&self) -> Option<ElementId> {
        self.parent
    }
}

/// Resolves the effective value of `property` on `id`.
pub(crate) fn resolve<T: PropertyValue>(
    tree: &VisualTree<ElementNode>,
    registry: &PropertyRegistry,
    id: ElementId,
    property: Property<T>,
) -> Result<T, UiError> {
    let node = tree.get(id.0).ok_or(UiError::StaleElement(id))?;
    let lookup = |key: ElementId| tree.get(key.0).map(|n| (&n.store, n.parent));
    Ok(node.get_value(property, registry, &lookup)?)
}

type Observer = Box<dyn FnMut(&PropertyChange<ElementId>)>;

/// Options for building a [`Ui`].
///
/// ```rust
/// use trellis::UiBuilder;
/// use trellis::headless::HeadlessPlatform;
///
/// let ui = UiBuilder::new()
///     .platform(Box::new(HeadlessPlatform::new()))
///     .layout_rounding(true)
///     .build()
///     .unwrap();
/// assert!(ui.layout_rounding());
/// ```
#[derive(Default)]
pub struct UiBuilder {
    platform: Option<Box<dyn Platform>>,
    layout_rounding: bool,
}

impl fmt::Debug for UiBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiBuilder")
            .field("layout_rounding", &self.layout_rounding)
            .finish_non_exhaustive()
    }
}

impl UiBuilder {
    /// Starts with a headless platform and rounding off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the platform providing windows and timers.
    #[must_use]
    pub fn platform(mut self, platform: Box<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Rounds arranged offsets and sizes to whole pixels.
    #[must_use]
    pub fn layout_rounding(mut self, enabled: bool) -> Self {
        self.layout_rounding = enabled;
        self
    }

    /// Registers the built-in kinds and properties and creates the host.
    pub fn build(self) -> Result<Ui, UiError> {
        let mut registry = PropertyRegistry::new();
        let (kinds, props, keys) = props::register(&mut registry)?;
        Ok(Ui {
            registry,
            kinds,
            props,
            keys,
            tree: VisualTree::new(),
            scheduler: LayoutScheduler::new(),
            dispatcher: Dispatcher::default(),
            windows: HashMap::new(),
            next_window: 0,
            timers: HashMap::new(),
            timer_ids: HashMap::new(),
            next_timer: 0,
            platform: self
                .platform
                .unwrap_or_else(|| Box::new(HeadlessPlatform::new())),
            observers: Vec::new(),
            layout_rounding: self.layout_rounding,
            layout_passes: 0,
        })
    }
}

/// Owner of every element, window and timer, and of the task queue that
/// runs deferred layout passes.
///
/// All mutation goes through `&mut Ui` on one thread. Property changes that
/// affect layout mark elements dirty and request a single deferred pass;
/// [`run_pending`](Self::run_pending) executes it.
pub struct Ui {
    pub(crate) registry: PropertyRegistry,
    pub(crate) kinds: Kinds,
    pub(crate) props: Props,
    pub(crate) keys: Keys,
    pub(crate) tree: VisualTree<ElementNode>,
    pub(crate) scheduler: LayoutScheduler,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) windows: HashMap<WindowId, WindowEntry>,
    pub(crate) next_window: u32,
    pub(crate) timers: HashMap<TimerId, TimerEntry>,
    pub(crate) timer_ids: HashMap<TimerHandle, TimerId>,
    pub(crate) next_timer: u32,
    pub(crate) platform: Box<dyn Platform>,
    observers: Vec<Observer>,
    pub(crate) layout_rounding: bool,
    layout_passes: usize,
}

impl fmt::Debug for Ui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ui")
            .field("elements", &self.tree.len())
            .field("windows", &self.windows.len())
            .field("timers", &self.timers.len())
            .field("scheduler", &self.scheduler)
            .field("dispatcher", &self.dispatcher)
            .field("layout_rounding", &self.layout_rounding)
            .finish_non_exhaustive()
    }
}

impl Ui {
    /// Creates a host on `platform` with default options.
    pub fn new(platform: Box<dyn Platform>) -> Result<Self, UiError> {
        UiBuilder::new().platform(platform).build()
    }

    /// The property registry, for custom kinds and properties.
    #[must_use]
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// Mutable registry access, for registering custom kinds and properties.
    pub fn registry_mut(&mut self) -> &mut PropertyRegistry {
        &mut self.registry
    }

    /// Built-in kinds.
    #[must_use]
    pub fn kinds(&self) -> &Kinds {
        &self.kinds
    }

    /// Built-in properties.
    #[must_use]
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Returns `true` if arranged geometry is rounded to whole pixels.
    #[must_use]
    pub fn layout_rounding(&self) -> bool {
        self.layout_rounding
    }

    /// The layout queue.
    #[must_use]
    pub fn scheduler(&self) -> &LayoutScheduler {
        &self.scheduler
    }

    /// The task queue.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Number of layout passes run so far.
    #[must_use]
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Creates a detached element of `kind` with the given behaviour.
    pub fn create(&mut self, kind: KindId, element: impl Element) -> Result<ElementId, UiError> {
        if self.registry.kind_name(kind).is_none() {
            return Err(PropertyError::UnknownKind(kind).into());
        }
        let node = self.tree.insert_with(|node| ElementNode {
            kind,
            parent: None,
            store: PropertyStore::new(ElementId(node)),
            slot: LayoutSlot::new(),
            behavior: Some(Box::new(element)),
            window: None,
        });
        Ok(ElementId(node))
    }

    /// Returns `true` if `id` refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.tree.is_alive(id.0)
    }

    /// Kind of an element.
    pub fn kind(&self, id: ElementId) -> Result<KindId, UiError> {
        Ok(self.node(id)?.kind)
    }

    /// Behaviour of an element, if it is an `E`.
    #[must_use]
    pub fn element<E: Element>(&self, id: ElementId) -> Option<&E> {
        let behavior: &dyn Element = self.tree.get(id.0)?.behavior.as_deref()?;
        let any: &dyn std::any::Any = behavior;
        any.downcast_ref::<E>()
    }

    pub(crate) fn node(&self, id: ElementId) -> Result<&ElementNode, UiError> {
        self.tree.get(id.0).ok_or(UiError::StaleElement(id))
    }

    pub(crate) fn node_mut(&mut self, id: ElementId) -> Result<&mut ElementNode, UiError> {
        self.tree.get_mut(id.0).ok_or(UiError::StaleElement(id))
    }

    /// Appends `child` to `parent`'s children and queues a layout pass.
    ///
    /// Fails if `child` already has a parent or is an ancestor of `parent`.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), UiError> {
        self.attach(parent, child)?;
        self.invalidate_measure(child);
        Ok(())
    }

    /// Inserts `child` at `index` among `parent`'s children.
    pub fn insert_child(
        &mut self,
        parent: ElementId,
        index: usize,
        child: ElementId,
    ) -> Result<(), UiError> {
        self.tree.insert_child(parent.0, index, child.0)?;
        self.adopt(parent, child);
        self.invalidate_measure(child);
        Ok(())
    }

    /// Detaches `child` from `parent`. The child stays alive as a root.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), UiError> {
        self.detach(parent, child)?;
        self.invalidate_measure(parent);
        Ok(())
    }

    /// Destroys `id` and its subtree.
    ///
    /// Pending layout work for the destroyed elements is dropped.
    pub fn destroy(&mut self, id: ElementId) -> Result<(), UiError> {
        let parent = self.node(id)?.parent;
        self.destroy_quiet(id)?;
        if let Some(parent) = parent {
            self.invalidate_measure(parent);
        }
        Ok(())
    }

    pub(crate) fn attach(&mut self, parent: ElementId, child: ElementId) -> Result<(), UiError> {
        self.tree.add_child(parent.0, child.0)?;
        self.adopt(parent, child);
        Ok(())
    }

    fn adopt(&mut self, parent: ElementId, child: ElementId) {
        if let Some(node) = self.tree.get_mut(child.0) {
            node.parent = Some(parent);
        }
        // Inherited values may differ under the new parent.
        self.dirty_subtree(child);
    }

    /// Marks the desired size of `id` and its descendants stale without
    /// queueing anything.
    pub(crate) fn dirty_subtree(&mut self, id: ElementId) {
        for node in self.tree.descendants(id.0) {
            if let Some(node) = self.tree.get_mut(node) {
                node.slot.invalidate_measure();
            }
        }
    }

    pub(crate) fn detach(&mut self, parent: ElementId, child: ElementId) -> Result<(), UiError> {
        self.tree.remove_child(parent.0, child.0)?;
        if let Some(node) = self.tree.get_mut(child.0) {
            node.parent = None;
        }
        Ok(())
    }

    pub(crate) fn destroy_quiet(&mut self, id: ElementId) -> Result<(), UiError> {
        for (node, _) in self.tree.remove(id.0)? {
            self.scheduler.prune(ElementId(node));
        }
        Ok(())
    }

    /// Parent of an element.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.tree.parent(id.0).map(ElementId)
    }

    /// Children of an element, in order.
    #[must_use]
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.tree.children(id.0).iter().copied().map(ElementId).collect()
    }

    /// Number of children of an element.
    #[must_use]
    pub fn child_count(&self, id: ElementId) -> usize {
        self.tree.child_count(id.0)
    }

    /// Child of `parent` at `index`.
    pub fn child(&self, parent: ElementId, index: usize) -> Result<ElementId, UiError> {
        Ok(ElementId(self.tree.child(parent.0, index)?))
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Effective value of `property` on `id`.
    pub fn get_value<T: PropertyValue>(
        &self,
        id: ElementId,
        property: Property<T>,
    ) -> Result<T, UiError> {
        resolve(&self.tree, &self.registry, id, property)
    }

    /// Sets a local value.
    ///
    /// Returns `true` if the effective value changed, in which case change
    /// observers have run and layout work has been queued according to the
    /// property's flags. Writing the current value does nothing.
    pub fn set_value<T: PropertyValue>(
        &mut self,
        id: ElementId,
        property: Property<T>,
        value: T,
    ) -> Result<bool, UiError> {
        let previous = self.get_value(id, property)?;
        let node = self.tree.get_mut(id.0).ok_or(UiError::StaleElement(id))?;
        let change = node.set_value(property, value, previous, &self.registry)?;
        self.apply_change(change)
    }

    /// Sets a value of a read-only property through its key.
    pub fn set_read_only_value<T: PropertyValue>(
        &mut self,
        id: ElementId,
        key: &PropertyKey<T>,
        value: T,
    ) -> Result<bool, UiError> {
        let previous = self.get_value(id, key.property())?;
        let node = self.tree.get_mut(id.0).ok_or(UiError::StaleElement(id))?;
        let change = node.set_read_only_value(key, value, previous, &self.registry)?;
        self.apply_change(change)
    }

    /// Removes a local value. Returns `true` if the effective value changed.
    pub fn clear_value<T: PropertyValue>(
        &mut self,
        id: ElementId,
        property: Property<T>,
    ) -> Result<bool, UiError> {
        let previous = self.get_value(id, property)?;
        let node = self.tree.get_mut(id.0).ok_or(UiError::StaleElement(id))?;
        let kind = node.kind;
        if !node.clear_value(property, &self.registry)? {
            return Ok(false);
        }
        let current = self.get_value(id, property)?;
        let change = self
            .registry
            .raise_changed(id, kind, property, &previous, &current)?;
        self.apply_change(change)
    }

    /// Returns `true` if `id` has a local value for `property`.
    pub fn has_local_value<T: PropertyValue>(
        &self,
        id: ElementId,
        property: Property<T>,
    ) -> Result<bool, UiError> {
        Ok(self.node(id)?.store.has_local(property))
    }

    /// Registers a callback run after every effective value change.
    pub fn observe_changes(&mut self, observer: impl FnMut(&PropertyChange<ElementId>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub(crate) fn apply_change(
        &mut self,
        change: Option<PropertyChange<ElementId>>,
    ) -> Result<bool, UiError> {
        let Some(change) = change else {
            return Ok(false);
        };
        let id = change.key;
        if change.property == self.props.is_visible.id()
            && let Some(&visible) = change.new.downcast_ref::<bool>()
        {
            let flags = if visible {
                NodeFlags::VISIBLE
            } else {
                NodeFlags::empty()
            };
            self.tree.set_flags(id.0, flags)?;
        }

        let flags = change.flags;
        if flags.contains(PropertyFlags::AFFECTS_MEASURE) {
            self.invalidate_measure(id);
        } else if flags.contains(PropertyFlags::AFFECTS_ARRANGE) {
            self.invalidate_arrange(id);
        } else if flags.contains(PropertyFlags::AFFECTS_RENDER) {
            self.invalidate_visual(id);
        }
        if flags.contains(PropertyFlags::INHERITS) && flags.affects_layout() {
            for node in self.tree.descendants(id.0).into_iter().skip(1) {
                let descendant = ElementId(node);
                if flags.contains(PropertyFlags::AFFECTS_MEASURE) {
                    self.invalidate_measure(descendant);
                } else {
                    self.invalidate_arrange(descendant);
                }
            }
        }

        for observer in &mut self.observers {
            observer(&change);
        }
        Ok(true)
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Marks the desired size of `id` and its ancestors stale and queues a pass.
    pub fn invalidate_measure(&mut self, id: ElementId) {
        if !self.tree.is_alive(id.0) {
            return;
        }
        let chain: Vec<NodeId> = std::iter::once(id.0)
            .chain(self.tree.ancestors(id.0))
            .collect();
        for node in chain {
            if let Some(node) = self.tree.get_mut(node) {
                node.slot.invalidate_measure();
            }
        }
        self.queue(id, true);
    }

    /// Marks the arrangement of `id` and its ancestors stale and queues a pass.
    pub fn invalidate_arrange(&mut self, id: ElementId) {
        if !self.tree.is_alive(id.0) {
            return;
        }
        let chain: Vec<NodeId> = std::iter::once(id.0)
            .chain(self.tree.ancestors(id.0))
            .collect();
        for node in chain {
            if let Some(node) = self.tree.get_mut(node) {
                node.slot.invalidate_arrange();
            }
        }
        self.queue(id, false);
    }

    /// Queues a pass that redraws the window of `id` without new layout work.
    pub fn invalidate_visual(&mut self, id: ElementId) {
        if self.tree.is_alive(id.0) {
            self.queue(id, false);
        }
    }

    fn queue(&mut self, id: ElementId, measure: bool) {
        let post = if measure {
            self.scheduler.queue_measure(id)
        } else {
            self.scheduler.queue_arrange(id)
        };
        if post {
            tracing::trace!(?id, "layout pass scheduled");
            self.dispatcher.post(Task::LayoutPass);
        }
    }

    // =========================================================================
    // Layout results
    // =========================================================================

    /// Desired size from the last measure, margin included.
    pub fn desired_size(&self, id: ElementId) -> Result<Size, UiError> {
        Ok(self.node(id)?.slot.desired())
    }

    /// Size from the last arrange.
    pub fn render_size(&self, id: ElementId) -> Result<Size, UiError> {
        Ok(self.node(id)?.slot.render_size())
    }

    /// Slot rect from the last arrange, in parent coordinates.
    pub fn final_rect(&self, id: ElementId) -> Result<Option<Rect>, UiError> {
        Ok(self.node(id)?.slot.final_rect())
    }

    /// Offset of `id` from its parent, set by the last arrange.
    pub fn visual_offset(&self, id: ElementId) -> Result<Vec2, UiError> {
        self.node(id)?;
        Ok(self.tree.offset(id.0))
    }

    /// Transform from `id` to the coordinates of its topmost ancestor.
    pub fn world_transform(&self, id: ElementId) -> Result<Affine, UiError> {
        Ok(self.tree.world_transform(id.0)?)
    }

    /// Position of `id` in the measure/arrange cycle.
    pub fn layout_state(&self, id: ElementId) -> Result<LayoutState, UiError> {
        Ok(self.node(id)?.slot.state())
    }

    /// Actual column widths and row heights of a grid after its last arrange.
    #[must_use]
    pub fn actual_track_sizes(&self, id: ElementId) -> Option<&GridArrangement> {
        self.element::<Grid>(id)?.arrangement()
    }

    // =========================================================================
    // Task queue
    // =========================================================================

    /// Queues `task` to run on the next [`run_pending`](Self::run_pending).
    pub fn post(&mut self, task: impl FnOnce(&mut Self) -> Result<(), UiError> + 'static) {
        self.dispatcher.post(Task::Invoke(Box::new(task)));
    }

    /// Runs queued tasks, including ones they post, until the queue is empty.
    ///
    /// Returns the number of tasks run. The first failing task stops the
    /// drain; its error is returned and later tasks stay queued.
    pub fn run_pending(&mut self) -> Result<usize, UiError> {
        let mut ran = 0;
        while let Some(task) = self.dispatcher.pop() {
            ran += 1;
            match task {
                Task::LayoutPass => self.run_layout_pass()?,
                Task::TimerTick(handle) => self.tick(handle)?,
                Task::Invoke(callback) => callback(self)?,
            }
        }
        Ok(ran)
    }

    /// Lays out and redraws every window that owns a queued element.
    ///
    /// Entries that are detached from any window, or destroyed, are dropped.
    /// Elements queued while the pass runs are left for one follow-up pass,
    /// which is posted when this one ends. An error aborts the pass; windows
    /// already processed keep their new layout.
    pub fn run_layout_pass(&mut self) -> Result<(), UiError> {
        let entries = self.scheduler.begin_pass();
        let span = tracing::debug_span!("layout_pass", entries = entries.len());
        let _guard = span.enter();

        let mut windows = Vec::new();
        for id in entries {
            match self.window_of(id) {
                Some(window) if !windows.contains(&window) => windows.push(window),
                Some(_) => {}
                None => tracing::trace!(?id, "dropped entry without a window"),
            }
        }
        tracing::debug!(windows = windows.len(), "layout pass started");

        let result = windows
            .iter()
            .try_for_each(|&window| self.layout_window(window));
        self.layout_passes += 1;
        if let Err(error) = &result {
            tracing::warn!(%error, "layout pass aborted");
        }
        if self.scheduler.end_pass() {
            tracing::debug!("follow-up layout pass scheduled");
            self.dispatcher.post(Task::LayoutPass);
        }
        tracing::debug!("layout pass finished");
        result
    }

    /// Window whose root is the topmost ancestor of `id`.
    #[must_use]
    pub fn window_of(&self, id: ElementId) -> Option<WindowId> {
        if !self.tree.is_alive(id.0) {
            return None;
        }
        let root = self.tree.root_of(id.0);
        self.tree.get(root)?.window
    }
}

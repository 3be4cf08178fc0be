// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred layout passes: coalescing, follow-ups, pruning and errors.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Insets, Rect, Size, Vec2};
use trellis::elements::{Rectangle, StackPanel};
use trellis::{
    ElementId, LayoutCx, Layoutable, Renderable, Ui, UiBuilder, UiError, WindowId,
};
use trellis_layout::{Alignment, LayoutState};

#[derive(Debug)]
struct Fixed(Size);

impl Layoutable for Fixed {
    fn measure_core(&mut self, _: &mut LayoutCx<'_>, _: Size) -> Result<Size, UiError> {
        Ok(self.0)
    }

    fn arrange_core(&mut self, _: &mut LayoutCx<'_>, final_size: Size) -> Result<Size, UiError> {
        Ok(final_size)
    }
}

impl Renderable for Fixed {}

/// Invalidates `target` from its arrange while `armed` is set, once.
#[derive(Debug)]
struct Reentrant {
    target: ElementId,
    armed: Rc<Cell<bool>>,
}

impl Layoutable for Reentrant {
    fn measure_core(&mut self, _: &mut LayoutCx<'_>, _: Size) -> Result<Size, UiError> {
        Ok(Size::new(10.0, 10.0))
    }

    fn arrange_core(&mut self, cx: &mut LayoutCx<'_>, final_size: Size) -> Result<Size, UiError> {
        if self.armed.replace(false) {
            cx.ui_mut().invalidate_measure(self.target);
        }
        Ok(final_size)
    }
}

impl Renderable for Reentrant {}

fn shown(ui: &mut Ui, content: ElementId) -> WindowId {
    let window = ui.create_window(Some(content)).unwrap();
    ui.show(window).unwrap();
    ui.run_pending().unwrap();
    window
}

#[test]
fn writes_coalesce_into_one_pass() {
    let mut ui = UiBuilder::new().build().unwrap();
    let p = *ui.props();
    let leaf = ui.create(ui.kinds().rectangle, Rectangle).unwrap();
    shown(&mut ui, leaf);
    let before = ui.layout_passes();

    ui.set_value(leaf, p.width, Some(10.0)).unwrap();
    ui.set_value(leaf, p.height, Some(20.0)).unwrap();
    ui.set_value(leaf, p.margin, Insets::uniform(1.0)).unwrap();
    assert_eq!(ui.dispatcher().pending_layout_passes(), 1);
    assert!(ui.scheduler().is_scheduled());

    assert_eq!(ui.run_pending().unwrap(), 1);
    assert_eq!(ui.layout_passes(), before + 1);
    assert!(!ui.scheduler().is_scheduled());
    assert_eq!(ui.layout_state(leaf).unwrap(), LayoutState::Arranged);
}

#[test]
fn invalidation_during_a_pass_runs_exactly_one_follow_up() {
    let mut ui = UiBuilder::new().build().unwrap();
    let p = *ui.props();
    let panel = ui.create(ui.kinds().stack_panel, StackPanel).unwrap();
    let target = ui.create(ui.kinds().rectangle, Rectangle).unwrap();
    let armed = Rc::new(Cell::new(false));
    let trigger = ui
        .create(
            ui.kinds().element,
            Reentrant {
                target,
                armed: armed.clone(),
            },
        )
        .unwrap();
    ui.add_child(panel, trigger).unwrap();
    ui.add_child(panel, target).unwrap();
    shown(&mut ui, panel);
    let before = ui.layout_passes();

    armed.set(true);
    ui.set_value(trigger, p.height, Some(20.0)).unwrap();
    ui.run_pending().unwrap();

    assert!(!armed.get());
    assert_eq!(ui.layout_passes(), before + 2);
    assert!(ui.dispatcher().is_empty());
    assert!(!ui.scheduler().is_scheduled());
    assert_eq!(ui.layout_state(target).unwrap(), LayoutState::Arranged);
    assert_eq!(ui.layout_state(panel).unwrap(), LayoutState::Arranged);
}

#[test]
fn leaf_arranged_at_desired_size_renders_at_desired_size() {
    let mut ui = UiBuilder::new().build().unwrap();
    let leaf = ui
        .create(ui.kinds().element, Fixed(Size::new(120.0, 30.0)))
        .unwrap();

    let desired = ui.measure(leaf, Size::new(300.0, 200.0)).unwrap();
    assert_eq!(desired, Size::new(120.0, 30.0));
    ui.arrange(leaf, Rect::from_origin_size((0.0, 0.0), desired))
        .unwrap();
    assert_eq!(ui.render_size(leaf).unwrap(), desired);
    assert_eq!(ui.layout_state(leaf).unwrap(), LayoutState::Arranged);
}

#[test]
fn margin_and_alignment_place_the_element() {
    let mut ui = UiBuilder::new().build().unwrap();
    let p = *ui.props();
    let leaf = ui
        .create(ui.kinds().element, Fixed(Size::new(40.0, 20.0)))
        .unwrap();
    ui.set_value(leaf, p.margin, Insets::uniform(5.0)).unwrap();
    ui.set_value(leaf, p.horizontal_alignment, Alignment::Center)
        .unwrap();
    ui.set_value(leaf, p.vertical_alignment, Alignment::End)
        .unwrap();

    let desired = ui.measure(leaf, Size::new(100.0, 100.0)).unwrap();
    assert_eq!(desired, Size::new(50.0, 30.0));
    ui.arrange(leaf, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();

    assert_eq!(ui.render_size(leaf).unwrap(), Size::new(40.0, 20.0));
    assert_eq!(ui.visual_offset(leaf).unwrap(), Vec2::new(30.0, 75.0));
    assert_eq!(ui.get_value(leaf, p.actual_width).unwrap(), 40.0);
    assert_eq!(ui.get_value(leaf, p.actual_height).unwrap(), 20.0);
}

#[test]
fn explicit_size_and_clamps() {
    let mut ui = UiBuilder::new().build().unwrap();
    let p = *ui.props();
    let leaf = ui
        .create(ui.kinds().element, Fixed(Size::new(40.0, 20.0)))
        .unwrap();
    ui.set_value(leaf, p.width, Some(100.0)).unwrap();
    ui.set_value(leaf, p.max_width, 60.0).unwrap();
    ui.set_value(leaf, p.min_height, 35.0).unwrap();

    let desired = ui.measure(leaf, Size::new(500.0, 500.0)).unwrap();
    assert_eq!(desired, Size::new(60.0, 35.0));
}

#[test]
fn hidden_elements_take_no_space() {
    let mut ui = UiBuilder::new().build().unwrap();
    let p = *ui.props();
    let leaf = ui
        .create(ui.kinds().element, Fixed(Size::new(40.0, 20.0)))
        .unwrap();
    ui.set_value(leaf, p.is_visible, false).unwrap();
    assert_eq!(
        ui.measure(leaf, Size::new(100.0, 100.0)).unwrap(),
        Size::ZERO
    );
}

#[test]
fn layout_rounding_snaps_to_whole_units() {
    let mut ui = UiBuilder::new().layout_rounding(true).build().unwrap();
    let p = *ui.props();
    let leaf = ui
        .create(ui.kinds().element, Fixed(Size::new(10.4, 10.6)))
        .unwrap();
    ui.set_value(leaf, p.horizontal_alignment, Alignment::Start)
        .unwrap();
    ui.set_value(leaf, p.vertical_alignment, Alignment::Start)
        .unwrap();
    ui.measure(leaf, Size::new(100.0, 100.0)).unwrap();
    ui.arrange(leaf, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    assert_eq!(ui.render_size(leaf).unwrap(), Size::new(10.0, 11.0));
}

#[test]
fn destroyed_elements_leave_the_queue() {
    let mut ui = UiBuilder::new().build().unwrap();
    let p = *ui.props();
    let panel = ui.create(ui.kinds().stack_panel, StackPanel).unwrap();
    let leaf = ui.create(ui.kinds().rectangle, Rectangle).unwrap();
    ui.add_child(panel, leaf).unwrap();
    shown(&mut ui, panel);

    ui.set_value(leaf, p.width, Some(10.0)).unwrap();
    assert!(ui.scheduler().pending().contains(&leaf));
    ui.destroy(leaf).unwrap();
    assert!(!ui.is_alive(leaf));
    assert!(!ui.scheduler().pending().contains(&leaf));

    ui.run_pending().unwrap();
    assert_eq!(ui.child_count(panel), 0);
    assert!(matches!(
        ui.get_value(leaf, p.width),
        Err(UiError::StaleElement(id)) if id == leaf
    ));
}

#[test]
fn detached_elements_are_dropped_from_the_pass() {
    let mut ui = UiBuilder::new().build().unwrap();
    let p = *ui.props();
    let loose = ui.create(ui.kinds().rectangle, Rectangle).unwrap();
    ui.set_value(loose, p.width, Some(10.0)).unwrap();
    assert_eq!(ui.dispatcher().pending_layout_passes(), 1);

    ui.run_pending().unwrap();
    assert_eq!(ui.layout_passes(), 1);
    assert_eq!(ui.layout_state(loose).unwrap(), LayoutState::Dirty);
    assert!(ui.scheduler().pending().is_empty());
}

#[test]
fn failing_task_stops_the_drain() {
    let mut ui = UiBuilder::new().build().unwrap();
    let closed = ui.create_window(None).unwrap();
    ui.close(closed).unwrap();
    ui.run_pending().unwrap();

    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();
    ui.post(move |ui| ui.show(closed));
    ui.post(move |_| {
        flag.set(true);
        Ok(())
    });

    assert_eq!(ui.run_pending(), Err(UiError::UnknownWindow(closed)));
    assert!(!ran.get());
    assert_eq!(ui.dispatcher().len(), 1);

    assert_eq!(ui.run_pending(), Ok(1));
    assert!(ran.get());
}

#[test]
fn posted_tasks_run_in_order() {
    let mut ui = UiBuilder::new().build().unwrap();
    let log = Rc::new(std::cell::RefCell::new(Vec::new()));
    for i in 0..3 {
        let log = log.clone();
        ui.post(move |ui| {
            log.borrow_mut().push(i);
            if i == 0 {
                let log = log.clone();
                ui.post(move |_| {
                    log.borrow_mut().push(10);
                    Ok(())
                });
            }
            Ok(())
        });
    }
    assert_eq!(ui.run_pending().unwrap(), 4);
    assert_eq!(*log.borrow(), [0, 1, 2, 10]);
}

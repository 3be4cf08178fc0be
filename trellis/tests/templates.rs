// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control templates: lazy application, re-application and content hand-over.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Insets, Size};
use trellis::elements::{Border, ContentPresenter, Control, Rectangle, StackPanel};
use trellis::{ElementId, TemplateHandle, Ui, UiBuilder, UiError};

/// Border around a presenter bound to the templated control.
fn framed(built: Rc<Cell<u32>>) -> TemplateHandle {
    TemplateHandle::new(
        move |ui: &mut Ui, owner: ElementId| -> Result<ElementId, UiError> {
            built.set(built.get() + 1);
            let p = *ui.props();
            let border = ui.create(ui.kinds().border, Border)?;
            ui.set_value(border, p.border_thickness, Insets::uniform(2.0))?;
            let presenter = ui.create(
                ui.kinds().content_presenter,
                ContentPresenter::bound_to(owner),
            )?;
            ui.add_child(border, presenter)?;
            Ok(border)
        },
    )
}

fn bare(ui: &mut Ui, owner: ElementId) -> Result<ElementId, UiError> {
    ui.create(
        ui.kinds().content_presenter,
        ContentPresenter::bound_to(owner),
    )
}

fn setup() -> (Ui, ElementId, ElementId) {
    let mut ui = UiBuilder::new().build().unwrap();
    let p = *ui.props();
    let control = ui.create(ui.kinds().control, Control::new()).unwrap();
    let content = ui.create(ui.kinds().rectangle, Rectangle).unwrap();
    ui.set_value(content, p.width, Some(40.0)).unwrap();
    ui.set_value(content, p.height, Some(10.0)).unwrap();
    ui.set_value(control, p.content, Some(content)).unwrap();
    (ui, control, content)
}

fn template_root(ui: &Ui, control: ElementId) -> Option<ElementId> {
    ui.element::<Control>(control)?.template_root()
}

#[test]
fn template_is_applied_on_first_measure() {
    let (mut ui, control, content) = setup();
    let p = *ui.props();
    let built = Rc::new(Cell::new(0));
    ui.set_value(control, p.template, Some(framed(built.clone())))
        .unwrap();
    assert_eq!(built.get(), 0);
    assert_eq!(ui.child_count(control), 0);

    let desired = ui.measure(control, Size::new(100.0, 100.0)).unwrap();
    assert_eq!(built.get(), 1);
    assert_eq!(desired, Size::new(44.0, 14.0));

    let root = template_root(&ui, control).unwrap();
    assert_eq!(ui.children(control), [root]);
    let presenter = ui.child(root, 0).unwrap();
    assert_eq!(ui.parent(content), Some(presenter));
    assert_eq!(
        ui.element::<ContentPresenter>(presenter)
            .and_then(ContentPresenter::presented),
        Some(content)
    );

    ui.measure(control, Size::new(100.0, 100.0)).unwrap();
    ui.measure(control, Size::new(90.0, 100.0)).unwrap();
    assert_eq!(built.get(), 1);
}

#[test]
fn changing_the_template_rebuilds_and_keeps_content() {
    let (mut ui, control, content) = setup();
    let p = *ui.props();
    let built = Rc::new(Cell::new(0));
    let framed = framed(built.clone());
    ui.set_value(control, p.template, Some(framed.clone()))
        .unwrap();
    ui.measure(control, Size::new(100.0, 100.0)).unwrap();
    let old_root = template_root(&ui, control).unwrap();

    // Same handle: nothing to do.
    assert!(!ui.set_value(control, p.template, Some(framed)).unwrap());

    ui.set_value(control, p.template, Some(TemplateHandle::new(bare)))
        .unwrap();
    let desired = ui.measure(control, Size::new(100.0, 100.0)).unwrap();
    assert_eq!(built.get(), 1);
    assert_eq!(desired, Size::new(40.0, 10.0));

    let new_root = template_root(&ui, control).unwrap();
    assert!(!ui.is_alive(old_root));
    assert!(ui.is_alive(content));
    assert_eq!(ui.parent(content), Some(new_root));
    assert_eq!(ui.children(control), [new_root]);
}

#[test]
fn clearing_the_template_removes_the_tree() {
    let (mut ui, control, content) = setup();
    let p = *ui.props();
    ui.set_value(control, p.template, Some(TemplateHandle::new(bare)))
        .unwrap();
    ui.measure(control, Size::new(100.0, 100.0)).unwrap();

    ui.set_value(control, p.template, None).unwrap();
    let desired = ui.measure(control, Size::new(100.0, 100.0)).unwrap();
    assert_eq!(desired, Size::ZERO);
    assert_eq!(ui.child_count(control), 0);
    assert_eq!(ui.parent(content), None);
    assert!(template_root(&ui, control).is_none());
}

#[test]
fn changing_content_swaps_the_presented_element() {
    let (mut ui, control, content) = setup();
    let p = *ui.props();
    ui.set_value(control, p.template, Some(TemplateHandle::new(bare)))
        .unwrap();
    ui.measure(control, Size::new(100.0, 100.0)).unwrap();
    let presenter = template_root(&ui, control).unwrap();

    let other = ui.create(ui.kinds().stack_panel, StackPanel).unwrap();
    ui.set_value(other, p.width, Some(5.0)).unwrap();
    ui.set_value(control, p.content, Some(other)).unwrap();
    let desired = ui.measure(control, Size::new(100.0, 100.0)).unwrap();

    assert_eq!(desired, Size::new(5.0, 0.0));
    assert_eq!(ui.parent(content), None);
    assert_eq!(ui.parent(other), Some(presenter));
}

#[test]
fn a_template_root_must_be_detached() {
    let (mut ui, control, _) = setup();
    let p = *ui.props();
    let holder = ui.create(ui.kinds().stack_panel, StackPanel).unwrap();
    let taken = ui.create(ui.kinds().rectangle, Rectangle).unwrap();
    ui.add_child(holder, taken).unwrap();
    let template = TemplateHandle::new(
        move |_: &mut Ui, _: ElementId| -> Result<ElementId, UiError> { Ok(taken) },
    );
    ui.set_value(control, p.template, Some(template)).unwrap();

    assert!(matches!(
        ui.measure(control, Size::new(100.0, 100.0)),
        Err(UiError::Template { owner, .. }) if owner == control
    ));
    assert_eq!(ui.parent(taken), Some(holder));
}

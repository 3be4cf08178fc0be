// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timers driven through the headless platform.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use trellis::elements::Rectangle;
use trellis::headless::HeadlessPlatform;
use trellis::{TimerId, Ui, UiError};

const FRAME: Duration = Duration::from_millis(16);

fn setup() -> (Ui, HeadlessPlatform) {
    let platform = HeadlessPlatform::new();
    let ui = Ui::new(Box::new(platform.clone())).unwrap();
    (ui, platform)
}

#[test]
fn ticks_run_on_the_task_queue() {
    let (mut ui, platform) = setup();
    let ticks = Rc::new(Cell::new(0));
    let counter = ticks.clone();
    let id = ui.start_timer(FRAME, move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    let timers = platform.active_timers();
    assert_eq!(timers.len(), 1);
    let (handle, interval) = timers[0];
    assert_eq!(interval, FRAME);
    assert_eq!(ui.timer_interval(id), Some(FRAME));
    assert!(ui.is_timer_running(id));

    ui.timer_elapsed(handle);
    ui.timer_elapsed(handle);
    assert_eq!(ticks.get(), 0);
    assert_eq!(ui.run_pending(), Ok(2));
    assert_eq!(ticks.get(), 2);

    assert!(ui.stop_timer(id));
    assert!(!ui.stop_timer(id));
    assert!(platform.active_timers().is_empty());

    ui.timer_elapsed(handle);
    assert_eq!(ui.run_pending(), Ok(1));
    assert_eq!(ticks.get(), 2);
}

#[test]
fn a_timer_can_stop_itself() {
    let (mut ui, platform) = setup();
    let own = Rc::new(Cell::new(None::<TimerId>));
    let slot = own.clone();
    let id = ui.start_timer(FRAME, move |ui| {
        if let Some(id) = slot.get() {
            ui.stop_timer(id);
        }
        Ok(())
    });
    own.set(Some(id));

    let (handle, _) = platform.active_timers()[0];
    ui.timer_elapsed(handle);
    ui.run_pending().unwrap();
    assert!(!ui.is_timer_running(id));
    assert!(platform.active_timers().is_empty());
}

#[test]
fn tick_errors_propagate_and_keep_the_timer() {
    let (mut ui, platform) = setup();
    let target = ui.create(ui.kinds().rectangle, Rectangle).unwrap();
    ui.destroy(target).unwrap();
    let id = ui.start_timer(FRAME, move |ui| ui.set_value(target, ui.props().width, None).map(drop));

    let (handle, _) = platform.active_timers()[0];
    ui.timer_elapsed(handle);
    assert_eq!(ui.run_pending(), Err(UiError::StaleElement(target)));
    assert!(ui.is_timer_running(id));
}

#[test]
fn tick_writes_schedule_layout() {
    let (mut ui, platform) = setup();
    let target = ui.create(ui.kinds().rectangle, Rectangle).unwrap();
    let window = ui.create_window(Some(target)).unwrap();
    ui.show(window).unwrap();
    ui.run_pending().unwrap();
    let before = ui.layout_passes();

    ui.start_timer(FRAME, move |ui| {
        let width = ui.props().width;
        ui.set_value(target, width, Some(25.0)).map(drop)
    });
    let (handle, _) = platform.active_timers()[0];
    ui.timer_elapsed(handle);
    assert_eq!(ui.run_pending(), Ok(2));
    assert_eq!(ui.layout_passes(), before + 1);
    assert_eq!(ui.get_value(target, ui.props().actual_width), Ok(25.0));
}

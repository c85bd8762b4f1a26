//! Bus behaviour seen from real subscribers: reentrancy, failure isolation
//! and cross-thread posting.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::thread;

use common::*;
use filterpane::{
    DisplayOutcome, HandlerError, LifecycleEvent, InteractionSource, Signal, SignalBus,
    SignalName, SubscriptionHandle,
};

#[test]
fn self_unsubscribe_delivers_everyone_else_once() {
    let bus = SignalBus::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let slot: Rc<Cell<Option<SubscriptionHandle>>> = Rc::new(Cell::new(None));

    {
        let calls = Rc::clone(&calls);
        bus.subscribe(SignalName::ConfigurationChanged, move |_| {
            calls.borrow_mut().push("first");
            Ok(())
        });
    }
    {
        let calls = Rc::clone(&calls);
        let slot_in_cb = Rc::clone(&slot);
        let bus_handle = bus.clone();
        let handle = bus.subscribe(SignalName::ConfigurationChanged, move |_| {
            calls.borrow_mut().push("once");
            if let Some(handle) = slot_in_cb.take() {
                bus_handle.unsubscribe(handle);
            }
            Ok(())
        });
        slot.set(Some(handle));
    }
    {
        let calls = Rc::clone(&calls);
        bus.subscribe(SignalName::ConfigurationChanged, move |_| {
            calls.borrow_mut().push("last");
            Ok(())
        });
    }

    let report = bus.publish(Signal::ConfigurationChanged);
    assert!(report.is_clean());
    assert_eq!(report.delivered, 3);
    bus.publish(Signal::ConfigurationChanged);

    assert_eq!(
        *calls.borrow(),
        vec!["first", "once", "last", "first", "last"]
    );
}

#[test]
fn failing_subscriber_does_not_starve_the_view() {
    let bus = SignalBus::new();
    bus.subscribe(SignalName::InteractionStarted, |_| {
        Err(HandlerError::failed("listener unavailable"))
    });
    bus.subscribe(SignalName::InteractionStarted, |_| panic!("listener exploded"));
    let (view, _) = counting_view(SURFACE);
    view.attach(&bus);

    let report = bus.publish(LifecycleEvent::started(InteractionSource::Drag, SURFACE).into());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.delivered, 1);
    assert!(view.state().paused_for_interaction);
}

#[test]
fn worker_posts_are_applied_on_pump() {
    let bus = SignalBus::new();
    let (view, count) = counting_view(SURFACE);
    view.attach(&bus);

    let poster = bus.poster();
    let worker = thread::spawn(move || {
        for _ in 0..3 {
            assert!(poster.post(Signal::ContentChanged { surface: SURFACE }));
        }
    });
    worker.join().expect("worker thread");

    assert_eq!(view.display(), DisplayOutcome::Idle);
    assert_eq!(bus.pump(), 3);
    assert!(matches!(view.display(), DisplayOutcome::Rendered(_)));
    assert_eq!(count.get(), 1);
}

#[test]
fn view_reattach_moves_to_the_new_bus() {
    let old_bus = SignalBus::new();
    let new_bus = SignalBus::new();
    let (view, _) = counting_view(SURFACE);

    view.attach(&old_bus);
    view.attach(&new_bus);
    assert_eq!(old_bus.subscriber_count(SignalName::InteractionStarted), 0);
    assert_eq!(new_bus.subscriber_count(SignalName::InteractionStarted), 1);

    old_bus.publish(LifecycleEvent::started(InteractionSource::LiveResize, SURFACE).into());
    assert!(!view.state().paused_for_interaction);
    new_bus.publish(LifecycleEvent::started(InteractionSource::LiveResize, SURFACE).into());
    assert!(view.state().live_resizing);
}

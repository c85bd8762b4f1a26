//! End-to-end tests: debouncer and live resize driving a filtered view
//! through the bus and a virtual-time timer queue.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::*;
use filterpane::{
    DisplayOutcome, DrawableSize, InteractionDebouncer, InteractionSample, InteractionSource,
    InteractionState, LifecycleEvent, LifecyclePhase, LiveResizeSource, RedrawDisposition,
    Signal, SignalBus, SignalName, TimerQueue,
};

fn sample() -> InteractionSample {
    InteractionSample::new(1.0, 0.5, ms(0))
}

// === Debounce ===

#[test]
fn burst_emits_one_start_and_one_stop() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let recorder = LifecycleRecorder::attach(&bus);
    let debouncer = InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET);

    for _ in 0..50 {
        debouncer.on_raw_event(sample());
        timers.advance(ms(10));
    }
    assert_eq!(recorder.edges(), vec![LifecyclePhase::Started]);

    timers.advance(QUIET);
    assert_eq!(
        recorder.edges(),
        vec![LifecyclePhase::Started, LifecyclePhase::Stopped]
    );
    assert_eq!(debouncer.state(), InteractionState::Idle);
}

#[test]
fn samples_at_0_50_100_140_stop_at_340() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let stopped_at = Rc::new(Cell::new(None));
    {
        let stopped_at = Rc::clone(&stopped_at);
        let clock = timers.clone();
        bus.subscribe(SignalName::InteractionStopped, move |_| {
            stopped_at.set(Some(clock.now()));
            Ok(())
        });
    }
    let debouncer = InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET);

    for t in [0, 50, 100, 140] {
        timers.advance_to(ms(t));
        debouncer.on_raw_event(sample());
    }
    timers.advance_to(ms(339));
    assert_eq!(stopped_at.get(), None);
    assert_eq!(debouncer.state(), InteractionState::Active);

    timers.advance_to(ms(400));
    assert_eq!(stopped_at.get(), Some(ms(340)));
}

#[test]
fn second_stop_is_a_no_op() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let recorder = LifecycleRecorder::attach(&bus);
    let debouncer = InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET);
    let (view, count) = counting_view(SURFACE);
    view.attach(&bus);

    debouncer.on_raw_event(sample());
    view.request_redraw();
    assert!(debouncer.on_timer_fired());
    assert!(!debouncer.on_timer_fired());
    timers.advance(QUIET);

    assert_eq!(recorder.count(LifecyclePhase::Stopped), 1);
    assert!(matches!(view.display(), DisplayOutcome::Rendered(_)));
    assert_eq!(view.display(), DisplayOutcome::Idle);
    assert_eq!(count.get(), 1);
}

#[test]
fn sample_just_before_deadline_restarts_quiet_interval() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let recorder = LifecycleRecorder::attach(&bus);
    let debouncer = InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET);

    debouncer.on_raw_event(sample());
    timers.advance_to(QUIET - ms(1));
    debouncer.on_raw_event(sample());
    timers.advance_to(QUIET);

    assert_eq!(recorder.edges(), vec![LifecyclePhase::Started]);
    assert!(debouncer.is_timer_pending());
}

#[test]
fn sample_in_same_tick_as_due_timer_cancels_it() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let recorder = LifecycleRecorder::attach(&bus);
    let debouncer = Rc::new(InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET));

    // Scheduled first, so it runs ahead of the quiet timer at the same deadline.
    {
        let debouncer = Rc::downgrade(&debouncer);
        timers.schedule(
            QUIET,
            Box::new(move || {
                if let Some(debouncer) = debouncer.upgrade() {
                    debouncer.on_raw_event(sample());
                }
            }),
        );
    }
    debouncer.on_raw_event(sample());

    assert_eq!(timers.advance_to(QUIET), 1);
    assert_eq!(recorder.edges(), vec![LifecyclePhase::Started]);
    assert_eq!(debouncer.state(), InteractionState::Active);

    timers.advance_to(QUIET * 2);
    assert_eq!(
        recorder.edges(),
        vec![LifecyclePhase::Started, LifecyclePhase::Stopped]
    );
}

#[test]
fn settling_from_a_started_handler_still_resumes_the_view() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let debouncer = Rc::new(InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET));
    {
        let debouncer = Rc::downgrade(&debouncer);
        bus.subscribe(SignalName::InteractionStarted, move |_| {
            if let Some(debouncer) = debouncer.upgrade() {
                debouncer.on_timer_fired();
            }
            Ok(())
        });
    }
    let recorder = LifecycleRecorder::attach(&bus);
    let (view, count) = counting_view(SURFACE);
    view.attach(&bus);

    debouncer.on_raw_event(sample());
    timers.advance(ms(1_000));

    assert_eq!(debouncer.state(), InteractionState::Idle);
    assert!(!view.state().paused_for_interaction);
    assert_eq!(
        recorder.edges(),
        vec![LifecyclePhase::Started, LifecyclePhase::Stopped]
    );
    view.request_redraw();
    assert!(matches!(view.display(), DisplayOutcome::Rendered(_)));
    assert_eq!(count.get(), 1);
}

// === Coalescing ===

#[test]
fn redraws_while_dragging_coalesce_into_one() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let debouncer = InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET);
    let (view, count) = counting_view(SURFACE);
    view.attach(&bus);

    debouncer.on_raw_event(sample());
    assert!(view.state().paused_for_interaction);
    for _ in 0..25 {
        assert_eq!(view.request_redraw(), RedrawDisposition::Deferred);
        view.display();
        timers.advance(ms(16));
        debouncer.on_raw_event(sample());
    }
    assert_eq!(count.get(), 0);

    timers.advance(QUIET);
    assert!(!view.state().paused_for_interaction);
    view.display();
    view.display();
    assert_eq!(count.get(), 1);
}

#[test]
fn drag_without_redraw_requests_renders_nothing() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let debouncer = InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET);
    let (view, count) = counting_view(SURFACE);
    view.attach(&bus);

    debouncer.on_raw_event(sample());
    timers.advance(QUIET);
    assert_eq!(view.display(), DisplayOutcome::Idle);
    assert_eq!(count.get(), 0);
}

#[test]
fn live_resize_with_three_redraws_recomputes_once() {
    let bus = SignalBus::new();
    let resize = LiveResizeSource::new(SURFACE, &bus);
    let (view, count) = counting_view(SURFACE);
    view.attach(&bus);

    assert!(resize.begin());
    for width in [400, 500, 600] {
        view.resize(DrawableSize::new(width, 300));
        view.request_redraw();
        view.display();
    }
    assert_eq!(count.get(), 0);
    assert!(resize.end());

    match view.display() {
        DisplayOutcome::Rendered(frame) => assert_eq!(frame.size, DrawableSize::new(600, 300)),
        other => panic!("expected a rendered frame, got {other:?}"),
    }
    assert_eq!(view.display(), DisplayOutcome::Idle);
    assert_eq!(count.get(), 1);
}

#[test]
fn content_changes_follow_the_same_path() {
    let bus = SignalBus::new();
    let resize = LiveResizeSource::new(SURFACE, &bus);
    let (view, count) = counting_view(SURFACE);
    view.attach(&bus);

    resize.begin();
    for _ in 0..4 {
        bus.publish(Signal::ContentChanged { surface: SURFACE });
    }
    // Other surfaces never touch this view.
    bus.publish(Signal::ContentChanged {
        surface: filterpane::SurfaceId::new(7),
    });
    resize.end();

    view.display();
    assert_eq!(count.get(), 1);
}

#[test]
fn drag_and_resize_overlap_resume_after_both() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let debouncer = InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET);
    let resize = LiveResizeSource::new(SURFACE, &bus);
    let (view, count) = counting_view(SURFACE);
    view.attach(&bus);

    resize.begin();
    debouncer.on_raw_event(sample());
    view.request_redraw();
    timers.advance(QUIET);
    assert!(view.state().paused_for_interaction);
    view.display();
    assert_eq!(count.get(), 0);

    resize.end();
    view.display();
    assert_eq!(count.get(), 1);
}

#[test]
fn duplicate_lifecycle_delivery_renders_once() {
    let bus = SignalBus::new();
    let (view, count) = counting_view(SURFACE);
    view.attach(&bus);

    bus.publish(LifecycleEvent::started(InteractionSource::Drag, SURFACE).into());
    bus.publish(LifecycleEvent::started(InteractionSource::Drag, SURFACE).into());
    for _ in 0..4 {
        assert_eq!(view.request_redraw(), RedrawDisposition::Deferred);
    }
    bus.publish(LifecycleEvent::stopped(InteractionSource::Drag, SURFACE).into());
    bus.publish(LifecycleEvent::stopped(InteractionSource::Drag, SURFACE).into());

    view.display();
    view.display();
    assert_eq!(count.get(), 1);
    assert!(!view.state().paused_for_interaction);
}

// === Teardown ===

#[test]
fn dropping_debouncer_cancels_pending_stop() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let recorder = LifecycleRecorder::attach(&bus);
    let debouncer = InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET);

    debouncer.on_raw_event(sample());
    drop(debouncer);
    assert_eq!(timers.advance(QUIET * 2), 0);
    assert_eq!(recorder.edges(), vec![LifecyclePhase::Started]);
}

#[test]
fn dropping_view_mid_drag_is_safe() {
    let bus = SignalBus::new();
    let timers = TimerQueue::new();
    let debouncer = InteractionDebouncer::new(SURFACE, &bus, &timers, QUIET);
    let (view, count) = counting_view(SURFACE);
    view.attach(&bus);

    debouncer.on_raw_event(sample());
    view.request_redraw();
    drop(view);

    timers.advance(QUIET);
    assert_eq!(debouncer.state(), InteractionState::Idle);
    assert_eq!(count.get(), 0);
    assert_eq!(
        bus.subscriber_count(SignalName::InteractionStopped),
        0
    );
}

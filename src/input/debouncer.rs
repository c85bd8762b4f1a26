//! Drag debouncing.
//!
//! Converts the raw stream of pointer-drag samples for one surface into two
//! edges on the bus: drag started (first sample while idle) and drag stopped
//! (no sample for the full quiet interval). Each sample cancels the pending
//! quiet timer and schedules a fresh one.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::Config;
use crate::events::{InteractionSource, LifecycleEvent, SignalBus, SurfaceId};
use crate::timer::{TimerHandle, TimerQueue};

/// Whether the surface is currently being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Active,
}

/// One raw continuous-interaction sample from the windowing system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSample {
    /// Pointer delta since the previous sample, in points.
    pub dx: f64,
    pub dy: f64,
    /// Event timestamp as reported by the windowing system.
    pub timestamp: Duration,
}

impl InteractionSample {
    pub fn new(dx: f64, dy: f64, timestamp: Duration) -> Self {
        Self { dx, dy, timestamp }
    }
}

#[derive(Default)]
struct DebouncerCore {
    state: InteractionState,
    /// The only live quiet timer, if any.
    timer: Option<TimerHandle>,
    /// Bumped on every raw sample; a timer only settles its own generation.
    generation: u64,
    last_sample: Option<InteractionSample>,
}

struct Shared {
    surface: SurfaceId,
    quiet_interval: Duration,
    bus: SignalBus,
    timers: TimerQueue,
    core: RefCell<DebouncerCore>,
    /// Edges waiting to be published, in emission order.
    outbox: RefCell<VecDeque<LifecycleEvent>>,
    emitting: Cell<bool>,
}

impl Shared {
    fn quiet_timer_fired(&self, generation: u64) {
        if self.core.borrow().generation != generation {
            trace!(surface = %self.surface, "stale quiet timer ignored");
            return;
        }
        self.settle();
    }

    fn settle(&self) -> bool {
        // Borrow released before publishing; handlers may call back in.
        let stopped = {
            let mut core = self.core.borrow_mut();
            if let Some(timer) = core.timer.take() {
                timer.cancel();
            }
            let was_active = core.state == InteractionState::Active;
            core.state = InteractionState::Idle;
            was_active
        };

        if stopped {
            debug!(surface = %self.surface, "drag stopped");
            self.emit(LifecycleEvent::stopped(InteractionSource::Drag, self.surface));
        } else {
            trace!(surface = %self.surface, "redundant stop ignored");
        }
        stopped
    }

    /// Publish `event` after any edge currently being dispatched.
    ///
    /// A handler that feeds a sample or settles the debouncer from inside a
    /// dispatch gets its edge queued, so every subscriber sees Started
    /// before the matching Stopped.
    fn emit(&self, event: LifecycleEvent) {
        self.outbox.borrow_mut().push_back(event);
        if self.emitting.replace(true) {
            trace!(surface = %self.surface, phase = ?event.phase, "edge queued behind dispatch");
            return;
        }
        loop {
            let next = self.outbox.borrow_mut().pop_front();
            let Some(event) = next else { break };
            self.bus.publish(event.into());
        }
        self.emitting.set(false);
    }
}

/// Debouncer bound 1:1 to one interactive surface.
///
/// Dropping it cancels the pending quiet timer without firing it; the
/// timer task only holds a weak reference and cannot call back into a
/// dropped debouncer.
pub struct InteractionDebouncer {
    shared: Rc<Shared>,
}

impl InteractionDebouncer {
    pub fn new(
        surface: SurfaceId,
        bus: &SignalBus,
        timers: &TimerQueue,
        quiet_interval: Duration,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                surface,
                quiet_interval,
                bus: bus.clone(),
                timers: timers.clone(),
                core: RefCell::new(DebouncerCore::default()),
                outbox: RefCell::new(VecDeque::new()),
                emitting: Cell::new(false),
            }),
        }
    }

    /// Build a debouncer using the configured quiet interval.
    pub fn from_config(
        surface: SurfaceId,
        bus: &SignalBus,
        timers: &TimerQueue,
        config: &Config,
    ) -> Self {
        Self::new(surface, bus, timers, config.quiet_interval())
    }

    /// Feed one raw drag sample.
    ///
    /// Emits drag-started if the surface was idle, then (re)starts the quiet
    /// timer. A pending timer is cancelled first, so a sample arriving in
    /// the same tick as a due timer suppresses that timer's stop edge.
    pub fn on_raw_event(&self, sample: InteractionSample) {
        let (started, generation) = {
            let mut core = self.shared.core.borrow_mut();
            core.last_sample = Some(sample);
            if let Some(timer) = core.timer.take() {
                timer.cancel();
            }
            core.generation += 1;
            let started = core.state == InteractionState::Idle;
            core.state = InteractionState::Active;
            (started, core.generation)
        };

        let weak: Weak<Shared> = Rc::downgrade(&self.shared);
        let handle = self.shared.timers.schedule(
            self.shared.quiet_interval,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.quiet_timer_fired(generation);
                }
            }),
        );
        self.shared.core.borrow_mut().timer = Some(handle);

        if started {
            debug!(surface = %self.shared.surface, "drag started");
            self.shared
                .emit(LifecycleEvent::started(InteractionSource::Drag, self.shared.surface));
        }
    }

    /// Settle the interaction now: Active -> Idle and emit drag-stopped.
    ///
    /// This is what the quiet timer runs. Hosts may also call it directly
    /// (e.g. on mouse-up) to settle without waiting. A no-op while idle.
    /// Returns whether a stop edge was emitted.
    pub fn on_timer_fired(&self) -> bool {
        self.shared.settle()
    }

    pub fn state(&self) -> InteractionState {
        self.shared.core.borrow().state
    }

    /// True while a quiet timer is waiting to fire.
    pub fn is_timer_pending(&self) -> bool {
        self.shared
            .core
            .borrow()
            .timer
            .as_ref()
            .is_some_and(TimerHandle::is_pending)
    }

    pub fn last_sample(&self) -> Option<InteractionSample> {
        self.shared.core.borrow().last_sample
    }

    pub fn quiet_interval(&self) -> Duration {
        self.shared.quiet_interval
    }

    pub fn surface(&self) -> SurfaceId {
        self.shared.surface
    }
}

impl Drop for InteractionDebouncer {
    fn drop(&mut self) {
        if let Ok(mut core) = self.shared.core.try_borrow_mut() {
            if let Some(timer) = core.timer.take() {
                timer.cancel();
                trace!(surface = %self.shared.surface, "quiet timer cancelled on teardown");
            }
        }
    }
}

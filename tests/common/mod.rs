//! Shared fakes for the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use filterpane::{
    FilteredView, FrameRequest, LifecyclePhase, RenderError, Signal, SignalBus, SignalName,
    SurfaceId,
};

pub const SURFACE: SurfaceId = SurfaceId::new(1);
pub const QUIET: Duration = Duration::from_millis(200);

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// A filtered view whose filter stage only counts invocations.
pub fn counting_view(surface: SurfaceId) -> (FilteredView, Rc<Cell<u32>>) {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    let view = FilteredView::new(surface, move |_: &FrameRequest| -> Result<(), RenderError> {
        c.set(c.get() + 1);
        Ok(())
    });
    (view, count)
}

/// Every lifecycle edge published on a bus, in order.
#[derive(Clone, Default)]
pub struct LifecycleRecorder {
    edges: Rc<RefCell<Vec<LifecyclePhase>>>,
}

impl LifecycleRecorder {
    pub fn attach(bus: &SignalBus) -> Self {
        let recorder = Self::default();
        for name in [SignalName::InteractionStarted, SignalName::InteractionStopped] {
            let edges = Rc::clone(&recorder.edges);
            bus.subscribe(name, move |signal| {
                if let Signal::Lifecycle(event) = signal {
                    edges.borrow_mut().push(event.phase);
                }
                Ok(())
            });
        }
        recorder
    }

    pub fn edges(&self) -> Vec<LifecyclePhase> {
        self.edges.borrow().clone()
    }

    pub fn count(&self, phase: LifecyclePhase) -> usize {
        self.edges.borrow().iter().filter(|p| **p == phase).count()
    }
}

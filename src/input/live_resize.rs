//! Live-resize source.
//!
//! The windowing system brackets a live resize with explicit begin/end
//! callbacks, so no debouncing is needed: begin maps to a started edge and
//! end to a stopped edge on the same bus the drag debouncer uses.

use std::cell::Cell;

use tracing::{debug, trace};

use crate::events::{InteractionSource, LifecycleEvent, SignalBus, SurfaceId};

pub struct LiveResizeSource {
    surface: SurfaceId,
    bus: SignalBus,
    resizing: Cell<bool>,
}

impl LiveResizeSource {
    pub fn new(surface: SurfaceId, bus: &SignalBus) -> Self {
        Self {
            surface,
            bus: bus.clone(),
            resizing: Cell::new(false),
        }
    }

    /// The view will start a live resize. Returns whether an edge was emitted.
    pub fn begin(&self) -> bool {
        if self.resizing.replace(true) {
            trace!(surface = %self.surface, "nested live-resize begin ignored");
            return false;
        }
        debug!(surface = %self.surface, "live resize started");
        self.bus.publish(
            LifecycleEvent::started(InteractionSource::LiveResize, self.surface).into(),
        );
        true
    }

    /// The view finished its live resize. Returns whether an edge was emitted.
    pub fn end(&self) -> bool {
        if !self.resizing.replace(false) {
            trace!(surface = %self.surface, "live-resize end without begin ignored");
            return false;
        }
        debug!(surface = %self.surface, "live resize ended");
        self.bus.publish(
            LifecycleEvent::stopped(InteractionSource::LiveResize, self.surface).into(),
        );
        true
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing.get()
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }
}

//! The filtered view: on-demand render scheduling.
//!
//! The view never runs a frame clock. It renders only after
//! [`FilteredView::request_redraw`] (or a content change) marked it dirty and
//! the host ran a compositor pass with [`FilteredView::display`].
//!
//! While a drag or live resize is in progress the view is paused: redraw
//! requests only set `needs_redraw`, however many arrive. When the last
//! interaction stops, exactly one redraw is issued if any was requested.
//! Drag and live resize share this one suppression path.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use super::surface::{DrawableSize, FilterStage, FrameRequest, SurfaceDescriptor};
use crate::error::RenderError;
use crate::events::{
    InteractionSource, LifecycleEvent, LifecyclePhase, Lifeline, Signal, SignalBus, SignalName,
    SubscriptionHandle, SurfaceId,
};

/// What `request_redraw` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawDisposition {
    /// The surface is marked dirty for the next compositor pass.
    Scheduled,
    /// Paused for interaction; one redraw will be issued on resume.
    Deferred,
}

/// What a compositor pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOutcome {
    /// Nothing was dirty.
    Idle,
    /// Dirty, but paused for interaction; converted into a deferred redraw.
    Suppressed,
    /// The filter stage ran for this frame.
    Rendered(FrameRequest),
    /// The filter stage failed; the frame is not retried automatically.
    Failed(RenderError),
}

/// Snapshot of the view's scheduling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderViewState {
    pub paused_for_interaction: bool,
    pub needs_redraw: bool,
    pub dirty: bool,
    pub dragging: bool,
    pub live_resizing: bool,
}

#[derive(Debug, Default)]
struct ViewState {
    dragging: bool,
    live_resizing: bool,
    needs_redraw: bool,
    dirty: bool,
    size: DrawableSize,
    frame_seq: u64,
    frames_rendered: u64,
    render_failures: u64,
}

impl ViewState {
    fn paused(&self) -> bool {
        self.dragging || self.live_resizing
    }

    fn source_flag(&mut self, source: InteractionSource) -> &mut bool {
        match source {
            InteractionSource::Drag => &mut self.dragging,
            InteractionSource::LiveResize => &mut self.live_resizing,
        }
    }
}

struct ViewShared {
    surface: SurfaceId,
    descriptor: SurfaceDescriptor,
    state: RefCell<ViewState>,
    stage: RefCell<Box<dyn FilterStage>>,
}

impl ViewShared {
    fn on_lifecycle(&self, event: &LifecycleEvent) {
        if event.surface != self.surface {
            return;
        }

        let reissue = {
            let mut st = self.state.borrow_mut();
            let flag = st.source_flag(event.source);
            match event.phase {
                LifecyclePhase::Started => {
                    if *flag {
                        trace!(surface = %self.surface, source = ?event.source, "redundant start ignored");
                        return;
                    }
                    *flag = true;
                    debug!(surface = %self.surface, source = ?event.source, "paused for interaction");
                    false
                }
                LifecyclePhase::Stopped => {
                    if !*flag {
                        trace!(surface = %self.surface, source = ?event.source, "redundant stop ignored");
                        return;
                    }
                    *flag = false;
                    if st.paused() {
                        debug!(surface = %self.surface, "another interaction still active");
                        false
                    } else {
                        debug!(surface = %self.surface, pending = st.needs_redraw, "resumed");
                        std::mem::take(&mut st.needs_redraw)
                    }
                }
            }
        };

        if reissue {
            self.request_redraw();
        }
    }

    fn request_redraw(&self) -> RedrawDisposition {
        let mut st = self.state.borrow_mut();
        if st.paused() {
            if st.needs_redraw {
                trace!(surface = %self.surface, "redraw already deferred");
            }
            st.needs_redraw = true;
            RedrawDisposition::Deferred
        } else {
            st.dirty = true;
            RedrawDisposition::Scheduled
        }
    }

    fn display(&self) -> DisplayOutcome {
        let request = {
            let mut st = self.state.borrow_mut();
            if !st.dirty {
                return DisplayOutcome::Idle;
            }
            st.dirty = false;
            if st.paused() {
                st.needs_redraw = true;
                trace!(surface = %self.surface, "compositor pass suppressed");
                return DisplayOutcome::Suppressed;
            }
            if st.size.is_empty() {
                st.render_failures += 1;
                let err = RenderError::DrawableUnavailable(self.surface);
                warn!(surface = %self.surface, error = %err, "frame skipped");
                return DisplayOutcome::Failed(err);
            }
            st.frame_seq += 1;
            FrameRequest {
                surface: self.surface,
                size: st.size,
                frame: st.frame_seq,
            }
        };

        let result = match self.stage.try_borrow_mut() {
            Ok(mut stage) => stage.encode(&request),
            Err(_) => Err(RenderError::Stage("filter stage re-entered".to_string())),
        };

        let mut st = self.state.borrow_mut();
        match result {
            Ok(()) => {
                st.frames_rendered += 1;
                debug!(surface = %self.surface, frame = request.frame, "frame rendered");
                DisplayOutcome::Rendered(request)
            }
            Err(err) => {
                st.render_failures += 1;
                warn!(surface = %self.surface, frame = request.frame, error = %err, "filter stage failed");
                DisplayOutcome::Failed(err)
            }
        }
    }

    /// Forget interaction and deferred work; used when leaving the bus.
    fn reset(&self) {
        let mut st = self.state.borrow_mut();
        st.dragging = false;
        st.live_resizing = false;
        st.needs_redraw = false;
    }
}

struct Attachment {
    bus: SignalBus,
    handles: Vec<SubscriptionHandle>,
    // Dropped with the attachment; the bus skips our handlers from then on.
    _lifeline: Lifeline,
}

/// On-demand render scheduler for one filtered surface.
pub struct FilteredView {
    shared: Rc<ViewShared>,
    attachment: RefCell<Option<Attachment>>,
}

impl FilteredView {
    pub fn new(surface: SurfaceId, stage: impl FilterStage + 'static) -> Self {
        Self::with_descriptor(surface, SurfaceDescriptor::FILTERED, stage)
    }

    pub fn with_descriptor(
        surface: SurfaceId,
        descriptor: SurfaceDescriptor,
        stage: impl FilterStage + 'static,
    ) -> Self {
        if !descriptor.supports_on_demand_filtering() {
            warn!(%surface, ?descriptor, "surface descriptor does not allow on-demand filtering");
        }
        Self {
            shared: Rc::new(ViewShared {
                surface,
                descriptor,
                state: RefCell::new(ViewState::default()),
                stage: RefCell::new(Box::new(stage)),
            }),
            attachment: RefCell::new(None),
        }
    }

    /// Subscribe to lifecycle and content signals for this view's surface.
    ///
    /// Re-attaching first detaches from the previous bus.
    pub fn attach(&self, bus: &SignalBus) {
        self.detach();

        let lifeline = Lifeline::new();
        let mut handles = Vec::with_capacity(3);

        for name in [SignalName::InteractionStarted, SignalName::InteractionStopped] {
            let weak: Weak<ViewShared> = Rc::downgrade(&self.shared);
            handles.push(bus.subscribe_owned(name, &lifeline, move |signal| {
                if let (Some(view), Signal::Lifecycle(event)) = (weak.upgrade(), signal) {
                    view.on_lifecycle(event);
                }
                Ok(())
            }));
        }

        let weak: Weak<ViewShared> = Rc::downgrade(&self.shared);
        handles.push(bus.subscribe_owned(SignalName::ContentChanged, &lifeline, move |signal| {
            if let Some(view) = weak.upgrade() {
                if signal.surface() == Some(view.surface) {
                    view.request_redraw();
                }
            }
            Ok(())
        }));

        debug!(surface = %self.shared.surface, "view attached");
        *self.attachment.borrow_mut() = Some(Attachment {
            bus: bus.clone(),
            handles,
            _lifeline: lifeline,
        });
    }

    /// Leave the bus. Any deferred redraw is discarded and the interaction
    /// pause is lifted, since the matching stop edges will not arrive.
    /// Returns whether the view was attached.
    pub fn detach(&self) -> bool {
        let Some(attachment) = self.attachment.borrow_mut().take() else {
            return false;
        };
        for handle in &attachment.handles {
            attachment.bus.unsubscribe(*handle);
        }
        self.shared.reset();
        debug!(surface = %self.shared.surface, "view detached");
        true
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.borrow().is_some()
    }

    /// Apply one lifecycle edge. Edges for other surfaces are ignored;
    /// repeated edges are no-ops.
    pub fn on_lifecycle(&self, event: &LifecycleEvent) {
        self.shared.on_lifecycle(event);
    }

    /// Ask for the filtered content to be recomputed.
    ///
    /// While paused this only records that a redraw is needed; otherwise it
    /// marks the surface dirty for the next compositor pass.
    pub fn request_redraw(&self) -> RedrawDisposition {
        self.shared.request_redraw()
    }

    /// Run one compositor pass: invoke the filter stage if dirty and not
    /// paused.
    pub fn display(&self) -> DisplayOutcome {
        self.shared.display()
    }

    /// Resize the drawable backing store. Returns whether the size changed.
    pub fn resize(&self, size: DrawableSize) -> bool {
        {
            let mut st = self.shared.state.borrow_mut();
            if st.size == size {
                return false;
            }
            st.size = size;
        }
        trace!(surface = %self.shared.surface, width = size.width, height = size.height, "drawable resized");
        self.shared.request_redraw();
        true
    }

    pub fn state(&self) -> RenderViewState {
        let st = self.shared.state.borrow();
        RenderViewState {
            paused_for_interaction: st.paused(),
            needs_redraw: st.needs_redraw,
            dirty: st.dirty,
            dragging: st.dragging,
            live_resizing: st.live_resizing,
        }
    }

    pub fn surface(&self) -> SurfaceId {
        self.shared.surface
    }

    pub fn descriptor(&self) -> SurfaceDescriptor {
        self.shared.descriptor
    }

    pub fn size(&self) -> DrawableSize {
        self.shared.state.borrow().size
    }

    pub fn frames_rendered(&self) -> u64 {
        self.shared.state.borrow().frames_rendered
    }

    pub fn render_failures(&self) -> u64 {
        self.shared.state.borrow().render_failures
    }
}

impl Drop for FilteredView {
    fn drop(&mut self) {
        self.detach();
    }
}

//! Local NSEvent monitor for drag samples.

use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::debug;

use super::bridge::{get_class, id, msg_send, RcBlock};
use crate::error::Result;
use crate::input::{InteractionDebouncer, InteractionSample};

// NSEventMaskLeftMouseDragged
const LEFT_MOUSE_DRAGGED_MASK: u64 = 1 << 6;

/// An installed event monitor; removed on drop.
pub struct MonitorToken {
    monitor: id,
}

impl Drop for MonitorToken {
    fn drop(&mut self) {
        if let Ok(cls) = get_class("NSEvent") {
            unsafe {
                let _: () = msg_send![cls, removeMonitor: self.monitor];
            }
        }
    }
}

/// Forward left-mouse drags inside `window` to `debouncer`.
///
/// Events are passed through unchanged.
///
/// # Safety
/// - `window` must be a valid NSWindow pointer that outlives the token.
/// - Must be called from the main thread.
pub unsafe fn install_drag_monitor(
    window: id,
    debouncer: &Rc<InteractionDebouncer>,
) -> Result<MonitorToken> {
    let cls = get_class("NSEvent")?;
    let weak: Weak<InteractionDebouncer> = Rc::downgrade(debouncer);

    let block = RcBlock::new(move |event: id| -> id {
        unsafe {
            let event_window: id = msg_send![event, window];
            if event_window == window {
                if let Some(debouncer) = weak.upgrade() {
                    let dx: f64 = msg_send![event, deltaX];
                    let dy: f64 = msg_send![event, deltaY];
                    let timestamp: f64 = msg_send![event, timestamp];
                    debouncer.on_raw_event(InteractionSample::new(
                        dx,
                        dy,
                        Duration::from_secs_f64(timestamp.max(0.0)),
                    ));
                }
            }
        }
        event
    });

    let monitor: id = msg_send![
        cls,
        addLocalMonitorForEventsMatchingMask: LEFT_MOUSE_DRAGGED_MASK,
        handler: &*block
    ];
    debug!(surface = %debouncer.surface(), "drag monitor installed");
    Ok(MonitorToken { monitor })
}

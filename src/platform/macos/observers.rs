//! Notification-center observers.
//!
//! - `NSUserDefaultsDidChangeNotification` publishes `ConfigurationChanged`
//! - `NSWindowWillStartLiveResizeNotification` / `NSWindowDidEndLiveResizeNotification`
//!   drive a [`LiveResizeSource`]

use std::rc::{Rc, Weak};

use tracing::debug;

use super::bridge::{get_class, id, msg_send, nil, nsstring, RcBlock};
use crate::error::Result;
use crate::events::{Signal, SignalBus};
use crate::input::LiveResizeSource;

/// Registered observers. Removed from the notification center on drop.
pub struct ObserverToken {
    center: id,
    observers: Vec<id>,
}

impl ObserverToken {
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Drop for ObserverToken {
    fn drop(&mut self) {
        for observer in self.observers.drain(..) {
            unsafe {
                let _: () = msg_send![self.center, removeObserver: observer];
            }
        }
    }
}

unsafe fn default_center() -> Result<id> {
    let cls = get_class("NSNotificationCenter")?;
    let center: id = msg_send![cls, defaultCenter];
    Ok(center)
}

unsafe fn main_queue() -> Result<id> {
    let cls = get_class("NSOperationQueue")?;
    let queue: id = msg_send![cls, mainQueue];
    Ok(queue)
}

/// Observe user-defaults changes and publish `ConfigurationChanged`.
///
/// The notification is delivered on the main queue whatever thread posted
/// it. Each delivery first publishes anything workers queued through a
/// `SignalPoster`.
///
/// # Safety
/// Must be called from the main thread.
pub unsafe fn observe_defaults(bus: &SignalBus) -> Result<ObserverToken> {
    let center = default_center()?;
    let queue = main_queue()?;
    let name = nsstring("NSUserDefaultsDidChangeNotification");
    let bus = bus.clone();
    let block = RcBlock::new(move |_note: id| {
        let posted = bus.pump();
        if posted > 0 {
            debug!(posted, "drained worker signals");
        }
        bus.publish(Signal::ConfigurationChanged);
    });
    let observer: id = msg_send![
        center,
        addObserverForName: &*name,
        object: nil,
        queue: queue,
        usingBlock: &*block
    ];
    Ok(ObserverToken {
        center,
        observers: vec![observer],
    })
}

/// Feed a window's live-resize notifications into `source`.
///
/// # Safety
/// - `window` must be a valid NSWindow pointer that outlives the token.
/// - Must be called from the main thread.
pub unsafe fn observe_live_resize(
    window: id,
    source: &Rc<LiveResizeSource>,
) -> Result<ObserverToken> {
    let center = default_center()?;
    let mut observers = Vec::with_capacity(2);

    let edges: [(&str, fn(&LiveResizeSource) -> bool); 2] = [
        ("NSWindowWillStartLiveResizeNotification", LiveResizeSource::begin),
        ("NSWindowDidEndLiveResizeNotification", LiveResizeSource::end),
    ];
    for (notification, edge) in edges {
        let weak: Weak<LiveResizeSource> = Rc::downgrade(source);
        let name = nsstring(notification);
        let block = RcBlock::new(move |_note: id| {
            if let Some(source) = weak.upgrade() {
                edge(&source);
            }
        });
        let observer: id = msg_send![
            center,
            addObserverForName: &*name,
            object: window,
            queue: nil,
            usingBlock: &*block
        ];
        observers.push(observer);
    }

    debug!(surface = %source.surface(), "live resize observers installed");
    Ok(ObserverToken { center, observers })
}

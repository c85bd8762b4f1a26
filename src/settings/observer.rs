//! Settings observer.
//!
//! Re-reads the whole settings snapshot on every `ConfigurationChanged`
//! signal and re-derives the presentation state. The signal carries no
//! payload, so a refresh is idempotent and cheap to repeat.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::store::SettingsSource;
use crate::events::{Lifeline, SignalBus, SignalName, SubscriptionHandle};
use crate::model::PresentationState;

struct ObserverShared {
    source: Rc<dyn SettingsSource>,
    presentation: RefCell<PresentationState>,
    refreshes: Cell<u64>,
}

impl ObserverShared {
    fn refresh(&self) -> bool {
        let next = PresentationState::derive(&self.source.current());
        self.refreshes.set(self.refreshes.get() + 1);
        let previous = self.presentation.replace(next);
        let changed = previous != next;
        if changed {
            debug!(vision = next.vision_label, "presentation updated");
        } else {
            trace!("settings refresh: no visible change");
        }
        changed
    }
}

struct Registration {
    bus: SignalBus,
    handle: SubscriptionHandle,
    _lifeline: Lifeline,
}

pub struct SettingsObserver {
    shared: Rc<ObserverShared>,
    registration: RefCell<Option<Registration>>,
}

impl SettingsObserver {
    /// Create an observer and derive the initial presentation from `source`.
    pub fn new(source: Rc<dyn SettingsSource>) -> Self {
        let presentation = PresentationState::derive(&source.current());
        Self {
            shared: Rc::new(ObserverShared {
                source,
                presentation: RefCell::new(presentation),
                refreshes: Cell::new(0),
            }),
            registration: RefCell::new(None),
        }
    }

    /// Start listening for `ConfigurationChanged` on `bus`, replacing any
    /// earlier registration.
    pub fn observe(&self, bus: &SignalBus) {
        self.stop();
        let lifeline = Lifeline::new();
        let weak: Weak<ObserverShared> = Rc::downgrade(&self.shared);
        let handle = bus.subscribe_owned(SignalName::ConfigurationChanged, &lifeline, move |_| {
            if let Some(shared) = weak.upgrade() {
                shared.refresh();
            }
            Ok(())
        });
        *self.registration.borrow_mut() = Some(Registration {
            bus: bus.clone(),
            handle,
            _lifeline: lifeline,
        });
    }

    /// Stop listening. Returns whether the observer was registered.
    pub fn stop(&self) -> bool {
        match self.registration.borrow_mut().take() {
            Some(reg) => reg.bus.unsubscribe(reg.handle),
            None => false,
        }
    }

    pub fn is_observing(&self) -> bool {
        self.registration.borrow().is_some()
    }

    /// Re-read the settings now. Returns whether the presentation changed.
    pub fn refresh(&self) -> bool {
        self.shared.refresh()
    }

    pub fn presentation(&self) -> PresentationState {
        *self.shared.presentation.borrow()
    }

    /// Number of refreshes run so far, explicit or signal-driven.
    pub fn refresh_count(&self) -> u64 {
        self.shared.refreshes.get()
    }
}

impl Drop for SettingsObserver {
    fn drop(&mut self) {
        self.stop();
    }
}

//! In-memory settings store.
//!
//! Plays the part of the platform defaults database: it holds the current
//! [`FilterSettings`] and publishes `ConfigurationChanged` on the bus after
//! every change. Observers are not told what changed; they re-read.

use std::cell::RefCell;

use tracing::debug;

use crate::events::{Signal, SignalBus};
use crate::model::{FilterSettings, RefreshSpeed, ViewArea, VisionKind};

/// Read access to the current settings.
pub trait SettingsSource {
    fn current(&self) -> FilterSettings;
}

pub struct SettingsStore {
    settings: RefCell<FilterSettings>,
    bus: SignalBus,
}

impl SettingsStore {
    pub fn new(bus: &SignalBus) -> Self {
        Self::with_settings(bus, FilterSettings::default())
    }

    pub fn with_settings(bus: &SignalBus, settings: FilterSettings) -> Self {
        Self {
            settings: RefCell::new(settings),
            bus: bus.clone(),
        }
    }

    /// Apply `f` to the settings. Publishes `ConfigurationChanged` only if
    /// something actually changed. Returns whether it did.
    pub fn update(&self, f: impl FnOnce(&mut FilterSettings)) -> bool {
        let changed = {
            let mut settings = self.settings.borrow_mut();
            let before = *settings;
            f(&mut settings);
            *settings != before
        };
        if changed {
            debug!("settings changed");
            self.bus.publish(Signal::ConfigurationChanged);
        }
        changed
    }

    pub fn set_vision(&self, vision: VisionKind) -> bool {
        self.update(|s| s.vision = vision)
    }

    pub fn set_refresh_speed(&self, speed: RefreshSpeed) -> bool {
        self.update(|s| s.refresh_speed = speed)
    }

    pub fn set_view_area(&self, area: ViewArea) -> bool {
        self.update(|s| s.view_area = area)
    }
}

impl SettingsSource for SettingsStore {
    fn current(&self) -> FilterSettings {
        *self.settings.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SignalName;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_change_publishes_once() {
        let bus = SignalBus::new();
        let count = Rc::new(Cell::new(0));
        {
            let count = Rc::clone(&count);
            bus.subscribe(SignalName::ConfigurationChanged, move |_| {
                count.set(count.get() + 1);
                Ok(())
            });
        }
        let store = SettingsStore::new(&bus);

        assert!(store.set_refresh_speed(RefreshSpeed::Slow));
        assert!(!store.set_refresh_speed(RefreshSpeed::Slow));
        assert_eq!(count.get(), 1);
        assert_eq!(store.current().refresh_speed, RefreshSpeed::Slow);
    }

    #[test]
    fn test_handlers_can_read_during_publish() {
        let bus = SignalBus::new();
        let store = Rc::new(SettingsStore::new(&bus));
        let seen = Rc::new(Cell::new(ViewArea::UnderWindow));
        {
            let store = Rc::clone(&store);
            let seen = Rc::clone(&seen);
            bus.subscribe(SignalName::ConfigurationChanged, move |_| {
                seen.set(store.current().view_area);
                Ok(())
            });
        }
        store.set_view_area(ViewArea::AroundMouse);
        assert_eq!(seen.get(), ViewArea::AroundMouse);
    }
}

//! User settings and their observer.

pub mod observer;
pub mod store;

pub use observer::SettingsObserver;
pub use store::{SettingsSource, SettingsStore};

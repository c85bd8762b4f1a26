//! macOS adapter: connects AppKit input and notifications to the core.
//!
//! - bridge.rs: objc2 helpers
//! - monitors.rs: drag samples -> `InteractionDebouncer`
//! - observers.rs: live resize -> `LiveResizeSource`, defaults -> `ConfigurationChanged`
//! - run_loop.rs: one-shot NSTimer driving the timer queue

pub mod bridge;
pub mod monitors;
pub mod observers;
pub mod run_loop;

pub use monitors::{install_drag_monitor, MonitorToken};
pub use observers::{observe_defaults, observe_live_resize, ObserverToken};
pub use run_loop::RunLoopTimer;

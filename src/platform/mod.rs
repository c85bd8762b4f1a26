//! Platform adapters.
//!
//! The core is platform-neutral. Each adapter feeds windowing-system events
//! into it and drives its timers from the native run loop.

#[cfg(target_os = "macos")]
pub mod macos;

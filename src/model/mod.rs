//! Domain model.
//!
//! Pure Rust, no FFI: the filter settings, the presentation derived from
//! them, and configuration constants.

pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{FilterSettings, PresentationState, RefreshSpeed, ViewArea, VisionKind};

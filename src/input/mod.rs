//! Interaction sources.
//!
//! This module contains the producers of lifecycle edges:
//! - debouncer.rs: pointer-drag samples -> debounced started/stopped edges
//! - live_resize.rs: begin/end live-resize -> started/stopped edges

pub mod debouncer;
pub mod live_resize;

pub use debouncer::{InteractionDebouncer, InteractionSample, InteractionState};
pub use live_resize::LiveResizeSource;

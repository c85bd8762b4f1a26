//! Configuration constants and default values.
//!
//! This module contains the tuning defaults for the interaction core,
//! the surface defaults for the filtered view, and the icon names used
//! by the settings presentation.

// === Interaction Defaults ===

/// Default debounce quiet interval in milliseconds.
///
/// Exceeds the typical inter-sample gap of a human drag while staying
/// imperceptible as added latency.
pub const DEFAULT_QUIET_INTERVAL_MS: u64 = 200;

/// Minimum accepted quiet interval in milliseconds.
pub const MIN_QUIET_INTERVAL_MS: u64 = 10;

/// Maximum accepted quiet interval in milliseconds.
pub const MAX_QUIET_INTERVAL_MS: u64 = 5_000;

// === Surface Defaults ===

/// Default drawable width in pixels.
pub const DEFAULT_DRAWABLE_WIDTH: u32 = 320;

/// Default drawable height in pixels.
pub const DEFAULT_DRAWABLE_HEIGHT: u32 = 240;

// === Logging ===

/// Default log filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// === Icon Names ===

/// Refresh speed icon shown for the normal refresh rate.
pub const ICON_REFRESH_NORMAL: &str = "RefreshSpeedNormal";

/// Refresh speed icon shown for the slow refresh rate.
pub const ICON_REFRESH_SLOW: &str = "RefreshSpeedSlow";

/// View area icon shown when filtering what is under the window.
pub const ICON_AREA_UNDER_WINDOW: &str = "ViewAreaUnderWindow";

/// View area icon shown when filtering around the mouse pointer.
pub const ICON_AREA_AROUND_MOUSE: &str = "ViewAreaAroundMouse";

//! Interaction-aware render coalescing for on-demand, GPU-filtered views.
//!
//! A filtered view re-runs an expensive filter pass only when asked. While
//! the user drags or live-resizes the window, redraw requests are coalesced
//! and exactly one redraw is issued when the interaction settles.
//!
//! The core is single-threaded and free of FFI so it can be tested as plain
//! Rust; `platform` holds the native adapters.

pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod model;
pub mod observability;
pub mod platform;
pub mod render;
pub mod settings;
pub mod timer;

pub use config::Config;
pub use error::{ConfigError, FilterPaneError, HandlerError, RenderError, Result};
pub use events::{
    DispatchReport, InteractionSource, LifecycleEvent, LifecyclePhase, Lifeline, Signal,
    SignalBus, SignalName, SignalPoster, SubscriptionHandle, SurfaceId,
};
pub use input::{InteractionDebouncer, InteractionSample, InteractionState, LiveResizeSource};
pub use model::{FilterSettings, PresentationState, RefreshSpeed, ViewArea, VisionKind};
pub use render::{
    DisplayOutcome, DrawableSize, FilterStage, FilteredView, FrameRequest, RedrawDisposition,
    SurfaceDescriptor,
};
pub use settings::{SettingsObserver, SettingsSource, SettingsStore};
pub use timer::{ClockSource, TimerHandle, TimerQueue, Waker};

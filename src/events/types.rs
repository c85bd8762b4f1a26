//! Signals carried by the bus.
//!
//! These are immutable value types. They flow from producers (drag
//! debouncers, live-resize sources, the settings store, content workers)
//! through the [`SignalBus`](super::SignalBus) to subscribers. The bus keeps
//! no history; a signal nobody is subscribed to is simply dropped.

use std::fmt;

/// Identity of one interactive surface (one window and its filtered view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u32);

impl SurfaceId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// What kind of continuous interaction produced a lifecycle edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionSource {
    /// Pointer drag of the window.
    Drag,
    /// Live resize of the window.
    LiveResize,
}

/// Edge of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    Started,
    Stopped,
}

/// A discrete Started/Stopped edge derived from a continuous interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LifecycleEvent {
    pub phase: LifecyclePhase,
    pub source: InteractionSource,
    pub surface: SurfaceId,
}

impl LifecycleEvent {
    pub fn started(source: InteractionSource, surface: SurfaceId) -> Self {
        Self {
            phase: LifecyclePhase::Started,
            source,
            surface,
        }
    }

    pub fn stopped(source: InteractionSource, surface: SurfaceId) -> Self {
        Self {
            phase: LifecyclePhase::Stopped,
            source,
            surface,
        }
    }
}

/// Subscription key. Every [`Signal`] maps to exactly one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalName {
    InteractionStarted,
    InteractionStopped,
    ConfigurationChanged,
    ContentChanged,
}

impl SignalName {
    /// Stable dotted name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalName::InteractionStarted => "interaction.started",
            SignalName::InteractionStopped => "interaction.stopped",
            SignalName::ConfigurationChanged => "configuration.changed",
            SignalName::ContentChanged => "content.changed",
        }
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload published on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    // === Interaction Lifecycle ===
    /// A drag or live resize started or stopped on a surface.
    Lifecycle(LifecycleEvent),

    // === Configuration ===
    /// Global configuration changed; observers re-read it themselves.
    ConfigurationChanged,

    // === Content ===
    /// The source content behind a surface changed and should be re-filtered.
    ContentChanged { surface: SurfaceId },
}

impl Signal {
    /// The subscription key this signal is delivered under.
    pub fn name(&self) -> SignalName {
        match self {
            Signal::Lifecycle(ev) => match ev.phase {
                LifecyclePhase::Started => SignalName::InteractionStarted,
                LifecyclePhase::Stopped => SignalName::InteractionStopped,
            },
            Signal::ConfigurationChanged => SignalName::ConfigurationChanged,
            Signal::ContentChanged { .. } => SignalName::ContentChanged,
        }
    }

    /// The surface this signal concerns, if it is surface-scoped.
    pub fn surface(&self) -> Option<SurfaceId> {
        match self {
            Signal::Lifecycle(ev) => Some(ev.surface),
            Signal::ContentChanged { surface } => Some(*surface),
            Signal::ConfigurationChanged => None,
        }
    }

    /// Returns a human-readable description of the signal for debugging.
    pub fn description(&self) -> &'static str {
        match self {
            Signal::Lifecycle(ev) => match (ev.source, ev.phase) {
                (InteractionSource::Drag, LifecyclePhase::Started) => "Window drag started",
                (InteractionSource::Drag, LifecyclePhase::Stopped) => "Window drag stopped",
                (InteractionSource::LiveResize, LifecyclePhase::Started) => "Live resize started",
                (InteractionSource::LiveResize, LifecyclePhase::Stopped) => "Live resize ended",
            },
            Signal::ConfigurationChanged => "Configuration changed",
            Signal::ContentChanged { .. } => "Surface content changed",
        }
    }
}

impl From<LifecycleEvent> for Signal {
    fn from(ev: LifecycleEvent) -> Self {
        Signal::Lifecycle(ev)
    }
}

//! Signal system for decoupled inter-component communication.
//!
//! Producers publish [`Signal`]s without knowing who handles them; consumers
//! subscribe by [`SignalName`]. Delivery is synchronous on the owning (UI)
//! context. Worker threads post through a [`SignalPoster`] instead.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────┐
//! │ Drag         │   │ LiveResize   │   │ Settings     │   │ Workers  │
//! │ debouncer    │   │ source       │   │ store        │   │ (Send)   │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘   └────┬─────┘
//!        │ publish()        │ publish()        │ publish()      │ post()
//!        ▼                  ▼                  ▼                ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     SignalBus (+ mpsc inbox)                        │
//! └───────────────┬─────────────────────────────────┬───────────────────┘
//!                 │ handler(&Signal)                │ handler(&Signal)
//!                 ▼                                 ▼
//!        ┌──────────────────┐              ┌──────────────────┐
//!        │  FilteredView    │              │ SettingsObserver │
//!        └──────────────────┘              └──────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`types`]: Signal definitions
//! - [`bus`]: `SignalBus`, subscription handles and dispatch reports
//! - [`lifeline`]: owner liveness tokens checked before each dispatch
//! - [`inbox`]: cross-thread `SignalPoster`

pub mod bus;
pub mod inbox;
pub mod lifeline;
pub mod types;

pub use bus::{
    DispatchReport, HandlerFailure, HandlerResult, SignalBus, SubscriptionHandle, SubscriptionId,
};
pub use inbox::SignalPoster;
pub use lifeline::{Lifeline, LifelineWatch};
pub use types::{InteractionSource, LifecycleEvent, LifecyclePhase, Signal, SignalName, SurfaceId};

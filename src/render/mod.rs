//! On-demand rendering of the filtered view.
//!
//! - surface.rs: the contract with the GPU filter collaborator
//! - view.rs: `FilteredView`, the interaction-aware render scheduler

pub mod surface;
pub mod view;

pub use surface::{DrawableSize, FilterStage, FrameRequest, SurfaceDescriptor};
pub use view::{DisplayOutcome, FilteredView, RedrawDisposition, RenderViewState};

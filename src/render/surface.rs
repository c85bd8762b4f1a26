//! Surface contract with the GPU filter collaborator.

use crate::error::RenderError;
use crate::events::SurfaceId;
use crate::model::constants::{DEFAULT_DRAWABLE_HEIGHT, DEFAULT_DRAWABLE_WIDTH};

/// Properties the backing surface must have for on-demand filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    /// No implicit continuous frame clock.
    pub paused_clock: bool,
    /// Redraws are driven by needs-display requests.
    pub needs_display_driven: bool,
    /// Drawable textures are display-only. Must be false: the compute pass
    /// writes into them.
    pub framebuffer_only: bool,
    /// The drawable follows the view's bounds.
    pub auto_resize_drawable: bool,
    pub opaque: bool,
    pub default_clipping: bool,
}

impl SurfaceDescriptor {
    /// The configuration a filtered view runs with.
    pub const FILTERED: Self = Self {
        paused_clock: true,
        needs_display_driven: true,
        framebuffer_only: false,
        auto_resize_drawable: true,
        opaque: true,
        default_clipping: false,
    };

    /// True when the descriptor allows on-demand compute filtering.
    pub fn supports_on_demand_filtering(&self) -> bool {
        self.paused_clock
            && self.needs_display_driven
            && !self.framebuffer_only
            && self.auto_resize_drawable
    }
}

impl Default for SurfaceDescriptor {
    fn default() -> Self {
        Self::FILTERED
    }
}

/// Size of the drawable backing store, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawableSize {
    pub width: u32,
    pub height: u32,
}

impl DrawableSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for DrawableSize {
    fn default() -> Self {
        Self::new(DEFAULT_DRAWABLE_WIDTH, DEFAULT_DRAWABLE_HEIGHT)
    }
}

/// One filter-recompute + present cycle handed to the filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub surface: SurfaceId,
    pub size: DrawableSize,
    /// Monotonic per-view frame number, starting at 1.
    pub frame: u64,
}

/// The opaque GPU compute stage. Called at most once per compositor pass.
pub trait FilterStage {
    fn encode(&mut self, request: &FrameRequest) -> Result<(), RenderError>;
}

impl<F> FilterStage for F
where
    F: FnMut(&FrameRequest) -> Result<(), RenderError>,
{
    fn encode(&mut self, request: &FrameRequest) -> Result<(), RenderError> {
        self(request)
    }
}

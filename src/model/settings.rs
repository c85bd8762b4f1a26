//! Filter settings and the presentation derived from them (pure Rust, no FFI).

use super::constants::*;

/// Which color-vision simulation the filter stage applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisionKind {
    #[default]
    Normal,
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Achromatopsia,
}

impl VisionKind {
    /// Human-readable label for menus and window titles.
    pub fn label(&self) -> &'static str {
        match self {
            VisionKind::Normal => "Normal Vision",
            VisionKind::Protanopia => "Protanopia",
            VisionKind::Deuteranopia => "Deuteranopia",
            VisionKind::Tritanopia => "Tritanopia",
            VisionKind::Achromatopsia => "Achromatopsia",
        }
    }
}

/// How often the filtered content is refreshed from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshSpeed {
    #[default]
    Normal,
    Slow,
}

/// Which part of the screen the filter reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewArea {
    #[default]
    UnderWindow,
    AroundMouse,
}

/// Current filter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSettings {
    pub vision: VisionKind,
    pub refresh_speed: RefreshSpeed,
    pub view_area: ViewArea,
}

/// Cached presentation values re-derived whenever settings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationState {
    /// Icon shown on the refresh speed button.
    pub refresh_speed_icon: &'static str,
    /// Icon shown on the view area button.
    pub view_area_icon: &'static str,
    /// Label shown on the vision button.
    pub vision_label: &'static str,
}

impl PresentationState {
    /// Derive the presentation for a given settings value.
    pub fn derive(settings: &FilterSettings) -> Self {
        let refresh_speed_icon = match settings.refresh_speed {
            RefreshSpeed::Normal => ICON_REFRESH_NORMAL,
            RefreshSpeed::Slow => ICON_REFRESH_SLOW,
        };
        let view_area_icon = match settings.view_area {
            ViewArea::UnderWindow => ICON_AREA_UNDER_WINDOW,
            ViewArea::AroundMouse => ICON_AREA_AROUND_MOUSE,
        };
        Self {
            refresh_speed_icon,
            view_area_icon,
            vision_label: settings.vision.label(),
        }
    }
}

impl Default for PresentationState {
    fn default() -> Self {
        Self::derive(&FilterSettings::default())
    }
}

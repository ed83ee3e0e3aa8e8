use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::LayoutMode;

/// Errors raised while loading or validating a [`SurfaceConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid surface config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("reduced_motion_factor must be in (0, 1], got {0}")]
    MotionFactor(f64),
}

/// Engine configuration. Every field has a default, so an empty JSON
/// object (`{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Logical stage size used until the background figure is measured.
    pub fallback_logical_size: [f64; 2],
    /// Viewports at or below this width use the mobile drawer layout.
    pub mobile_breakpoint: f64,
    /// First z-index handed out to a dragged item.
    pub first_z_index: i32,
    pub desktop: LayoutPadding,
    pub mobile: LayoutPadding,
    pub trash: TrashPlacement,
    pub conveyor: ConveyorConfig,
    pub scrollbar: ScrollbarConfig,
}

/// Gutters and paddings subtracted from the viewport before fitting the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPadding {
    /// Minimum left gutter. On desktop the gutter also grows to fit the trash icon.
    pub gutter_left: f64,
    pub gutter_right: f64,
    pub top_pad: f64,
    /// Bottom padding. `None` means "use the host-provided stage bottom offset".
    pub bottom_pad: Option<f64>,
    /// Gap between the left tray and the trash icon.
    pub trash_gap: f64,
    /// Room between the trash icon and the stage.
    pub trash_to_stage_pad: f64,
    /// Floor for the available width and height.
    pub min_available: f64,
    /// Whether the left gutter reserves room for the trash icon.
    pub reserve_trash_gutter: bool,
}

impl LayoutPadding {
    pub fn desktop() -> Self {
        Self {
            gutter_left: 24.0,
            gutter_right: 24.0,
            top_pad: 24.0,
            bottom_pad: None,
            trash_gap: 6.0,
            trash_to_stage_pad: 10.0,
            min_available: 240.0,
            reserve_trash_gutter: true,
        }
    }

    pub fn mobile() -> Self {
        Self {
            top_pad: 12.0,
            bottom_pad: Some(12.0),
            reserve_trash_gutter: false,
            ..Self::desktop()
        }
    }
}

impl Default for LayoutPadding {
    fn default() -> Self {
        Self::desktop()
    }
}

/// Where the trash icon sits relative to the trays and stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrashPlacement {
    /// Desktop: gap to the right of the left tray.
    pub desktop_gap: f64,
    /// Desktop: distance from the viewport bottom.
    pub desktop_bottom_pad: f64,
    /// Mobile: clamp margin against the viewport and drawer.
    pub mobile_pad: f64,
    /// Mobile: gap between the icon and the stage's left edge.
    pub mobile_side_gap: f64,
    /// Mobile: lift above the stage bottom.
    pub mobile_bottom_lift: f64,
}

impl Default for TrashPlacement {
    fn default() -> Self {
        Self {
            desktop_gap: 6.0,
            desktop_bottom_pad: 22.0,
            mobile_pad: 10.0,
            mobile_side_gap: 8.0,
            mobile_bottom_lift: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConveyorConfig {
    /// Vertical tray speed in px/s.
    pub desktop_speed: f64,
    /// Horizontal drawer speed in px/s.
    pub mobile_speed: f64,
    /// Speed multiplier when the host prefers reduced motion.
    pub reduced_motion_factor: f64,
    /// Largest frame delta in seconds a single tick may consume.
    pub max_dt: f64,
}

impl Default for ConveyorConfig {
    fn default() -> Self {
        Self {
            desktop_speed: 30.0,
            mobile_speed: 22.0,
            reduced_motion_factor: 0.55,
            max_dt: 0.05,
        }
    }
}

impl ConveyorConfig {
    /// Effective lane speed for a layout, with the reduced-motion factor applied.
    pub fn speed_for(&self, mode: LayoutMode, reduced_motion: bool) -> f64 {
        let base = match mode {
            LayoutMode::Desktop => self.desktop_speed,
            LayoutMode::Mobile => self.mobile_speed,
        };
        if reduced_motion {
            base * self.reduced_motion_factor
        } else {
            base
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarConfig {
    /// Thumb never shrinks below this width, so it stays grabbable.
    pub min_thumb: f64,
}

impl Default for ScrollbarConfig {
    fn default() -> Self {
        Self { min_thumb: 56.0 }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            fallback_logical_size: [800.0, 1200.0],
            mobile_breakpoint: 768.0,
            first_z_index: 100,
            desktop: LayoutPadding::desktop(),
            mobile: LayoutPadding::mobile(),
            trash: TrashPlacement::default(),
            conveyor: ConveyorConfig::default(),
            scrollbar: ScrollbarConfig::default(),
        }
    }
}

impl SurfaceConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("fallback_logical_size[0]", self.fallback_logical_size[0]),
            ("fallback_logical_size[1]", self.fallback_logical_size[1]),
            ("desktop.min_available", self.desktop.min_available),
            ("mobile.min_available", self.mobile.min_available),
            ("conveyor.desktop_speed", self.conveyor.desktop_speed),
            ("conveyor.mobile_speed", self.conveyor.mobile_speed),
            ("conveyor.max_dt", self.conveyor.max_dt),
            ("scrollbar.min_thumb", self.scrollbar.min_thumb),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        let factor = self.conveyor.reduced_motion_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(ConfigError::MotionFactor(factor));
        }
        Ok(())
    }

    pub fn padding(&self, mode: LayoutMode) -> &LayoutPadding {
        match mode {
            LayoutMode::Desktop => &self.desktop,
            LayoutMode::Mobile => &self.mobile,
        }
    }
}

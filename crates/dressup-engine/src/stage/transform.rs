use glam::DVec2;

use crate::api::config::LayoutPadding;
use crate::api::types::{LayoutMode, NodeId};
use crate::core::scene::{Rect, SceneGraph, StageAnchor};

/// Rendered sizes of everything that competes with the stage for room.
/// Missing collaborators measure as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutMetrics {
    pub viewport: DVec2,
    pub header_height: f64,
    pub left_tray_width: f64,
    pub right_tray_width: f64,
    pub trash_width: f64,
    /// Only subtracted in the mobile layout.
    pub drawer_height: f64,
    /// Host-provided bottom padding used by layouts without a fixed one.
    pub stage_bottom_offset: f64,
}

/// Logical-to-visual scale of the play surface.
///
/// The logical size is the background figure's natural resolution, so item
/// positions line up 1:1 with the figure no matter how large it is drawn.
pub struct StageTransform {
    logical: DVec2,
    measured: bool,
    scale: f64,
    anchor: StageAnchor,
}

impl StageTransform {
    /// Start with a fallback logical size until the background is measured.
    pub fn new(fallback: DVec2) -> Self {
        Self {
            logical: fallback,
            measured: false,
            scale: 1.0,
            anchor: StageAnchor::CenterX,
        }
    }

    /// Fix the logical size from the background's natural size.
    /// Only the first successful measurement counts; later calls are ignored.
    /// Returns true when the logical size was set by this call.
    pub fn measure_background(&mut self, natural: Option<DVec2>) -> bool {
        if self.measured {
            return false;
        }
        match natural {
            Some(size) if size.x > 0.0 && size.y > 0.0 => {
                self.logical = size;
                self.measured = true;
                log::debug!("stage: logical size fixed at {}x{}", size.x, size.y);
                true
            }
            _ => false,
        }
    }

    /// Fit the stage into whatever the trays, header and drawer leave over.
    pub fn recompute(&mut self, metrics: &LayoutMetrics, mode: LayoutMode, padding: &LayoutPadding) -> f64 {
        let gutter_left = if padding.reserve_trash_gutter {
            padding
                .gutter_left
                .max(metrics.trash_width + padding.trash_gap + padding.trash_to_stage_pad)
        } else {
            padding.gutter_left
        };
        let available_w = (metrics.viewport.x
            - metrics.left_tray_width
            - metrics.right_tray_width
            - gutter_left
            - padding.gutter_right)
            .max(padding.min_available);

        let drawer = if mode.is_mobile() { metrics.drawer_height } else { 0.0 };
        let bottom_pad = padding.bottom_pad.unwrap_or(metrics.stage_bottom_offset);
        let available_h = (metrics.viewport.y - metrics.header_height - drawer - padding.top_pad - bottom_pad)
            .max(padding.min_available);

        self.scale = (available_w / self.logical.x).min(available_h / self.logical.y);
        self.anchor = match mode {
            LayoutMode::Desktop => StageAnchor::CenterX,
            LayoutMode::Mobile => StageAnchor::Center,
        };
        self.scale
    }

    /// Push the logical box size and the scale transform to the host.
    pub fn apply<S: SceneGraph>(&self, scene: &mut S, stage: NodeId) {
        if self.measured {
            scene.set_logical_size(stage, self.logical);
        }
        scene.set_transform(stage, self.scale, self.anchor);
    }

    /// Map a viewport point into stage-logical coordinates.
    #[inline]
    pub fn to_logical(&self, client: DVec2, stage_rect: &Rect) -> DVec2 {
        (client - stage_rect.min) / self.scale
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn logical_size(&self) -> DVec2 {
        self.logical
    }

    pub fn is_measured(&self) -> bool {
        self.measured
    }
}

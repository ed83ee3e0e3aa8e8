use glam::DVec2;

use crate::api::types::{ItemId, NodeId};

/// Where an item currently lives. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Laid out by its home tray; no inline overrides.
    Tray { home: Option<NodeId> },
    /// Absolutely positioned on the stage, in logical pixels.
    OnStage { pos: DVec2, z_index: i32 },
}

/// A clothing item that can be dragged from its tray onto the stage.
#[derive(Debug, Clone)]
pub struct DraggableItem {
    pub id: ItemId,
    pub node: NodeId,
    /// Tray the item returns to. Recorded on first observation, never overwritten.
    pub home: Option<NodeId>,
    /// Intrinsic size of the asset, once known.
    pub natural_size: Option<DVec2>,
    /// Per-asset display multiplier applied to the natural size on the stage.
    pub scale_mult: f64,
    /// Stage size, frozen on first drag so later drags don't jitter.
    pub base_size: Option<DVec2>,
    pub placement: Placement,
}

impl DraggableItem {
    pub fn new(id: ItemId, node: NodeId, home: Option<NodeId>) -> Self {
        Self {
            id,
            node,
            home,
            natural_size: None,
            scale_mult: 1.0,
            base_size: None,
            placement: Placement::Tray { home },
        }
    }

    pub fn with_scale(mut self, scale_mult: f64) -> Self {
        // Non-finite or non-positive multipliers fall back to 1.
        self.scale_mult = if scale_mult.is_finite() && scale_mult > 0.0 { scale_mult } else { 1.0 };
        self
    }

    pub fn with_natural_size(mut self, size: DVec2) -> Self {
        self.natural_size = Some(size);
        self
    }

    /// Record the home tray if none is known yet.
    pub fn observe_home(&mut self, parent: Option<NodeId>) {
        if self.home.is_none() {
            self.home = parent;
            if let Placement::Tray { home } = &mut self.placement {
                *home = parent;
            }
        }
    }

    /// Return the cached stage size, computing it from the natural size
    /// (or the rendered box when the natural size is unknown) on first use.
    pub fn freeze_base_size(&mut self, rendered: DVec2) -> DVec2 {
        if let Some(base) = self.base_size {
            return base;
        }
        let natural = self.natural_size.unwrap_or(rendered);
        let base = natural * self.scale_mult;
        self.base_size = Some(base);
        base
    }

    pub fn is_on_stage(&self) -> bool {
        matches!(self.placement, Placement::OnStage { .. })
    }
}

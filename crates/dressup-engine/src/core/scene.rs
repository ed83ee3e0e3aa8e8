use glam::DVec2;

use crate::api::types::{Axis, NodeId};

/// Axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min: DVec2::new(x, y),
            max: DVec2::new(x + width, y + height),
        }
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Edges are inclusive, so a pointer exactly on the border counts as inside.
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// True when the box has been laid out (non-zero area).
    #[inline]
    pub fn is_measured(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }
}

/// Scroll state of a scrollable node along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current scroll offset (scrollTop / scrollLeft).
    pub offset: f64,
    /// Visible extent (clientHeight / clientWidth).
    pub client_extent: f64,
    /// Total content extent (scrollHeight / scrollWidth).
    pub scroll_extent: f64,
}

impl ScrollMetrics {
    /// Largest valid scroll offset.
    #[inline]
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_extent - self.client_extent).max(0.0)
    }

    /// Content overflows when it is more than a pixel larger than the viewport.
    #[inline]
    pub fn overflows(&self) -> bool {
        self.scroll_extent > self.client_extent + 1.0
    }
}

/// Where a reparented node is inserted among its new siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    First,
    Last,
}

/// How the scaled stage stays centred in its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAnchor {
    /// Centre horizontally only (desktop).
    CenterX,
    /// Centre on both axes (mobile).
    Center,
}

/// Inline overrides for an item that lives on the stage, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemStyle {
    pub pos: DVec2,
    pub size: DVec2,
    pub z_index: i32,
}

/// The host cannot provide an optional capability (pointer capture, observers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported;

/// Everything the engine needs from the host's element tree.
///
/// Geometry reads return `None` when the host cannot measure yet (image not
/// loaded, node detached); callers skip that frame instead of failing.
pub trait SceneGraph {
    /// Live viewport rectangle of a node.
    fn bounding_box(&self, node: NodeId) -> Option<Rect>;

    /// Intrinsic pixel size of an image-backed node.
    fn natural_size(&self, node: NodeId) -> Option<DVec2>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Move `node` under `parent`, as its first or last child.
    fn reparent(&mut self, node: NodeId, parent: NodeId, at: Insert);

    /// Fix the stage's unscaled box size.
    fn set_logical_size(&mut self, stage: NodeId, size: DVec2);

    /// Apply the uniform stage scale.
    fn set_transform(&mut self, stage: NodeId, scale: f64, anchor: StageAnchor);

    /// Absolute position, size and stacking for an item on the stage.
    fn set_item_style(&mut self, node: NodeId, style: &ItemStyle);

    /// Drop every inline override so the tray layout regains control.
    fn clear_item_style(&mut self, node: NodeId);

    /// Place a fixed-position node at viewport coordinates.
    fn set_fixed_position(&mut self, node: NodeId, pos: DVec2);

    /// Toggle the trash icon's "armed" look.
    fn set_armed(&mut self, node: NodeId, armed: bool);

    fn set_visible(&mut self, node: NodeId, visible: bool);

    fn scroll_metrics(&self, node: NodeId, axis: Axis) -> Option<ScrollMetrics>;

    fn set_scroll_offset(&mut self, node: NodeId, axis: Axis, offset: f64);

    /// Flex/grid gap between children of a container.
    fn gap(&self, _node: NodeId, _axis: Axis) -> f64 {
        0.0
    }

    /// Size and offset of a scrollbar thumb inside its track.
    fn place_thumb(&mut self, thumb: NodeId, offset: f64, width: f64);

    fn set_pointer_capture(&mut self, _node: NodeId, _pointer_id: i32) -> Result<(), Unsupported> {
        Err(Unsupported)
    }

    fn release_pointer_capture(&mut self, _node: NodeId, _pointer_id: i32) -> Result<(), Unsupported> {
        Err(Unsupported)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }
}

/// Scroll metrics of `scroller`, taking the larger content extent of the
/// scroller and its inner `content` element (some engines under-report one
/// of the two while images are still loading).
pub fn combined_metrics<S: SceneGraph + ?Sized>(
    scene: &S,
    scroller: NodeId,
    content: NodeId,
    axis: Axis,
) -> Option<ScrollMetrics> {
    let mut metrics = scene.scroll_metrics(scroller, axis)?;
    if content != scroller {
        if let Some(inner) = scene.scroll_metrics(content, axis) {
            metrics.scroll_extent = metrics.scroll_extent.max(inner.scroll_extent);
        }
    }
    Some(metrics)
}

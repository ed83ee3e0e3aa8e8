//! In-memory scene graph used by the unit tests.

use std::collections::HashMap;

use glam::DVec2;

use crate::api::types::{Axis, NodeId};
use crate::core::scene::{Insert, ItemStyle, Rect, SceneGraph, ScrollMetrics, StageAnchor, Unsupported};

#[derive(Debug, Clone, Default)]
pub struct MockNode {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub rect: Option<Rect>,
    pub natural: Option<DVec2>,
    pub client: DVec2,
    pub scroll: DVec2,
    /// Explicit content extent; otherwise derived from the children.
    pub content: Option<DVec2>,
    pub gap: f64,
    pub style: Option<ItemStyle>,
    pub fixed_pos: Option<DVec2>,
    pub armed: bool,
    pub visible: bool,
    pub captured: Option<i32>,
    pub thumb: Option<(f64, f64)>,
}

#[derive(Debug, Default)]
pub struct MockScene {
    pub nodes: HashMap<NodeId, MockNode>,
    pub transforms: Vec<(f64, StageAnchor)>,
    pub logical_size: Option<DVec2>,
    pub capture_supported: bool,
    /// Report scroll offsets as whole pixels, like integer DOM getters.
    pub truncate_scroll: bool,
    next_id: u32,
}

impl MockScene {
    pub fn new() -> Self {
        Self { capture_supported: true, next_id: 1, ..Default::default() }
    }

    pub fn add(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, MockNode { parent, visible: true, ..Default::default() });
        if let Some(p) = parent {
            self.node_mut(p).children.push(id);
        }
        id
    }

    pub fn add_sized(&mut self, parent: Option<NodeId>, rect: Rect) -> NodeId {
        let id = self.add(parent);
        self.node_mut(id).rect = Some(rect);
        id
    }

    pub fn node(&self, id: NodeId) -> &MockNode {
        &self.nodes[&id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut MockNode {
        self.nodes.get_mut(&id).unwrap()
    }

    fn content_extent(&self, id: NodeId, axis: Axis) -> f64 {
        let node = self.node(id);
        if let Some(content) = node.content {
            return axis.of(content);
        }
        let sizes: Vec<f64> = node
            .children
            .iter()
            .filter_map(|c| self.node(*c).rect.map(|r| axis.of(r.size())))
            .collect();
        if sizes.is_empty() {
            return 0.0;
        }
        sizes.iter().sum::<f64>() + node.gap * (sizes.len() - 1) as f64
    }
}

impl SceneGraph for MockScene {
    fn bounding_box(&self, node: NodeId) -> Option<Rect> {
        self.nodes.get(&node).and_then(|n| n.rect)
    }

    fn natural_size(&self, node: NodeId) -> Option<DVec2> {
        self.nodes.get(&node).and_then(|n| n.natural)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.get(&node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn reparent(&mut self, node: NodeId, parent: NodeId, at: Insert) {
        let old_parent = self.node(node).parent;
        if let Some(old) = old_parent {
            self.node_mut(old).children.retain(|c| *c != node);
        }
        let children = &mut self.node_mut(parent).children;
        match at {
            Insert::First => children.insert(0, node),
            Insert::Last => children.push(node),
        }
        self.node_mut(node).parent = Some(parent);
    }

    fn set_logical_size(&mut self, _stage: NodeId, size: DVec2) {
        self.logical_size = Some(size);
    }

    fn set_transform(&mut self, _stage: NodeId, scale: f64, anchor: StageAnchor) {
        self.transforms.push((scale, anchor));
    }

    fn set_item_style(&mut self, node: NodeId, style: &ItemStyle) {
        self.node_mut(node).style = Some(*style);
    }

    fn clear_item_style(&mut self, node: NodeId) {
        self.node_mut(node).style = None;
    }

    fn set_fixed_position(&mut self, node: NodeId, pos: DVec2) {
        self.node_mut(node).fixed_pos = Some(pos);
    }

    fn set_armed(&mut self, node: NodeId, armed: bool) {
        self.node_mut(node).armed = armed;
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        self.node_mut(node).visible = visible;
    }

    fn scroll_metrics(&self, node: NodeId, axis: Axis) -> Option<ScrollMetrics> {
        let n = self.nodes.get(&node)?;
        let client_extent = axis.of(n.client);
        let offset = axis.of(n.scroll);
        Some(ScrollMetrics {
            offset: if self.truncate_scroll { offset.trunc() } else { offset },
            client_extent,
            scroll_extent: self.content_extent(node, axis).max(client_extent),
        })
    }

    fn set_scroll_offset(&mut self, node: NodeId, axis: Axis, offset: f64) {
        let max = self.scroll_metrics(node, axis).map(|m| m.max_scroll()).unwrap_or(0.0);
        let clamped = offset.clamp(0.0, max);
        let n = self.node_mut(node);
        match axis {
            Axis::Horizontal => n.scroll.x = clamped,
            Axis::Vertical => n.scroll.y = clamped,
        }
    }

    fn gap(&self, node: NodeId, _axis: Axis) -> f64 {
        self.nodes.get(&node).map(|n| n.gap).unwrap_or(0.0)
    }

    fn place_thumb(&mut self, thumb: NodeId, offset: f64, width: f64) {
        self.node_mut(thumb).thumb = Some((offset, width));
    }

    fn set_pointer_capture(&mut self, node: NodeId, pointer_id: i32) -> Result<(), Unsupported> {
        if !self.capture_supported {
            return Err(Unsupported);
        }
        self.node_mut(node).captured = Some(pointer_id);
        Ok(())
    }

    fn release_pointer_capture(&mut self, node: NodeId, _pointer_id: i32) -> Result<(), Unsupported> {
        if !self.capture_supported {
            return Err(Unsupported);
        }
        self.node_mut(node).captured = None;
        Ok(())
    }
}

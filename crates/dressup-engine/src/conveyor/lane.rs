//! Conveyor-belt tray: a scroll container that keeps advancing and moves
//! the item that scrolled fully out of view to the opposite end, so a
//! handful of children reads as an endless belt.
//!
//! Recycling is index rotation over a ring of node handles. The host
//! container is told about each rotation with a single reparent so its
//! visual order stays in step with the ring.

use crate::api::types::{Axis, LayoutMode, NodeId};
use crate::core::scene::{combined_metrics, Insert, SceneGraph, ScrollMetrics};

/// Which tray a lane drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneRole {
    Left,
    Right,
    Drawer,
}

impl LaneRole {
    pub fn mode(self) -> LayoutMode {
        match self {
            LaneRole::Left | LaneRole::Right => LayoutMode::Desktop,
            LaneRole::Drawer => LayoutMode::Mobile,
        }
    }
}

/// Direction of scroll travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Scroll offset grows; the leading item is recycled to the end.
    Forward,
    /// Scroll offset shrinks; the trailing item is recycled to the front.
    Reverse,
}

/// Item handles in belt order with their extents (size + gap).
#[derive(Debug, Clone, Default)]
struct Ring {
    slots: Vec<NodeId>,
    extents: Vec<f64>,
    head: usize,
}

impl Ring {
    fn from_nodes(nodes: Vec<NodeId>) -> Self {
        let extents = vec![0.0; nodes.len()];
        Self { slots: nodes, extents, head: 0 }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, i: usize) -> usize {
        (self.head + i) % self.slots.len()
    }

    fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.len()).map(|i| self.slots[self.slot(i)])
    }

    fn front_extent(&self) -> f64 {
        self.extents[self.head]
    }

    fn back_extent(&self) -> f64 {
        self.extents[self.slot(self.len() - 1)]
    }

    /// Front item becomes the back item. Returns the moved handle.
    fn rotate_forward(&mut self) -> NodeId {
        let node = self.slots[self.head];
        self.head = self.slot(1);
        node
    }

    /// Back item becomes the front item. Returns the moved handle.
    fn rotate_backward(&mut self) -> NodeId {
        self.head = self.slot(self.len() - 1);
        self.slots[self.head]
    }

    fn same_order(&self, live: &[NodeId]) -> bool {
        live.len() == self.len() && self.iter().zip(live).all(|(a, b)| a == *b)
    }
}

/// What one tick did, for callers that track travelled distance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Items relocated this tick.
    pub recycled: usize,
    /// Sum of the relocated items' extents.
    pub recycled_distance: f64,
    /// Scroll offset written back to the container.
    pub offset: f64,
}

pub struct ConveyorLane {
    role: LaneRole,
    /// Element whose scroll offset moves.
    scroller: NodeId,
    /// Element whose children are the belt items (may equal `scroller`).
    content: NodeId,
    axis: Axis,
    direction: Direction,
    /// px per second.
    speed: f64,
    ring: Ring,
    /// Fractional offset the belt is at. Hosts may truncate or snap the
    /// value they store, so this is the source of truth between ticks.
    offset: f64,
}

impl ConveyorLane {
    pub fn new<S: SceneGraph>(
        scene: &S,
        role: LaneRole,
        scroller: NodeId,
        content: NodeId,
        axis: Axis,
        direction: Direction,
        speed: f64,
    ) -> Self {
        let mut lane = Self {
            role,
            scroller,
            content,
            axis,
            direction,
            speed,
            ring: Ring::from_nodes(scene.children(content)),
            offset: 0.0,
        };
        lane.snapshot_extents(scene);
        lane
    }

    pub fn role(&self) -> LaneRole {
        self.role
    }

    pub fn scroller(&self) -> NodeId {
        self.scroller
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Current belt order, front first.
    pub fn order(&self) -> Vec<NodeId> {
        self.ring.iter().collect()
    }

    /// Scroll offset written by the last tick.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    fn metrics<S: SceneGraph>(&self, scene: &S) -> Option<ScrollMetrics> {
        combined_metrics(scene, self.scroller, self.content, self.axis)
    }

    /// Measure every item once. Items that can't be measured keep their
    /// previous extent. A membership or order change in the host (an item
    /// dragged out, a group added) resets the ring to the live order.
    pub fn snapshot_extents<S: SceneGraph>(&mut self, scene: &S) {
        let live = scene.children(self.content);
        if !self.ring.same_order(&live) {
            log::debug!("conveyor {:?}: membership changed, {} -> {} items", self.role, self.ring.len(), live.len());
            let previous: Vec<(NodeId, f64)> = self.ring.slots.iter().copied().zip(self.ring.extents.iter().copied()).collect();
            self.ring = Ring::from_nodes(live);
            for (slot, node) in self.ring.slots.iter().enumerate() {
                if let Some((_, extent)) = previous.iter().find(|(n, _)| n == node) {
                    self.ring.extents[slot] = *extent;
                }
            }
        }
        let gap = scene.gap(self.content, self.axis);
        for slot in 0..self.ring.len() {
            if let Some(rect) = scene.bounding_box(self.ring.slots[slot]) {
                self.ring.extents[slot] = self.axis.of(rect.size()) + gap;
            }
        }
    }

    /// Advance the belt by `speed * dt` and recycle everything that left view.
    /// Lanes whose content fits without overflow are left untouched.
    pub fn tick<S: SceneGraph>(&mut self, scene: &mut S, dt: f64) -> TickReport {
        let Some(metrics) = self.metrics(scene) else {
            return TickReport { offset: self.offset, ..Default::default() };
        };
        if !metrics.overflows() {
            self.offset = metrics.offset;
            return TickReport { offset: self.offset, ..Default::default() };
        }
        self.snapshot_extents(scene);
        let count = self.ring.len();
        if count == 0 {
            return TickReport { offset: metrics.offset, ..Default::default() };
        }

        let step = self.speed * dt;
        // Sub-pixel differences are host rounding of our own write; anything
        // larger is a swipe or a scrollbar drag and wins.
        let mut offset = if (metrics.offset - self.offset).abs() >= 1.0 {
            metrics.offset
        } else {
            self.offset
        };
        let mut report = TickReport::default();
        match self.direction {
            Direction::Forward => {
                offset += step;
                while report.recycled < count {
                    let extent = self.ring.front_extent();
                    if extent <= 0.0 || offset < extent {
                        break;
                    }
                    let node = self.ring.rotate_forward();
                    scene.reparent(node, self.content, Insert::Last);
                    offset -= extent;
                    report.recycled += 1;
                    report.recycled_distance += extent;
                }
            }
            Direction::Reverse => {
                // Make room above before stepping back towards zero.
                while report.recycled < count && offset <= step + 1.0 {
                    let extent = self.ring.back_extent();
                    if extent <= 0.0 {
                        break;
                    }
                    let node = self.ring.rotate_backward();
                    scene.reparent(node, self.content, Insert::First);
                    offset += extent;
                    report.recycled += 1;
                    report.recycled_distance += extent;
                }
                offset -= step;
            }
        }
        if report.recycled > 0 {
            log::trace!("conveyor {:?}: recycled {} item(s)", self.role, report.recycled);
        }

        let offset = offset.clamp(0.0, metrics.max_scroll());
        scene.set_scroll_offset(self.scroller, self.axis, offset);
        self.offset = offset;
        report.offset = offset;
        report
    }
}

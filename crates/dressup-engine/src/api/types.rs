use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Handle to a node in the host scene graph (a DOM element in the browser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Index of a draggable item registered with the drag engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub u32);

/// A fire-and-forget audio cue for the host's sound subsystem.
/// Playback failures on the host side are never reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Cue {
    /// Any primary press anywhere on the page.
    Click = 1,
    /// An item was released over the trash and went back to its tray.
    Trash = 2,
}

/// Which physical axis a lane or scrollbar works along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Pick the component of a vector along this axis.
    #[inline]
    pub fn of(self, v: glam::DVec2) -> f64 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }
}

/// Desktop uses two vertical side trays, mobile uses a horizontal drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    Desktop,
    Mobile,
}

impl LayoutMode {
    /// Narrow viewports (at or below the breakpoint) get the drawer layout.
    pub fn from_viewport(width: f64, breakpoint: f64) -> Self {
        if width <= breakpoint {
            LayoutMode::Mobile
        } else {
            LayoutMode::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == LayoutMode::Mobile
    }
}

/// Per-item placement record, laid out for zero-copy reads from the host.
/// `on_stage` is 1.0 for items on the stage and 0.0 for items in a tray.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PlacementRecord {
    pub item: f32,
    pub on_stage: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PlacementRecord {
    pub const FLOATS: usize = 5;
}

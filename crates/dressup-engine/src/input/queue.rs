use glam::DVec2;

use crate::api::types::ItemId;

/// Kind of device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Parse the DOM `pointerType` string. Unknown types are treated as touch.
    pub fn from_dom(kind: &str) -> Self {
        match kind {
            "mouse" => PointerKind::Mouse,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Touch,
        }
    }
}

/// A single pointer sample in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub id: i32,
    pub kind: PointerKind,
    pub is_primary: bool,
    pub button: i16,
    pub client: DVec2,
}

impl Pointer {
    /// Primary pointer, and for a mouse only the main (left) button.
    pub fn is_primary_press(&self) -> bool {
        self.is_primary && (self.kind != PointerKind::Mouse || self.button == 0)
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Item(ItemId),
    /// Inside the mobile drawer, not on an item.
    Drawer,
    ScrollbarThumb,
    ScrollbarTrack,
    Other,
}

/// Side tray regions that pause on hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayRegion {
    Left,
    Right,
}

/// Input and environment events the surface understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { target: PointerTarget, pointer: Pointer },
    /// Window-level move.
    PointerMove(Pointer),
    /// Window-level release.
    PointerUp(Pointer),
    /// Window-level cancel (touch interrupted, capture lost).
    PointerCancel(Pointer),
    HoverEnter(TrayRegion),
    HoverLeave(TrayRegion),
    /// Viewport resized. `stage_bottom_offset` is the host's desktop bottom padding.
    Resize { viewport: DVec2, stage_bottom_offset: f64 },
    /// Media-query change: coarse/narrow layout and reduced-motion preference.
    MediaChange { mobile: Option<bool>, reduced_motion: bool },
    /// The background figure finished loading.
    BackgroundLoaded,
    /// Native scroll on the drawer (user swipe or programmatic write).
    LaneScrolled,
    /// Drawer content resized, mutated or an image inside it loaded.
    ContentChanged,
    /// Page restored from the back/forward cache.
    PageShow,
}

/// A queue of input events.
/// The host pushes events as they arrive; the runner drains them in order
/// at the start of each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

//! Custom horizontal scrollbar for the mobile drawer.
//!
//! The thumb mirrors the drawer's native scroll offset; dragging the thumb
//! or pressing the track writes the offset back. Both directions go
//! through the same [`ThumbGeometry`] mapping so they stay consistent.

use crate::api::types::{Axis, NodeId};
use crate::core::scene::{combined_metrics, SceneGraph};
use crate::input::queue::Pointer;

/// Thumb size and travel for one sync.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbGeometry {
    pub track: f64,
    pub thumb: f64,
    pub client: f64,
    pub scroll: f64,
}

impl ThumbGeometry {
    /// Thumb width is proportional to the visible share, floored to whole pixels
    /// and never narrower than `min_thumb`.
    pub fn compute(track: f64, client: f64, scroll: f64, min_thumb: f64) -> Self {
        let ratio = if scroll > 0.0 { client / scroll } else { 1.0 };
        let thumb = min_thumb.max((track * ratio).floor());
        Self { track, thumb, client, scroll }
    }

    #[inline]
    pub fn max_scroll(&self) -> f64 {
        (self.scroll - self.client).max(1.0)
    }

    /// Pixels the thumb can move inside the track.
    #[inline]
    pub fn travel(&self) -> f64 {
        (self.track - self.thumb).max(1.0)
    }

    /// Thumb position for a scroll offset, rounded to whole pixels.
    pub fn thumb_offset(&self, offset: f64) -> f64 {
        ((offset / self.max_scroll()) * self.travel()).round()
    }

    /// Scroll offset that puts the thumb's left edge at `thumb_pos`.
    pub fn offset_for_thumb(&self, thumb_pos: f64) -> f64 {
        (thumb_pos.clamp(0.0, self.travel()) / self.travel()) * self.max_scroll()
    }

    /// Scroll distance for a thumb movement of `dx` pixels.
    pub fn scroll_delta(&self, dx: f64) -> f64 {
        dx / self.travel() * self.max_scroll()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ThumbDrag {
    pointer_id: i32,
    start_x: f64,
    start_offset: f64,
    captured_on: Option<NodeId>,
}

pub struct ScrollbarBinding {
    track: NodeId,
    thumb: NodeId,
    scroller: NodeId,
    content: NodeId,
    min_thumb: f64,
    geometry: Option<ThumbGeometry>,
    drag: Option<ThumbDrag>,
}

impl ScrollbarBinding {
    pub fn new(track: NodeId, thumb: NodeId, scroller: NodeId, content: NodeId, min_thumb: f64) -> Self {
        Self {
            track,
            thumb,
            scroller,
            content,
            min_thumb,
            geometry: None,
            drag: None,
        }
    }

    pub fn track(&self) -> NodeId {
        self.track
    }

    /// Geometry from the last successful sync, `None` while hidden.
    pub fn geometry(&self) -> Option<ThumbGeometry> {
        self.geometry
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Recompute the thumb from the drawer's live scroll metrics.
    /// Hides the track when the content fits.
    pub fn sync<S: SceneGraph>(&mut self, scene: &mut S) -> Option<ThumbGeometry> {
        let metrics = combined_metrics(scene, self.scroller, self.content, Axis::Horizontal)
            .filter(|m| m.overflows());
        let Some(metrics) = metrics else {
            self.hide(scene);
            return None;
        };
        let Some(track_box) = scene.bounding_box(self.track) else {
            self.geometry = None;
            return None;
        };
        scene.set_visible(self.track, true);

        let geometry = ThumbGeometry::compute(
            track_box.width(),
            metrics.client_extent,
            metrics.scroll_extent,
            self.min_thumb,
        );
        scene.place_thumb(self.thumb, geometry.thumb_offset(metrics.offset), geometry.thumb);
        self.geometry = Some(geometry);
        Some(geometry)
    }

    pub fn hide<S: SceneGraph>(&mut self, scene: &mut S) {
        scene.set_visible(self.track, false);
        self.geometry = None;
    }

    /// Press on the thumb: start dragging from the current offset.
    pub fn thumb_down<S: SceneGraph>(&mut self, scene: &mut S, pointer: &Pointer) -> bool {
        if !self.can_start(scene, pointer) {
            return false;
        }
        self.begin(scene, pointer, self.thumb);
        true
    }

    /// Press on the bare track: jump so the thumb centres under the
    /// pointer, then keep dragging from there.
    pub fn track_down<S: SceneGraph>(&mut self, scene: &mut S, pointer: &Pointer) -> bool {
        if !self.can_start(scene, pointer) {
            return false;
        }
        let (Some(geometry), Some(track_box)) = (self.geometry, scene.bounding_box(self.track)) else {
            return false;
        };
        let centred = pointer.client.x - track_box.min.x - geometry.thumb / 2.0;
        let offset = geometry.offset_for_thumb(centred);
        scene.set_scroll_offset(self.scroller, Axis::Horizontal, offset);
        self.sync(scene);
        self.begin(scene, pointer, self.track);
        true
    }

    /// Follow an active thumb drag. Returns true when the offset was written.
    pub fn pointer_move<S: SceneGraph>(&mut self, scene: &mut S, pointer: &Pointer) -> bool {
        let Some(drag) = self.drag.filter(|d| d.pointer_id == pointer.id) else {
            return false;
        };
        let Some(geometry) = self.sync(scene) else {
            return false;
        };
        let offset = drag.start_offset + geometry.scroll_delta(pointer.client.x - drag.start_x);
        let max = (geometry.scroll - geometry.client).max(0.0);
        scene.set_scroll_offset(self.scroller, Axis::Horizontal, offset.clamp(0.0, max));
        self.sync(scene);
        true
    }

    /// End a thumb drag on release or cancel of the same pointer.
    pub fn pointer_up<S: SceneGraph>(&mut self, scene: &mut S, pointer: &Pointer) -> bool {
        let Some(drag) = self.drag.filter(|d| d.pointer_id == pointer.id) else {
            return false;
        };
        if let Some(node) = drag.captured_on {
            let _ = scene.release_pointer_capture(node, drag.pointer_id);
        }
        self.drag = None;
        self.sync(scene);
        true
    }

    /// Forget any drag state, e.g. before the layout is rebuilt.
    pub fn reset<S: SceneGraph>(&mut self, scene: &mut S) {
        if let Some(drag) = self.drag.take() {
            if let Some(node) = drag.captured_on {
                let _ = scene.release_pointer_capture(node, drag.pointer_id);
            }
        }
    }

    fn can_start<S: SceneGraph>(&mut self, scene: &mut S, pointer: &Pointer) -> bool {
        if !pointer.is_primary_press() || self.drag.is_some() {
            return false;
        }
        self.geometry.is_some() || self.sync(scene).is_some()
    }

    fn begin<S: SceneGraph>(&mut self, scene: &mut S, pointer: &Pointer, on: NodeId) {
        let start_offset = scene
            .scroll_metrics(self.scroller, Axis::Horizontal)
            .map(|m| m.offset)
            .unwrap_or(0.0);
        let captured_on = scene.set_pointer_capture(on, pointer.id).ok().map(|_| on);
        self.drag = Some(ThumbDrag {
            pointer_id: pointer.id,
            start_x: pointer.client.x,
            start_offset,
            captured_on,
        });
    }
}

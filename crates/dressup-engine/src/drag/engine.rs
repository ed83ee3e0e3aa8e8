//! Stage-aware drag and drop.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Dragging   (primary press on an item)
//! Dragging -> Idle   (release or cancel of the same pointer id)
//! ```
//!
//! Pointer coordinates arrive in viewport pixels and are mapped into the
//! stage's logical space with the scale published by [`StageTransform`].
//! The scale is re-read on every move, never cached for the whole drag.

use glam::DVec2;

use crate::api::types::{ItemId, NodeId, PlacementRecord};
use crate::core::scene::{Insert, ItemStyle, SceneGraph};
use crate::drag::item::{DraggableItem, Placement};
use crate::input::queue::{Pointer, PointerKind};
use crate::stage::transform::StageTransform;

/// How events for the active drag reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    /// Mouse, or touch/pen when capture is unavailable: window-level
    /// listeners filtered by pointer id.
    Document,
    /// Touch/pen with pointer capture held on the item.
    Captured,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub item: ItemId,
    pub pointer_id: i32,
    pub tracking: Tracking,
    /// Fractional grab point inside the item box, in `[0, 1]²`.
    pub grab: DVec2,
    /// Frozen logical size of the item.
    pub base: DVec2,
    pub z_index: i32,
    /// Last known pointer position in viewport pixels.
    pub last: DVec2,
    pub over_trash: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// Result of ending a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released over the trash; the item went back to its tray.
    Trashed(ItemId),
    /// Left on the stage at its last position.
    Placed(ItemId),
}

pub struct DragEngine {
    items: Vec<DraggableItem>,
    state: DragState,
    /// Last z-index handed out. Only ever grows.
    z_counter: i32,
    stage: NodeId,
    trash: Option<NodeId>,
}

impl DragEngine {
    pub fn new(stage: NodeId, trash: Option<NodeId>, first_z_index: i32) -> Self {
        Self {
            items: Vec::new(),
            state: DragState::Idle,
            z_counter: first_z_index,
            stage,
            trash,
        }
    }

    /// Register a tray item. Its current parent becomes its home.
    pub fn register_item<S: SceneGraph>(&mut self, scene: &S, node: NodeId, scale_mult: f64) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        let mut item = DraggableItem::new(id, node, None).with_scale(scale_mult);
        item.natural_size = scene.natural_size(node);
        item.observe_home(scene.parent(node).filter(|p| *p != self.stage));
        self.items.push(item);
        id
    }

    pub fn item(&self, id: ItemId) -> Option<&DraggableItem> {
        self.items.get(id.0 as usize)
    }

    pub fn items(&self) -> &[DraggableItem] {
        &self.items
    }

    pub fn item_for_node(&self, node: NodeId) -> Option<ItemId> {
        self.items.iter().find(|i| i.node == node).map(|i| i.id)
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// True while any pointer is mid-drag.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Start dragging `id`. Returns false when the press is ignored.
    pub fn pointer_down<S: SceneGraph>(
        &mut self,
        scene: &mut S,
        stage: &StageTransform,
        id: ItemId,
        pointer: &Pointer,
    ) -> bool {
        if !pointer.is_primary_press() {
            return false;
        }
        if let DragState::Dragging(active) = self.state {
            log::debug!("drag: ignoring press on {:?}, {:?} already dragging", id, active.item);
            return false;
        }
        let stage_node = self.stage;
        let Some(item) = self.items.get_mut(id.0 as usize) else {
            return false;
        };
        let Some(rect) = scene.bounding_box(item.node) else {
            log::warn!("drag: item {:?} has no layout box yet", id);
            return false;
        };
        // Without a stage box no move can be placed; leave the item in its tray.
        if scene.bounding_box(stage_node).is_none() {
            log::warn!("drag: stage has no layout box, ignoring press on {:?}", id);
            return false;
        }

        item.observe_home(scene.parent(item.node).filter(|p| *p != stage_node));
        if item.natural_size.is_none() {
            item.natural_size = scene.natural_size(item.node);
        }

        let size = rect.size();
        let grab = if rect.is_measured() {
            ((pointer.client - rect.min) / size).clamp(DVec2::ZERO, DVec2::ONE)
        } else {
            DVec2::ZERO
        };
        let base = item.freeze_base_size(size);

        if !scene.contains(stage_node, item.node) {
            scene.reparent(item.node, stage_node, Insert::Last);
        }

        self.z_counter += 1;
        let tracking = match pointer.kind {
            PointerKind::Mouse => Tracking::Document,
            PointerKind::Touch | PointerKind::Pen => match scene.set_pointer_capture(item.node, pointer.id) {
                Ok(()) => Tracking::Captured,
                Err(_) => {
                    log::debug!("drag: pointer capture unavailable, tracking at window level");
                    Tracking::Document
                }
            },
        };

        self.state = DragState::Dragging(ActiveDrag {
            item: id,
            pointer_id: pointer.id,
            tracking,
            grab,
            base,
            z_index: self.z_counter,
            last: pointer.client,
            over_trash: false,
        });
        log::debug!("drag: start {:?} grab=({:.3}, {:.3})", id, grab.x, grab.y);
        self.move_to(scene, stage, pointer.client);
        true
    }

    /// Follow the pointer. Events from other pointer ids are discarded.
    pub fn pointer_move<S: SceneGraph>(&mut self, scene: &mut S, stage: &StageTransform, pointer: &Pointer) -> bool {
        match self.state {
            DragState::Dragging(active) if active.pointer_id == pointer.id => {}
            _ => return false,
        }
        self.move_to(scene, stage, pointer.client);
        true
    }

    /// Release: drop on the trash sends the item home, anything else leaves it.
    pub fn pointer_up<S: SceneGraph>(&mut self, scene: &mut S, pointer: &Pointer) -> Option<DropOutcome> {
        self.finish(scene, pointer, true)
    }

    /// Cancel: like release, but judged at the last move position because
    /// cancel events don't carry a meaningful location.
    pub fn pointer_cancel<S: SceneGraph>(&mut self, scene: &mut S, pointer: &Pointer) -> Option<DropOutcome> {
        self.finish(scene, pointer, false)
    }

    /// Send an item back to its tray and drop every inline override.
    pub fn return_home<S: SceneGraph>(&mut self, scene: &mut S, id: ItemId) {
        let Some(item) = self.items.get_mut(id.0 as usize) else {
            return;
        };
        if let Some(home) = item.home {
            scene.reparent(item.node, home, Insert::Last);
        } else {
            log::warn!("drag: {:?} has no home tray, leaving it in place", id);
        }
        scene.clear_item_style(item.node);
        item.placement = Placement::Tray { home: item.home };
    }

    /// Drop any in-flight drag without side effects other than clearing state.
    pub fn reset<S: SceneGraph>(&mut self, scene: &mut S) {
        if let DragState::Dragging(active) = self.state {
            self.release_capture(scene, &active);
            if let Some(trash) = self.trash {
                scene.set_armed(trash, false);
            }
        }
        self.state = DragState::Idle;
    }

    /// Snapshot of every item's placement for host readback.
    pub fn placements(&self, out: &mut Vec<PlacementRecord>) {
        out.clear();
        out.extend(self.items.iter().map(|item| match item.placement {
            Placement::Tray { .. } => PlacementRecord { item: item.id.0 as f32, ..Default::default() },
            Placement::OnStage { pos, z_index } => PlacementRecord {
                item: item.id.0 as f32,
                on_stage: 1.0,
                x: pos.x as f32,
                y: pos.y as f32,
                z: z_index as f32,
            },
        }));
    }

    fn move_to<S: SceneGraph>(&mut self, scene: &mut S, stage: &StageTransform, client: DVec2) {
        let DragState::Dragging(active) = &mut self.state else {
            return;
        };
        active.last = client;
        let Some(item) = self.items.get_mut(active.item.0 as usize) else {
            return;
        };

        match scene.bounding_box(self.stage) {
            Some(stage_rect) => {
                let pos = stage.to_logical(client, &stage_rect) - active.grab * active.base;
                scene.set_item_style(item.node, &ItemStyle { pos, size: active.base, z_index: active.z_index });
                item.placement = Placement::OnStage { pos, z_index: active.z_index };
            }
            None => log::warn!("drag: stage has no layout box, skipping move"),
        }

        if let Some(trash) = self.trash {
            // Viewport-space test: the trash icon is outside the scaled stage.
            let over = scene.bounding_box(trash).is_some_and(|r| r.contains(client));
            if over != active.over_trash {
                active.over_trash = over;
                scene.set_armed(trash, over);
            }
        }
    }

    fn finish<S: SceneGraph>(&mut self, scene: &mut S, pointer: &Pointer, use_event_position: bool) -> Option<DropOutcome> {
        let DragState::Dragging(mut active) = self.state else {
            return None;
        };
        if active.pointer_id != pointer.id {
            return None;
        }
        if use_event_position {
            active.last = pointer.client;
        }
        self.state = DragState::Idle;
        self.release_capture(scene, &active);

        let node = self.items.get(active.item.0 as usize)?.node;
        let over_trash = match self.trash {
            Some(trash) => {
                scene.set_armed(trash, false);
                scene.bounding_box(trash).is_some_and(|r| r.contains(active.last))
            }
            None => false,
        };

        if over_trash && scene.contains(self.stage, node) {
            log::debug!("drag: {:?} dropped on trash", active.item);
            self.return_home(scene, active.item);
            Some(DropOutcome::Trashed(active.item))
        } else {
            log::debug!("drag: {:?} placed", active.item);
            Some(DropOutcome::Placed(active.item))
        }
    }

    fn release_capture<S: SceneGraph>(&self, scene: &mut S, active: &ActiveDrag) {
        if active.tracking != Tracking::Captured {
            return;
        }
        if let Some(item) = self.items.get(active.item.0 as usize) {
            // Capture may already be gone (element moved, pointer lost); nothing to do then.
            let _ = scene.release_pointer_capture(item.node, active.pointer_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::LayoutPadding;
    use crate::api::types::LayoutMode;
    use crate::core::mock::MockScene;
    use crate::core::scene::Rect;
    use crate::stage::transform::LayoutMetrics;

    struct Fixture {
        scene: MockScene,
        stage: StageTransform,
        engine: DragEngine,
        tray: NodeId,
        stage_node: NodeId,
        trash: NodeId,
        item: ItemId,
        item_node: NodeId,
    }

    /// Stage at (300, 100) drawn at 0.5 scale; trash at (100, 600).
    fn fixture() -> Fixture {
        let mut scene = MockScene::new();
        let root = scene.add(None);
        let tray = scene.add(Some(root));
        let stage_node = scene.add_sized(Some(root), Rect::new(300.0, 100.0, 400.0, 600.0));
        let trash = scene.add_sized(Some(root), Rect::new(100.0, 600.0, 64.0, 80.0));
        let item_node = scene.add_sized(Some(tray), Rect::new(10.0, 10.0, 100.0, 50.0));
        scene.node_mut(item_node).natural = Some(DVec2::new(160.0, 80.0));

        let mut stage = StageTransform::new(DVec2::new(800.0, 1200.0));
        let metrics = LayoutMetrics {
            viewport: DVec2::new(400.0 + 48.0, 600.0 + 48.0),
            ..Default::default()
        };
        stage.recompute(&metrics, LayoutMode::Desktop, &LayoutPadding::desktop());
        assert!((stage.scale() - 0.5).abs() < 1e-12);

        let mut engine = DragEngine::new(stage_node, Some(trash), 100);
        let item = engine.register_item(&scene, item_node, 1.0);
        Fixture { scene, stage, engine, tray, stage_node, trash, item, item_node }
    }

    fn pointer(id: i32, kind: PointerKind, x: f64, y: f64) -> Pointer {
        Pointer { id, kind, is_primary: true, button: 0, client: DVec2::new(x, y) }
    }

    #[test]
    fn press_moves_item_onto_stage_with_fresh_z() {
        let mut f = fixture();
        assert!(f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0)));
        assert!(f.engine.is_dragging());
        assert_eq!(f.scene.parent(f.item_node), Some(f.stage_node));
        let style = f.scene.node(f.item_node).style.unwrap();
        assert_eq!(style.z_index, 101);
        assert_eq!(style.size, DVec2::new(160.0, 80.0));
        assert_eq!(f.engine.item(f.item).unwrap().home, Some(f.tray));
    }

    #[test]
    fn press_without_stage_box_leaves_item_in_tray() {
        let mut f = fixture();
        f.scene.node_mut(f.stage_node).rect = None;
        assert!(!f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0)));
        assert!(!f.engine.is_dragging());
        assert_eq!(f.scene.parent(f.item_node), Some(f.tray));
        assert!(f.scene.node(f.item_node).style.is_none());
        assert_eq!(f.engine.item(f.item).unwrap().placement, Placement::Tray { home: Some(f.tray) });

        // The z counter was not consumed by the refused press.
        f.scene.node_mut(f.stage_node).rect = Some(Rect::new(300.0, 100.0, 400.0, 600.0));
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0));
        assert_eq!(f.scene.node(f.item_node).style.unwrap().z_index, 101);
    }

    #[test]
    fn grab_point_stays_under_pointer() {
        let mut f = fixture();
        // Grab at 25% / 20% of the 100x50 tray box.
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0));
        f.engine.pointer_move(&mut f.scene, &f.stage, &pointer(1, PointerKind::Mouse, 500.0, 300.0));
        let style = f.scene.node(f.item_node).style.unwrap();
        // stage point: ((500-300)/0.5, (300-100)/0.5) = (400, 400); minus grab * base (40, 16)
        assert!((style.pos - DVec2::new(360.0, 384.0)).length() < 1e-9);
    }

    #[test]
    fn movement_delta_is_divided_by_scale() {
        let mut f = fixture();
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0));
        f.engine.pointer_move(&mut f.scene, &f.stage, &pointer(1, PointerKind::Mouse, 400.0, 200.0));
        let a = f.scene.node(f.item_node).style.unwrap().pos;
        f.engine.pointer_move(&mut f.scene, &f.stage, &pointer(1, PointerKind::Mouse, 437.0, 171.0));
        let b = f.scene.node(f.item_node).style.unwrap().pos;
        assert!((b - a - DVec2::new(74.0, -58.0)).length() < 1e-9);
    }

    #[test]
    fn foreign_pointer_ids_are_ignored() {
        let mut f = fixture();
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0));
        let before = f.scene.node(f.item_node).style;
        assert!(!f.engine.pointer_move(&mut f.scene, &f.stage, &pointer(2, PointerKind::Mouse, 900.0, 900.0)));
        assert_eq!(f.scene.node(f.item_node).style, before);
        assert_eq!(f.engine.pointer_up(&mut f.scene, &pointer(2, PointerKind::Mouse, 0.0, 0.0)), None);
        assert!(f.engine.is_dragging());
    }

    #[test]
    fn right_click_and_secondary_touch_do_not_start() {
        let mut f = fixture();
        let mut right = pointer(1, PointerKind::Mouse, 35.0, 20.0);
        right.button = 2;
        assert!(!f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &right));
        let mut secondary = pointer(7, PointerKind::Touch, 35.0, 20.0);
        secondary.is_primary = false;
        assert!(!f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &secondary));
        assert!(!f.engine.is_dragging());
    }

    #[test]
    fn hovering_trash_arms_it() {
        let mut f = fixture();
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0));
        f.engine.pointer_move(&mut f.scene, &f.stage, &pointer(1, PointerKind::Mouse, 120.0, 620.0));
        assert!(f.scene.node(f.trash).armed);
        f.engine.pointer_move(&mut f.scene, &f.stage, &pointer(1, PointerKind::Mouse, 500.0, 300.0));
        assert!(!f.scene.node(f.trash).armed);
    }

    #[test]
    fn trash_drop_round_trips_to_tray() {
        let mut f = fixture();
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0));
        f.engine.pointer_move(&mut f.scene, &f.stage, &pointer(1, PointerKind::Mouse, 500.0, 300.0));
        let outcome = f.engine.pointer_up(&mut f.scene, &pointer(1, PointerKind::Mouse, 130.0, 640.0));
        assert_eq!(outcome, Some(DropOutcome::Trashed(f.item)));
        assert_eq!(f.scene.parent(f.item_node), Some(f.tray));
        assert_eq!(f.scene.node(f.item_node).style, None);
        assert!(!f.scene.node(f.trash).armed);
        assert_eq!(f.engine.item(f.item).unwrap().placement, Placement::Tray { home: Some(f.tray) });
        assert!(!f.engine.is_dragging());
    }

    #[test]
    fn release_elsewhere_keeps_stage_position() {
        let mut f = fixture();
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0));
        f.engine.pointer_move(&mut f.scene, &f.stage, &pointer(1, PointerKind::Mouse, 500.0, 300.0));
        let outcome = f.engine.pointer_up(&mut f.scene, &pointer(1, PointerKind::Mouse, 500.0, 300.0));
        assert_eq!(outcome, Some(DropOutcome::Placed(f.item)));
        assert!(f.engine.item(f.item).unwrap().is_on_stage());
        assert_eq!(f.scene.parent(f.item_node), Some(f.stage_node));
    }

    #[test]
    fn touch_capture_is_released_on_cancel() {
        let mut f = fixture();
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(4, PointerKind::Touch, 35.0, 20.0));
        assert_eq!(f.scene.node(f.item_node).captured, Some(4));
        f.engine.pointer_move(&mut f.scene, &f.stage, &pointer(4, PointerKind::Touch, 500.0, 300.0));
        // Cancel reports (0, 0); the last move position decides.
        let outcome = f.engine.pointer_cancel(&mut f.scene, &pointer(4, PointerKind::Touch, 0.0, 0.0));
        assert_eq!(outcome, Some(DropOutcome::Placed(f.item)));
        assert_eq!(f.scene.node(f.item_node).captured, None);
        assert!(!f.engine.is_dragging());
    }

    #[test]
    fn cancel_over_trash_still_trashes() {
        let mut f = fixture();
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(4, PointerKind::Touch, 35.0, 20.0));
        f.engine.pointer_move(&mut f.scene, &f.stage, &pointer(4, PointerKind::Touch, 110.0, 610.0));
        let outcome = f.engine.pointer_cancel(&mut f.scene, &pointer(4, PointerKind::Touch, 0.0, 0.0));
        assert_eq!(outcome, Some(DropOutcome::Trashed(f.item)));
    }

    #[test]
    fn missing_capture_falls_back_to_window_tracking() {
        let mut f = fixture();
        f.scene.capture_supported = false;
        assert!(f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(4, PointerKind::Pen, 35.0, 20.0)));
        match f.engine.state() {
            DragState::Dragging(active) => assert_eq!(active.tracking, Tracking::Document),
            DragState::Idle => panic!("expected an active drag"),
        }
        assert!(f.engine.pointer_up(&mut f.scene, &pointer(4, PointerKind::Pen, 500.0, 300.0)).is_some());
        assert!(!f.engine.is_dragging());
    }

    #[test]
    fn z_index_grows_across_drags_and_base_size_is_stable() {
        let mut f = fixture();
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0));
        f.engine.pointer_up(&mut f.scene, &pointer(1, PointerKind::Mouse, 500.0, 300.0));
        // Item is now drawn on the stage at a different size.
        f.scene.node_mut(f.item_node).rect = Some(Rect::new(400.0, 200.0, 80.0, 40.0));
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 420.0, 210.0));
        let style = f.scene.node(f.item_node).style.unwrap();
        assert_eq!(style.z_index, 102);
        assert_eq!(style.size, DVec2::new(160.0, 80.0));
    }

    #[test]
    fn unmeasured_item_does_not_start() {
        let mut f = fixture();
        f.scene.node_mut(f.item_node).rect = None;
        assert!(!f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0)));
        assert!(!f.engine.is_dragging());
    }

    #[test]
    fn placements_report_stage_items() {
        let mut f = fixture();
        let mut out = Vec::new();
        f.engine.placements(&mut out);
        assert_eq!(out[0].on_stage, 0.0);
        f.engine.pointer_down(&mut f.scene, &f.stage, f.item, &pointer(1, PointerKind::Mouse, 35.0, 20.0));
        f.engine.placements(&mut out);
        assert_eq!(out[0].on_stage, 1.0);
        assert_eq!(out[0].z, 101.0);
    }
}
